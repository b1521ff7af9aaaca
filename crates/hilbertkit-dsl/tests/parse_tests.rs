use hilbertkit_dsl::definitions::or;
use hilbertkit_dsl::{
    chi, imp, not, parse_formula, phi, psi, ParseError, Var, VariableScope,
};

fn scope() -> VariableScope {
    VariableScope::standard()
}

#[test]
fn axiom_texts_parse_in_both_spellings() {
    let a1 = imp(phi(), imp(psi(), phi()));
    assert_eq!(parse_formula("φ → (ψ → φ)", &scope()).unwrap(), a1);
    assert_eq!(parse_formula("( ph -> ( ps -> ph ) )", &scope()).unwrap(), a1);

    let a3 = imp(imp(not(phi()), not(psi())), imp(psi(), phi()));
    assert_eq!(
        parse_formula("( ¬φ → ¬ψ ) → ( ψ → φ )", &scope()).unwrap(),
        a3
    );
    assert_eq!(
        parse_formula("( ( -. ph -> -. ps ) -> ( ps -> ph ) )", &scope()).unwrap(),
        a3
    );
}

#[test]
fn disjunction_expands_through_the_or_macro() {
    let expected = or(phi(), psi());
    assert_eq!(parse_formula("φ ∨ ψ", &scope()).unwrap(), expected);
    assert_eq!(parse_formula("( ph \\/ ps )", &scope()).unwrap(), expected);
    assert_eq!(expected, imp(not(phi()), psi()));
}

#[test]
fn junctions_associate_to_the_left() {
    let parsed = parse_formula("φ ∨ ψ ∨ χ", &scope()).unwrap();
    assert_eq!(parsed, or(or(phi(), psi()), chi()));
}

#[test]
fn unknown_identifiers_are_reported_by_name() {
    let err = parse_formula("φ → η", &scope()).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownIdentifier {
            name: "η".to_string()
        }
    );
}

#[test]
fn quantifier_must_bind_a_variable() {
    let mut scope = scope();
    scope.declare_constant("c0");
    let err = parse_formula("∀ c0 φ", &scope).unwrap_err();
    assert!(matches!(err, ParseError::NotAVariable { ref name } if name == "c0"));
}

#[test]
fn custom_scopes_declare_their_own_variables() {
    let mut scope = VariableScope::new();
    scope.declare_var("p", Var::wff("p"));
    let parsed = parse_formula("p -> p", &scope).unwrap();
    let p = hilbertkit_dsl::Expr::Var(Var::wff("p"));
    assert_eq!(parsed, imp(p.clone(), p));
    assert!(parse_formula("ph", &scope).is_err());
}

#[test]
fn trailing_garbage_is_a_syntax_error() {
    let err = parse_formula("φ → ψ )", &scope()).unwrap_err();
    match err {
        ParseError::Syntax { text, message } => {
            assert_eq!(text, "φ → ψ )");
            assert!(message.contains(')'), "{message}");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
    assert!(matches!(
        parse_formula("", &scope()),
        Err(ParseError::Syntax { .. })
    ));
}
