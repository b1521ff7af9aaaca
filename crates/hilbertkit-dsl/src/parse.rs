//! Formula text parser.
//!
//! Accepts both spellings used in practice:
//!
//! - Unicode: `φ → (ψ → φ)`, `¬ φ`, `φ ∧ ψ`, `φ ∨ ψ`, `∀ x φ`, `x ∈ y`
//! - Metamath ASCII: `( ph -> ( ps -> ph ) )`, `-. ph`, `( ph /\ ps )`,
//!   `( ph \/ ps )`, `A. x ph`, `E. x ph`, `x e. y`
//!
//! Precedence, loosest first: `→` (right associative), `∧`/`∨` (left
//! associative, same level), prefix `¬`/quantifiers, then atoms. Outer
//! parentheses are optional. Disjunction has no constructor of its own and is
//! expanded through [`crate::definitions::OR`].

use crate::definitions::{DefinitionError, OR};
use crate::expr::{self, Constructor, Expr};
use crate::scope::VariableScope;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char as pchar, multispace0},
    combinator::{all_consuming, opt, value},
    error::{Error, ErrorKind},
    sequence::{pair, preceded},
    IResult,
};
use thiserror::Error;

/// Nesting accepted by [`parse_formula`]. Each parenthesis, prefix operator,
/// implication or junction operand counts as one level.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("cannot parse formula `{text}`: {message}")]
    Syntax { text: String, message: String },
    #[error("formula text is nested deeper than the limit of {limit}")]
    TooDeep { limit: usize },
    #[error("unknown identifier `{name}`")]
    UnknownIdentifier { name: String },
    #[error("`{name}` is bound by a quantifier but is not a variable")]
    NotAVariable { name: String },
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Parses `text` and resolves its identifiers against `scope`.
pub fn parse_formula(text: &str, scope: &VariableScope) -> Result<Expr, ParseError> {
    parse_formula_with_limit(text, scope, DEFAULT_MAX_DEPTH)
}

/// Like [`parse_formula`], failing with [`ParseError::TooDeep`] once the text
/// nests past `max_depth`.
pub fn parse_formula_with_limit(
    text: &str,
    scope: &VariableScope,
    max_depth: usize,
) -> Result<Expr, ParseError> {
    let grammar = Grammar { max_depth };
    let surface = match grammar.formula(text) {
        Ok((_, surface)) => surface,
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => {
            return Err(ParseError::TooDeep { limit: max_depth });
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let rest = e.input.trim_start();
            let message = if rest.is_empty() {
                "unexpected end of formula".to_string()
            } else {
                let snippet: String = rest.chars().take(16).collect();
                format!("unexpected input at `{snippet}`")
            };
            return Err(ParseError::Syntax {
                text: text.to_string(),
                message,
            });
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ParseError::Syntax {
                text: text.to_string(),
                message: "incomplete input".to_string(),
            })
        }
    };
    resolve(surface, scope)
}

// ============================================================================
// Surface syntax
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantifier {
    All,
    Exists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Eq,
    Elem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Surface {
    Ident(String),
    Imp(Box<Surface>, Box<Surface>),
    Junction(Junction, Box<Surface>, Box<Surface>),
    Not(Box<Surface>),
    Quantified(Quantifier, String, Box<Surface>),
    Relation(Relation, String, String),
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

fn ident(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(is_ident_char))(input)
}

fn space(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn end_of_text(input: &str) -> IResult<&str, &str> {
    all_consuming(multispace0)(input)
}

fn arrow(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, alt((tag("->"), tag("→"))))(input)
}

fn junction_op(input: &str) -> IResult<&str, Junction> {
    preceded(
        multispace0,
        alt((
            value(Junction::And, alt((tag("/\\"), tag("∧")))),
            value(Junction::Or, alt((tag("\\/"), tag("∨")))),
        )),
    )(input)
}

fn negation_op(input: &str) -> IResult<&str, &str> {
    alt((tag("-."), tag("¬"), tag("~")))(input)
}

fn quantifier(input: &str) -> IResult<&str, Quantifier> {
    alt((
        value(Quantifier::All, alt((tag("A."), tag("∀")))),
        value(Quantifier::Exists, alt((tag("E."), tag("∃")))),
    ))(input)
}

fn open_paren(input: &str) -> IResult<&str, char> {
    pchar('(')(input)
}

fn close_paren(input: &str) -> IResult<&str, char> {
    preceded(multispace0, pchar(')'))(input)
}

/// The recursive part of the grammar. Every recursive descent carries its
/// depth; past `max_depth` parsing stops with a `TooLarge` failure instead of
/// growing the stack.
struct Grammar {
    max_depth: usize,
}

impl Grammar {
    fn formula<'a>(&self, input: &'a str) -> IResult<&'a str, Surface> {
        let (input, surface) = self.implication(input, 1)?;
        let (input, _) = end_of_text(input)?;
        Ok((input, surface))
    }

    fn guard<'a>(&self, input: &'a str, depth: usize) -> Result<(), nom::Err<Error<&'a str>>> {
        if depth > self.max_depth {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
        }
        Ok(())
    }

    fn implication<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, Surface> {
        self.guard(input, depth)?;
        let (input, lhs) = self.junction(input, depth)?;
        let (rest, arrow) = opt(arrow)(input)?;
        if arrow.is_none() {
            return Ok((input, lhs));
        }
        let (rest, rhs) = self.implication(rest, depth + 1)?;
        Ok((rest, Surface::Imp(Box::new(lhs), Box::new(rhs))))
    }

    fn junction<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, Surface> {
        let (mut input, mut lhs) = self.unary(input, depth)?;
        let mut depth = depth;
        loop {
            let (rest, op) = opt(junction_op)(input)?;
            let Some(op) = op else {
                return Ok((input, lhs));
            };
            // Left associative: every further operand deepens the tree.
            depth += 1;
            let (rest, rhs) = self.unary(rest, depth)?;
            lhs = Surface::Junction(op, Box::new(lhs), Box::new(rhs));
            input = rest;
        }
    }

    fn unary<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, Surface> {
        self.guard(input, depth)?;
        let (input, _) = space(input)?;
        if let Ok((rest, _)) = negation_op(input) {
            let (rest, body) = self.unary(rest, depth + 1)?;
            return Ok((rest, Surface::Not(Box::new(body))));
        }
        if let Ok((rest, q)) = quantifier(input) {
            let (rest, bound) = ident(rest)?;
            let (rest, body) = self.unary(rest, depth + 1)?;
            return Ok((rest, Surface::Quantified(q, bound.to_string(), Box::new(body))));
        }
        self.atom(input, depth)
    }

    fn atom<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, Surface> {
        if let Ok((rest, _)) = open_paren(input) {
            let (rest, inner) = self.implication(rest, depth + 1)?;
            let (rest, _) = close_paren(rest)?;
            return Ok((rest, inner));
        }
        relation_or_ident(input)
    }
}

fn relation_or_ident(input: &str) -> IResult<&str, Surface> {
    let (input, lhs) = ident(input)?;
    let (input, rel) = opt(pair(
        preceded(
            multispace0,
            alt((
                value(Relation::Eq, tag("=")),
                value(Relation::Elem, alt((tag("e."), tag("∈")))),
            )),
        ),
        ident,
    ))(input)?;
    Ok(match rel {
        Some((rel, rhs)) => (
            input,
            Surface::Relation(rel, lhs.to_string(), rhs.to_string()),
        ),
        None => (input, Surface::Ident(lhs.to_string())),
    })
}

// ============================================================================
// Resolution
// ============================================================================

fn resolve_ident(name: &str, scope: &VariableScope) -> Result<Expr, ParseError> {
    scope
        .resolve(name)
        .ok_or_else(|| ParseError::UnknownIdentifier {
            name: name.to_string(),
        })
}

fn resolve(surface: Surface, scope: &VariableScope) -> Result<Expr, ParseError> {
    Ok(match surface {
        Surface::Ident(name) => resolve_ident(&name, scope)?,
        Surface::Imp(a, b) => expr::imp(resolve(*a, scope)?, resolve(*b, scope)?),
        Surface::Junction(Junction::And, a, b) => {
            expr::and(resolve(*a, scope)?, resolve(*b, scope)?)
        }
        Surface::Junction(Junction::Or, a, b) => {
            OR.apply(vec![resolve(*a, scope)?, resolve(*b, scope)?])?
        }
        Surface::Not(a) => expr::not(resolve(*a, scope)?),
        Surface::Quantified(q, bound, body) => {
            let bound = scope
                .var(&bound)
                .cloned()
                .ok_or(ParseError::NotAVariable { name: bound })?;
            let ctor = match q {
                Quantifier::All => Constructor::ALL,
                Quantifier::Exists => Constructor::EXISTS,
            };
            ctor.apply(vec![Expr::Var(bound), resolve(*body, scope)?])
        }
        Surface::Relation(rel, lhs, rhs) => {
            let ctor = match rel {
                Relation::Eq => Constructor::EQ,
                Relation::Elem => Constructor::ELEM,
            };
            ctor.apply(vec![resolve_ident(&lhs, scope)?, resolve_ident(&rhs, scope)?])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{and, imp, not, phi, psi, Var};

    fn parse(text: &str) -> Expr {
        parse_formula(text, &VariableScope::standard()).unwrap()
    }

    #[test]
    fn implication_is_right_associative() {
        assert_eq!(parse("φ → ψ → φ"), imp(phi(), imp(psi(), phi())));
        assert_eq!(parse("( φ → ψ ) → φ"), imp(imp(phi(), psi()), phi()));
    }

    #[test]
    fn negation_binds_tighter_than_implication() {
        assert_eq!(parse("¬ φ → ψ"), imp(not(phi()), psi()));
        assert_eq!(parse("-. ( ph -> ps )"), not(imp(phi(), psi())));
    }

    #[test]
    fn conjunction_binds_tighter_than_implication() {
        assert_eq!(parse("φ ∧ ψ → φ"), imp(and(phi(), psi()), phi()));
    }

    #[test]
    fn quantifier_scopes_over_a_unary_body() {
        let x = Var::setvar("x");
        let y = Var::setvar("y");
        assert_eq!(
            parse("A. x x = y -> ph"),
            imp(expr::all(x.clone(), expr::eq(x, y)), phi())
        );
    }

    #[test]
    fn unbalanced_parenthesis_is_a_syntax_error() {
        let err = parse_formula("( ph -> ps", &VariableScope::standard()).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }), "{err:?}");
    }

    fn nested_negations(n: usize) -> String {
        format!("{}φ", "¬ ".repeat(n))
    }

    fn nested_parens(n: usize) -> String {
        format!("{}φ{}", "( ".repeat(n), " )".repeat(n))
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let scope = VariableScope::standard();
        let negs = parse_formula_with_limit(&nested_negations(7), &scope, 8).unwrap();
        assert_eq!(negs.depth(), 8);
        let parens = parse_formula_with_limit(&nested_parens(7), &scope, 8).unwrap();
        assert_eq!(parens, phi());
    }

    #[test]
    fn nesting_past_the_limit_is_too_deep() {
        let scope = VariableScope::standard();
        for text in [nested_negations(8), nested_parens(8)] {
            assert_eq!(
                parse_formula_with_limit(&text, &scope, 8),
                Err(ParseError::TooDeep { limit: 8 })
            );
        }
        let chain = format!("φ{}", " → φ".repeat(8));
        assert_eq!(
            parse_formula_with_limit(&chain, &scope, 8),
            Err(ParseError::TooDeep { limit: 8 })
        );
    }

    #[test]
    fn pathological_text_fails_without_exhausting_the_stack() {
        let scope = VariableScope::standard();
        for text in [nested_negations(20_000), nested_parens(20_000)] {
            assert_eq!(
                parse_formula(&text, &scope),
                Err(ParseError::TooDeep {
                    limit: DEFAULT_MAX_DEPTH
                })
            );
        }
    }
}
