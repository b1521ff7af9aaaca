//! Predicate extension: quantifiers, equality and membership over setvars.
//!
//! The connectives and modus ponens are shared with the propositional system,
//! but variables live in their own origin, so `φ` here is not the
//! propositional `φ`.

use crate::propositional::with_connectives;
use hilbertkit_dsl::{Constructor, Sort};
use hilbertkit_kernel::lowering::{lower_elem, lower_eq, lower_exists, lower_forall};
use hilbertkit_kernel::{LogicSystem, LowerFn, Result, RuleImpl, Signature, SymbolInterner};
use std::sync::Arc;

pub const ORIGIN: &str = "predicate";

pub const WAL: &str = "wal";
pub const WEX: &str = "wex";
pub const WEQ: &str = "weq";
pub const WEL: &str = "wel";

pub const AXIOMS: [(&str, &str); 9] = [
    ("AX5", "ph -> A. x ph"),
    ("AX6", "-. A. x -. x = y"),
    ("AX7", "x = y -> ( x = z -> y = z )"),
    ("AX8", "x = y -> ( x e. z -> y e. z )"),
    ("AX9", "x = y -> ( z e. x -> z e. y )"),
    ("AX10", "-. A. x ph -> A. x -. A. x ph"),
    ("AX11", "A. x A. y ph -> A. y A. x ph"),
    ("AX12", "x = y -> ( A. y ph -> A. x ( x = y -> ph ) )"),
    ("AX13", "-. x = y -> ( y = z -> A. x y = z )"),
];

pub const SETMM_TO_PREDICATE: [(&str, &str); 9] = [
    ("ax-5", "AX5"),
    ("ax-6", "AX6"),
    ("ax-7", "AX7"),
    ("ax-8", "AX8"),
    ("ax-9", "AX9"),
    ("ax-10", "AX10"),
    ("ax-11", "AX11"),
    ("ax-12", "AX12"),
    ("ax-13", "AX13"),
];

fn binders() -> [(Constructor, &'static str, Signature, LowerFn); 4] {
    let binder = Signature::new([Sort::Setvar, Sort::Wff], Sort::Wff);
    let relation = Signature::new([Sort::Setvar, Sort::Setvar], Sort::Wff);
    [
        (Constructor::ALL, WAL, binder.clone(), lower_forall),
        (Constructor::EXISTS, WEX, binder, lower_exists),
        (Constructor::EQ, WEQ, relation.clone(), lower_eq),
        (Constructor::ELEM, WEL, relation, lower_elem),
    ]
}

pub fn predicate_system(interner: Arc<SymbolInterner>) -> Result<LogicSystem> {
    let mut builder = with_connectives(
        LogicSystem::builder("predicate")
            .interner(interner)
            .origin(ORIGIN),
    );
    for (ctor, rule, signature, lower) in binders() {
        builder = builder
            .constructor(ctor.name, signature.clone(), lower)
            .rule(rule, signature, RuleImpl::Constructor(ctor.name.to_string()));
    }
    AXIOMS
        .iter()
        .fold(builder, |b, (name, text)| b.axiom_text(*name, *text))
        .build()
}

pub fn setmm_label(label: &str) -> Option<&'static str> {
    SETMM_TO_PREDICATE
        .iter()
        .find(|(setmm, _)| *setmm == label)
        .map(|(_, local)| *local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilbertkit_dsl::{all, eq, phi, Expr, Var};
    use hilbertkit_kernel::{ErrorKind, Hypothesis};

    fn system() -> LogicSystem {
        predicate_system(Arc::new(SymbolInterner::new())).unwrap()
    }

    #[test]
    fn axioms_compile_in_metamath_layout() {
        let sys = system();
        let axioms = sys.compile_axioms().unwrap();
        assert_eq!(axioms.len(), 9);
        assert_eq!(
            axioms["AX6"].render(sys.interner()),
            "-. A. x -. x = y"
        );
        assert_eq!(
            axioms["AX12"].render(sys.interner()),
            "( x = y -> ( A. y φ -> A. x ( x = y -> φ ) ) )"
        );
    }

    #[test]
    fn binders_require_a_setvar() {
        let sys = system();
        let err = sys
            .compile(&all(Var::wff("φ"), phi()), "t")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Typing);

        let x = sys.compile(&Expr::Var(Var::setvar("x")), "t").unwrap();
        let y = sys.compile(&Expr::Var(Var::setvar("y")), "t").unwrap();
        let via_rule = sys
            .apply(
                WEQ,
                &[Hypothesis::new("x", x.clone()), Hypothesis::new("y", y)],
                "t",
            )
            .unwrap();
        let direct = sys
            .compile(&eq(Var::setvar("x"), Var::setvar("y")), "t")
            .unwrap();
        assert_eq!(via_rule, direct);

        let err = sys
            .apply(WAL, &[Hypothesis::new("x", x.clone()), Hypothesis::new("x2", x)], "t")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Typing);
    }

    #[test]
    fn origins_keep_propositional_variables_apart() {
        let interner = Arc::new(SymbolInterner::new());
        let hilbert = crate::propositional::hilbert_system(interner.clone()).unwrap();
        let pred = predicate_system(interner).unwrap();
        assert_ne!(
            hilbert.compile(&phi(), "t").unwrap(),
            pred.compile(&phi(), "t").unwrap()
        );
        assert_eq!(setmm_label("ax-13"), Some("AX13"));
    }
}
