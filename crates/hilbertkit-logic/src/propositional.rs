//! Propositional Hilbert system.

use hilbertkit_dsl::{Constructor, Sort};
use hilbertkit_kernel::lowering::{lower_and, lower_imp, lower_not};
use hilbertkit_kernel::{
    LogicSystem, LogicSystemBuilder, LowerFn, Result, RuleImpl, Signature, SymbolInterner,
};
use std::sync::Arc;

pub const ORIGIN: &str = "hilbert";

pub const WI: &str = "wi";
pub const WN: &str = "wn";
pub const WA: &str = "wa";
pub const MP: &str = "mp";

/// A1 (simplification), A2 (Frege), A3 (transposition).
pub const AXIOMS: [(&str, &str); 3] = [
    ("A1", "φ → (ψ → φ)"),
    ("A2", "(φ → (ψ → χ)) → ((φ → ψ) → (φ → χ))"),
    ("A3", "(¬φ → ¬ψ) → (ψ → φ)"),
];

/// set.mm label to local label.
pub const SETMM_TO_HILBERT: [(&str, &str); 4] = [
    ("ax-1", "A1"),
    ("ax-2", "A2"),
    ("ax-3", "A3"),
    ("ax-mp", MP),
];

fn wff(arity: usize) -> Signature {
    Signature::new(vec![Sort::Wff; arity], Sort::Wff)
}

/// `(constructor, syntax rule, signature, lowering)` for `→ ¬ ∧`.
pub(crate) fn connectives() -> [(Constructor, &'static str, Signature, LowerFn); 3] {
    [
        (Constructor::IMP, WI, wff(2), lower_imp),
        (Constructor::NOT, WN, wff(1), lower_not),
        (Constructor::AND, WA, wff(2), lower_and),
    ]
}

/// Connectives, their syntax rules and modus ponens; no axioms.
pub(crate) fn with_connectives(mut builder: LogicSystemBuilder) -> LogicSystemBuilder {
    for (ctor, rule, signature, lower) in connectives() {
        builder = builder
            .constructor(ctor.name, signature.clone(), lower)
            .rule(rule, signature, RuleImpl::Constructor(ctor.name.to_string()));
    }
    builder.rule(MP, wff(2), RuleImpl::ModusPonens)
}

pub fn hilbert_system(interner: Arc<SymbolInterner>) -> Result<LogicSystem> {
    let builder = with_connectives(
        LogicSystem::builder("hilbert")
            .interner(interner)
            .origin(ORIGIN),
    );
    AXIOMS
        .iter()
        .fold(builder, |b, (name, text)| b.axiom_text(*name, *text))
        .build()
}

pub fn setmm_label(label: &str) -> Option<&'static str> {
    SETMM_TO_HILBERT
        .iter()
        .find(|(setmm, _)| *setmm == label)
        .map(|(_, local)| *local)
}
