//! Inference and constructor rules.
//!
//! The engine is stateless once built. Every application runs in two phases:
//! a signature check (count and sorts of the hypotheses), then the rule's own
//! execution. The rule table is closed and validated when the engine is
//! constructed, so a misspelled rule fails while the system is assembled and
//! not halfway through a proof.

use crate::builtins::Builtins;
use crate::error::{KernelError, Result, ShapeError, TypingError};
use crate::formula::Formula;
use crate::lowering::{split_implication, LowerFn, LoweringTable};
use crate::signature::{Signature, SignatureRegistry};
use hilbertkit_dsl::Sort;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a rule executes once its signature check has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "constructor", rename_all = "snake_case")]
pub enum RuleImpl {
    /// Hypotheses `[minor, major]` (Metamath `ax-mp` order: `mp.1 = φ`,
    /// `mp.2 = ( φ -> ψ )`).
    ModusPonens,
    /// Syntax rule: applies the named constructor's lowering to its operands.
    Constructor(String),
}

/// A labelled formula handed to [`RuleEngine::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub label: String,
    pub formula: Formula,
}

impl Hypothesis {
    pub fn new(label: impl Into<String>, formula: Formula) -> Self {
        Self {
            label: label.into(),
            formula,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    ModusPonens,
    Construct(LowerFn),
}

#[derive(Debug, Clone)]
struct RuleEntry {
    signature: Signature,
    implementation: RuleImpl,
    action: Action,
}

#[derive(Debug, Clone)]
pub struct RuleEngine {
    builtins: Builtins,
    rules: BTreeMap<String, RuleEntry>,
}

fn invalid(label: &str, reason: impl Into<String>) -> TypingError {
    TypingError::InvalidRule {
        label: label.to_string(),
        reason: reason.into(),
    }
}

impl RuleEngine {
    /// Builds the engine from `(label, implementation)` pairs.
    ///
    /// Each label needs a rule signature, each rule signature needs an
    /// implementation, and constructor rules must share their constructor's
    /// signature and have a lowering.
    pub fn new(
        builtins: Builtins,
        signatures: &SignatureRegistry,
        lowerings: &LoweringTable,
        implementations: impl IntoIterator<Item = (String, RuleImpl)>,
    ) -> std::result::Result<Self, TypingError> {
        let mut rules = BTreeMap::new();
        for (label, implementation) in implementations {
            if rules.contains_key(&label) {
                return Err(TypingError::DuplicateDeclaration { name: label });
            }
            let signature = signatures
                .rule(&label)
                .ok_or_else(|| invalid(&label, "no signature declared"))?
                .clone();

            let action = match &implementation {
                RuleImpl::ModusPonens => {
                    if signature != Signature::new([Sort::Wff, Sort::Wff], Sort::Wff) {
                        return Err(invalid(&label, "modus ponens must be (wff, wff) -> wff"));
                    }
                    Action::ModusPonens
                }
                RuleImpl::Constructor(ctor) => {
                    let ctor_sig = signatures.constructor(ctor).ok_or_else(|| {
                        TypingError::UnknownConstructor { name: ctor.clone() }
                    })?;
                    if *ctor_sig != signature {
                        return Err(invalid(
                            &label,
                            format!("signature differs from constructor `{ctor}`"),
                        ));
                    }
                    let lower = lowerings
                        .get(ctor)
                        .ok_or_else(|| TypingError::MissingLowering { name: ctor.clone() })?;
                    Action::Construct(lower)
                }
            };

            rules.insert(
                label,
                RuleEntry {
                    signature,
                    implementation,
                    action,
                },
            );
        }

        if let Some((label, _)) = signatures.rules().find(|(l, _)| !rules.contains_key(*l)) {
            return Err(invalid(label, "signature declared without an implementation"));
        }

        Ok(Self { builtins, rules })
    }

    pub fn apply(&self, label: &str, hypotheses: &[Hypothesis], ctx: &str) -> Result<Formula> {
        let entry = self.rules.get(label).ok_or_else(|| {
            KernelError::typing(
                ctx,
                TypingError::UnknownRule {
                    label: label.to_string(),
                },
            )
        })?;

        let sorts: Vec<Sort> = hypotheses.iter().map(|h| h.formula.sort()).collect();
        entry
            .signature
            .check(label, &sorts)
            .map_err(|detail| KernelError::typing(ctx, detail))?;

        match entry.action {
            Action::ModusPonens => match hypotheses {
                [minor, major] => modus_ponens(&self.builtins, label, minor, major)
                    .map_err(|detail| KernelError::shape(ctx, detail)),
                _ => Err(KernelError::typing(
                    ctx,
                    TypingError::ArityMismatch {
                        name: label.to_string(),
                        expected: 2,
                        found: hypotheses.len(),
                    },
                )),
            },
            Action::Construct(lower) => {
                let operands: Vec<_> = hypotheses.iter().map(|h| h.formula.tokens()).collect();
                let tokens = lower(&self.builtins, &operands).ok_or_else(|| {
                    KernelError::typing(
                        ctx,
                        TypingError::LoweringFailed {
                            name: label.to_string(),
                        },
                    )
                })?;
                Ok(Formula::new(entry.signature.result, tokens))
            }
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.rules.contains_key(label)
    }

    pub fn signature(&self, label: &str) -> Option<&Signature> {
        self.rules.get(label).map(|e| &e.signature)
    }

    pub fn implementation(&self, label: &str) -> Option<&RuleImpl> {
        self.rules.get(label).map(|e| &e.implementation)
    }

    /// Label of the modus ponens rule, if the system has one.
    pub fn modus_ponens_label(&self) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, e)| matches!(e.action, Action::ModusPonens))
            .map(|(l, _)| l.as_str())
    }
}

/// `minor = A`, `major = ( A -> B )` gives `B`.
fn modus_ponens(
    builtins: &Builtins,
    rule: &str,
    minor: &Hypothesis,
    major: &Hypothesis,
) -> std::result::Result<Formula, ShapeError> {
    let (antecedent, consequent) = split_implication(builtins, major.formula.tokens())
        .ok_or_else(|| ShapeError::NotAnImplication {
            rule: rule.to_string(),
            premise: major.label.clone(),
        })?;
    if antecedent != minor.formula.tokens() {
        return Err(ShapeError::AntecedentMismatch {
            rule: rule.to_string(),
            minor: minor.label.clone(),
            major: major.label.clone(),
        });
    }
    Ok(Formula::new(Sort::Wff, consequent.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{compile, CompileEnv, CompileOptions};
    use crate::lowering::{lower_imp, lower_not};
    use crate::symbols::{Namespace, SymbolInterner};
    use crate::ErrorKind;
    use hilbertkit_dsl::{imp, not, phi, psi, Expr, Var};

    struct Fixture {
        interner: SymbolInterner,
        builtins: Builtins,
        signatures: SignatureRegistry,
        lowerings: LoweringTable,
        origin: Namespace,
    }

    fn fixture() -> Fixture {
        let interner = SymbolInterner::new();
        let builtins = Builtins::ensure(&interner);
        let mut signatures = SignatureRegistry::new();
        let mut lowerings = LoweringTable::new();
        let wff2 = Signature::new([Sort::Wff, Sort::Wff], Sort::Wff);
        let wff1 = Signature::new([Sort::Wff], Sort::Wff);
        signatures.declare_constructor("→", wff2.clone()).unwrap();
        signatures.declare_constructor("¬", wff1.clone()).unwrap();
        signatures.declare_rule("wi", wff2.clone()).unwrap();
        signatures.declare_rule("wn", wff1).unwrap();
        signatures.declare_rule("mp", wff2).unwrap();
        lowerings.register("→", lower_imp).unwrap();
        lowerings.register("¬", lower_not).unwrap();
        Fixture {
            interner,
            builtins,
            signatures,
            lowerings,
            origin: Namespace::origin("hilbert"),
        }
    }

    fn standard_rules() -> Vec<(String, RuleImpl)> {
        vec![
            ("wi".to_string(), RuleImpl::Constructor("→".to_string())),
            ("wn".to_string(), RuleImpl::Constructor("¬".to_string())),
            ("mp".to_string(), RuleImpl::ModusPonens),
        ]
    }

    impl Fixture {
        fn engine(&self) -> RuleEngine {
            RuleEngine::new(self.builtins, &self.signatures, &self.lowerings, standard_rules())
                .unwrap()
        }

        fn env(&self) -> CompileEnv<'_> {
            CompileEnv {
                interner: &self.interner,
                builtins: &self.builtins,
                signatures: &self.signatures,
                lowerings: &self.lowerings,
                origin: &self.origin,
                options: CompileOptions::default(),
            }
        }

        fn hyp(&self, label: &str, e: &Expr) -> Hypothesis {
            Hypothesis::new(label, compile(e, &self.env(), label).unwrap())
        }
    }

    #[test]
    fn modus_ponens_detaches_the_consequent() {
        let fx = fixture();
        let engine = fx.engine();
        let minor = fx.hyp("min", &phi());
        let major = fx.hyp("maj", &imp(phi(), psi()));
        let expected = fx.hyp("exp", &psi());

        let out = engine.apply("mp", &[minor, major], "t").unwrap();
        assert_eq!(out, expected.formula);
        assert_ne!(out.id(), expected.formula.id());
        assert_eq!(engine.modus_ponens_label(), Some("mp"));
    }

    #[test]
    fn modus_ponens_rejects_non_implications_and_mismatches() {
        let fx = fixture();
        let engine = fx.engine();

        let err = engine
            .apply("mp", &[fx.hyp("min", &phi()), fx.hyp("maj", &not(phi()))], "p/s3")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert_eq!(err.context(), "p/s3");
        assert!(matches!(
            err,
            KernelError::Shape {
                detail: ShapeError::NotAnImplication { .. },
                ..
            }
        ));

        let err = engine
            .apply(
                "mp",
                &[fx.hyp("min", &psi()), fx.hyp("maj", &imp(phi(), psi()))],
                "t",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            KernelError::Shape {
                detail: ShapeError::AntecedentMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn builtin_tokens_cannot_forge_an_implication() {
        let fx = fixture();
        let engine = fx.engine();

        // A bare `->` leaf would render as `( -. -> -> ψ )` and split in the
        // wrong place; it never becomes a formula.
        for (label, leaf) in [
            ("maj", imp(not(Expr::constant("->")), psi())),
            ("min", Expr::constant("-.")),
        ] {
            let err = compile(&leaf, &fx.env(), label).unwrap_err();
            assert!(matches!(
                err,
                KernelError::Typing {
                    detail: TypingError::ReservedToken { .. },
                    ..
                }
            ));
        }

        // The honest formulas of the same shape still fail to detach.
        let major = fx.hyp("maj", &imp(not(phi()), psi()));
        let minor = fx.hyp("min", &not(psi()));
        let err = engine.apply("mp", &[minor, major], "t").unwrap_err();
        assert!(matches!(
            err,
            KernelError::Shape {
                detail: ShapeError::AntecedentMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn signature_check_runs_before_execution() {
        let fx = fixture();
        let engine = fx.engine();

        let err = engine.apply("mp", &[fx.hyp("a", &phi())], "t").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Typing);

        let x = fx.hyp("x", &Expr::Var(Var::setvar("x")));
        let err = engine
            .apply("mp", &[x, fx.hyp("maj", &imp(phi(), psi()))], "t")
            .unwrap_err();
        assert!(matches!(
            err,
            KernelError::Typing {
                detail: TypingError::SortMismatch { position: 1, .. },
                ..
            }
        ));

        let err = engine.apply("ax-17", &[], "t").unwrap_err();
        assert!(matches!(
            err,
            KernelError::Typing {
                detail: TypingError::UnknownRule { .. },
                ..
            }
        ));
    }

    #[test]
    fn constructor_rules_build_formulas() {
        let fx = fixture();
        let engine = fx.engine();
        let out = engine
            .apply("wi", &[fx.hyp("a", &phi()), fx.hyp("b", &not(psi()))], "t")
            .unwrap();
        assert_eq!(out.render(&fx.interner), "( φ -> -. ψ )");
    }

    #[test]
    fn construction_rejects_an_open_rule_table() {
        let fx = fixture();
        let missing_impl = RuleEngine::new(
            fx.builtins,
            &fx.signatures,
            &fx.lowerings,
            vec![("mp".to_string(), RuleImpl::ModusPonens)],
        );
        assert!(matches!(missing_impl, Err(TypingError::InvalidRule { .. })));

        let mut rules = standard_rules();
        rules.push(("wa".to_string(), RuleImpl::Constructor("∧".to_string())));
        let unsigned = RuleEngine::new(fx.builtins, &fx.signatures, &fx.lowerings, rules);
        assert!(matches!(
            unsigned,
            Err(TypingError::InvalidRule { ref label, .. }) if label == "wa"
        ));

        let mismatched = RuleEngine::new(
            fx.builtins,
            &fx.signatures,
            &fx.lowerings,
            vec![
                ("wi".to_string(), RuleImpl::Constructor("¬".to_string())),
                ("wn".to_string(), RuleImpl::Constructor("¬".to_string())),
                ("mp".to_string(), RuleImpl::ModusPonens),
            ],
        );
        assert!(matches!(mismatched, Err(TypingError::InvalidRule { .. })));
    }
}
