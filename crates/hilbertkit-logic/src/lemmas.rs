//! Propositional lemmas, proved from A1–A3 and modus ponens.
//!
//! Names follow set.mm. Steps that cite another lemma in rule form (e.g.
//! `syl`) record the earlier steps they instantiate as premises; the cited
//! lemma is pulled in by the dependency resolver.

use hilbertkit_kernel::{LogicSystem, Proof, ProofBuilder, Result};

/// `φ → φ`
pub fn id(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "id");
    let s1 = pb.reference("s1", "φ → (φ → φ)", "A1", "")?;
    let s2 = pb.reference(
        "s2",
        "(φ → ((φ → φ) → φ)) → ((φ → (φ → φ)) → (φ → φ))",
        "A2",
        "",
    )?;
    let s3 = pb.reference("s3", "φ → ((φ → φ) → φ)", "A1", "")?;
    let s4 = pb.infer("s4", &s2, &s3, "")?;
    let s5 = pb.infer("s5", &s4, &s1, "")?;
    pb.finish(&s5)
}

/// `φ → (ψ → ψ)`
pub fn idd(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "idd");
    let s1 = pb.reference("s1", "ψ → ψ", "id", "")?;
    let s2 = pb.reference("s2", "(ψ → ψ) → (φ → (ψ → ψ))", "A1", "")?;
    let s3 = pb.infer("s3", &s2, &s1, "")?;
    pb.finish(&s3)
}

/// `φ ⊢ ψ → φ`
pub fn a1i(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "a1i");
    let h1 = pb.hypothesis("a1i.1", "φ")?;
    let s1 = pb.reference("s1", "φ → (ψ → φ)", "A1", "")?;
    let s2 = pb.infer("s2", &s1, &h1, "")?;
    pb.finish(&s2)
}

/// `φ → (ψ → χ) ⊢ (φ → ψ) → (φ → χ)`
pub fn a2i(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "a2i");
    let h1 = pb.hypothesis("a2i.1", "φ → (ψ → χ)")?;
    let s1 = pb.reference("s1", "(φ → (ψ → χ)) → ((φ → ψ) → (φ → χ))", "A2", "")?;
    let s2 = pb.infer("s2", &s1, &h1, "")?;
    pb.finish(&s2)
}

/// Deduction form of modus ponens.
pub fn mpd(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "mpd");
    let h1 = pb.hypothesis("mpd.1", "φ → ψ")?;
    let h2 = pb.hypothesis("mpd.2", "φ → (ψ → χ)")?;
    let s1 = pb.reference("s1", "(φ → (ψ → χ)) → ((φ → ψ) → (φ → χ))", "A2", "")?;
    let s2 = pb.infer("s2", &s1, &h2, "")?;
    let s3 = pb.infer("s3", &s2, &h1, "")?;
    pb.finish(&s3)
}

/// Hypothetical syllogism.
pub fn syl(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "syl");
    let h1 = pb.hypothesis("syl.1", "φ → ψ")?;
    let h2 = pb.hypothesis("syl.2", "ψ → χ")?;
    let s1 = pb.reference("s1", "(ψ → χ) → (φ → (ψ → χ))", "A1", "")?;
    let s2 = pb.infer("s2", &s1, &h2, "")?;
    let s3 = pb.reference("s3", "(φ → (ψ → χ)) → ((φ → ψ) → (φ → χ))", "A2", "")?;
    let s4 = pb.infer("s4", &s3, &s2, "")?;
    let s5 = pb.infer("s5", &s4, &h1, "")?;
    pb.finish(&s5)
}

pub fn a1d(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "a1d");
    let h1 = pb.hypothesis("a1d.1", "φ → ψ")?;
    let s1 = pb.reference("s1", "ψ → (χ → ψ)", "A1", "")?;
    let s2 = pb.reference_from("s2", "φ → (χ → ψ)", "syl", &[&h1, &s1], "")?;
    pb.finish(&s2)
}

/// Commute antecedents.
pub fn com12(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "com12");
    let h1 = pb.hypothesis("com12.1", "φ → (ψ → χ)")?;
    let s1 = pb.reference("s1", "(φ → (ψ → χ)) → ((φ → ψ) → (φ → χ))", "A2", "")?;
    let s2 = pb.infer("s2", &s1, &h1, "")?;
    let s3 = pb.reference("s3", "ψ → (φ → ψ)", "A1", "")?;
    let s4 = pb.reference_from("s4", "ψ → (φ → χ)", "syl", &[&s3, &s2], "")?;
    pb.finish(&s4)
}

/// Contraposition, directly A3.
pub fn con4(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "con4");
    let s1 = pb.reference("s1", "(¬φ → ¬ψ) → (ψ → φ)", "A3", "")?;
    pb.finish(&s1)
}

pub fn con4d(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "con4d");
    let h1 = pb.hypothesis("con4d.1", "φ → (¬ψ → ¬χ)")?;
    let s1 = pb.reference("s1", "(¬ψ → ¬χ) → (χ → ψ)", "con4", "")?;
    let s2 = pb.reference(
        "s2",
        "((¬ψ → ¬χ) → (χ → ψ)) → (φ → ((¬ψ → ¬χ) → (χ → ψ)))",
        "A1",
        "",
    )?;
    let s3 = pb.infer("s3", &s2, &s1, "")?;
    let s4 = pb.reference(
        "s4",
        "(φ → ((¬ψ → ¬χ) → (χ → ψ))) → ((φ → (¬ψ → ¬χ)) → (φ → (χ → ψ)))",
        "A2",
        "",
    )?;
    let s5 = pb.infer("s5", &s4, &s3, "")?;
    let s6 = pb.infer("s6", &s5, &h1, "")?;
    pb.finish(&s6)
}

pub fn pm2_21d(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "pm2.21d");
    let h1 = pb.hypothesis("pm2.21d.1", "φ → ¬ψ")?;
    let s1 = pb.reference_from("s1", "φ → (¬χ → ¬ψ)", "a1d", &[&h1], "")?;
    let s2 = pb.reference_from("s2", "φ → (ψ → χ)", "con4d", &[&s1], "")?;
    pb.finish(&s2)
}

/// From a contradiction, anything.
pub fn pm2_21(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "pm2.21");
    let s1 = pb.reference("s1", "¬φ → ¬φ", "id", "")?;
    let s2 = pb.reference_from("s2", "¬φ → (φ → ψ)", "pm2.21d", &[&s1], "")?;
    pb.finish(&s2)
}

pub fn pm2_24(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "pm2.24");
    let s1 = pb.reference("s1", "¬φ → (φ → ψ)", "pm2.21", "")?;
    let s2 = pb.reference_from("s2", "φ → (¬φ → ψ)", "com12", &[&s1], "")?;
    pb.finish(&s2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propositional::hilbert_system;
    use hilbertkit_kernel::{StepKind, SymbolInterner};
    use std::sync::Arc;

    fn system() -> LogicSystem {
        hilbert_system(Arc::new(SymbolInterner::new())).unwrap()
    }

    #[test]
    fn identity_uses_a1_twice_a2_once_and_two_detachments() {
        let sys = system();
        let proof = id(&sys).unwrap();
        let cites = |name: &str| {
            proof
                .steps()
                .iter()
                .filter(|s| s.reference.as_deref() == Some(name))
                .count()
        };
        assert_eq!(cites("A1"), 2);
        assert_eq!(cites("A2"), 1);
        assert_eq!(cites("mp"), 2);
        assert_eq!(
            proof.statement(),
            &sys.compile_statement("φ → φ", "expected").unwrap()
        );
    }

    #[test]
    fn statements_have_the_expected_shape() {
        let sys = system();
        let expected = [
            (syl(&sys).unwrap(), "φ → χ"),
            (mpd(&sys).unwrap(), "φ → χ"),
            (a1d(&sys).unwrap(), "φ → (χ → ψ)"),
            (com12(&sys).unwrap(), "ψ → (φ → χ)"),
            (con4d(&sys).unwrap(), "φ → (χ → ψ)"),
            (pm2_24(&sys).unwrap(), "φ → (¬φ → ψ)"),
        ];
        for (proof, text) in expected {
            assert_eq!(
                proof.statement(),
                &sys.compile_statement(text, "expected").unwrap(),
                "{}",
                proof.name()
            );
        }
    }

    #[test]
    fn rule_form_citations_record_their_premises() {
        let sys = system();
        let proof = com12(&sys).unwrap();
        let s4 = proof.step("s4").unwrap();
        assert_eq!(s4.kind, StepKind::Reference);
        assert_eq!(s4.reference.as_deref(), Some("syl"));
        assert_eq!(s4.operands, vec!["s3", "s2"]);
        assert_eq!(proof.hypotheses().count(), 1);
    }
}
