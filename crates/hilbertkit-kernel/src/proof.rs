//! Proofs and the provenance-tracking proof builder.

use crate::error::{IntegrityError, KernelError, Result, TypingError};
use crate::formula::{Formula, FormulaId};
use crate::rules::Hypothesis;
use crate::system::{Authored, LogicSystem};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Local assumption of the proof, emitted as an essential hypothesis.
    Hypothesis,
    /// Instance of a named axiom, lemma or rule; checked downstream.
    Reference,
    /// Produced by the rule engine.
    Inference,
    /// Asserted without justification.
    Opaque,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProofStep {
    pub label: String,
    pub formula: Formula,
    pub kind: StepKind,
    /// Labels of earlier steps this one was derived from.
    pub operands: Vec<String>,
    pub reference: Option<String>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Proof {
    name: String,
    statement: Formula,
    steps: Vec<ProofStep>,
}

impl Proof {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Always the formula of the last step.
    pub fn statement(&self) -> &Formula {
        &self.statement
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn step(&self, label: &str) -> Option<&ProofStep> {
        self.steps.iter().find(|s| s.label == label)
    }

    /// Distinct names cited by any step, in order of first citation.
    pub fn references(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for name in self.steps.iter().filter_map(|s| s.reference.as_deref()) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    pub fn hypotheses(&self) -> impl Iterator<Item = &ProofStep> {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::Hypothesis)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates the steps of one proof.
///
/// Inference operands must be formulas this builder produced. The check is by
/// [`FormulaId`], so a token-identical formula compiled elsewhere is rejected.
pub struct ProofBuilder<'s> {
    system: &'s LogicSystem,
    name: String,
    steps: Vec<ProofStep>,
    provenance: AHashMap<FormulaId, usize>,
    labels: AHashMap<String, usize>,
}

impl<'s> ProofBuilder<'s> {
    pub fn new(system: &'s LogicSystem, name: impl Into<String>) -> Self {
        Self {
            system,
            name: name.into(),
            steps: Vec::new(),
            provenance: AHashMap::new(),
            labels: AHashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system(&self) -> &'s LogicSystem {
        self.system
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn ctx(&self, label: &str) -> String {
        format!("{}/{}", self.name, label)
    }

    fn claim(&self, label: &str) -> Result<String> {
        let ctx = self.ctx(label);
        if self.labels.contains_key(label) {
            return Err(KernelError::integrity(
                ctx,
                IntegrityError::DuplicateLabel {
                    label: label.to_string(),
                },
            ));
        }
        Ok(ctx)
    }

    fn operand(&self, role: &'static str, formula: &Formula, ctx: &str) -> Result<String> {
        self.provenance
            .get(&formula.id())
            .map(|&idx| self.steps[idx].label.clone())
            .ok_or_else(|| {
                KernelError::integrity(ctx, IntegrityError::UnknownProvenance { role })
            })
    }

    fn record(&mut self, step: ProofStep) -> Formula {
        let idx = self.steps.len();
        tracing::trace!(
            proof = %self.name,
            step = %step.label,
            kind = ?step.kind,
            reference = step.reference.as_deref().unwrap_or(""),
            "recorded proof step"
        );
        self.provenance.insert(step.formula.id(), idx);
        self.labels.insert(step.label.clone(), idx);
        let formula = step.formula.clone();
        self.steps.push(step);
        formula
    }

    fn push(
        &mut self,
        label: &str,
        formula: Formula,
        kind: StepKind,
        operands: Vec<String>,
        reference: Option<&str>,
        note: &str,
    ) -> Formula {
        self.record(ProofStep {
            label: label.to_string(),
            formula,
            kind,
            operands,
            reference: reference.map(str::to_string),
            note: note.to_string(),
        })
    }

    pub fn hypothesis<S: Authored + ?Sized>(
        &mut self,
        label: &str,
        stmt: &S,
    ) -> Result<Formula> {
        let ctx = self.claim(label)?;
        let formula = self.system.compile_statement(stmt, &ctx)?;
        Ok(self.push(label, formula, StepKind::Hypothesis, vec![], None, ""))
    }

    /// A step asserted to be an instance of `ref_name`.
    pub fn reference<S: Authored + ?Sized>(
        &mut self,
        label: &str,
        stmt: &S,
        ref_name: &str,
        note: &str,
    ) -> Result<Formula> {
        self.reference_from(label, stmt, ref_name, &[], note)
    }

    /// Like [`reference`](Self::reference), for a cited rule-form lemma applied
    /// to earlier steps (its premises).
    pub fn reference_from<S: Authored + ?Sized>(
        &mut self,
        label: &str,
        stmt: &S,
        ref_name: &str,
        premises: &[&Formula],
        note: &str,
    ) -> Result<Formula> {
        let ctx = self.claim(label)?;
        let operands = premises
            .iter()
            .map(|p| self.operand("premise", p, &ctx))
            .collect::<Result<Vec<_>>>()?;
        let formula = self.system.compile_statement(stmt, &ctx)?;
        Ok(self.push(
            label,
            formula,
            StepKind::Reference,
            operands,
            Some(ref_name),
            note,
        ))
    }

    pub fn opaque<S: Authored + ?Sized>(
        &mut self,
        label: &str,
        stmt: &S,
        note: &str,
    ) -> Result<Formula> {
        let ctx = self.claim(label)?;
        let formula = self.system.compile_statement(stmt, &ctx)?;
        Ok(self.push(label, formula, StepKind::Opaque, vec![], None, note))
    }

    /// Modus ponens: `minor = φ`, `major = ( φ -> ψ )`, result `ψ`.
    pub fn infer(
        &mut self,
        label: &str,
        major: &Formula,
        minor: &Formula,
        note: &str,
    ) -> Result<Formula> {
        let ctx = self.claim(label)?;
        let minor_label = self.operand("minor", minor, &ctx)?;
        let major_label = self.operand("major", major, &ctx)?;
        let system = self.system;
        let rule = system.rules().modus_ponens_label().ok_or_else(|| {
            KernelError::typing(
                ctx.as_str(),
                TypingError::UnknownRule {
                    label: "mp".to_string(),
                },
            )
        })?;

        let formula = system.apply(
            rule,
            &[
                Hypothesis::new(minor_label.clone(), minor.clone()),
                Hypothesis::new(major_label.clone(), major.clone()),
            ],
            &ctx,
        )?;
        Ok(self.push(
            label,
            formula,
            StepKind::Inference,
            vec![minor_label, major_label],
            Some(rule),
            note,
        ))
    }

    /// `statement` must be the very formula produced by the last step.
    pub fn finish(self, statement: &Formula) -> Result<Proof> {
        let ctx = self.ctx("finish");
        let last = self
            .steps
            .last()
            .ok_or_else(|| KernelError::integrity(ctx.as_str(), IntegrityError::EmptyProof))?;
        if last.formula.id() != statement.id() {
            return Err(KernelError::integrity(
                ctx,
                IntegrityError::StatementNotFinal {
                    last: last.label.clone(),
                },
            ));
        }
        let statement = last.formula.clone();
        Ok(Proof {
            name: self.name,
            statement,
            steps: self.steps,
        })
    }
}
