//! Arity and sort signatures for constructors and rules.

use crate::error::TypingError;
use hilbertkit_dsl::Sort;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub operands: Vec<Sort>,
    pub result: Sort,
}

impl Signature {
    pub fn new(operands: impl Into<Vec<Sort>>, result: Sort) -> Self {
        Self {
            operands: operands.into(),
            result,
        }
    }

    pub fn arity(&self) -> usize {
        self.operands.len()
    }

    pub fn check_arity(&self, subject: &str, found: usize) -> Result<(), TypingError> {
        if found != self.arity() {
            return Err(TypingError::ArityMismatch {
                name: subject.to_string(),
                expected: self.arity(),
                found,
            });
        }
        Ok(())
    }

    /// `position` is zero-based; it is reported one-based.
    pub fn check_operand(
        &self,
        subject: &str,
        position: usize,
        found: Sort,
    ) -> Result<(), TypingError> {
        match self.operands.get(position) {
            Some(&expected) if expected == found => Ok(()),
            Some(&expected) => Err(TypingError::SortMismatch {
                name: subject.to_string(),
                position: position + 1,
                expected,
                found,
            }),
            None => Err(TypingError::ArityMismatch {
                name: subject.to_string(),
                expected: self.arity(),
                found: position + 1,
            }),
        }
    }

    pub fn check(&self, subject: &str, sorts: &[Sort]) -> Result<(), TypingError> {
        self.check_arity(subject, sorts.len())?;
        sorts
            .iter()
            .enumerate()
            .try_for_each(|(i, &s)| self.check_operand(subject, i, s))
    }
}

/// Signatures of every constructor and rule known to one logic system, plus
/// the sorts of its declared constants.
///
/// Built once while the system is assembled and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    constructors: BTreeMap<String, Signature>,
    rules: BTreeMap<String, Signature>,
    constants: BTreeMap<String, Sort>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_constructor(
        &mut self,
        name: impl Into<String>,
        signature: Signature,
    ) -> Result<(), TypingError> {
        declare(&mut self.constructors, name.into(), signature)
    }

    pub fn declare_rule(
        &mut self,
        label: impl Into<String>,
        signature: Signature,
    ) -> Result<(), TypingError> {
        declare(&mut self.rules, label.into(), signature)
    }

    pub fn declare_constant(
        &mut self,
        name: impl Into<String>,
        sort: Sort,
    ) -> Result<(), TypingError> {
        let name = name.into();
        if self.constants.contains_key(&name) {
            return Err(TypingError::DuplicateDeclaration { name });
        }
        self.constants.insert(name, sort);
        Ok(())
    }

    /// Sort of a constant declared through this registry.
    pub fn constant(&self, name: &str) -> Option<Sort> {
        self.constants.get(name).copied()
    }

    pub fn constructor(&self, name: &str) -> Option<&Signature> {
        self.constructors.get(name)
    }

    pub fn rule(&self, label: &str) -> Option<&Signature> {
        self.rules.get(label)
    }

    pub fn constructors(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.constructors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn declare(
    table: &mut BTreeMap<String, Signature>,
    name: String,
    signature: Signature,
) -> Result<(), TypingError> {
    if table.contains_key(&name) {
        return Err(TypingError::DuplicateDeclaration { name });
    }
    table.insert(name, signature);
    Ok(())
}
