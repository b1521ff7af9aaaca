//! Identifier scopes for the formula parser.

use crate::expr::{Expr, Sort, Var};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Maps surface identifiers to variables or declared constants.
///
/// Several spellings may alias one variable (`ph` and `φ` both name `φ`), so
/// the ASCII and Unicode forms of a formula produce identical trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableScope {
    vars: BTreeMap<String, Var>,
    constants: BTreeSet<String>,
}

impl VariableScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Greek wff metavariables with their set.mm ASCII names, plus setvars
    /// `x y z w`.
    pub fn standard() -> Self {
        let mut scope = Self::new();
        for (greek, ascii) in [("φ", "ph"), ("ψ", "ps"), ("χ", "ch"), ("θ", "th"), ("τ", "ta")] {
            let v = Var::wff(greek);
            scope.declare_var(greek, v.clone());
            scope.declare_var(ascii, v);
        }
        for name in ["x", "y", "z", "w"] {
            scope.declare_var(name, Var::setvar(name));
        }
        scope
    }

    pub fn declare_var(&mut self, alias: impl Into<String>, var: Var) -> &mut Self {
        self.vars.insert(alias.into(), var);
        self
    }

    pub fn declare_constant(&mut self, name: impl Into<String>) -> &mut Self {
        self.constants.insert(name.into());
        self
    }

    pub fn var(&self, alias: &str) -> Option<&Var> {
        self.vars.get(alias)
    }

    /// Variables take precedence over constants with the same spelling.
    pub fn resolve(&self, ident: &str) -> Option<Expr> {
        if let Some(v) = self.vars.get(ident) {
            return Some(Expr::Var(v.clone()));
        }
        self.constants
            .contains(ident)
            .then(|| Expr::constant(ident))
    }

    /// Sort of a variable by its canonical name (not by alias).
    pub fn sort_of(&self, name: &str) -> Option<Sort> {
        self.vars
            .values()
            .find(|v| v.name == name)
            .map(|v| v.sort)
    }

    /// Distinct variables, sorted by canonical name.
    pub fn variables(&self) -> Vec<&Var> {
        let set: BTreeSet<&Var> = self.vars.values().collect();
        set.into_iter().collect()
    }
}
