//! Definitional macros.
//!
//! A definition is not a kernel constructor: it has no signature and no
//! lowering. It is expanded into primitive constructors before the tree ever
//! reaches the compiler, so `Or(φ, ψ)` and `¬φ → ψ` compile to the same tokens.

use crate::expr::{imp, not, Expr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("definition `{name}` expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Definition {
    pub name: &'static str,
    pub arity: usize,
    expand: fn(&[Expr]) -> Expr,
}

impl Definition {
    pub const fn new(name: &'static str, arity: usize, expand: fn(&[Expr]) -> Expr) -> Self {
        Self {
            name,
            arity,
            expand,
        }
    }

    /// Expands the macro after checking the argument count.
    pub fn apply(&self, args: Vec<Expr>) -> Result<Expr, DefinitionError> {
        if args.len() != self.arity {
            return Err(DefinitionError::Arity {
                name: self.name.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        Ok((self.expand)(&args))
    }
}

/// `Or(φ, ψ) := ¬φ → ψ`
pub const OR: Definition = Definition::new("∨", 2, expand_or);

fn expand_or(args: &[Expr]) -> Expr {
    match args {
        [a, b] => imp(not(a.clone()), b.clone()),
        _ => unreachable!("arity is checked by Definition::apply"),
    }
}

pub fn or(a: Expr, b: Expr) -> Expr {
    expand_or(&[a, b])
}
