//! Hilbertkit authoring surface
//!
//! Proofs are written against expression trees (`Expr`) built from a small set
//! of logical constructors, or against formula text that the parser lowers into
//! the same trees. Nothing here knows about symbols or token sequences; that is
//! the kernel's job.
//!
//! - `expr`: sorts, variables, constructors and the `Expr` tree.
//! - `definitions`: definitional macros such as `Or`, expanded before compilation.
//! - `scope`: which identifiers name variables (and of which sort) or constants.
//! - `parse`: Unicode / Metamath-ASCII formula text to `Expr`.

pub mod definitions;
pub mod expr;
pub mod parse;
pub mod scope;

pub use definitions::{Definition, DefinitionError, OR};
pub use expr::{
    all, and, chi, elem, eq, exists, imp, not, phi, psi, tau, theta, var, Constructor, Expr, Sort,
    Var,
};
pub use parse::{parse_formula, parse_formula_with_limit, ParseError, DEFAULT_MAX_DEPTH};
pub use scope::VariableScope;
