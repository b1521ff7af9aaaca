//! Hilbertkit logics
//!
//! Concrete content assembled from kernel parts:
//!
//! - `propositional`: the Hilbert system over `→ ¬ ∧` with axioms A1–A3 and
//!   rules `wi wn wa mp`.
//! - `predicate`: the same connectives plus `∀ ∃ = ∈` and axioms AX5–AX13.
//! - `lemmas` / `catalogue`: proved lemmas and the registry the resolver uses.
//! - `build`: axioms, rule skeleton and resolved lemmas handed to a
//!   `DatabaseWriter` in dependency order.

pub mod build;
pub mod catalogue;
pub mod lemmas;
pub mod predicate;
pub mod propositional;

pub use build::{build_database, BuildOptions, BuildReport};
pub use catalogue::registry;
pub use predicate::predicate_system;
pub use propositional::hilbert_system;
