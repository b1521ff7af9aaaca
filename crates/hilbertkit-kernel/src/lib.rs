//! Hilbertkit kernel
//!
//! The trusted part of the toolkit. Authoring trees from `hilbertkit-dsl` are
//! compiled into token-level [`Formula`]s, inference steps are checked by the
//! [`RuleEngine`], and the [`ProofBuilder`] refuses to let a step cite a
//! formula it did not itself produce. The [`DependencyResolver`] closes a set
//! of lemmas over their citations before anything reaches an [`Emitter`].
//!
//! Everything except the [`SymbolInterner`] is single-threaded and immutable
//! once built; the interner is shared through an `Arc` and may be used from any
//! thread.

pub mod builtins;
pub mod compile;
pub mod emit;
pub mod error;
pub mod formula;
pub mod lowering;
pub mod proof;
pub mod resolver;
pub mod rules;
pub mod signature;
pub mod symbols;
pub mod system;

pub use builtins::Builtins;
pub use compile::{compile, CompileEnv, CompileOptions};
pub use emit::{
    DatabaseWriter, EmissionBundle, EmitOptions, EmittedHypothesis, EmittedStatement,
    EmittedStep, Emitter, StatementKind, TokenNaming, VariableDeclaration,
};
pub use error::{
    ErrorKind, IntegrityError, KernelError, Result, ShapeError, TypingError, UnresolvedReference,
};
pub use formula::{Formula, FormulaId};
pub use lowering::{LowerFn, LoweringTable};
pub use proof::{Proof, ProofBuilder, ProofStep, StepKind};
pub use resolver::{DependencyResolver, LemmaCtor, LemmaRegistry, ResolvedLemmas};
pub use rules::{Hypothesis, RuleEngine, RuleImpl};
pub use signature::{Signature, SignatureRegistry};
pub use symbols::{Namespace, Symbol, SymbolId, SymbolInterner, SymbolKind, SymbolTable};
pub use system::{Authored, LogicSystem, LogicSystemBuilder};
