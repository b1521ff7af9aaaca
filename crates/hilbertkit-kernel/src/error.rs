//! Kernel error taxonomy.
//!
//! Every failure carries the caller-supplied context string (usually
//! `"<proof>/<step>"`) and a structured detail. Errors are never downgraded;
//! only the dependency resolver batches several problems into one report.

use hilbertkit_dsl::{ParseError, Sort};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T, E = KernelError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Typing,
    Shape,
    ReferentialIntegrity,
    UnresolvedDependency,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Typing => "typing error",
            ErrorKind::Shape => "shape error",
            ErrorKind::ReferentialIntegrity => "referential integrity error",
            ErrorKind::UnresolvedDependency => "unresolved dependency",
        })
    }
}

// ============================================================================
// Details
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("unknown constructor `{name}`")]
    UnknownConstructor { name: String },

    #[error("unknown rule `{label}`")]
    UnknownRule { label: String },

    #[error("`{name}` expects {expected} operand(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("operand {position} of `{name}` must have sort {expected}, got {found}")]
    SortMismatch {
        name: String,
        position: usize,
        expected: Sort,
        found: Sort,
    },

    #[error("constant `{name}` has not been declared")]
    UndeclaredConstant { name: String },

    #[error("`{name}` is a builtin token and cannot be used as a constant")]
    ReservedToken { name: String },

    #[error("no lowering registered for constructor `{name}`")]
    MissingLowering { name: String },

    #[error("lowering for `{name}` rejected its operands")]
    LoweringFailed { name: String },

    #[error("expression is nested deeper than the limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("`{name}` is declared twice")]
    DuplicateDeclaration { name: String },

    #[error("rule `{label}` is malformed: {reason}")]
    InvalidRule { label: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("major premise `{premise}` of `{rule}` is not of the form ( φ -> ψ )")]
    NotAnImplication { rule: String, premise: String },

    #[error("antecedent of `{major}` does not match `{minor}` in `{rule}` (token-level)")]
    AntecedentMismatch {
        rule: String,
        minor: String,
        major: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("{role} operand was not produced by this proof")]
    UnknownProvenance { role: &'static str },

    #[error("step label `{label}` is already used in this proof")]
    DuplicateLabel { label: String },

    #[error("proof has no steps")]
    EmptyProof,

    #[error("statement is not the formula produced by the final step `{last}`")]
    StatementNotFinal { last: String },

    #[error("constructor registered as `{registered}` produced a proof named `{produced}`")]
    LemmaNameMismatch {
        registered: String,
        produced: String,
    },
}

/// One citation that names nothing known to the resolver.
///
/// `lemma`/`step` are `None` when the name was requested directly as a seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub lemma: Option<String>,
    pub step: Option<String>,
    pub reference: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lemma, &self.step) {
            (Some(lemma), Some(step)) => write!(f, "{lemma}/{step} -> {}", self.reference),
            (Some(lemma), None) => write!(f, "{lemma} -> {}", self.reference),
            _ => write!(f, "requested `{}`", self.reference),
        }
    }
}

fn render_unresolved(unresolved: &[UnresolvedReference]) -> String {
    unresolved
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// KernelError
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("{context}: {detail}")]
    Typing {
        context: String,
        #[source]
        detail: TypingError,
    },

    #[error("{context}: {detail}")]
    Shape {
        context: String,
        #[source]
        detail: ShapeError,
    },

    #[error("{context}: {detail}")]
    ReferentialIntegrity {
        context: String,
        #[source]
        detail: IntegrityError,
    },

    #[error(
        "{}: {} unresolved reference(s): {}",
        .context,
        .unresolved.len(),
        render_unresolved(.unresolved)
    )]
    UnresolvedDependency {
        context: String,
        unresolved: Vec<UnresolvedReference>,
    },
}

impl KernelError {
    pub fn typing(context: impl Into<String>, detail: impl Into<TypingError>) -> Self {
        KernelError::Typing {
            context: context.into(),
            detail: detail.into(),
        }
    }

    pub fn shape(context: impl Into<String>, detail: ShapeError) -> Self {
        KernelError::Shape {
            context: context.into(),
            detail,
        }
    }

    pub fn integrity(context: impl Into<String>, detail: IntegrityError) -> Self {
        KernelError::ReferentialIntegrity {
            context: context.into(),
            detail,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KernelError::Typing { .. } => ErrorKind::Typing,
            KernelError::Shape { .. } => ErrorKind::Shape,
            KernelError::ReferentialIntegrity { .. } => ErrorKind::ReferentialIntegrity,
            KernelError::UnresolvedDependency { .. } => ErrorKind::UnresolvedDependency,
        }
    }

    pub fn context(&self) -> &str {
        match self {
            KernelError::Typing { context, .. }
            | KernelError::Shape { context, .. }
            | KernelError::ReferentialIntegrity { context, .. }
            | KernelError::UnresolvedDependency { context, .. } => context,
        }
    }
}
