//! Token-level formulas.
//!
//! A `Formula` is a sort tag plus an immutable token sequence. Equality and
//! hashing are structural. Each formula also carries a process-unique
//! [`FormulaId`], assigned when the compiler or the rule engine creates it and
//! shared by clones; proof builders use it to know which formulas they
//! produced themselves.

use crate::symbols::{SymbolId, SymbolInterner};
use hilbertkit_dsl::Sort;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_FORMULA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-local creation identity of a formula. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormulaId(u64);

impl FormulaId {
    fn fresh() -> Self {
        Self(NEXT_FORMULA_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Formula {
    id: FormulaId,
    sort: Sort,
    tokens: Arc<[SymbolId]>,
}

impl Formula {
    pub(crate) fn new(sort: Sort, tokens: Vec<SymbolId>) -> Self {
        Self {
            id: FormulaId::fresh(),
            sort,
            tokens: tokens.into(),
        }
    }

    pub fn id(&self) -> FormulaId {
        self.id
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn tokens(&self) -> &[SymbolId] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Space-separated display names; unknown ids render as `#<id>`.
    pub fn render(&self, interner: &SymbolInterner) -> String {
        self.tokens
            .iter()
            .map(|&id| interner.name_of(id).unwrap_or_else(|| id.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.sort == other.sort && self.tokens == other.tokens
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort.hash(state);
        self.tokens.hash(state);
    }
}
