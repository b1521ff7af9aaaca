//! Constant tokens used by the standard lowerings.

use crate::symbols::{SymbolId, SymbolInterner};

/// Spellings of the builtin constants, in the order they are interned.
pub const BUILTIN_CONSTANTS: [&str; 9] = ["(", ")", "->", "-.", "/\\", "A.", "E.", "=", "e."];

/// Ids of the builtin constants in one interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtins {
    pub lparen: SymbolId,
    pub rparen: SymbolId,
    pub imp: SymbolId,
    pub not: SymbolId,
    pub and: SymbolId,
    pub forall: SymbolId,
    pub exists: SymbolId,
    pub equals: SymbolId,
    pub elem: SymbolId,
}

impl Builtins {
    /// Interns every builtin constant (idempotent) and returns their ids.
    pub fn ensure(interner: &SymbolInterner) -> Self {
        let [lparen, rparen, imp, not, and, forall, exists, equals, elem] =
            BUILTIN_CONSTANTS.map(|name| interner.intern_constant(name));
        Self {
            lparen,
            rparen,
            imp,
            not,
            and,
            forall,
            exists,
            equals,
            elem,
        }
    }

    /// Builtin spellings belong to the lowerings and never name a user constant.
    pub fn is_reserved(name: &str) -> bool {
        BUILTIN_CONSTANTS.contains(&name)
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        [
            self.lparen,
            self.rparen,
            self.imp,
            self.not,
            self.and,
            self.forall,
            self.exists,
            self.equals,
            self.elem,
        ]
        .contains(&id)
    }
}
