//! Lowering functions: how a constructor arranges its operands' tokens.
//!
//! The standard arrangement is the one set.mm uses, e.g. `( A -> B )` and
//! `-. A`, so token sequences can be written to a Metamath database verbatim.

use crate::builtins::Builtins;
use crate::error::TypingError;
use crate::symbols::SymbolId;
use std::collections::BTreeMap;

/// Returns `None` when the operand count does not fit the arrangement.
pub type LowerFn = fn(&Builtins, &[&[SymbolId]]) -> Option<Vec<SymbolId>>;

#[derive(Debug, Clone, Default)]
pub struct LoweringTable {
    table: BTreeMap<String, LowerFn>,
}

impl LoweringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        lower: LowerFn,
    ) -> Result<(), TypingError> {
        let name = name.into();
        if self.table.contains_key(&name) {
            return Err(TypingError::DuplicateDeclaration { name });
        }
        self.table.insert(name, lower);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<LowerFn> {
        self.table.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }
}

// ============================================================================
// Standard arrangements
// ============================================================================

fn infix(
    open: SymbolId,
    op: SymbolId,
    close: SymbolId,
    a: &[SymbolId],
    b: &[SymbolId],
) -> Vec<SymbolId> {
    let mut out = Vec::with_capacity(a.len() + b.len() + 3);
    out.push(open);
    out.extend_from_slice(a);
    out.push(op);
    out.extend_from_slice(b);
    out.push(close);
    out
}

fn prefix(ops: &[SymbolId], operands: &[&[SymbolId]]) -> Vec<SymbolId> {
    let mut out = ops.to_vec();
    for operand in operands {
        out.extend_from_slice(operand);
    }
    out
}

/// `( A -> B )`
pub fn lower_imp(b: &Builtins, args: &[&[SymbolId]]) -> Option<Vec<SymbolId>> {
    match args {
        [lhs, rhs] => Some(infix(b.lparen, b.imp, b.rparen, lhs, rhs)),
        _ => None,
    }
}

/// `-. A`
pub fn lower_not(b: &Builtins, args: &[&[SymbolId]]) -> Option<Vec<SymbolId>> {
    match args {
        [a] => Some(prefix(&[b.not], &[*a])),
        _ => None,
    }
}

/// `( A /\ B )`
pub fn lower_and(b: &Builtins, args: &[&[SymbolId]]) -> Option<Vec<SymbolId>> {
    match args {
        [lhs, rhs] => Some(infix(b.lparen, b.and, b.rparen, lhs, rhs)),
        _ => None,
    }
}

/// `A. x A`
pub fn lower_forall(b: &Builtins, args: &[&[SymbolId]]) -> Option<Vec<SymbolId>> {
    match args {
        [x, body] => Some(prefix(&[b.forall], &[*x, *body])),
        _ => None,
    }
}

/// `E. x A`
pub fn lower_exists(b: &Builtins, args: &[&[SymbolId]]) -> Option<Vec<SymbolId>> {
    match args {
        [x, body] => Some(prefix(&[b.exists], &[*x, *body])),
        _ => None,
    }
}

/// `x = y`
pub fn lower_eq(b: &Builtins, args: &[&[SymbolId]]) -> Option<Vec<SymbolId>> {
    match args {
        [x, y] => Some([*x, &[b.equals][..], *y].concat()),
        _ => None,
    }
}

/// `x e. y`
pub fn lower_elem(b: &Builtins, args: &[&[SymbolId]]) -> Option<Vec<SymbolId>> {
    match args {
        [x, y] => Some([*x, &[b.elem][..], *y].concat()),
        _ => None,
    }
}

/// Splits `( A -> B )` into `(A, B)`, using the `->` at parenthesis depth zero
/// inside the outer pair. Returns `None` for anything else.
pub fn split_implication<'t>(
    b: &Builtins,
    tokens: &'t [SymbolId],
) -> Option<(&'t [SymbolId], &'t [SymbolId])> {
    let inner = match tokens {
        [open, inner @ .., close] if *open == b.lparen && *close == b.rparen => inner,
        _ => return None,
    };

    let mut depth = 0usize;
    for (i, &tok) in inner.iter().enumerate() {
        if tok == b.lparen {
            depth += 1;
        } else if tok == b.rparen {
            depth = depth.checked_sub(1)?;
        } else if tok == b.imp && depth == 0 {
            let (lhs, rhs) = (&inner[..i], &inner[i + 1..]);
            if lhs.is_empty() || rhs.is_empty() {
                return None;
            }
            return Some((lhs, rhs));
        }
    }
    None
}
