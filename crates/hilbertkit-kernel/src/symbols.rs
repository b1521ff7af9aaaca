//! Symbol interning.
//!
//! Names are interned per namespace: the same spelling in two namespaces gives
//! two unrelated symbols. Ids are dense and handed out in insertion order, so
//! the reverse table is a plain `Vec`.

use ahash::RandomState;
use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Constant,
    Variable,
}

/// Where a symbol lives. The kind of a symbol follows from its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Namespace {
    /// Builtin and declared constants.
    Constants,
    /// Variables introduced by one authoring origin (e.g. `"hilbert"`).
    Origin(String),
}

impl Namespace {
    pub fn origin(name: impl Into<String>) -> Self {
        Namespace::Origin(name.into())
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Namespace::Constants => SymbolKind::Constant,
            Namespace::Origin(_) => SymbolKind::Variable,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Constants => f.write_str("constants"),
            Namespace::Origin(name) => write!(f, "origin:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub namespace: Namespace,
    pub kind: SymbolKind,
}

/// Point-in-time copy of every interned symbol, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    pub symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// ============================================================================
// Interner
// ============================================================================

/// Thread-safe interner keyed by `(namespace, name)`.
///
/// The `DashMap` entry holds the shard lock while a new id is allocated and
/// pushed onto the reverse table, so two threads interning the same key always
/// agree on the id and ids stay dense.
pub struct SymbolInterner {
    by_key: DashMap<(Namespace, String), SymbolId, RandomState>,
    symbols: RwLock<Vec<Symbol>>,
}

impl SymbolInterner {
    pub fn new() -> Self {
        Self {
            by_key: DashMap::with_hasher(RandomState::new()),
            symbols: RwLock::new(Vec::new()),
        }
    }

    /// Intern a name, returning its id. Idempotent.
    pub fn intern(&self, name: &str, namespace: &Namespace) -> SymbolId {
        let key = (namespace.clone(), name.to_string());
        if let Some(id) = self.by_key.get(&key) {
            return *id;
        }

        match self.by_key.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut symbols = self.symbols.write();
                let id = SymbolId(symbols.len() as u32);
                symbols.push(Symbol {
                    id,
                    name: name.to_string(),
                    namespace: namespace.clone(),
                    kind: namespace.kind(),
                });
                entry.insert(id);
                id
            }
        }
    }

    pub fn intern_constant(&self, name: &str) -> SymbolId {
        self.intern(name, &Namespace::Constants)
    }

    pub fn intern_variable(&self, name: &str, origin: &str) -> SymbolId {
        self.intern(name, &Namespace::origin(origin))
    }

    /// Look up an existing id without inserting.
    pub fn lookup(&self, name: &str, namespace: &Namespace) -> Option<SymbolId> {
        self.by_key
            .get(&(namespace.clone(), name.to_string()))
            .map(|id| *id)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<Symbol> {
        self.symbols.read().get(id.0 as usize).cloned()
    }

    pub fn name_of(&self, id: SymbolId) -> Option<String> {
        self.symbols.read().get(id.0 as usize).map(|s| s.name.clone())
    }

    pub fn kind_of(&self, id: SymbolId) -> Option<SymbolKind> {
        self.symbols.read().get(id.0 as usize).map(|s| s.kind)
    }

    pub fn snapshot(&self) -> SymbolTable {
        SymbolTable {
            symbols: self.symbols.read().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.read().is_empty()
    }
}

impl Default for SymbolInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn interning_is_idempotent_and_kinds_follow_namespace() {
        let interner = SymbolInterner::new();
        let a = interner.intern_constant("->");
        let b = interner.intern_constant("->");
        let v = interner.intern_variable("->", "hilbert");

        assert_eq!(a, b);
        assert_ne!(a, v);
        assert_eq!(interner.kind_of(a), Some(SymbolKind::Constant));
        assert_eq!(interner.kind_of(v), Some(SymbolKind::Variable));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn lookup_never_inserts() {
        let interner = SymbolInterner::new();
        assert_eq!(interner.lookup("φ", &Namespace::origin("hilbert")), None);
        assert!(interner.is_empty());
        let id = interner.intern_variable("φ", "hilbert");
        assert_eq!(interner.lookup("φ", &Namespace::origin("hilbert")), Some(id));
        assert_eq!(interner.kind_of(SymbolId(99)), None);
    }

    #[test]
    fn snapshot_is_indexed_by_id() {
        let interner = SymbolInterner::new();
        let x = interner.intern_variable("x", "predicate");
        let table = interner.snapshot();
        let sym = table.get(x).unwrap();
        assert_eq!(sym.name, "x");
        assert_eq!(sym.namespace, Namespace::origin("predicate"));

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["symbols"][0]["namespace"]["kind"], "origin");
        assert_eq!(json["symbols"][0]["kind"], "variable");
    }

    #[test]
    fn concurrent_interning_agrees_on_ids() {
        let interner = Arc::new(SymbolInterner::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interner = Arc::clone(&interner);
                thread::spawn(move || {
                    (0..64)
                        .map(|i| interner.intern_variable(&format!("v{i}"), "hilbert"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<Vec<SymbolId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results[1..] {
            assert_eq!(r, &results[0]);
        }
        assert_eq!(interner.len(), 64);
        let table = interner.snapshot();
        for (i, sym) in table.symbols.iter().enumerate() {
            assert_eq!(sym.id.raw() as usize, i);
        }
    }
}
