//! Expression trees and the standard logical constructors.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Sorts and variables
// ============================================================================

/// Syntactic category of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    /// Well-formed formula.
    Wff,
    /// Individual (set) variable, only meaningful in the predicate extension.
    Setvar,
}

impl Sort {
    /// Typecode used when the sort is written to a Metamath-style database.
    pub fn typecode(self) -> &'static str {
        match self {
            Sort::Wff => "wff",
            Sort::Setvar => "setvar",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.typecode())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    pub sort: Sort,
}

impl Var {
    pub fn new(name: impl Into<String>, sort: Sort) -> Self {
        Self {
            name: name.into(),
            sort,
        }
    }

    pub fn wff(name: impl Into<String>) -> Self {
        Self::new(name, Sort::Wff)
    }

    pub fn setvar(name: impl Into<String>) -> Self {
        Self::new(name, Sort::Setvar)
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// A named logical constructor with a fixed arity.
///
/// The arity is copied into every `Expr::App` node built through
/// [`Constructor::apply`], so a tree remembers what its author declared even
/// if the node was later edited by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constructor {
    pub name: &'static str,
    pub arity: usize,
}

impl Constructor {
    pub const IMP: Constructor = Constructor::new("→", 2);
    pub const NOT: Constructor = Constructor::new("¬", 1);
    pub const AND: Constructor = Constructor::new("∧", 2);
    pub const ALL: Constructor = Constructor::new("∀", 2);
    pub const EXISTS: Constructor = Constructor::new("∃", 2);
    pub const EQ: Constructor = Constructor::new("=", 2);
    pub const ELEM: Constructor = Constructor::new("∈", 2);

    pub const fn new(name: &'static str, arity: usize) -> Self {
        Self { name, arity }
    }

    pub fn apply(self, args: Vec<Expr>) -> Expr {
        Expr::App {
            ctor: self.name.to_string(),
            arity: self.arity,
            args,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Var(Var),
    /// A named constant. It must be declared in the kernel before it compiles
    /// and takes the sort it was declared with. Builtin token spellings such
    /// as `->` are never constants.
    Const { name: String },
    App {
        ctor: String,
        arity: usize,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn constant(name: impl Into<String>) -> Self {
        Expr::Const { name: name.into() }
    }

    /// Nesting depth; leaves have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const { .. } => 1,
            Expr::App { args, .. } => 1 + args.iter().map(Expr::depth).max().unwrap_or(0),
        }
    }

    /// Variables in first-occurrence order.
    pub fn variables(&self) -> Vec<&Var> {
        fn walk<'a>(expr: &'a Expr, out: &mut Vec<&'a Var>) {
            match expr {
                Expr::Var(v) => {
                    if !out.contains(&v) {
                        out.push(v);
                    }
                }
                Expr::Const { .. } => {}
                Expr::App { args, .. } => args.iter().for_each(|a| walk(a, out)),
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}

impl From<Var> for Expr {
    fn from(v: Var) -> Self {
        Expr::Var(v)
    }
}

/// Renders with the Unicode spellings the parser accepts, fully parenthesizing
/// binary connectives so that parsing the output yields the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(v) => f.write_str(&v.name),
            Expr::Const { name } => f.write_str(name),
            Expr::App { ctor, args, .. } => match (ctor.as_str(), args.as_slice()) {
                ("→", [a, b]) => write!(f, "( {a} → {b} )"),
                ("∧", [a, b]) => write!(f, "( {a} ∧ {b} )"),
                ("¬", [a]) => write!(f, "¬ {a}"),
                ("∀", [x, body]) => write!(f, "∀ {x} {body}"),
                ("∃", [x, body]) => write!(f, "∃ {x} {body}"),
                ("=", [x, y]) => write!(f, "{x} = {y}"),
                ("∈", [x, y]) => write!(f, "{x} ∈ {y}"),
                (name, args) => {
                    write!(f, "{name}(")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    f.write_str(")")
                }
            },
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn var(v: &Var) -> Expr {
    Expr::Var(v.clone())
}

pub fn imp(antecedent: Expr, consequent: Expr) -> Expr {
    Constructor::IMP.apply(vec![antecedent, consequent])
}

pub fn not(a: Expr) -> Expr {
    Constructor::NOT.apply(vec![a])
}

pub fn and(a: Expr, b: Expr) -> Expr {
    Constructor::AND.apply(vec![a, b])
}

pub fn all(x: Var, body: Expr) -> Expr {
    Constructor::ALL.apply(vec![Expr::Var(x), body])
}

pub fn exists(x: Var, body: Expr) -> Expr {
    Constructor::EXISTS.apply(vec![Expr::Var(x), body])
}

pub fn eq(x: Var, y: Var) -> Expr {
    Constructor::EQ.apply(vec![Expr::Var(x), Expr::Var(y)])
}

pub fn elem(x: Var, y: Var) -> Expr {
    Constructor::ELEM.apply(vec![Expr::Var(x), Expr::Var(y)])
}

pub fn phi() -> Expr {
    Expr::Var(Var::wff("φ"))
}

pub fn psi() -> Expr {
    Expr::Var(Var::wff("ψ"))
}

pub fn chi() -> Expr {
    Expr::Var(Var::wff("χ"))
}

pub fn theta() -> Expr {
    Expr::Var(Var::wff("θ"))
}

pub fn tau() -> Expr {
    Expr::Var(Var::wff("τ"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_records_declared_arity() {
        let e = imp(phi(), psi());
        match e {
            Expr::App { ctor, arity, args } => {
                assert_eq!(ctor, "→");
                assert_eq!(arity, 2);
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected application, got {other:?}"),
        }
    }

    #[test]
    fn display_is_fully_parenthesized() {
        let e = imp(not(phi()), and(psi(), chi()));
        assert_eq!(e.to_string(), "( ¬ φ → ( ψ ∧ χ ) )");

        let x = Var::setvar("x");
        let y = Var::setvar("y");
        assert_eq!(all(x.clone(), eq(x, y)).to_string(), "∀ x x = y");
    }

    #[test]
    fn variables_are_deduplicated_in_order() {
        let e = imp(psi(), imp(phi(), psi()));
        let names: Vec<_> = e.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["ψ", "φ"]);
        assert_eq!(e.depth(), 3);
    }

    #[test]
    fn expr_serializes_with_kind_tag() {
        let json = serde_json::to_value(not(phi())).unwrap();
        assert_eq!(json["kind"], "app");
        assert_eq!(json["args"][0]["kind"], "var");
        assert_eq!(json["args"][0]["sort"], "wff");
    }
}
