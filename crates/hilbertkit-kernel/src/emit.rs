//! Emission boundary.
//!
//! The [`Emitter`] turns kernel objects into plain records with external token
//! names and hands them to a [`DatabaseWriter`]. Concrete database syntax is
//! the writer's business; [`EmissionBundle`] is the in-memory writer that
//! serializes everything as JSON.

use crate::formula::Formula;
use crate::proof::{Proof, StepKind};
use crate::symbols::{Namespace, SymbolId, SymbolInterner, SymbolKind};
use anyhow::{anyhow, bail, Context, Result};
use hilbertkit_dsl::{Sort, VariableScope};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How symbol ids become external token names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenNaming {
    /// `c<id>` for constants, `v<id>` for variables. Always ASCII and never
    /// ambiguous across origins.
    #[default]
    Positional,
    /// The symbol's display name.
    Display,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    pub naming: TokenNaming,
    /// Typecode of axioms, rules and theorems.
    pub provable_typecode: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            naming: TokenNaming::default(),
            provable_typecode: "|-".to_string(),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Syntax,
    Axiom,
    Theorem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    pub typecode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedHypothesis {
    pub label: String,
    pub typecode: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedStep {
    pub label: String,
    pub kind: StepKind,
    pub tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedStatement {
    pub label: String,
    pub kind: StatementKind,
    pub typecode: String,
    pub tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hypotheses: Vec<EmittedHypothesis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<EmittedStep>,
}

/// Receives emitted records in dependency order.
pub trait DatabaseWriter {
    fn declare_constants(&mut self, names: &[String]) -> Result<()>;
    fn declare_variables(&mut self, variables: &[VariableDeclaration]) -> Result<()>;
    fn write_statement(&mut self, statement: EmittedStatement) -> Result<()>;
    fn export(&mut self, labels: &[String]) -> Result<()>;
}

/// In-memory writer; serializes the whole emission as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionBundle {
    pub constants: Vec<String>,
    pub variables: Vec<VariableDeclaration>,
    pub statements: Vec<EmittedStatement>,
    pub exports: Vec<String>,
}

impl EmissionBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statement(&self, label: &str) -> Option<&EmittedStatement> {
        self.statements.iter().find(|s| s.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().map(|s| s.label.as_str())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing emission bundle")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing emission bundle")
    }
}

impl DatabaseWriter for EmissionBundle {
    fn declare_constants(&mut self, names: &[String]) -> Result<()> {
        self.constants.extend_from_slice(names);
        Ok(())
    }

    fn declare_variables(&mut self, variables: &[VariableDeclaration]) -> Result<()> {
        self.variables.extend_from_slice(variables);
        Ok(())
    }

    fn write_statement(&mut self, statement: EmittedStatement) -> Result<()> {
        self.statements.push(statement);
        Ok(())
    }

    fn export(&mut self, labels: &[String]) -> Result<()> {
        self.exports.extend_from_slice(labels);
        Ok(())
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Declarations a statement needs that the writer has not seen yet. Nothing
/// reaches the writer until the whole statement has translated.
#[derive(Debug, Default)]
struct Pending {
    constants: Vec<String>,
    variables: Vec<VariableDeclaration>,
    symbols: Vec<(SymbolId, String)>,
}

impl Pending {
    fn name_of(&self, id: SymbolId) -> Option<&str> {
        self.symbols
            .iter()
            .find(|(pending, _)| *pending == id)
            .map(|(_, name)| name.as_str())
    }

    fn owner_of(&self, name: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .find(|(_, pending)| pending == name)
            .map(|(id, _)| *id)
    }
}

/// Declares every token on first use, so a writer never sees an undeclared
/// name, and refuses duplicate statement labels.
pub struct Emitter<'i, W> {
    interner: &'i SymbolInterner,
    writer: W,
    options: EmitOptions,
    var_sorts: BTreeMap<(Namespace, String), Sort>,
    declared: BTreeMap<SymbolId, String>,
    external: BTreeMap<String, SymbolId>,
    constant_names: BTreeSet<String>,
    labels: BTreeSet<String>,
}

impl<'i, W: DatabaseWriter> Emitter<'i, W> {
    pub fn new(interner: &'i SymbolInterner, writer: W, options: EmitOptions) -> Self {
        Self {
            interner,
            writer,
            options,
            var_sorts: BTreeMap::new(),
            declared: BTreeMap::new(),
            external: BTreeMap::new(),
            constant_names: BTreeSet::new(),
            labels: BTreeSet::new(),
        }
    }

    /// Learn the sorts of the variables `scope` introduces under `origin`.
    /// Needed before emitting any formula that mentions those variables.
    pub fn with_scope(mut self, origin: &Namespace, scope: &VariableScope) -> Self {
        self.add_scope(origin, scope);
        self
    }

    pub fn add_scope(&mut self, origin: &Namespace, scope: &VariableScope) {
        for var in scope.variables() {
            self.var_sorts.insert((origin.clone(), var.name.clone()), var.sort);
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    fn check_unclaimed(&self, label: &str) -> Result<()> {
        if self.labels.contains(label) {
            bail!("statement label `{label}` is emitted twice");
        }
        Ok(())
    }

    fn typecode(&self, typecode: &str, pending: &mut Pending) -> String {
        let typecode = typecode.to_string();
        if !self.constant_names.contains(&typecode) && !pending.constants.contains(&typecode) {
            pending.constants.push(typecode.clone());
        }
        typecode
    }

    fn token(&self, id: SymbolId, pending: &mut Pending) -> Result<String> {
        if let Some(name) = self.declared.get(&id) {
            return Ok(name.clone());
        }
        if let Some(name) = pending.name_of(id) {
            return Ok(name.to_string());
        }

        let symbol = self
            .interner
            .symbol(id)
            .ok_or_else(|| anyhow!("symbol {id} is not interned"))?;
        let name = match (self.options.naming, symbol.kind) {
            (TokenNaming::Positional, SymbolKind::Constant) => format!("c{}", id.raw()),
            (TokenNaming::Positional, SymbolKind::Variable) => format!("v{}", id.raw()),
            (TokenNaming::Display, _) => symbol.name.clone(),
        };
        if let Some(other) = self
            .external
            .get(&name)
            .copied()
            .or_else(|| pending.owner_of(&name))
        {
            bail!("external name `{name}` would denote both {other} and {id}");
        }

        match symbol.kind {
            SymbolKind::Constant => pending.constants.push(name.clone()),
            SymbolKind::Variable => {
                let sort = self
                    .var_sorts
                    .get(&(symbol.namespace.clone(), symbol.name.clone()))
                    .copied()
                    .ok_or_else(|| {
                        anyhow!(
                            "no sort known for variable `{}` of {}",
                            symbol.name,
                            symbol.namespace
                        )
                    })?;
                let typecode = self.typecode(sort.typecode(), pending);
                pending.variables.push(VariableDeclaration {
                    name: name.clone(),
                    typecode,
                });
            }
        }
        pending.symbols.push((id, name.clone()));
        Ok(name)
    }

    fn tokens(&self, formula: &Formula, pending: &mut Pending) -> Result<Vec<String>> {
        formula
            .tokens()
            .iter()
            .map(|&id| self.token(id, pending))
            .collect()
    }

    /// Claims `label`, declares what the statement introduced, then writes it.
    fn commit(&mut self, statement: EmittedStatement, pending: Pending) -> Result<()> {
        self.labels.insert(statement.label.clone());
        if !pending.constants.is_empty() {
            self.writer.declare_constants(&pending.constants)?;
        }
        if !pending.variables.is_empty() {
            self.writer.declare_variables(&pending.variables)?;
        }
        self.constant_names.extend(pending.constants);
        for (id, name) in pending.symbols {
            self.external.insert(name.clone(), id);
            self.declared.insert(id, name);
        }
        self.writer.write_statement(statement)
    }

    /// A syntax axiom; its typecode is the formula's sort.
    pub fn emit_syntax(&mut self, label: &str, formula: &Formula) -> Result<()> {
        self.check_unclaimed(label)?;
        let mut pending = Pending::default();
        let typecode = self.typecode(formula.sort().typecode(), &mut pending);
        let tokens = self
            .tokens(formula, &mut pending)
            .with_context(|| format!("emitting `{label}`"))?;
        let statement = EmittedStatement {
            label: label.to_string(),
            kind: StatementKind::Syntax,
            typecode,
            tokens,
            hypotheses: vec![],
            steps: vec![],
        };
        self.commit(statement, pending)
    }

    pub fn emit_axiom(&mut self, label: &str, formula: &Formula) -> Result<()> {
        self.emit_rule(label, &[], formula)
    }

    /// An axiom with essential hypotheses, e.g. `mp` with `mp.1` and `mp.2`.
    pub fn emit_rule(
        &mut self,
        label: &str,
        hypotheses: &[(&str, &Formula)],
        conclusion: &Formula,
    ) -> Result<()> {
        self.check_unclaimed(label)?;
        let mut pending = Pending::default();
        let provable = self.typecode(&self.options.provable_typecode, &mut pending);

        let mut emitted = Vec::with_capacity(hypotheses.len());
        for (hyp_label, formula) in hypotheses {
            let tokens = self
                .tokens(formula, &mut pending)
                .with_context(|| format!("emitting hypothesis `{hyp_label}` of `{label}`"))?;
            emitted.push(EmittedHypothesis {
                label: hyp_label.to_string(),
                typecode: provable.clone(),
                tokens,
            });
        }
        let tokens = self
            .tokens(conclusion, &mut pending)
            .with_context(|| format!("emitting `{label}`"))?;
        let statement = EmittedStatement {
            label: label.to_string(),
            kind: StatementKind::Axiom,
            typecode: provable,
            tokens,
            hypotheses: emitted,
            steps: vec![],
        };
        self.commit(statement, pending)
    }

    /// A theorem with its hypothesis steps as essential hypotheses and every
    /// step recorded in order.
    pub fn emit_lemma(&mut self, proof: &Proof) -> Result<()> {
        let label = proof.name();
        self.check_unclaimed(label)?;
        let mut pending = Pending::default();
        let provable = self.typecode(&self.options.provable_typecode, &mut pending);

        let mut hypotheses = Vec::new();
        let mut steps = Vec::with_capacity(proof.steps().len());
        for step in proof.steps() {
            let tokens = self
                .tokens(&step.formula, &mut pending)
                .with_context(|| format!("emitting step `{}` of `{label}`", step.label))?;
            if step.kind == StepKind::Hypothesis {
                hypotheses.push(EmittedHypothesis {
                    label: step.label.clone(),
                    typecode: provable.clone(),
                    tokens: tokens.clone(),
                });
            }
            steps.push(EmittedStep {
                label: step.label.clone(),
                kind: step.kind,
                tokens,
                operands: step.operands.clone(),
                reference: step.reference.clone(),
                note: step.note.clone(),
            });
        }

        let statement = EmittedStatement {
            label: label.to_string(),
            kind: StatementKind::Theorem,
            typecode: provable,
            tokens: self.tokens(proof.statement(), &mut pending)?,
            hypotheses,
            steps,
        };
        self.commit(statement, pending)
    }

    /// Passes the export list to the writer; every label must have been emitted.
    pub fn finish(mut self, exports: &[String]) -> Result<W> {
        let missing: Vec<&str> = exports
            .iter()
            .map(String::as_str)
            .filter(|l| !self.labels.contains(*l))
            .collect();
        if !missing.is_empty() {
            bail!("exported labels were never emitted: {}", missing.join(", "));
        }
        self.writer.export(exports)?;
        Ok(self.writer)
    }
}
