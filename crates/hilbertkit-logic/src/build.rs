//! Database build: everything the external verifier needs, in order.
//!
//! 1. syntax rules `wi wn wa` and the `mp` rule with hypotheses `mp.1 mp.2`;
//! 2. axioms A1–A3;
//! 3. the requested lemmas closed over their citations, dependencies first;
//! 4. optionally the predicate syntax rules and AX5–AX13;
//! 5. the export list: every label above.

use crate::catalogue;
use crate::predicate::{self, predicate_system};
use crate::propositional::{self, hilbert_system};
use anyhow::{Context, Result};
use hilbertkit_dsl::{Expr, Var};
use hilbertkit_kernel::{
    DatabaseWriter, DependencyResolver, EmitOptions, Emitter, Formula, Hypothesis, LogicSystem,
    SymbolInterner, TokenNaming,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Lemmas to emit; their citations are added automatically.
    pub lemmas: Vec<String>,
    pub naming: TokenNaming,
    pub include_predicate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            lemmas: catalogue::lemma_names(),
            naming: TokenNaming::Positional,
            include_predicate: true,
        }
    }
}

#[derive(Debug)]
pub struct BuildReport<W> {
    pub writer: W,
    pub axioms: Vec<String>,
    /// In emission order.
    pub lemmas: Vec<String>,
    pub exports: Vec<String>,
}

pub fn build_database<W: DatabaseWriter>(
    interner: &Arc<SymbolInterner>,
    writer: W,
    options: &BuildOptions,
) -> Result<BuildReport<W>> {
    let system =
        hilbert_system(interner.clone()).context("assembling the propositional system")?;
    let emit_options = EmitOptions {
        naming: options.naming,
        ..EmitOptions::default()
    };
    let mut emitter = Emitter::new(interner, writer, emit_options)
        .with_scope(system.origin(), system.scope());
    let mut exports = Vec::new();
    let mut axioms = Vec::new();

    emit_propositional_skeleton(&system, &mut emitter).context("emitting the rule skeleton")?;
    exports.extend(
        [propositional::WI, propositional::WN, propositional::WA, propositional::MP]
            .map(str::to_string),
    );

    for (name, formula) in system.compile_axioms()? {
        emitter.emit_axiom(&name, &formula)?;
        axioms.push(name);
    }

    let registry = catalogue::registry();
    let resolved = DependencyResolver::new(&system, &registry)
        .resolve_names(&options.lemmas)
        .context("resolving requested lemmas")?;
    let mut lemmas = Vec::with_capacity(resolved.len());
    for proof in resolved.emission_order() {
        emitter
            .emit_lemma(proof)
            .with_context(|| format!("emitting lemma `{}`", proof.name()))?;
        lemmas.push(proof.name().to_string());
    }

    if options.include_predicate {
        let pred =
            predicate_system(interner.clone()).context("assembling the predicate system")?;
        emitter.add_scope(pred.origin(), pred.scope());
        emit_predicate_skeleton(&pred, &mut emitter).context("emitting predicate syntax")?;
        exports.extend(
            [predicate::WAL, predicate::WEX, predicate::WEQ, predicate::WEL].map(str::to_string),
        );
        for (name, formula) in pred.compile_axioms()? {
            emitter.emit_axiom(&name, &formula)?;
            axioms.push(name);
        }
    }

    exports.extend(axioms.iter().cloned());
    exports.extend(lemmas.iter().cloned());

    tracing::info!(
        axioms = axioms.len(),
        lemmas = lemmas.len(),
        exports = exports.len(),
        predicate = options.include_predicate,
        "database emitted"
    );

    let writer = emitter.finish(&exports)?;
    Ok(BuildReport {
        writer,
        axioms,
        lemmas,
        exports,
    })
}

fn hyp(label: &str, formula: &Formula) -> Hypothesis {
    Hypothesis::new(label, formula.clone())
}

fn emit_propositional_skeleton<W: DatabaseWriter>(
    system: &LogicSystem,
    emitter: &mut Emitter<'_, W>,
) -> Result<()> {
    let ctx = "rule_skeleton";
    let ph = system.compile_statement("φ", ctx)?;
    let ps = system.compile_statement("ψ", ctx)?;

    let wi = system.apply(propositional::WI, &[hyp("φ", &ph), hyp("ψ", &ps)], ctx)?;
    let wn = system.apply(propositional::WN, &[hyp("φ", &ph)], ctx)?;
    let wa = system.apply(propositional::WA, &[hyp("φ", &ph), hyp("ψ", &ps)], ctx)?;

    emitter.emit_syntax(propositional::WI, &wi)?;
    emitter.emit_syntax(propositional::WN, &wn)?;
    emitter.emit_syntax(propositional::WA, &wa)?;
    emitter.emit_rule(propositional::MP, &[("mp.1", &ph), ("mp.2", &wi)], &ps)?;
    Ok(())
}

fn emit_predicate_skeleton<W: DatabaseWriter>(
    system: &LogicSystem,
    emitter: &mut Emitter<'_, W>,
) -> Result<()> {
    let ctx = "predicate_skeleton";
    let x = system.compile(&Expr::Var(Var::setvar("x")), ctx)?;
    let y = system.compile(&Expr::Var(Var::setvar("y")), ctx)?;
    let ph = system.compile_statement("φ", ctx)?;

    let binder = [hyp("x", &x), hyp("φ", &ph)];
    let relation = [hyp("x", &x), hyp("y", &y)];
    for (label, operands) in [
        (predicate::WAL, &binder),
        (predicate::WEX, &binder),
        (predicate::WEQ, &relation),
        (predicate::WEL, &relation),
    ] {
        let formula = system.apply(label, operands, ctx)?;
        emitter.emit_syntax(label, &formula)?;
    }
    Ok(())
}
