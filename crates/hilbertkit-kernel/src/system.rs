//! The logic-system context object.
//!
//! A [`LogicSystem`] bundles everything a proof needs: the shared interner,
//! builtin constant ids, signatures, lowerings, the validated rule engine, the
//! named axioms and the variable scope used to read formula text. It is built
//! once through [`LogicSystemBuilder`] and only read afterwards.

use crate::builtins::Builtins;
use crate::compile::{compile, CompileEnv, CompileOptions};
use crate::error::{KernelError, Result, TypingError};
use crate::formula::Formula;
use crate::lowering::{LowerFn, LoweringTable};
use crate::rules::{Hypothesis, RuleEngine, RuleImpl};
use crate::signature::{Signature, SignatureRegistry};
use crate::symbols::{Namespace, SymbolInterner};
use hilbertkit_dsl::{parse_formula_with_limit, Expr, ParseError, Sort, VariableScope};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Something a proof author can write a statement as: an `Expr` tree or
/// formula text. Text nested past `max_depth` is refused before it is parsed
/// any further.
pub trait Authored {
    fn to_expr(
        &self,
        scope: &VariableScope,
        max_depth: usize,
    ) -> std::result::Result<Cow<'_, Expr>, ParseError>;
}

impl Authored for Expr {
    fn to_expr(
        &self,
        _scope: &VariableScope,
        _max_depth: usize,
    ) -> std::result::Result<Cow<'_, Expr>, ParseError> {
        Ok(Cow::Borrowed(self))
    }
}

impl Authored for str {
    fn to_expr(
        &self,
        scope: &VariableScope,
        max_depth: usize,
    ) -> std::result::Result<Cow<'_, Expr>, ParseError> {
        parse_formula_with_limit(self, scope, max_depth).map(Cow::Owned)
    }
}

impl Authored for String {
    fn to_expr(
        &self,
        scope: &VariableScope,
        max_depth: usize,
    ) -> std::result::Result<Cow<'_, Expr>, ParseError> {
        self.as_str().to_expr(scope, max_depth)
    }
}

#[derive(Debug)]
pub struct LogicSystem {
    name: String,
    interner: Arc<SymbolInterner>,
    builtins: Builtins,
    signatures: SignatureRegistry,
    lowerings: LoweringTable,
    rules: RuleEngine,
    axioms: BTreeMap<String, Expr>,
    scope: VariableScope,
    origin: Namespace,
    options: CompileOptions,
}

impl LogicSystem {
    pub fn builder(name: impl Into<String>) -> LogicSystemBuilder {
        LogicSystemBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interner(&self) -> &Arc<SymbolInterner> {
        &self.interner
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn signatures(&self) -> &SignatureRegistry {
        &self.signatures
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn scope(&self) -> &VariableScope {
        &self.scope
    }

    pub fn origin(&self) -> &Namespace {
        &self.origin
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn env(&self) -> CompileEnv<'_> {
        CompileEnv {
            interner: &self.interner,
            builtins: &self.builtins,
            signatures: &self.signatures,
            lowerings: &self.lowerings,
            origin: &self.origin,
            options: self.options,
        }
    }

    pub fn compile(&self, expr: &Expr, ctx: &str) -> Result<Formula> {
        compile(expr, &self.env(), ctx)
    }

    /// Compile a tree or formula text. Parse failures, including text nested
    /// past [`CompileOptions::max_depth`], are typing errors.
    pub fn compile_statement<S: Authored + ?Sized>(
        &self,
        stmt: &S,
        ctx: &str,
    ) -> Result<Formula> {
        let expr = stmt
            .to_expr(&self.scope, self.options.max_depth)
            .map_err(|err| KernelError::typing(ctx, err))?;
        self.compile(&expr, ctx)
    }

    pub fn axiom(&self, name: &str) -> Option<&Expr> {
        self.axioms.get(name)
    }

    pub fn axiom_names(&self) -> impl Iterator<Item = &str> {
        self.axioms.keys().map(String::as_str)
    }

    /// Every axiom, compiled with context `compile_axiom[<name>]`.
    pub fn compile_axioms(&self) -> Result<BTreeMap<String, Formula>> {
        self.axioms
            .iter()
            .map(|(name, expr)| {
                let formula = self.compile(expr, &format!("compile_axiom[{name}]"))?;
                Ok((name.clone(), formula))
            })
            .collect()
    }

    pub fn apply(&self, label: &str, hypotheses: &[Hypothesis], ctx: &str) -> Result<Formula> {
        self.rules.apply(label, hypotheses, ctx)
    }

    pub fn rule_labels(&self) -> Vec<&str> {
        self.rules.labels().collect()
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug, Clone)]
enum AxiomSource {
    Tree(Expr),
    Text(String),
}

/// Collects declarations; [`LogicSystemBuilder::build`] validates them all.
#[derive(Debug)]
pub struct LogicSystemBuilder {
    name: String,
    interner: Option<Arc<SymbolInterner>>,
    origin: Option<String>,
    scope: VariableScope,
    options: CompileOptions,
    constructors: Vec<(String, Signature, LowerFn)>,
    rules: Vec<(String, Signature, RuleImpl)>,
    constants: Vec<(String, Sort)>,
    axioms: Vec<(String, AxiomSource)>,
}

impl LogicSystemBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interner: None,
            origin: None,
            scope: VariableScope::standard(),
            options: CompileOptions::default(),
            constructors: Vec::new(),
            rules: Vec::new(),
            constants: Vec::new(),
            axioms: Vec::new(),
        }
    }

    /// Share an interner with other systems. A fresh one is created otherwise.
    pub fn interner(mut self, interner: Arc<SymbolInterner>) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Namespace for variables; defaults to the system name.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn scope(mut self, scope: VariableScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn constructor(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        lower: LowerFn,
    ) -> Self {
        self.constructors.push((name.into(), signature, lower));
        self
    }

    pub fn rule(
        mut self,
        label: impl Into<String>,
        signature: Signature,
        implementation: RuleImpl,
    ) -> Self {
        self.rules.push((label.into(), signature, implementation));
        self
    }

    /// Declare a constant of `sort`; it also becomes readable in formula
    /// text. Builtin token spellings such as `->` or `(` are reserved.
    pub fn constant(mut self, name: impl Into<String>, sort: Sort) -> Self {
        self.constants.push((name.into(), sort));
        self
    }

    pub fn axiom(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.axioms.push((name.into(), AxiomSource::Tree(expr)));
        self
    }

    pub fn axiom_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.axioms.push((name.into(), AxiomSource::Text(text.into())));
        self
    }

    pub fn build(self) -> Result<LogicSystem> {
        let ctx = format!("{}/build", self.name);
        let typing = |detail: TypingError| KernelError::typing(ctx.as_str(), detail);

        let interner = self.interner.unwrap_or_default();
        let builtins = Builtins::ensure(&interner);
        let origin = Namespace::origin(self.origin.unwrap_or_else(|| self.name.clone()));

        let mut scope = self.scope;
        let mut signatures = SignatureRegistry::new();
        for (name, sort) in self.constants {
            if Builtins::is_reserved(&name) {
                return Err(typing(TypingError::ReservedToken { name }));
            }
            interner.intern_constant(&name);
            scope.declare_constant(name.as_str());
            signatures.declare_constant(name, sort).map_err(typing)?;
        }

        let mut lowerings = LoweringTable::new();
        for (name, signature, lower) in self.constructors {
            signatures
                .declare_constructor(name.as_str(), signature)
                .map_err(typing)?;
            lowerings.register(name, lower).map_err(typing)?;
        }

        let mut implementations = Vec::with_capacity(self.rules.len());
        for (label, signature, implementation) in self.rules {
            signatures
                .declare_rule(label.as_str(), signature)
                .map_err(typing)?;
            implementations.push((label, implementation));
        }
        let rules = RuleEngine::new(builtins, &signatures, &lowerings, implementations)
            .map_err(typing)?;

        let max_depth = self.options.max_depth;
        let mut axioms = BTreeMap::new();
        for (name, source) in self.axioms {
            let expr = match source {
                AxiomSource::Tree(expr) => expr,
                AxiomSource::Text(text) => parse_formula_with_limit(&text, &scope, max_depth)
                    .map_err(|err| KernelError::typing(format!("compile_axiom[{name}]"), err))?,
            };
            if axioms.contains_key(&name) {
                return Err(typing(TypingError::DuplicateDeclaration { name }));
            }
            axioms.insert(name, expr);
        }

        let system = LogicSystem {
            name: self.name,
            interner,
            builtins,
            signatures,
            lowerings,
            rules,
            axioms,
            scope,
            origin,
            options: self.options,
        };
        // Axioms that cannot compile are a construction error, not a proof-time one.
        system.compile_axioms()?;
        Ok(system)
    }
}
