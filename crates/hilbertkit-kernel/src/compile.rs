//! Expression-tree compiler.

use crate::builtins::Builtins;
use crate::error::{KernelError, Result, TypingError};
use crate::formula::Formula;
use crate::lowering::LoweringTable;
use crate::signature::SignatureRegistry;
use crate::symbols::{Namespace, SymbolId, SymbolInterner};
use hilbertkit_dsl::{Expr, Sort};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Deepest expression nesting accepted before compilation fails.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Everything the compiler reads. Variables are interned under `origin`;
/// constants must already exist in [`Namespace::Constants`]. A constant takes
/// the sort declared for it in `signatures` and is a `wff` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct CompileEnv<'a> {
    pub interner: &'a SymbolInterner,
    pub builtins: &'a Builtins,
    pub signatures: &'a SignatureRegistry,
    pub lowerings: &'a LoweringTable,
    pub origin: &'a Namespace,
    pub options: CompileOptions,
}

/// Compile `expr` into a formula. Failures are typing errors tagged with `ctx`.
pub fn compile(expr: &Expr, env: &CompileEnv<'_>, ctx: &str) -> Result<Formula> {
    let (sort, tokens) =
        compile_at(expr, env, 1).map_err(|detail| KernelError::typing(ctx, detail))?;
    Ok(Formula::new(sort, tokens))
}

fn compile_at(
    expr: &Expr,
    env: &CompileEnv<'_>,
    depth: usize,
) -> std::result::Result<(Sort, Vec<SymbolId>), TypingError> {
    if depth > env.options.max_depth {
        return Err(TypingError::DepthExceeded {
            limit: env.options.max_depth,
        });
    }

    match expr {
        Expr::Var(var) => Ok((var.sort, vec![env.interner.intern(&var.name, env.origin)])),
        Expr::Const { name } => {
            let id = env
                .interner
                .lookup(name, &Namespace::Constants)
                .ok_or_else(|| TypingError::UndeclaredConstant { name: name.clone() })?;
            // Builtin tokens are only ever placed by lowerings.
            if env.builtins.contains(id) {
                return Err(TypingError::ReservedToken { name: name.clone() });
            }
            let sort = env.signatures.constant(name).unwrap_or(Sort::Wff);
            Ok((sort, vec![id]))
        }
        Expr::App { ctor, arity, args } => {
            let signature = env
                .signatures
                .constructor(ctor)
                .ok_or_else(|| TypingError::UnknownConstructor { name: ctor.clone() })?;
            // The node's own arity must agree with both the signature and its children.
            signature.check_arity(ctor, *arity)?;
            signature.check_arity(ctor, args.len())?;
            let lower = env
                .lowerings
                .get(ctor)
                .ok_or_else(|| TypingError::MissingLowering { name: ctor.clone() })?;

            let mut parts = Vec::with_capacity(args.len());
            for (position, arg) in args.iter().enumerate() {
                let (sort, tokens) = compile_at(arg, env, depth + 1)?;
                signature.check_operand(ctor, position, sort)?;
                parts.push(tokens);
            }

            let operands: Vec<&[SymbolId]> = parts.iter().map(Vec::as_slice).collect();
            let tokens = lower(env.builtins, &operands)
                .ok_or_else(|| TypingError::LoweringFailed { name: ctor.clone() })?;
            Ok((signature.result, tokens))
        }
    }
}
