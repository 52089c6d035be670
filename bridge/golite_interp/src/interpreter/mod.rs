//! Tree-walking evaluator.
//!
//! One [`Interpreter`] is one session: globals, function declarations and
//! imports persist across [`Interpreter::evaluate`] calls. Everything a
//! program prints goes to the [`SharedSink`] handed to [`Interpreter::new`].

mod scope_guard;

pub use scope_guard::{FrameGuard, ScopedInterpreter};

use std::sync::Arc;

use golite_capture::SharedSink;
use rustc_hash::FxHashMap;

use crate::ast::{BinaryOp, Block, Expr, ExprKind, FuncDecl, ImportSpec, Pos, Program, Stmt};
use crate::builtins::{self, NativeCall};
use crate::environment::{Environment, Scope};
use crate::error::{EvalError, EvalErrorKind, EvalResult, Fault, InitError};
use crate::operators;
use crate::parser;
use crate::stack::ensure_sufficient_stack;
use crate::stdlib::Package;
use crate::value::Value;

/// Default bound on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpOptions {
    pub max_call_depth: usize,
}

impl Default for InterpOptions {
    fn default() -> Self {
        InterpOptions {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Control flow signal out of a statement.
#[derive(Debug)]
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

pub struct Interpreter {
    stdout: SharedSink,
    options: InterpOptions,
    /// Installed packages, by import path.
    packages: FxHashMap<&'static str, Package>,
    /// Imported packages, by local name.
    imports: FxHashMap<String, Package>,
    env: Environment,
}

impl Interpreter {
    pub fn new(stdout: SharedSink, options: InterpOptions) -> Result<Self, InitError> {
        if options.max_call_depth == 0 {
            return Err(InitError::ZeroCallDepth);
        }
        Ok(Interpreter {
            stdout,
            options,
            packages: FxHashMap::default(),
            imports: FxHashMap::default(),
            env: Environment::new(),
        })
    }

    pub fn options(&self) -> InterpOptions {
        self.options
    }

    /// Make packages available to `import`.
    pub fn use_symbols(
        &mut self,
        packages: impl IntoIterator<Item = Package>,
    ) -> Result<(), InitError> {
        for package in packages {
            if self.packages.contains_key(package.path) {
                return Err(InitError::DuplicatePackage(package.path.to_string()));
            }
            tracing::trace!(path = package.path, "installing package");
            self.packages.insert(package.path, package);
        }
        Ok(())
    }

    /// Names bound at the top level of the session, sorted.
    pub fn globals(&self) -> Vec<String> {
        let mut names: Vec<String> = self.env.global_names().map(str::to_string).collect();
        names.sort_unstable();
        names
    }

    /// Run one source unit.
    ///
    /// Imports and `func` declarations are hoisted, then the remaining
    /// statements run in order. The result is the value of the last
    /// top-level expression statement (`Value::Nil` when the source ends
    /// with anything else). If the source has a `package` clause and
    /// declares `main`, `main` runs last and the result is `Value::Nil`.
    ///
    /// Runtime panics propagate as Rust panics carrying a [`Fault`].
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn evaluate(&mut self, source: &str) -> EvalResult<Value> {
        self.env.reset_frames();
        let program = parser::parse(source)?;
        self.declare(&program)?;

        let mut last = Value::Nil;
        for stmt in &program.stmts {
            last = match stmt {
                Stmt::Import(_) | Stmt::Func(_) => continue,
                Stmt::Expr(expr) => self.eval_expr(expr)?,
                other => {
                    self.exec_stmt(other)?;
                    Value::Nil
                }
            };
        }

        if let Some(main) = entry_point(&program) {
            tracing::debug!("calling main");
            self.call_func(&main, Vec::new(), main.pos)?;
            last = Value::Nil;
        }
        Ok(last)
    }

    fn declare(&mut self, program: &Program) -> EvalResult<()> {
        for stmt in &program.stmts {
            match stmt {
                Stmt::Import(specs) => self.import(specs)?,
                Stmt::Func(decl) => self
                    .env
                    .define_global(&decl.name, Value::Func(Arc::clone(decl))),
                _ => {}
            }
        }
        Ok(())
    }

    fn import(&mut self, specs: &[ImportSpec]) -> EvalResult<()> {
        for spec in specs {
            let package = self.packages.get(spec.path.as_str()).copied().ok_or_else(|| {
                EvalError::new(
                    EvalErrorKind::UnknownPackage {
                        path: spec.path.clone(),
                    },
                    spec.pos,
                )
            })?;
            let local = spec.path.rsplit('/').next().unwrap_or(&spec.path);
            tracing::debug!(path = %spec.path, "import");
            self.imports.insert(local.to_string(), package);
        }
        Ok(())
    }

    fn exec_block(&mut self, block: &Block) -> EvalResult<Flow> {
        let mut scoped = self.scoped();
        scoped.exec_stmts(block)
    }

    fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            let flow = self.exec_stmt(stmt)?;
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Import(_) | Stmt::Func(_) => {}
            Stmt::Var { name, ty, init, .. } => {
                let value = match (init, ty) {
                    (Some(init), _) => self.eval_expr(init)?,
                    (None, Some(ty)) => Value::zero(ty),
                    (None, None) => Value::Nil,
                };
                self.env.define(name, value);
            }
            Stmt::Define { name, value, .. } => {
                let value = self.eval_expr(value)?;
                self.env.define(name, value);
            }
            Stmt::Assign {
                target, op, value, pos,
            } => {
                let rhs = self.eval_expr(value)?;
                let value = match op.binary() {
                    None => rhs,
                    Some(binary) => {
                        let current = self.eval_expr(target)?;
                        operators::binary(binary, current, rhs, *pos)?
                    }
                };
                self.assign(target, value)?;
            }
            Stmt::IncDec { target, delta, pos } => {
                let current = self.eval_expr(target)?;
                let value = match current {
                    Value::Int(n) => Value::Int(n.wrapping_add(*delta)),
                    other => {
                        let symbol = if *delta > 0 { "++" } else { "--" };
                        return Err(EvalError::invalid(
                            format!("{other}{symbol} (non-numeric type {})", other.type_name()),
                            *pos,
                        ));
                    }
                };
                self.assign(target, value)?;
            }
            Stmt::Expr(expr) => {
                self.eval_expr(expr)?;
            }
            Stmt::Return(value, pos) => {
                if self.env.call_depth() == 0 {
                    return Err(EvalError::new(EvalErrorKind::MisplacedReturn, *pos));
                }
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Break(pos) => return self.branch(Flow::Break, "break", *pos),
            Stmt::Continue(pos) => return self.branch(Flow::Continue, "continue", *pos),
            Stmt::If {
                init,
                cond,
                then,
                otherwise,
            } => {
                let mut scoped = self.scoped();
                if let Some(init) = init {
                    scoped.exec_stmt(init)?;
                }
                return if scoped.condition(cond, "if")? {
                    scoped.exec_block(then)
                } else {
                    match otherwise.as_deref() {
                        Some(Stmt::Block(block)) => scoped.exec_block(block),
                        Some(other) => scoped.exec_stmt(other),
                        None => Ok(Flow::Normal),
                    }
                };
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                let mut scoped = self.scoped();
                if let Some(init) = init {
                    scoped.exec_stmt(init)?;
                }
                return scoped
                    .in_loop(|interp| interp.run_for(cond.as_ref(), post.as_deref(), body));
            }
            Stmt::Range {
                key,
                value,
                iterable,
                body,
                pos,
            } => {
                let iterable = self.eval_expr(iterable)?;
                let items = range_items(&iterable, value.is_some(), *pos)?;
                return self.in_loop(|interp| {
                    interp.run_range(key.as_deref(), value.as_deref(), items, body)
                });
            }
            Stmt::Block(block) => return self.exec_block(block),
        }
        Ok(Flow::Normal)
    }

    fn branch(&self, flow: Flow, keyword: &'static str, pos: Pos) -> EvalResult<Flow> {
        if self.env.in_loop() {
            Ok(flow)
        } else {
            Err(EvalError::new(EvalErrorKind::MisplacedBranch { keyword }, pos))
        }
    }

    fn in_loop(&mut self, run: impl FnOnce(&mut Self) -> EvalResult<Flow>) -> EvalResult<Flow> {
        self.env.enter_loop();
        let result = run(self);
        self.env.exit_loop();
        result
    }

    fn run_for(
        &mut self,
        cond: Option<&Expr>,
        post: Option<&Stmt>,
        body: &Block,
    ) -> EvalResult<Flow> {
        loop {
            if let Some(cond) = cond {
                if !self.condition(cond, "for")? {
                    return Ok(Flow::Normal);
                }
            }
            match self.exec_block(body)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
            if let Some(post) = post {
                self.exec_stmt(post)?;
            }
        }
    }

    fn run_range(
        &mut self,
        key: Option<&str>,
        value: Option<&str>,
        items: RangeItems,
        body: &Block,
    ) -> EvalResult<Flow> {
        for (index, item) in items {
            let mut scoped = self.scoped();
            if let Some(key) = key {
                scoped.env.define(key, index);
            }
            if let Some(value) = value {
                scoped.env.define(value, item);
            }
            match scoped.exec_stmts(body)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        Ok(Flow::Normal)
    }

    fn condition(&mut self, cond: &Expr, statement: &'static str) -> EvalResult<bool> {
        match self.eval_expr(cond)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::new(
                EvalErrorKind::NonBoolCondition {
                    statement,
                    type_name: other.type_name(),
                },
                cond.pos,
            )),
        }
    }

    /// Store into a variable or an element reached through index chains.
    fn assign(&mut self, target: &Expr, value: Value) -> EvalResult<()> {
        let mut indices = Vec::new();
        let mut cursor = target;
        while let ExprKind::Index(base, index) = &cursor.kind {
            indices.push((self.eval_expr(index)?, index.pos));
            cursor = base;
        }
        indices.reverse();

        let ExprKind::Ident(name) = &cursor.kind else {
            return Err(EvalError::new(
                EvalErrorKind::CannotAssign {
                    target: describe_target(target),
                },
                target.pos,
            ));
        };
        if name == "_" && indices.is_empty() {
            return Ok(());
        }
        let slot = self
            .env
            .lookup_mut(name)
            .ok_or_else(|| EvalError::undefined(name.clone(), cursor.pos))?;
        store(slot, &indices, value, target)
    }

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult<Value> {
        let pos = expr.pos;
        match &expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Ident(name) => self.resolve(name, pos),
            ExprKind::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval_expr(item))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::list(values))
            }
            ExprKind::Unary(op, operand) => {
                let operand = self.eval_expr(operand)?;
                operators::unary(*op, operand, pos)
            }
            ExprKind::Binary(op, left, right) => {
                let lhs = self.eval_expr(left)?;
                if let BinaryOp::And | BinaryOp::Or = op {
                    let short = matches!(op, BinaryOp::Or);
                    if operators::logical_operand(*op, &lhs, left.pos)? == short {
                        return Ok(Value::Bool(short));
                    }
                    let rhs = self.eval_expr(right)?;
                    return operators::logical_operand(*op, &rhs, right.pos).map(Value::Bool);
                }
                let rhs = self.eval_expr(right)?;
                operators::binary(*op, lhs, rhs, pos)
            }
            ExprKind::Index(base, index) => {
                let base = self.eval_expr(base)?;
                let index = self.eval_expr(index)?;
                operators::index(&base, &index, pos)
            }
            ExprKind::Selector(base, member) => self.select(base, member, pos),
            ExprKind::Call {
                callee,
                args,
                spread,
            } => {
                let func = self.eval_expr(callee)?;
                let mut values = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                if *spread {
                    match values.pop() {
                        Some(Value::List(items)) => values.extend(items.iter().cloned()),
                        Some(Value::Nil) | None => {}
                        Some(other) => {
                            return Err(EvalError::invalid(
                                format!(
                                    "cannot use ... with non-slice {other} (type {})",
                                    other.type_name()
                                ),
                                pos,
                            ))
                        }
                    }
                }
                self.call(func, values, pos)
            }
        }
    }

    fn resolve(&self, name: &str, pos: Pos) -> EvalResult<Value> {
        if name == "_" {
            return Err(EvalError::invalid("cannot use _ as value", pos));
        }
        if let Some(value) = self.env.lookup(name) {
            return Ok(value.clone());
        }
        if let Some(builtin) = builtins::universe(name) {
            return Ok(Value::Native(builtin));
        }
        if self.imports.contains_key(name) {
            return Err(EvalError::invalid(
                format!("use of package {name} without selector"),
                pos,
            ));
        }
        Err(EvalError::undefined(name, pos))
    }

    fn select(&mut self, base: &Expr, member: &str, pos: Pos) -> EvalResult<Value> {
        if let ExprKind::Ident(name) = &base.kind {
            if self.env.lookup(name).is_none() {
                if let Some(package) = self.imports.get(name.as_str()) {
                    return package.member(member).map(Value::Native).ok_or_else(|| {
                        EvalError::new(
                            EvalErrorKind::UndefinedMember {
                                package: name.clone(),
                                member: member.to_string(),
                            },
                            pos,
                        )
                    });
                }
            }
        }
        let value = self.eval_expr(base)?;
        Err(EvalError::invalid(
            format!(
                "{value}.{member} undefined (type {} has no field or method {member})",
                value.type_name()
            ),
            pos,
        ))
    }

    fn call(&mut self, func: Value, args: Vec<Value>, pos: Pos) -> EvalResult<Value> {
        match func {
            Value::Native(native) => {
                (native.func)(&NativeCall::new(native.name, pos, &self.stdout), args)
            }
            Value::Func(decl) => self.call_func(&decl, args, pos),
            other => Err(EvalError::new(
                EvalErrorKind::NotCallable {
                    type_name: other.type_name(),
                },
                pos,
            )),
        }
    }

    fn call_func(&mut self, decl: &Arc<FuncDecl>, args: Vec<Value>, pos: Pos) -> EvalResult<Value> {
        let params = bind_params(decl, args, pos)?;
        if self.env.call_depth() >= self.options.max_call_depth {
            Fault::raise(format!(
                "runtime error: stack exceeds {} nested calls",
                self.options.max_call_depth
            ));
        }
        ensure_sufficient_stack(|| {
            let mut frame = self.enter_frame(params);
            match frame.exec_stmts(&decl.body)? {
                Flow::Return(value) => Ok(value),
                Flow::Normal | Flow::Break | Flow::Continue => Ok(Value::Nil),
            }
        })
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("options", &self.options)
            .field("packages", &self.packages.len())
            .field("imports", &self.imports.len())
            .finish_non_exhaustive()
    }
}

fn entry_point(program: &Program) -> Option<Arc<FuncDecl>> {
    program.package.as_ref()?;
    program.stmts.iter().find_map(|stmt| match stmt {
        Stmt::Func(decl) if decl.name == "main" => Some(Arc::clone(decl)),
        _ => None,
    })
}

fn bind_params(decl: &FuncDecl, args: Vec<Value>, pos: Pos) -> EvalResult<Scope> {
    let fixed = if decl.variadic {
        decl.params.len().saturating_sub(1)
    } else {
        decl.params.len()
    };
    let count_ok = if decl.variadic {
        args.len() >= fixed
    } else {
        args.len() == fixed
    };
    if !count_ok {
        return Err(EvalError::new(
            EvalErrorKind::ArgumentCount {
                name: decl.name.clone(),
                expected: fixed,
                got: args.len(),
            },
            pos,
        ));
    }

    let mut scope = Scope::default();
    let mut args = args.into_iter();
    for name in &decl.params[..fixed] {
        let value = args.next().unwrap_or(Value::Nil);
        if name != "_" {
            scope.insert(name.clone(), value);
        }
    }
    if decl.variadic {
        if let Some(name) = decl.params.last() {
            scope.insert(name.clone(), Value::list(args.collect()));
        }
    }
    Ok(scope)
}

/// `(key, value)` pairs of a `range` loop.
///
/// Lists and strings are snapshotted when the loop starts. Integer ranges
/// yield their keys one at a time.
enum RangeItems {
    Snapshot(std::vec::IntoIter<(Value, Value)>),
    Count(std::ops::Range<i64>),
}

impl Iterator for RangeItems {
    type Item = (Value, Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RangeItems::Snapshot(pairs) => pairs.next(),
            RangeItems::Count(keys) => keys.next().map(|i| (Value::Int(i), Value::Nil)),
        }
    }
}

fn range_items(iterable: &Value, wants_value: bool, pos: Pos) -> EvalResult<RangeItems> {
    let pairs: Vec<(Value, Value)> = match iterable {
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (Value::Int(i as i64), item.clone()))
            .collect(),
        Value::Str(s) => s
            .char_indices()
            .map(|(i, c)| (Value::Int(i as i64), Value::Int(i64::from(u32::from(c)))))
            .collect(),
        Value::Int(n) if !wants_value => return Ok(RangeItems::Count(0..*n)),
        Value::Int(n) => {
            let message = format!(
                "range over {n} (untyped int constant) permits only one iteration variable"
            );
            return Err(EvalError::invalid(message, pos));
        }
        Value::Nil => Vec::new(),
        other => {
            return Err(EvalError::invalid(
                format!("cannot range over {other} (type {})", other.type_name()),
                pos,
            ))
        }
    };
    Ok(RangeItems::Snapshot(pairs.into_iter()))
}

fn store(
    slot: &mut Value,
    indices: &[(Value, Pos)],
    value: Value,
    target: &Expr,
) -> EvalResult<()> {
    let Some(((index, pos), rest)) = indices.split_first() else {
        *slot = value;
        return Ok(());
    };
    match slot {
        Value::List(items) => {
            let at = operators::index_of(index, items.len(), *pos)?;
            store(&mut Arc::make_mut(items)[at], rest, value, target)
        }
        Value::Str(_) => Err(EvalError::new(
            EvalErrorKind::CannotAssign {
                target: format!(
                    "{} (neither addressable nor a map index expression)",
                    describe_target(target)
                ),
            },
            target.pos,
        )),
        other => Err(EvalError::new(
            EvalErrorKind::NotIndexable {
                type_name: other.type_name(),
            },
            *pos,
        )),
    }
}

fn describe_target(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Index(base, _) => format!("{}[...]", describe_target(base)),
        ExprKind::Selector(base, member) => format!("{}.{member}", describe_target(base)),
        ExprKind::Call { .. } => "function call".to_string(),
        _ => "expression".to_string(),
    }
}
