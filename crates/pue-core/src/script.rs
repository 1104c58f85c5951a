//! Scripting builders: everything a component uses to assemble the IR
//! shipped to the client runtime.
//!
//! Two symmetric scope proxies ([`this`] and [`local`]) bind variable
//! reads and writes; the rest are pure combinators over [`Expr`] /
//! [`Stmt`]. Construction has no side effects and every call allocates
//! fresh values — builders never share collections between calls.

use crate::ast::{
    BinOpKind, Block, BoolOpKind, CompareKind, Expr, HttpMethod, LogLevel, Scope, Stmt,
    UnaryOpKind,
};
use indexmap::IndexMap;

/// Scope-bound accessor for variable reads and writes.
///
/// The node model does not verify binding correctness: a `local` read is
/// only meaningful textually nested inside a `Map`/`Filter`/`For` body
/// that binds the same name (nested iterations may shadow an outer
/// binding; the innermost one wins). Building a local access outside any
/// iteration is representable but violates the interpreter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeProxy {
    scope: Scope,
}

impl ScopeProxy {
    /// Bind a read of `name` in this scope.
    pub fn get(&self, name: impl Into<String>) -> Expr {
        Expr::Load {
            name: name.into(),
            scope: self.scope,
        }
    }

    /// Bind a write of `value` into `name` in this scope.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Expr>) -> Stmt {
        Stmt::Store {
            name: name.into(),
            scope: self.scope,
            value: value.into(),
        }
    }
}

/// Accessor for the owning component instance's reactive state.
pub fn this() -> ScopeProxy {
    ScopeProxy {
        scope: Scope::Component,
    }
}

/// Accessor for the binding introduced by an enclosing iteration body.
pub fn local() -> ScopeProxy {
    ScopeProxy {
        scope: Scope::Local,
    }
}

// === Operators ===

fn binop(op: BinOpKind, left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::BinOp {
        op,
        left: Box::new(left.into()),
        right: Box::new(right.into()),
    }
}

fn boolop(op: BoolOpKind, left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::BoolOp {
        op,
        left: Box::new(left.into()),
        right: Box::new(right.into()),
    }
}

fn unaryop(op: UnaryOpKind, expr: impl Into<Expr>) -> Expr {
    Expr::UnaryOp {
        op,
        expr: Box::new(expr.into()),
    }
}

fn comparison(op: CompareKind, left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::Compare {
        op,
        left: Box::new(left.into()),
        right: Box::new(right.into()),
    }
}

pub fn add(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Add, left, right)
}

pub fn sub(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Sub, left, right)
}

pub fn mul(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Mul, left, right)
}

pub fn div(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Div, left, right)
}

pub fn modulo(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Mod, left, right)
}

pub fn pow(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Pow, left, right)
}

pub fn floordiv(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Floordiv, left, right)
}

pub fn lshift(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Lshift, left, right)
}

pub fn rshift(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Rshift, left, right)
}

pub fn bitand(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Bitand, left, right)
}

pub fn bitor(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Bitor, left, right)
}

pub fn bitxor(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    binop(BinOpKind::Bitxor, left, right)
}

pub fn and(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    boolop(BoolOpKind::And, left, right)
}

pub fn or(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    boolop(BoolOpKind::Or, left, right)
}

pub fn not(expr: impl Into<Expr>) -> Expr {
    unaryop(UnaryOpKind::Not, expr)
}

pub fn invert(expr: impl Into<Expr>) -> Expr {
    unaryop(UnaryOpKind::Invert, expr)
}

pub fn uadd(expr: impl Into<Expr>) -> Expr {
    unaryop(UnaryOpKind::Uadd, expr)
}

pub fn usub(expr: impl Into<Expr>) -> Expr {
    unaryop(UnaryOpKind::Usub, expr)
}

pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::Eq, left, right)
}

pub fn neq(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::Neq, left, right)
}

pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::Lt, left, right)
}

pub fn lte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::Lte, left, right)
}

pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::Gt, left, right)
}

pub fn gte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::Gte, left, right)
}

/// Membership test; the right operand must evaluate to a collection.
pub fn in_(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::In, left, right)
}

pub fn nin(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    comparison(CompareKind::Nin, left, right)
}

// === Control flow ===

/// Conditional with no else branch; evaluates to the interpreter's
/// "no value" when the condition is false.
pub fn if_(condition: impl Into<Expr>, then: impl Into<Block>) -> Expr {
    Expr::If {
        condition: Box::new(condition.into()),
        then_clause: Some(then.into()),
        else_clause: None,
    }
}

pub fn if_else(
    condition: impl Into<Expr>,
    then: impl Into<Block>,
    else_: impl Into<Block>,
) -> Expr {
    Expr::If {
        condition: Box::new(condition.into()),
        then_clause: Some(then.into()),
        else_clause: Some(else_.into()),
    }
}

/// Try block builder; catch and finally are each independently optional.
/// Without a catch clause, a failure inside the try body propagates past
/// this node.
pub fn try_(body: impl Into<Block>) -> TryBuilder {
    TryBuilder {
        try_clause: body.into(),
        catch_clause: None,
        finally_clause: None,
    }
}

#[derive(Debug, Clone)]
pub struct TryBuilder {
    try_clause: Block,
    catch_clause: Option<Block>,
    finally_clause: Option<Block>,
}

impl TryBuilder {
    /// The caught error is bound to the local name `error`.
    pub fn catch(mut self, body: impl Into<Block>) -> Self {
        self.catch_clause = Some(body.into());
        self
    }

    pub fn finally(mut self, body: impl Into<Block>) -> Self {
        self.finally_clause = Some(body.into());
        self
    }
}

impl From<TryBuilder> for Stmt {
    fn from(value: TryBuilder) -> Self {
        Stmt::Try {
            try_clause: value.try_clause,
            catch_clause: value.catch_clause,
            finally_clause: value.finally_clause,
        }
    }
}

impl From<TryBuilder> for Block {
    fn from(value: TryBuilder) -> Self {
        Stmt::from(value).into()
    }
}

// === Iteration ===

/// Map `iterable` into a new collection, binding each element to the
/// local name `value` inside `body`.
pub fn map(iterable: impl Into<Expr>, value: impl Into<String>, body: impl Into<Block>) -> Expr {
    Expr::Map {
        value: value.into(),
        iterable: Box::new(iterable.into()),
        body: body.into(),
    }
}

/// Keep the elements of `iterable` for which `body` is truthy.
pub fn filter(iterable: impl Into<Expr>, value: impl Into<String>, body: impl Into<Block>) -> Expr {
    Expr::Filter {
        value: value.into(),
        iterable: Box::new(iterable.into()),
        body: body.into(),
    }
}

/// General for-loop statement; the body result is discarded.
pub fn for_(iterable: impl Into<Expr>, value: impl Into<String>, body: impl Into<Block>) -> Stmt {
    Stmt::For {
        value: value.into(),
        iterable: iterable.into(),
        body: body.into(),
    }
}

/// Append `value` to the collection referenced by `iterable`.
pub fn append(iterable: impl Into<Expr>, value: impl Into<Expr>) -> Stmt {
    Stmt::Append {
        iterable: iterable.into(),
        value: value.into(),
    }
}

// === Literals ===

/// Object literal from ordered key/value pairs.
pub fn obj<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Expr {
    Expr::Dictionary(
        entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<IndexMap<String, Expr>>(),
    )
}

// === Async descriptors ===

/// Network-fetch descriptor (GET by default). The host performs no I/O;
/// the client runtime executes the fetch when it evaluates the node.
pub fn fetch(url: impl Into<String>) -> FetchBuilder {
    FetchBuilder {
        url: url.into(),
        method: HttpMethod::Get,
        headers: None,
    }
}

#[derive(Debug, Clone)]
pub struct FetchBuilder {
    url: String,
    method: HttpMethod,
    headers: Option<IndexMap<String, String>>,
}

impl FetchBuilder {
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }
}

impl From<FetchBuilder> for Expr {
    fn from(value: FetchBuilder) -> Self {
        Expr::Fetch {
            url: value.url,
            method: value.method,
            headers: value.headers,
        }
    }
}

impl From<FetchBuilder> for Stmt {
    fn from(value: FetchBuilder) -> Self {
        Expr::from(value).into()
    }
}

impl From<FetchBuilder> for Block {
    fn from(value: FetchBuilder) -> Self {
        Expr::from(value).into()
    }
}

/// Timed-delay descriptor; executed remotely, never blocks the host.
pub fn sleep(ms: u64) -> Stmt {
    Stmt::Sleep { ms }
}

// === Failure & logging ===

pub fn panic(msg: impl Into<String>) -> Stmt {
    Stmt::Panic { msg: msg.into() }
}

fn log_level(level: LogLevel, value: impl Into<Expr>) -> Stmt {
    Stmt::Log {
        value: value.into(),
        level,
    }
}

pub fn log(value: impl Into<Expr>) -> Stmt {
    log_level(LogLevel::Log, value)
}

pub fn info(value: impl Into<Expr>) -> Stmt {
    log_level(LogLevel::Info, value)
}

pub fn warn(value: impl Into<Expr>) -> Stmt {
    log_level(LogLevel::Warn, value)
}

pub fn debug(value: impl Into<Expr>) -> Stmt {
    log_level(LogLevel::Debug, value)
}

pub fn error(value: impl Into<Expr>) -> Stmt {
    log_level(LogLevel::Error, value)
}

// === Debugging ===

pub fn inspect() -> Expr {
    Expr::Inspect
}

pub fn breakpoint() -> Stmt {
    Stmt::Breakpoint
}
