use crate::error::BuildError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Separator used when a compound property key is flattened into one
/// composite wire key. The client runtime splits prop keys on this
/// character to recover the event name and its modifiers.
pub const PROP_KEY_SEPARATOR: char = ',';

/// Variable namespace for `Load`/`Store`.
///
/// `Component` addresses the owning component instance's reactive state
/// and is valid for the lifetime of the component. `Local` addresses a
/// binding introduced by an enclosing `Map`/`Filter`/`For` body and is
/// only meaningful textually nested inside that body. The node model does
/// not enforce the nesting contract; see [`crate::script::ScopeProxy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Component,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOpKind {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Floordiv,
    Lshift,
    Rshift,
    Bitand,
    Bitor,
    Bitxor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnaryOpKind {
    Invert,
    Not,
    Uadd,
    Usub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareKind {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Nin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Log,
    Info,
    Warn,
    Debug,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Literal constant. Serializes as a bare JSON scalar, never as a tagged
/// node object; the client dispatches on `typeof` for these.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Constant {
    /// Checked float constructor. NaN and infinities have no wire image
    /// and are rejected here rather than at serialization time.
    pub fn float(value: f64) -> Result<Self, BuildError> {
        if !value.is_finite() {
            return Err(BuildError::new(format!(
                "float literal {value} is not representable in the wire format"
            )));
        }
        Ok(Self::Float(value))
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Constant {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Constant {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Constant {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Expression — an IR node that produces a value.
///
/// Every tagged variant carries a unique `kind` discriminator (the
/// variant name) and an `isAsync` flag derived from variant identity;
/// both are emitted by the wire serializer and are the sole dispatch
/// basis for the external interpreter. Recursive positions use `Box` /
/// `Vec` indirection so the type stays finite in size.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bare literal; the one untagged case (wire form is the scalar itself).
    Constant(Constant),

    // === Operators ===
    BoolOp {
        op: BoolOpKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    BinOp {
        op: BinOpKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOpKind,
        expr: Box<Expr>,
    },
    Compare {
        op: CompareKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // === Control flow ===
    If {
        condition: Box<Expr>,
        then_clause: Option<Block>,
        else_clause: Option<Block>,
    },

    // === Iteration ===
    /// Iterate `iterable`, binding each element to the local name `value`
    /// inside `body`; collects the body results.
    Map {
        value: String,
        iterable: Box<Expr>,
        body: Block,
    },
    /// Like `Map`, but keeps the elements for which `body` is truthy.
    Filter {
        value: String,
        iterable: Box<Expr>,
        body: Block,
    },

    // === Variables ===
    Load {
        name: String,
        scope: Scope,
    },

    // === Literals ===
    Dictionary(IndexMap<String, Expr>),

    // === Async descriptors (no host-side I/O; executed remotely) ===
    Fetch {
        url: String,
        method: HttpMethod,
        headers: Option<IndexMap<String, String>>,
    },

    // === Debugging ===
    /// Evaluates to the interpreter's current scope for inspection.
    Inspect,

    // === Templates ===
    VNode(Box<VNode>),
}

impl Expr {
    pub fn null() -> Self {
        Self::Constant(Constant::Null)
    }

    /// Checked float literal; see [`Constant::float`].
    pub fn float(value: f64) -> Result<Self, BuildError> {
        Ok(Self::Constant(Constant::float(value)?))
    }

    /// Discriminator for tagged nodes. Literal constants serialize as
    /// bare scalars and have no discriminator.
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Self::Constant(_) => None,
            Self::BoolOp { .. } => Some("BoolOp"),
            Self::BinOp { .. } => Some("BinOp"),
            Self::UnaryOp { .. } => Some("UnaryOp"),
            Self::Compare { .. } => Some("Compare"),
            Self::If { .. } => Some("If"),
            Self::Map { .. } => Some("Map"),
            Self::Filter { .. } => Some("Filter"),
            Self::Load { .. } => Some("Load"),
            Self::Dictionary(_) => Some("Dictionary"),
            Self::Fetch { .. } => Some("Fetch"),
            Self::Inspect => Some("Inspect"),
            Self::VNode(_) => Some("VNode"),
        }
    }

    /// True only for operations whose execution is inherently
    /// asynchronous on the interpreter side.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

impl From<Constant> for Expr {
    fn from(value: Constant) -> Self {
        Self::Constant(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Constant(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Constant(value.into())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Constant(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Constant(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Constant(value.into())
    }
}

impl From<VNode> for Expr {
    fn from(value: VNode) -> Self {
        Self::VNode(Box::new(value))
    }
}

/// Statement — everything an [`Expr`] can be, plus non-value operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression in statement position; serializes as the expression
    /// itself (no extra tagging).
    Expr(Expr),

    Log {
        value: Expr,
        level: LogLevel,
    },
    /// Unconditional failure; the interpreter raises `msg`.
    Panic {
        msg: String,
    },
    Try {
        try_clause: Block,
        catch_clause: Option<Block>,
        finally_clause: Option<Block>,
    },
    /// Async timed-delay descriptor; no host-side blocking.
    Sleep {
        ms: u64,
    },
    For {
        value: String,
        iterable: Expr,
        body: Block,
    },
    Store {
        name: String,
        scope: Scope,
        value: Expr,
    },
    /// Appends `value` to the collection referenced by `iterable`,
    /// preserving prior order.
    Append {
        iterable: Expr,
        value: Expr,
    },
    Breakpoint,
}

impl Stmt {
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Self::Expr(e) => e.kind(),
            Self::Log { .. } => Some("Log"),
            Self::Panic { .. } => Some("Panic"),
            Self::Try { .. } => Some("Try"),
            Self::Sleep { .. } => Some("Sleep"),
            Self::For { .. } => Some("For"),
            Self::Store { .. } => Some("Store"),
            Self::Append { .. } => Some("Append"),
            Self::Breakpoint => Some("Breakpoint"),
        }
    }

    pub fn is_async(&self) -> bool {
        match self {
            Self::Expr(e) => e.is_async(),
            Self::Sleep { .. } => true,
            _ => false,
        }
    }
}

impl From<Expr> for Stmt {
    fn from(value: Expr) -> Self {
        Self::Expr(value)
    }
}

impl From<Constant> for Stmt {
    fn from(value: Constant) -> Self {
        Self::Expr(value.into())
    }
}

impl From<VNode> for Stmt {
    fn from(value: VNode) -> Self {
        Self::Expr(value.into())
    }
}

impl From<&str> for Stmt {
    fn from(value: &str) -> Self {
        Self::Expr(value.into())
    }
}

impl From<String> for Stmt {
    fn from(value: String) -> Self {
        Self::Expr(value.into())
    }
}

impl From<bool> for Stmt {
    fn from(value: bool) -> Self {
        Self::Expr(value.into())
    }
}

impl From<i64> for Stmt {
    fn from(value: i64) -> Self {
        Self::Expr(value.into())
    }
}

impl From<i32> for Stmt {
    fn from(value: i32) -> Self {
        Self::Expr(value.into())
    }
}

/// One statement or an ordered sequence of statements. Execution order
/// is significant; the wire form is a single node or a JSON array.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    One(Box<Stmt>),
    Seq(Vec<Stmt>),
}

impl Block {
    pub fn seq(stmts: impl IntoIterator<Item = Stmt>) -> Self {
        Self::Seq(stmts.into_iter().collect())
    }
}

impl From<Stmt> for Block {
    fn from(value: Stmt) -> Self {
        Self::One(Box::new(value))
    }
}

impl From<Expr> for Block {
    fn from(value: Expr) -> Self {
        Stmt::from(value).into()
    }
}

impl From<Constant> for Block {
    fn from(value: Constant) -> Self {
        Stmt::from(value).into()
    }
}

impl From<VNode> for Block {
    fn from(value: VNode) -> Self {
        Stmt::from(value).into()
    }
}

impl From<&str> for Block {
    fn from(value: &str) -> Self {
        Stmt::from(value).into()
    }
}

impl From<String> for Block {
    fn from(value: String) -> Self {
        Stmt::from(value).into()
    }
}

impl From<bool> for Block {
    fn from(value: bool) -> Self {
        Stmt::from(value).into()
    }
}

impl From<i64> for Block {
    fn from(value: i64) -> Self {
        Stmt::from(value).into()
    }
}

impl From<i32> for Block {
    fn from(value: i32) -> Self {
        Stmt::from(value).into()
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(value: Vec<Stmt>) -> Self {
        Self::Seq(value)
    }
}

/// A script shipped to the client: one statement or a sequence.
pub type Script = Block;

/// A template is a virtual node or any other expression (a nested
/// component's output, a computed fragment, a bare string).
pub type Template = Expr;

/// Discriminant between a plain HTML tag and a named client-side
/// component. Wire strings are `"string"` and `"component"` (the client
/// forks on them to decide between `h(tag)` and `h(resolveComponent)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VNodeType {
    #[serde(rename = "string")]
    Tag,
    #[serde(rename = "component")]
    Component,
}

/// Template node: a tag or component instance with properties and
/// ordered children. Child order is render order. The tree is acyclic by
/// construction — children are owned values, never references.
#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
    pub node_type: VNodeType,
    pub type_name: String,
    pub props: IndexMap<PropKey, Script>,
    pub children: Vec<Template>,
}

impl VNode {
    pub fn new(node_type: VNodeType, type_name: impl Into<String>) -> Self {
        Self {
            node_type,
            type_name: type_name.into(),
            props: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        "VNode"
    }

    pub fn is_async(&self) -> bool {
        false
    }
}

/// VNode property key: a plain name, or a compound key encoding an event
/// name plus modifiers (e.g. `("onSubmit", "prevent")`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropKey {
    /// Used as-is on the wire. A plain key containing the separator
    /// character will be re-read as compound by the client runtime;
    /// builder-normalized attribute names can never contain it.
    Plain(String),
    Compound(Vec<String>),
}

impl PropKey {
    pub fn plain(name: impl Into<String>) -> Self {
        Self::Plain(name.into())
    }

    /// Compound key constructor. Requires at least two parts (an event
    /// name and one or more modifiers), each non-empty and free of the
    /// separator character, so that [`PropKey::decode`] inverts
    /// [`PropKey::encode`].
    pub fn compound<I, S>(parts: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.len() < 2 {
            return Err(BuildError::new(
                "compound prop key requires an event name and at least one modifier",
            ));
        }
        for part in &parts {
            if part.is_empty() {
                return Err(BuildError::new("compound prop key part is empty"));
            }
            if part.contains(PROP_KEY_SEPARATOR) {
                return Err(BuildError::new(format!(
                    "compound prop key part {part:?} contains the separator {PROP_KEY_SEPARATOR:?}"
                )));
            }
        }
        Ok(Self::Compound(parts))
    }

    /// Flatten to the single composite wire key.
    pub fn encode(&self) -> String {
        match self {
            Self::Plain(name) => name.clone(),
            Self::Compound(parts) => parts.join(&PROP_KEY_SEPARATOR.to_string()),
        }
    }

    /// Re-derive the key from its wire form, as the client runtime does.
    pub fn decode(raw: &str) -> Self {
        if raw.contains(PROP_KEY_SEPARATOR) {
            Self::Compound(raw.split(PROP_KEY_SEPARATOR).map(String::from).collect())
        } else {
            Self::Plain(raw.to_string())
        }
    }
}

impl From<&str> for PropKey {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for PropKey {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}
