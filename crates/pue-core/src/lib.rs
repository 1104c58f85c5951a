//! pue core crate.
//!
//! This crate separates the scripting IR into layers:
//!
//! - `ast`: tagged-variant node model for expressions, statements, and
//!   templates. Immutable values, unique `kind` discriminators.
//! - `script` + `dom`: the builder surface components use to assemble
//!   scripts and templates — scope proxies, operator combinators, the
//!   node factory with attribute-name normalization.
//! - `component`: the capability contract (one required render hook,
//!   optional lifecycle/computed/watch/data hooks) and the per-request
//!   concurrent fan-out into one response envelope.
//! - `route`: recursive route configuration consumed by the web layer.
//! - `wire`: the canonical JSON encoding the external interpreter
//!   dispatches on, plus the symmetric decoder.
//!
//! The critical design rule is that the wire format is the contract:
//! every node carries its discriminator, field names are statically
//! declared, and compound property keys flatten to one composite key the
//! client can split back apart. The host never executes scripts — async
//! nodes like `Fetch` and `Sleep` are intent descriptors the remote
//! runtime interprets.

pub mod ast;
pub mod component;
pub mod dom;
pub mod error;
pub mod route;
pub mod script;
pub mod wire;

pub use ast::{
    BinOpKind, Block, BoolOpKind, CompareKind, Constant, Expr, HttpMethod, LogLevel, PropKey,
    Scope, Script, Stmt, Template, UnaryOpKind, VNode, VNodeType,
};
pub use component::{
    Component, ComponentEndpointResponse, ComponentRef, Data, HookResult, RequestContext,
};
pub use error::{BuildError, HookError, WireError};
pub use route::{Route, RouteConfigResponse};
pub use wire::{decode_block, decode_expr, decode_stmt};

// hook signatures use IndexMap; re-exported so implementors don't need a
// direct indexmap dependency
pub use indexmap::IndexMap;
