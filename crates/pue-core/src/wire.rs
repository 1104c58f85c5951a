//! Canonical wire encoding for the scripting IR.
//!
//! Every tagged node serializes to a JSON object carrying `kind` (the
//! variant discriminator, unique across the IR) and `isAsync`, followed by
//! the variant's own fields under statically declared camelCase names.
//! Literal constants serialize as bare scalars and statement sequences as
//! arrays — the client interpreter dispatches on `typeof` / `Array.isArray`
//! before it ever looks at `kind`. Compound property keys flatten to one
//! composite string key.
//!
//! The decoder walks a `serde_json::Value` tree and rebuilds typed nodes
//! from the same tags, so `serialize → decode` reproduces an equivalent
//! tree (field order aside). It is strict: unknown kinds, missing fields,
//! and malformed shapes are [`WireError`]s, never coerced.

use crate::ast::{Block, Constant, Expr, PropKey, Stmt, VNode, VNodeType};
use crate::error::WireError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

// === Encoding ===

impl Serialize for Constant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for PropKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::One(stmt) => stmt.serialize(serializer),
            Self::Seq(stmts) => stmts.serialize(serializer),
        }
    }
}

impl Serialize for Stmt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Expr(e) => e.serialize(serializer),
            Self::Log { value, level } => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.serialize_entry("value", value)?;
                map.serialize_entry("level", level)?;
                map.end()
            }
            Self::Panic { msg } => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.serialize_entry("msg", msg)?;
                map.end()
            }
            Self::Try {
                try_clause,
                catch_clause,
                finally_clause,
            } => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.serialize_entry("tryClause", try_clause)?;
                map.serialize_entry("catchClause", catch_clause)?;
                map.serialize_entry("finallyClause", finally_clause)?;
                map.end()
            }
            Self::Sleep { ms } => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.serialize_entry("ms", ms)?;
                map.end()
            }
            Self::For {
                value,
                iterable,
                body,
            } => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.serialize_entry("value", value)?;
                map.serialize_entry("iterable", iterable)?;
                map.serialize_entry("body", body)?;
                map.end()
            }
            Self::Store { name, scope, value } => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("scope", scope)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Append { iterable, value } => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.serialize_entry("iterable", iterable)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Breakpoint => {
                let mut map = serializer.serialize_map(None)?;
                tag(&mut map, self)?;
                map.end()
            }
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Constant(c) => c.serialize(serializer),
            Self::BoolOp { op, left, right } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("op", op)?;
                map.serialize_entry("left", left)?;
                map.serialize_entry("right", right)?;
                map.end()
            }
            Self::BinOp { op, left, right } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("op", op)?;
                map.serialize_entry("left", left)?;
                map.serialize_entry("right", right)?;
                map.end()
            }
            Self::UnaryOp { op, expr } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("op", op)?;
                map.serialize_entry("expr", expr)?;
                map.end()
            }
            Self::Compare { op, left, right } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("op", op)?;
                map.serialize_entry("left", left)?;
                map.serialize_entry("right", right)?;
                map.end()
            }
            Self::If {
                condition,
                then_clause,
                else_clause,
            } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("condition", condition)?;
                map.serialize_entry("thenClause", then_clause)?;
                map.serialize_entry("elseClause", else_clause)?;
                map.end()
            }
            Self::Map {
                value,
                iterable,
                body,
            } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("value", value)?;
                map.serialize_entry("iterable", iterable)?;
                map.serialize_entry("body", body)?;
                map.end()
            }
            Self::Filter {
                value,
                iterable,
                body,
            } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("value", value)?;
                map.serialize_entry("iterable", iterable)?;
                map.serialize_entry("body", body)?;
                map.end()
            }
            Self::Load { name, scope } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("scope", scope)?;
                map.end()
            }
            Self::Dictionary(value) => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Fetch {
                url,
                method,
                headers,
            } => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.serialize_entry("url", url)?;
                map.serialize_entry("method", method)?;
                map.serialize_entry("headers", headers)?;
                map.end()
            }
            Self::Inspect => {
                let mut map = serializer.serialize_map(None)?;
                tag_expr(&mut map, self)?;
                map.end()
            }
            Self::VNode(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for VNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", self.kind())?;
        map.serialize_entry("isAsync", &self.is_async())?;
        map.serialize_entry("vNodeTypeType", &self.node_type)?;
        map.serialize_entry("vNodeTypeVal", &self.type_name)?;
        map.serialize_entry("props", &self.props)?;
        map.serialize_entry("children", &self.children)?;
        map.end()
    }
}

fn tag<M: SerializeMap>(map: &mut M, stmt: &Stmt) -> Result<(), M::Error> {
    // statement serialization only reaches here for tagged variants
    map.serialize_entry("kind", &stmt.kind())?;
    map.serialize_entry("isAsync", &stmt.is_async())
}

fn tag_expr<M: SerializeMap>(map: &mut M, expr: &Expr) -> Result<(), M::Error> {
    map.serialize_entry("kind", &expr.kind())?;
    map.serialize_entry("isAsync", &expr.is_async())
}

// === Decoding ===

/// Rebuild a statement from its wire form.
pub fn decode_stmt(value: &Value) -> Result<Stmt, WireError> {
    let obj = match value {
        Value::Object(obj) => obj,
        Value::Array(_) => {
            return Err(WireError::new(
                "expected a single statement, found a sequence",
            ));
        }
        scalar => return Ok(Stmt::Expr(decode_constant(scalar))),
    };
    let kind = node_kind(obj)?;
    if let Some(expr) = decode_tagged_expr(kind, obj)? {
        return Ok(Stmt::Expr(expr));
    }
    match kind {
        "Log" => Ok(Stmt::Log {
            value: decode_expr(field(obj, "value", kind)?)?,
            level: leaf(field(obj, "level", kind)?, "log level")?,
        }),
        "Panic" => Ok(Stmt::Panic {
            msg: string_field(obj, "msg", kind)?,
        }),
        "Try" => Ok(Stmt::Try {
            try_clause: decode_block(field(obj, "tryClause", kind)?)?,
            catch_clause: opt_block(obj, "catchClause")?,
            finally_clause: opt_block(obj, "finallyClause")?,
        }),
        "Sleep" => {
            let ms = field(obj, "ms", kind)?
                .as_u64()
                .ok_or_else(|| WireError::new("Sleep.ms is not an unsigned integer"))?;
            Ok(Stmt::Sleep { ms })
        }
        "For" => Ok(Stmt::For {
            value: string_field(obj, "value", kind)?,
            iterable: decode_expr(field(obj, "iterable", kind)?)?,
            body: decode_block(field(obj, "body", kind)?)?,
        }),
        "Store" => Ok(Stmt::Store {
            name: string_field(obj, "name", kind)?,
            scope: leaf(field(obj, "scope", kind)?, "scope")?,
            value: decode_expr(field(obj, "value", kind)?)?,
        }),
        "Append" => Ok(Stmt::Append {
            iterable: decode_expr(field(obj, "iterable", kind)?)?,
            value: decode_expr(field(obj, "value", kind)?)?,
        }),
        "Breakpoint" => Ok(Stmt::Breakpoint),
        unknown => Err(WireError::new(format!("unknown node kind {unknown:?}"))),
    }
}

/// Rebuild an expression from its wire form.
pub fn decode_expr(value: &Value) -> Result<Expr, WireError> {
    let obj = match value {
        Value::Object(obj) => obj,
        Value::Array(_) => {
            return Err(WireError::new(
                "expected an expression, found a sequence",
            ));
        }
        scalar => return Ok(decode_constant(scalar)),
    };
    let kind = node_kind(obj)?;
    match decode_tagged_expr(kind, obj)? {
        Some(expr) => Ok(expr),
        None => Err(WireError::new(format!(
            "node kind {kind:?} is not an expression"
        ))),
    }
}

/// Rebuild a block: a JSON array is a statement sequence, anything else
/// a single statement.
pub fn decode_block(value: &Value) -> Result<Block, WireError> {
    match value {
        Value::Array(items) => Ok(Block::Seq(
            items.iter().map(decode_stmt).collect::<Result<_, _>>()?,
        )),
        other => Ok(Block::One(Box::new(decode_stmt(other)?))),
    }
}

fn decode_constant(value: &Value) -> Expr {
    let constant = match value {
        Value::Null => Constant::Null,
        Value::Bool(b) => Constant::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Constant::Int(i)
            } else {
                // JSON numbers are always finite
                Constant::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => Constant::Str(s.clone()),
        Value::Array(_) | Value::Object(_) => unreachable!("handled by callers"),
    };
    Expr::Constant(constant)
}

/// Dispatch table for expression kinds; returns `None` for statement-only
/// kinds so callers can produce the right error.
fn decode_tagged_expr(kind: &str, obj: &Map<String, Value>) -> Result<Option<Expr>, WireError> {
    let expr = match kind {
        "BoolOp" => Expr::BoolOp {
            op: leaf(field(obj, "op", kind)?, "bool op")?,
            left: Box::new(decode_expr(field(obj, "left", kind)?)?),
            right: Box::new(decode_expr(field(obj, "right", kind)?)?),
        },
        "BinOp" => Expr::BinOp {
            op: leaf(field(obj, "op", kind)?, "bin op")?,
            left: Box::new(decode_expr(field(obj, "left", kind)?)?),
            right: Box::new(decode_expr(field(obj, "right", kind)?)?),
        },
        "UnaryOp" => Expr::UnaryOp {
            op: leaf(field(obj, "op", kind)?, "unary op")?,
            expr: Box::new(decode_expr(field(obj, "expr", kind)?)?),
        },
        "Compare" => Expr::Compare {
            op: leaf(field(obj, "op", kind)?, "compare op")?,
            left: Box::new(decode_expr(field(obj, "left", kind)?)?),
            right: Box::new(decode_expr(field(obj, "right", kind)?)?),
        },
        "If" => Expr::If {
            condition: Box::new(decode_expr(field(obj, "condition", kind)?)?),
            then_clause: opt_block(obj, "thenClause")?,
            else_clause: opt_block(obj, "elseClause")?,
        },
        "Map" => Expr::Map {
            value: string_field(obj, "value", kind)?,
            iterable: Box::new(decode_expr(field(obj, "iterable", kind)?)?),
            body: decode_block(field(obj, "body", kind)?)?,
        },
        "Filter" => Expr::Filter {
            value: string_field(obj, "value", kind)?,
            iterable: Box::new(decode_expr(field(obj, "iterable", kind)?)?),
            body: decode_block(field(obj, "body", kind)?)?,
        },
        "Load" => Expr::Load {
            name: string_field(obj, "name", kind)?,
            scope: leaf(field(obj, "scope", kind)?, "scope")?,
        },
        "Dictionary" => {
            let entries = field(obj, "value", kind)?
                .as_object()
                .ok_or_else(|| WireError::new("Dictionary.value is not an object"))?;
            let mut value = IndexMap::with_capacity(entries.len());
            for (k, v) in entries {
                value.insert(k.clone(), decode_expr(v)?);
            }
            Expr::Dictionary(value)
        }
        "Fetch" => {
            let headers = match opt_field(obj, "headers") {
                None => None,
                Some(v) => {
                    let entries = v
                        .as_object()
                        .ok_or_else(|| WireError::new("Fetch.headers is not an object"))?;
                    let mut headers = IndexMap::with_capacity(entries.len());
                    for (k, v) in entries {
                        let v = v
                            .as_str()
                            .ok_or_else(|| WireError::new("Fetch header value is not a string"))?;
                        headers.insert(k.clone(), v.to_string());
                    }
                    Some(headers)
                }
            };
            Expr::Fetch {
                url: string_field(obj, "url", kind)?,
                method: leaf(field(obj, "method", kind)?, "http method")?,
                headers,
            }
        }
        "Inspect" => Expr::Inspect,
        "VNode" => Expr::VNode(Box::new(decode_vnode(obj)?)),
        _ => return Ok(None),
    };
    Ok(Some(expr))
}

fn decode_vnode(obj: &Map<String, Value>) -> Result<VNode, WireError> {
    let node_type: VNodeType = leaf(field(obj, "vNodeTypeType", "VNode")?, "v node type")?;
    let type_name = string_field(obj, "vNodeTypeVal", "VNode")?;
    let raw_props = field(obj, "props", "VNode")?
        .as_object()
        .ok_or_else(|| WireError::new("VNode.props is not an object"))?;
    let mut props = IndexMap::with_capacity(raw_props.len());
    for (k, v) in raw_props {
        props.insert(PropKey::decode(k), decode_block(v)?);
    }
    let raw_children = field(obj, "children", "VNode")?
        .as_array()
        .ok_or_else(|| WireError::new("VNode.children is not an array"))?;
    let children = raw_children
        .iter()
        .map(decode_expr)
        .collect::<Result<_, _>>()?;
    Ok(VNode {
        node_type,
        type_name,
        props,
        children,
    })
}

fn node_kind(obj: &Map<String, Value>) -> Result<&str, WireError> {
    obj.get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| WireError::new("node object is missing its kind discriminator"))
}

fn field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    kind: &str,
) -> Result<&'a Value, WireError> {
    obj.get(key)
        .ok_or_else(|| WireError::new(format!("{kind} node is missing field {key:?}")))
}

/// Missing and explicit-null are equivalent for optional clauses.
fn opt_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn opt_block(obj: &Map<String, Value>, key: &str) -> Result<Option<Block>, WireError> {
    opt_field(obj, key).map(decode_block).transpose()
}

fn string_field(obj: &Map<String, Value>, key: &str, kind: &str) -> Result<String, WireError> {
    field(obj, key, kind)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| WireError::new(format!("{kind}.{key} is not a string")))
}

fn leaf<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T, WireError> {
    serde_json::from_value(value.clone())
        .map_err(|e| WireError::new(format!("invalid {what}: {e}")))
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_expr(&value).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Stmt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_stmt(&value).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_block(&value).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for VNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let obj = value
            .as_object()
            .ok_or_else(|| serde::de::Error::custom("VNode wire form is not an object"))?;
        decode_vnode(obj).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOpKind, CompareKind, HttpMethod, LogLevel, Scope};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn to_value<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).expect("serializable")
    }

    #[test]
    fn constants_serialize_as_bare_scalars() {
        assert_eq!(to_value(&Expr::from("hello")), json!("hello"));
        assert_eq!(to_value(&Expr::from(42)), json!(42));
        assert_eq!(to_value(&Expr::from(true)), json!(true));
        assert_eq!(to_value(&Expr::null()), json!(null));
        assert_eq!(to_value(&Expr::float(1.5).unwrap()), json!(1.5));
    }

    #[test]
    fn blocks_serialize_single_or_sequence() {
        let one = Block::from(Expr::from("x"));
        assert_eq!(to_value(&one), json!("x"));

        let seq = Block::seq([Stmt::from("a"), Stmt::Breakpoint]);
        assert_eq!(
            to_value(&seq),
            json!(["a", { "kind": "Breakpoint", "isAsync": false }])
        );
    }

    #[test]
    fn if_over_compare_emits_nested_tagged_nodes() {
        // If(Compare(gt, Load("count", component), 0), then=VNode(div))
        let node = Expr::If {
            condition: Box::new(Expr::Compare {
                op: CompareKind::Gt,
                left: Box::new(Expr::Load {
                    name: "count".to_string(),
                    scope: Scope::Component,
                }),
                right: Box::new(0.into()),
            }),
            then_clause: Some(VNode::new(VNodeType::Tag, "div").into()),
            else_clause: None,
        };
        assert_eq!(
            to_value(&node),
            json!({
                "kind": "If",
                "isAsync": false,
                "condition": {
                    "kind": "Compare",
                    "isAsync": false,
                    "op": "gt",
                    "left": { "kind": "Load", "isAsync": false, "name": "count", "scope": "component" },
                    "right": 0,
                },
                "thenClause": {
                    "kind": "VNode",
                    "isAsync": false,
                    "vNodeTypeType": "string",
                    "vNodeTypeVal": "div",
                    "props": {},
                    "children": [],
                },
                "elseClause": null,
            })
        );
    }

    #[test]
    fn map_body_load_is_tagged_local() {
        // Map over component todos with the local binding "todo"
        let node = Expr::Map {
            value: "todo".to_string(),
            iterable: Box::new(Expr::Load {
                name: "todos".to_string(),
                scope: Scope::Component,
            }),
            body: Expr::Load {
                name: "todo.completed".to_string(),
                scope: Scope::Local,
            }
            .into(),
        };
        let wire = to_value(&node);
        assert_eq!(wire["kind"], json!("Map"));
        assert_eq!(wire["body"]["scope"], json!("local"));
        assert_eq!(wire["iterable"]["scope"], json!("component"));
    }

    #[test]
    fn compound_prop_key_flattens_to_composite_key() {
        let mut node = VNode::new(VNodeType::Tag, "form");
        node.props.insert(
            PropKey::compound(["onSubmit", "prevent"]).unwrap(),
            Stmt::Breakpoint.into(),
        );
        let wire = to_value(&node);
        assert!(wire["props"].get("onSubmit,prevent").is_some());
    }

    #[test]
    fn fetch_and_sleep_are_flagged_async_on_the_wire() {
        let fetch = Expr::Fetch {
            url: "https://picsum.photos/v2/list".to_string(),
            method: HttpMethod::Get,
            headers: None,
        };
        let wire = to_value(&fetch);
        assert_eq!(wire["isAsync"], json!(true));
        assert_eq!(wire["method"], json!("get"));
        assert_eq!(wire["headers"], json!(null));

        let sleep = Stmt::Sleep { ms: 250 };
        let wire = to_value(&sleep);
        assert_eq!(wire["isAsync"], json!(true));
        assert_eq!(wire["ms"], json!(250));
    }

    #[test]
    fn log_levels_serialize_lowercase() {
        let stmt = Stmt::Log {
            value: "oops".into(),
            level: LogLevel::Warn,
        };
        assert_eq!(
            to_value(&stmt),
            json!({ "kind": "Log", "isAsync": false, "value": "oops", "level": "warn" })
        );
    }

    #[test]
    fn round_trip_reproduces_equivalent_trees() {
        let trees = vec![
            Stmt::from(Expr::BinOp {
                op: BinOpKind::Add,
                left: Box::new(Expr::Load {
                    name: "count".to_string(),
                    scope: Scope::Component,
                }),
                right: Box::new(1.into()),
            }),
            Stmt::Store {
                name: "new_todo".to_string(),
                scope: Scope::Component,
                value: "".into(),
            },
            Stmt::Try {
                try_clause: Stmt::Store {
                    name: "photos".to_string(),
                    scope: Scope::Component,
                    value: Expr::Fetch {
                        url: "https://example.com/list".to_string(),
                        method: HttpMethod::Get,
                        headers: None,
                    },
                }
                .into(),
                catch_clause: Some(
                    Stmt::Store {
                        name: "error".to_string(),
                        scope: Scope::Component,
                        value: Expr::Load {
                            name: "error.message".to_string(),
                            scope: Scope::Local,
                        },
                    }
                    .into(),
                ),
                finally_clause: Some(
                    Stmt::Store {
                        name: "is_loading".to_string(),
                        scope: Scope::Component,
                        value: false.into(),
                    }
                    .into(),
                ),
            },
            Stmt::For {
                value: "todo".to_string(),
                iterable: Expr::Load {
                    name: "todos".to_string(),
                    scope: Scope::Component,
                },
                body: Block::seq([
                    Stmt::Log {
                        value: Expr::Load {
                            name: "todo".to_string(),
                            scope: Scope::Local,
                        },
                        level: LogLevel::Debug,
                    },
                    Stmt::Sleep { ms: 10 },
                ]),
            },
            Stmt::from(Expr::Dictionary(IndexMap::from([
                ("id".to_string(), Expr::from(1)),
                ("completed".to_string(), Expr::from(false)),
            ]))),
        ];
        for tree in trees {
            let wire = to_value(&tree);
            let back = decode_stmt(&wire).expect("decodes");
            assert_eq!(back, tree);
        }
    }

    #[test]
    fn vnode_round_trip_preserves_children_order_and_props() {
        let mut form = VNode::new(VNodeType::Tag, "form");
        form.props.insert(
            PropKey::compound(["onSubmit", "prevent"]).unwrap(),
            Stmt::Append {
                iterable: Expr::Load {
                    name: "todos".to_string(),
                    scope: Scope::Component,
                },
                value: "x".into(),
            }
            .into(),
        );
        form.props
            .insert(PropKey::plain("class"), Block::from(Expr::from("mb-6 flex")));
        form.children.push(Expr::from("Add"));
        form.children
            .push(VNode::new(VNodeType::Component, "RouterView").into());

        let wire = to_value(&form);
        let back: VNode = serde_json::from_value(wire).expect("decodes");
        assert_eq!(back, form);
        assert_eq!(back.children[0], Expr::from("Add"));
    }

    #[test]
    fn decode_rejects_malformed_nodes() {
        let unknown = json!({ "kind": "Frobnicate", "isAsync": false });
        assert!(decode_stmt(&unknown).is_err());

        let missing_kind = json!({ "isAsync": false, "name": "x" });
        assert!(decode_stmt(&missing_kind).is_err());

        let missing_field = json!({ "kind": "Load", "isAsync": false, "name": "x" });
        assert!(decode_stmt(&missing_field).is_err());

        // statement-only kind in expression position
        let stmt_as_expr = json!({ "kind": "Breakpoint", "isAsync": false });
        assert!(decode_expr(&stmt_as_expr).is_err());
    }
}
