//! Template construction: the node factory, the builder for tag and
//! component nodes, and helpers for the common HTML elements plus the
//! router built-ins.
//!
//! Attribute names set through [`VNodeBuilder::attr`] are normalized for
//! the wire: one trailing `'_'` (the reserved-word escape) is stripped,
//! then the snake_case remainder is converted to camelCase. Keys set
//! through the raw [`VNodeBuilder::prop`] channel pass through untouched.

use crate::ast::{Block, Expr, PropKey, Script, Template, VNode, VNodeType};

/// Strip the reserved-word escape and convert to the wire's medial
/// capitalization: `class_` → `class`, `exact_active_class` →
/// `exactActiveClass`. Idempotent.
pub fn normalize_attr_name(name: &str) -> String {
    let name = name.strip_suffix('_').unwrap_or(name);
    let mut out = String::with_capacity(name.len());
    let mut segments = name.split('_').filter(|s| !s.is_empty());
    if let Some(first) = segments.next() {
        out.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Factory for one node type: a type discriminant (tag vs component) and
/// a stable type name, yielding builders for that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFactory {
    node_type: VNodeType,
    type_name: &'static str,
}

impl NodeFactory {
    /// Start a builder with the given ordered children.
    pub fn build(&self, children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
        let mut node = VNode::new(self.node_type, self.type_name);
        node.children = children.into_iter().collect();
        VNodeBuilder { node }
    }
}

/// Factory for a plain HTML tag.
pub fn tag(name: &'static str) -> NodeFactory {
    NodeFactory {
        node_type: VNodeType::Tag,
        type_name: name,
    }
}

/// Factory for a named client-side component.
pub fn component(name: &'static str) -> NodeFactory {
    NodeFactory {
        node_type: VNodeType::Component,
        type_name: name,
    }
}

/// Builder over one [`VNode`]. Every builder owns a fresh node — prop
/// maps and child lists are never shared between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct VNodeBuilder {
    node: VNode,
}

impl VNodeBuilder {
    /// Set a property under a normalized attribute name
    /// (see [`normalize_attr_name`]).
    pub fn attr(mut self, name: &str, value: impl Into<Block>) -> Self {
        self.node
            .props
            .insert(PropKey::plain(normalize_attr_name(name)), value.into());
        self
    }

    /// Set a property under an explicit key, bypassing normalization.
    /// Compound keys come from [`PropKey::compound`].
    pub fn prop(mut self, key: impl Into<PropKey>, value: impl Into<Script>) -> Self {
        self.node.props.insert(key.into(), value.into());
        self
    }

    /// Merge a prepared property mapping, preserving its order.
    pub fn props(mut self, entries: impl IntoIterator<Item = (PropKey, Script)>) -> Self {
        self.node.props.extend(entries);
        self
    }

    /// Append a child; render order follows insertion order.
    pub fn child(mut self, child: impl Into<Template>) -> Self {
        self.node.children.push(child.into());
        self
    }

    pub fn class(self, value: impl Into<Block>) -> Self {
        self.attr("class", value)
    }

    /// Event listener: `on("input", ...)` becomes the `onInput` property.
    pub fn on(self, event: &str, handler: impl Into<Script>) -> Self {
        let key = normalize_attr_name(&format!("on_{event}"));
        self.prop(PropKey::plain(key), handler)
    }

    pub fn into_node(self) -> VNode {
        self.node
    }
}

impl From<VNodeBuilder> for VNode {
    fn from(value: VNodeBuilder) -> Self {
        value.node
    }
}

impl From<VNodeBuilder> for Expr {
    fn from(value: VNodeBuilder) -> Self {
        value.node.into()
    }
}

impl From<VNodeBuilder> for Block {
    fn from(value: VNodeBuilder) -> Self {
        Expr::from(value).into()
    }
}

// === HTML elements ===

pub fn a(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("a").build(children)
}

pub fn div(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("div").build(children)
}

pub fn span(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("span").build(children)
}

pub fn nav(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("nav").build(children)
}

pub fn h1(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("h1").build(children)
}

pub fn h2(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("h2").build(children)
}

pub fn h3(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("h3").build(children)
}

pub fn h4(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("h4").build(children)
}

pub fn h5(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("h5").build(children)
}

pub fn h6(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("h6").build(children)
}

pub fn p(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("p").build(children)
}

pub fn input() -> VNodeBuilder {
    tag("input").build([])
}

pub fn label(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("label").build(children)
}

pub fn legend(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("legend").build(children)
}

pub fn img() -> VNodeBuilder {
    tag("img").build([])
}

pub fn header(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("header").build(children)
}

pub fn footer(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("footer").build(children)
}

pub fn form(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("form").build(children)
}

pub fn button(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("button").build(children)
}

pub fn section(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("section").build(children)
}

pub fn article(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("article").build(children)
}

pub fn main(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("main").build(children)
}

pub fn ul(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("ul").build(children)
}

pub fn li(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    tag("li").build(children)
}

// === Router built-ins ===

pub fn router_view() -> VNodeBuilder {
    component("RouterView").build([])
}

pub fn router_link(children: impl IntoIterator<Item = Template>) -> VNodeBuilder {
    component("RouterLink").build(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{local, this};
    use serde_json::json;

    #[test]
    fn normalization_strips_escape_and_camelizes() {
        assert_eq!(normalize_attr_name("class_"), "class");
        assert_eq!(normalize_attr_name("type_"), "type");
        assert_eq!(normalize_attr_name("exact_active_class"), "exactActiveClass");
        assert_eq!(normalize_attr_name("href"), "href");
        assert_eq!(normalize_attr_name("on_input"), "onInput");
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["class_", "exact_active_class", "on_input", "href", "as_"] {
            let once = normalize_attr_name(name);
            assert_eq!(normalize_attr_name(&once), once);
        }
    }

    #[test]
    fn attr_channel_normalizes_prop_channel_does_not() {
        let node: VNode = router_link(["Todos".into()])
            .attr("exact_active_class", "bg-indigo-100")
            .prop(PropKey::plain("exact_active_class"), "raw")
            .into();
        assert!(node
            .props
            .contains_key(&PropKey::plain("exactActiveClass")));
        assert!(node.props.contains_key(&PropKey::plain("exact_active_class")));
    }

    #[test]
    fn tag_and_component_discriminants() {
        let plain: VNode = div([]).into();
        assert_eq!(plain.node_type, VNodeType::Tag);
        assert_eq!(plain.type_name, "div");

        let routed: VNode = router_view().into();
        assert_eq!(routed.node_type, VNodeType::Component);
        assert_eq!(routed.type_name, "RouterView");
    }

    #[test]
    fn children_keep_render_order() {
        let node: VNode = div(["first".into()])
            .child("second")
            .child(span([]))
            .into();
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.children[0], Expr::from("first"));
        assert_eq!(node.children[1], Expr::from("second"));
        match &node.children[2] {
            Expr::VNode(inner) => assert_eq!(inner.type_name, "span"),
            other => panic!("expected VNode, got {other:?}"),
        }
    }

    #[test]
    fn builders_do_not_share_prop_maps() {
        // each call allocates fresh collections; mutating one node can
        // never leak into a sibling built from the same helper
        let first: VNode = div([]).class("p-6").into();
        let second: VNode = div([]).into();
        assert_eq!(first.props.len(), 1);
        assert!(second.props.is_empty());
        assert!(second.children.is_empty());
    }

    #[test]
    fn event_listener_sugar_builds_on_key() {
        let node: VNode = input()
            .on("input", this().set("new_todo", local().get("$event.target.value")))
            .into();
        assert!(node.props.contains_key(&PropKey::plain("onInput")));
    }

    #[test]
    fn full_element_serializes_with_normalized_props() {
        let node: VNode = button(["Add".into()])
            .attr("disabled", crate::script::not(this().get("new_todo.length")))
            .attr("type_", "submit")
            .into();
        let wire = serde_json::to_value(&node).unwrap();
        assert_eq!(wire["vNodeTypeType"], json!("string"));
        assert_eq!(wire["vNodeTypeVal"], json!("button"));
        assert_eq!(wire["children"], json!(["Add"]));
        assert_eq!(wire["props"]["type"], json!("submit"));
        assert_eq!(wire["props"]["disabled"]["kind"], json!("UnaryOp"));
    }
}
