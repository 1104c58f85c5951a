//! Route configuration: a pure, recursive pairing of URL paths with
//! component references, consumed by the web layer to mount component
//! endpoints and emitted to clients as the router configuration.

use crate::component::ComponentRef;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One route-tree node. `component` is a per-request factory and never
/// crosses the wire; only its derived endpoint path is serialized.
/// Children are owned values, so the tree is finite and acyclic by
/// construction.
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub path: String,
    pub name: Option<String>,
    pub redirect: Option<String>,
    pub component: Option<ComponentRef>,
    pub children: Vec<Route>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    pub fn with_component(mut self, component: ComponentRef) -> Self {
        self.component = Some(component);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Route>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Endpoint path of the referenced component, if any.
    pub fn component_endpoint(&self) -> Option<String> {
        self.component.as_ref().map(ComponentRef::endpoint_path)
    }

    /// Every component referenced by this subtree, in declaration order.
    pub fn components(&self) -> Vec<&ComponentRef> {
        let mut out = Vec::new();
        self.collect_components(&mut out);
        out
    }

    fn collect_components<'a>(&'a self, out: &mut Vec<&'a ComponentRef>) {
        if let Some(component) = &self.component {
            out.push(component);
        }
        for child in &self.children {
            child.collect_components(out);
        }
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("redirect", &self.redirect)?;
        map.serialize_entry("componentEndpoint", &self.component_endpoint())?;
        map.serialize_entry("children", &self.children)?;
        map.end()
    }
}

/// Wire envelope for `GET /_pue/routes`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RouteConfigResponse {
    pub routes: Vec<Route>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Template;
    use crate::component::{Component, HookResult, RequestContext};
    use crate::dom::div;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Default)]
    struct Todos;

    #[async_trait]
    impl Component for Todos {
        fn name(&self) -> &'static str {
            "Todos"
        }

        async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
            Ok(div([]).into())
        }
    }

    #[derive(Default)]
    struct App;

    #[async_trait]
    impl Component for App {
        fn name(&self) -> &'static str {
            "App"
        }

        async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
            Ok(div([]).into())
        }
    }

    fn route_tree() -> Route {
        Route::new("/")
            .with_component(ComponentRef::new::<App>())
            .with_children([
                Route::new("").with_name("Index").with_redirect("todos"),
                Route::new("todos")
                    .with_name("Todos")
                    .with_component(ComponentRef::new::<Todos>()),
            ])
    }

    #[test]
    fn serializes_endpoint_not_component() {
        let wire = serde_json::to_value(RouteConfigResponse {
            routes: vec![route_tree()],
        })
        .unwrap();
        assert_eq!(
            wire,
            json!({
                "routes": [{
                    "path": "/",
                    "name": null,
                    "redirect": null,
                    "componentEndpoint": "components/App",
                    "children": [
                        {
                            "path": "",
                            "name": "Index",
                            "redirect": "todos",
                            "componentEndpoint": null,
                            "children": [],
                        },
                        {
                            "path": "todos",
                            "name": "Todos",
                            "redirect": null,
                            "componentEndpoint": "components/Todos",
                            "children": [],
                        },
                    ],
                }],
            })
        );
    }

    #[test]
    fn components_walks_the_tree_in_order() {
        let tree = route_tree();
        let names: Vec<&str> = tree.components().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["App", "Todos"]);
    }
}
