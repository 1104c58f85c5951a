//! Component capability contract and per-request response aggregation.
//!
//! A component declares one mandatory render hook (`template`) and up to
//! ten optional hooks. For every incoming request a fresh instance is
//! constructed and all declared hooks are dispatched concurrently, then
//! joined into a single [`ComponentEndpointResponse`]. The join is
//! fail-fast and all-or-nothing: the first hook failure aborts the whole
//! aggregation and no partial envelope is ever produced.

use crate::ast::{Script, Template};
use crate::error::HookError;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type HookResult<T> = Result<T, HookError>;

/// Initial reactive state: name → JSON literal.
pub type Data = IndexMap<String, Value>;

/// Per-request context handed to the render hook. Plain data extracted
/// from the transport request by the web layer; the core never touches
/// HTTP machinery.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }
}

/// A server-side component: the capability set behind one endpoint.
///
/// `template` is the only required operation — if it fails, the whole
/// request fails. Every other hook defaults to "not declared" and an
/// implementation opts in by overriding it. Hook results are merged into
/// the response envelope by [`ComponentRef::respond`].
#[async_trait]
pub trait Component: Send + Sync {
    /// Stable component name; also drives the endpoint path.
    fn name(&self) -> &'static str;

    /// Identity-derived endpoint path: `components/<name>`.
    fn endpoint_path(&self) -> String {
        format!("components/{}", self.name())
    }

    /// Render the component's template for this request.
    async fn template(&self, req: &RequestContext) -> HookResult<Template>;

    /// Initial reactive state.
    async fn data(&self) -> HookResult<Data> {
        Ok(Data::new())
    }

    async fn created(&self) -> HookResult<Option<Script>> {
        Ok(None)
    }

    async fn before_mount(&self) -> HookResult<Option<Script>> {
        Ok(None)
    }

    async fn mounted(&self) -> HookResult<Option<Script>> {
        Ok(None)
    }

    async fn before_update(&self) -> HookResult<Option<Script>> {
        Ok(None)
    }

    async fn updated(&self) -> HookResult<Option<Script>> {
        Ok(None)
    }

    async fn before_unmount(&self) -> HookResult<Option<Script>> {
        Ok(None)
    }

    async fn unmounted(&self) -> HookResult<Option<Script>> {
        Ok(None)
    }

    /// Computed property name → script.
    async fn computed(&self) -> HookResult<Option<IndexMap<String, Script>>> {
        Ok(None)
    }

    /// Watcher name → script.
    async fn watch(&self) -> HookResult<Option<IndexMap<String, Script>>> {
        Ok(None)
    }
}

/// Per-request component envelope: the template plus every declared hook
/// result, serialized once and discarded after the response is sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEndpointResponse {
    pub template: Template,
    pub created: Option<Script>,
    pub before_mount: Option<Script>,
    pub mounted: Option<Script>,
    pub before_update: Option<Script>,
    pub updated: Option<Script>,
    pub before_unmount: Option<Script>,
    pub unmounted: Option<Script>,
    pub computed: Option<IndexMap<String, Script>>,
    pub watch: Option<IndexMap<String, Script>>,
    pub data: Data,
}

/// Handle to a component type: its name plus a factory constructing one
/// fresh instance per request, so no state is ever shared across
/// requests or across concurrent requests for the same component.
#[derive(Clone)]
pub struct ComponentRef {
    name: String,
    make: Arc<dyn Fn() -> Box<dyn Component> + Send + Sync>,
}

impl ComponentRef {
    pub fn new<C: Component + Default + 'static>() -> Self {
        let name = C::default().name().to_string();
        Self {
            name,
            make: Arc::new(|| Box::new(C::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint_path(&self) -> String {
        format!("components/{}", self.name)
    }

    pub fn instantiate(&self) -> Box<dyn Component> {
        (self.make)()
    }

    /// Build the endpoint response for one request: construct a fresh
    /// instance, fan out every hook concurrently, join, and assemble the
    /// envelope. The first hook failure wins and the remaining futures
    /// are dropped with the request.
    pub async fn respond(
        &self,
        req: &RequestContext,
    ) -> Result<ComponentEndpointResponse, HookError> {
        let instance = self.instantiate();
        let component = instance.name();
        let (
            template,
            data,
            created,
            before_mount,
            mounted,
            before_update,
            updated,
            before_unmount,
            unmounted,
            computed,
            watch,
        ) = tokio::try_join!(
            hook(instance.template(req), component, "template"),
            hook(instance.data(), component, "data"),
            hook(instance.created(), component, "created"),
            hook(instance.before_mount(), component, "beforeMount"),
            hook(instance.mounted(), component, "mounted"),
            hook(instance.before_update(), component, "beforeUpdate"),
            hook(instance.updated(), component, "updated"),
            hook(instance.before_unmount(), component, "beforeUnmount"),
            hook(instance.unmounted(), component, "unmounted"),
            hook(instance.computed(), component, "computed"),
            hook(instance.watch(), component, "watch"),
        )?;
        Ok(ComponentEndpointResponse {
            template,
            created,
            before_mount,
            mounted,
            before_update,
            updated,
            before_unmount,
            unmounted,
            computed,
            watch,
            data,
        })
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

async fn hook<T>(
    fut: impl Future<Output = HookResult<T>>,
    component: &str,
    name: &str,
) -> HookResult<T> {
    fut.await.map_err(|e| e.in_hook(component, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::div;
    use crate::script::this;
    use serde_json::json;

    #[derive(Default)]
    struct Todos;

    #[async_trait]
    impl Component for Todos {
        fn name(&self) -> &'static str {
            "Todos"
        }

        async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
            Ok(div(["todos".into()]).into())
        }

        async fn data(&self) -> HookResult<Data> {
            Ok(Data::from([
                ("todos".to_string(), json!([])),
                ("new_todo".to_string(), json!("")),
            ]))
        }

        async fn computed(&self) -> HookResult<Option<IndexMap<String, Script>>> {
            Ok(Some(IndexMap::from([(
                "count".to_string(),
                Script::from(this().get("todos.length")),
            )])))
        }
    }

    #[derive(Default)]
    struct BrokenData;

    #[async_trait]
    impl Component for BrokenData {
        fn name(&self) -> &'static str {
            "BrokenData"
        }

        async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
            Ok(div([]).into())
        }

        async fn data(&self) -> HookResult<Data> {
            Err(HookError::new("backing store unavailable"))
        }
    }

    #[test]
    fn endpoint_path_derives_from_name() {
        let component = ComponentRef::new::<Todos>();
        assert_eq!(component.name(), "Todos");
        assert_eq!(component.endpoint_path(), "components/Todos");
    }

    #[tokio::test]
    async fn all_hooks_succeed_yields_complete_envelope() {
        let component = ComponentRef::new::<Todos>();
        let req = RequestContext::new("GET", "/_pue/components/Todos");
        let response = component.respond(&req).await.expect("responds");

        assert_eq!(response.data["new_todo"], json!(""));
        assert!(response.computed.is_some());
        // undeclared hooks stay empty rather than failing the envelope
        assert!(response.mounted.is_none());
        assert!(response.watch.is_none());

        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["template"]["kind"], json!("VNode"));
        assert_eq!(wire["beforeMount"], json!(null));
        assert_eq!(wire["computed"]["count"]["kind"], json!("Load"));
    }

    #[tokio::test]
    async fn one_failing_hook_rejects_the_whole_response() {
        // template succeeds, data fails: no partial envelope
        let component = ComponentRef::new::<BrokenData>();
        let req = RequestContext::new("GET", "/_pue/components/BrokenData");
        let err = component.respond(&req).await.expect_err("must fail");
        assert_eq!(err.component.as_deref(), Some("BrokenData"));
        assert_eq!(err.hook.as_deref(), Some("data"));
        assert_eq!(err.message, "backing store unavailable");
    }

    #[tokio::test]
    async fn each_request_gets_a_fresh_instance() {
        let component = ComponentRef::new::<Todos>();
        let req = RequestContext::new("GET", "/");
        let first = component.respond(&req).await.unwrap();
        let second = component.respond(&req).await.unwrap();
        let (a, b) = (
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap(),
        );
        assert_eq!(a, b);
    }
}
