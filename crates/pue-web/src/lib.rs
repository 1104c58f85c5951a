//! Axum surface for pue applications.
//!
//! [`Pue`] takes a route tree and exposes the contract the client
//! runtime depends on:
//!
//! - `GET /_pue/client.js` — the embedded runtime bootstrap asset
//! - `GET /_pue/routes` — the serialized route configuration
//! - `GET /_pue/components/{Name}` — one endpoint per referenced
//!   component, producing its [`ComponentEndpointResponse`]
//! - `GET /*` — the static HTML shell bootstrapping the runtime
//!   (catch-all, so vue-router can use web history)
//!
//! Hook failures abort the whole component response and surface as 500s;
//! nothing in this layer retries or degrades partially.

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use pue_core::{ComponentRef, IndexMap, RequestContext, Route, RouteConfigResponse};
use std::collections::HashMap;
use std::sync::Arc;

/// Runtime bootstrap asset served at `/_pue/client.js`.
pub const CLIENT_JS: &str = include_str!("client.js");

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html class="h-full bg-gray-50">

    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <title>pue app</title>
        <link rel="icon" href="https://zany.sh/favicon.svg" />
        <script type="importmap">
            {
                "imports": {
                    "pue": "/_pue/client.js"
                }
            }
        </script>

        <script src="https://cdn.tailwindcss.com?plugins=forms"></script>
        <script src="https://unpkg.com/vue@3"></script>
        <script src="https://unpkg.com/vue-router@4"></script>

        <script type="module">
            import { pue } from "pue";

            const app = Vue.createApp();
            const history = VueRouter.createWebHistory();

            // the server is the single source of truth for routing
            const routes = await pue()
            const router = VueRouter.createRouter({
                history,
                routes,
            });

            app.use(router)
            app.mount("#app");
        </script>
    </head>

    <body class="h-full">
        <div id="app"><router-view></router-view></div>
    </body>

</html>
"##;

/// One pue application: a route tree plus the axum routers serving it.
#[derive(Debug, Clone)]
pub struct Pue {
    routes: Vec<Route>,
    components: IndexMap<String, ComponentRef>,
}

impl Pue {
    /// Mount point for the config API.
    pub const CONFIG_PATH: &'static str = "/_pue";
    /// Catch-all for the index shell, so vue-router web history works.
    pub const INDEX_PATH: &'static str = "/";

    pub fn new(routes: Vec<Route>) -> Self {
        let mut components = IndexMap::new();
        for route in &routes {
            for component in route.components() {
                let previous = components.insert(component.name().to_string(), component.clone());
                if previous.is_some() {
                    tracing::warn!(
                        component = component.name(),
                        "duplicate component name in route tree; last reference wins"
                    );
                }
            }
        }
        Self { routes, components }
    }

    /// Look up a referenced component by name.
    pub fn component(&self, name: &str) -> Option<&ComponentRef> {
        self.components.get(name)
    }

    pub fn routes_response(&self) -> RouteConfigResponse {
        RouteConfigResponse {
            routes: self.routes.clone(),
        }
    }

    /// Config API router: runtime asset, route config, component
    /// endpoints.
    pub fn config_router(&self) -> Router {
        let state = Arc::new(self.clone());
        Router::new()
            .route("/client.js", get(client_js_endpoint))
            .route("/routes", get(routes_endpoint))
            .route("/components/{name}", get(component_endpoint))
            .with_state(state)
    }

    /// Catch-all router serving the bootstrap shell.
    pub fn index_router(&self) -> Router {
        Router::new().fallback(get(index_endpoint))
    }

    /// The combined application router.
    pub fn router(&self) -> Router {
        Router::new()
            .nest(Self::CONFIG_PATH, self.config_router())
            .merge(self.index_router())
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(&self, addr: &str) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("pue listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await
    }
}

async fn client_js_endpoint() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        CLIENT_JS,
    )
}

async fn routes_endpoint(State(pue): State<Arc<Pue>>) -> Json<RouteConfigResponse> {
    Json(pue.routes_response())
}

async fn component_endpoint(
    State(pue): State<Arc<Pue>>,
    Path(name): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(component) = pue.component(&name) else {
        return (StatusCode::NOT_FOUND, format!("unknown component {name:?}")).into_response();
    };
    let ctx = request_context(&method, &uri, &headers);
    tracing::debug!(component = %name, path = %ctx.path, "building component response");
    match component.respond(&ctx).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::error!(
                component = %name,
                hook = e.hook.as_deref().unwrap_or("?"),
                "component hook failed: {e}"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("component endpoint failed: {e}"),
            )
                .into_response()
        }
    }
}

async fn index_endpoint() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn request_context(method: &Method, uri: &Uri, headers: &HeaderMap) -> RequestContext {
    RequestContext {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: parse_query(uri.query()),
        headers: headers_to_map(headers),
        cookies: parse_cookies(headers),
    }
}

fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (name, value) in headers {
        if let Ok(v) = value.to_str() {
            out.insert(name.as_str().to_string(), v.to_string());
        }
    }
    out
}

fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Some(query) = raw else {
        return out;
    };
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        out.insert(key.to_string(), value.to_string());
    }
    out
}

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Some(raw) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) else {
        return out;
    };
    for part in raw.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (name, value) = trimmed
            .split_once('=')
            .map(|(n, v)| (n.trim(), v.trim()))
            .unwrap_or((trimmed, ""));
        if !name.is_empty() {
            out.insert(name.to_string(), value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use pue_core::dom::div;
    use pue_core::{Component, HookError, HookResult, Template};
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
    }

    #[derive(Default)]
    struct Broken;

    #[async_trait]
    impl Component for Broken {
        fn name(&self) -> &'static str {
            "Broken"
        }

        async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
            Err(HookError::new("render exploded"))
        }
    }

    fn app() -> Pue {
        Pue::new(vec![
            Route::new("/")
                .with_component(ComponentRef::new::<Todos>())
                .with_children([Route::new("broken")
                    .with_name("Broken")
                    .with_component(ComponentRef::new::<Broken>())]),
        ])
    }

    #[test]
    fn client_js_asset_has_interpreter_markers() {
        assert!(!CLIENT_JS.is_empty());
        assert!(CLIENT_JS.contains("export async function pue"));
        // dispatch table covers the tagged node kinds
        for kind in [
            "\"VNode\"", "\"Load\"", "\"Store\"", "\"BinOp\"", "\"BoolOp\"", "\"UnaryOp\"",
            "\"Compare\"", "\"If\"", "\"Map\"", "\"Filter\"", "\"For\"", "\"Append\"", "\"Try\"",
            "\"Dictionary\"", "\"Log\"", "\"Panic\"", "\"Sleep\"", "\"Fetch\"", "\"Breakpoint\"",
            "\"Inspect\"",
        ] {
            assert!(CLIENT_JS.contains(kind), "client.js misses {kind}");
        }
        // composite prop keys are split back into name + modifiers
        assert!(CLIENT_JS.contains("rawKey.split(\",\")"));
        assert!(CLIENT_JS.contains("withModifiers"));
    }

    #[test]
    fn index_shell_bootstraps_the_runtime() {
        assert!(INDEX_HTML.contains(r#""pue": "/_pue/client.js""#));
        assert!(INDEX_HTML.contains(r#"<div id="app">"#));
        assert!(INDEX_HTML.contains("VueRouter.createWebHistory"));
    }

    #[test]
    fn component_index_covers_nested_routes() {
        let app = app();
        assert!(app.component("Todos").is_some());
        assert!(app.component("Broken").is_some());
        assert!(app.component("Missing").is_none());
    }

    #[test]
    fn routes_response_serializes_endpoints() {
        let wire = serde_json::to_value(app().routes_response()).unwrap();
        assert_eq!(
            wire["routes"][0]["componentEndpoint"],
            json!("components/Todos")
        );
        assert_eq!(
            wire["routes"][0]["children"][0]["componentEndpoint"],
            json!("components/Broken")
        );
    }

    #[test]
    fn request_context_extracts_query_and_cookies() {
        let uri: Uri = "/_pue/components/Todos?page=2&flag".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "sid=abc; theme=dark".parse().unwrap());
        let ctx = request_context(&Method::GET, &uri, &headers);
        assert_eq!(ctx.method, "GET");
        assert_eq!(ctx.path, "/_pue/components/Todos");
        assert_eq!(ctx.query["page"], "2");
        assert_eq!(ctx.query["flag"], "");
        assert_eq!(ctx.cookies["sid"], "abc");
        assert_eq!(ctx.cookies["theme"], "dark");
    }

    #[tokio::test]
    async fn component_response_round_trips_through_the_app() {
        let app = app();
        let component = app.component("Todos").unwrap();
        let ctx = RequestContext::new("GET", "/_pue/components/Todos");
        let response = component.respond(&ctx).await.unwrap();
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["template"]["vNodeTypeVal"], json!("div"));
        assert_eq!(wire["data"], json!({}));
    }

    #[tokio::test]
    async fn failing_render_hook_fails_the_request() {
        let app = app();
        let component = app.component("Broken").unwrap();
        let ctx = RequestContext::new("GET", "/_pue/components/Broken");
        let err = component.respond(&ctx).await.expect_err("must fail");
        assert_eq!(err.hook.as_deref(), Some("template"));
    }
}
