//! The classic pue demo app: a nav shell with a todo list and a photo
//! grid fed by a client-side fetch. Run with:
//!
//! ```sh
//! cargo run --example todo_app
//! ```

use async_trait::async_trait;
use pue_core::dom as h;
use pue_core::script::{self as s, local, this};
use pue_core::{
    Block, Component, ComponentRef, Data, Expr, HookResult, IndexMap, PropKey, RequestContext,
    Route, Script, Template,
};
use pue_web::Pue;
use serde_json::json;

const NAV: [(&str, &str); 2] = [("Todos", "/todos"), ("Fetch", "/fetch")];

#[derive(Default)]
struct App;

#[async_trait]
impl Component for App {
    fn name(&self) -> &'static str {
        "App"
    }

    async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
        let links: Vec<Template> = NAV
            .iter()
            .map(|(name, to)| {
                h::router_link([(*name).into()])
                    .attr("as_", "a")
                    .attr("to", *to)
                    .attr("exact_active_class", "bg-indigo-100 text-indigo-700")
                    .class("text-gray-500 hover:text-gray-700 rounded-md px-3 py-2 text-sm font-medium")
                    .into()
            })
            .collect();
        Ok(h::div([
            h::nav(links).class("flex space-x-4").into(),
            h::main([h::router_view().into()]).class("pt-10").into(),
            h::footer([h::p([
                "Made by ".into(),
                h::a(["thejchap".into()])
                    .attr("href", "https://github.com/thejchap/pue")
                    .attr("target", "_blank")
                    .class("font-semibold text-indigo-600 hover:text-indigo-500")
                    .into(),
            ])
            .class("text-xs leading-5 text-gray-500")
            .into()])
            .class("mt-6")
            .into(),
        ])
        .class("p-6")
        .into())
    }
}

#[derive(Default)]
struct Todos;

#[async_trait]
impl Component for Todos {
    fn name(&self) -> &'static str {
        "Todos"
    }

    async fn data(&self) -> HookResult<Data> {
        Ok(Data::from([
            ("todos".to_string(), json!([])),
            ("new_todo".to_string(), json!("")),
        ]))
    }

    async fn computed(&self) -> HookResult<Option<IndexMap<String, Script>>> {
        Ok(Some(IndexMap::from([
            (
                "completed".to_string(),
                Script::from(s::filter(
                    this().get("todos"),
                    "todo",
                    local().get("todo.completed"),
                )),
            ),
            (
                "incomplete".to_string(),
                Script::from(s::filter(
                    this().get("todos"),
                    "todo",
                    s::not(local().get("todo.completed")),
                )),
            ),
        ])))
    }

    async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
        let [title, source_link] = heading(
            "Pue - Todos Example",
            "https://github.com/thejchap/pue/blob/main/example.py",
        );
        Ok(h::div([
            title,
            source_link,
            h::form([
                h::input()
                    .attr("type_", "text")
                    .attr("placeholder", "What needs to be done?")
                    .attr("autofocus", true)
                    .class("mr-2 flex-1 rounded-md border-0 py-2.5 text-sm text-gray-900 shadow-sm ring-1 ring-inset ring-gray-300 placeholder:text-gray-400 focus:ring-2 focus:ring-inset focus:ring-indigo-600 sm:text-sm sm:leading-6")
                    .attr("value", this().get("new_todo"))
                    .on("input", this().set("new_todo", local().get("$event.target.value")))
                    .into(),
                h::button(["Add".into()])
                    .attr("disabled", s::not(this().get("new_todo.length")))
                    .attr("type_", "submit")
                    .class("rounded-md bg-indigo-600 px-3.5 py-2.5 text-sm font-semibold text-white shadow-sm hover:bg-indigo-500 focus-visible:outline focus-visible:outline-2 focus-visible:outline-offset-2 focus-visible:outline-indigo-600 disabled:opacity-50 disabled:cursor-not-allowed")
                    .into(),
            ])
            .prop(
                PropKey::compound(["onSubmit", "prevent"])?,
                Block::seq([
                    s::append(
                        this().get("todos"),
                        s::obj([
                            ("id", this().get("todos.length")),
                            ("title", this().get("new_todo")),
                            ("completed", false.into()),
                        ]),
                    ),
                    this().set("new_todo", ""),
                ]),
            )
            .class("mb-6 flex")
            .into(),
            s::if_(
                s::gt(this().get("incomplete.length"), 0),
                todo_list(this().get("incomplete"), "Incomplete"),
            ),
            s::if_(
                s::gt(this().get("completed.length"), 0),
                todo_list(this().get("completed"), "Completed"),
            ),
        ])
        .class("block")
        .into())
    }
}

fn todo_list(todos: Expr, title: &str) -> Expr {
    h::section([
        h::legend([title.into()])
            .class("text-base font-semibold leading-6 text-gray-900")
            .into(),
        h::div([s::map(
            todos,
            "todo",
            h::div([
                h::div([h::input()
                    .attr("type_", "checkbox")
                    .class("h-4 w-4 rounded border-gray-300 text-indigo-600 focus:ring-indigo-600")
                    .attr("checked", local().get("todo.completed"))
                    .on(
                        "change",
                        local().set("todo.completed", local().get("$event.target.checked")),
                    )
                    .into()])
                .class("flex h-6 items-center")
                .into(),
                h::div([h::label([local().get("todo.title")])
                    .class(Block::seq([
                        "font-medium text-gray-900".into(),
                        s::if_(local().get("todo.completed"), "line-through").into(),
                    ]))
                    .into()])
                .class("ml-3 text-sm leading-6")
                .into(),
            ])
            .class("relative flex items-start py-4")
            .attr("key", local().get("todo.id")),
        )])
        .class("my-4 divide-y divide-gray-200 border-b border-t border-gray-200")
        .into(),
    ])
    .into()
}

#[derive(Default)]
struct FetchExample;

#[async_trait]
impl Component for FetchExample {
    fn name(&self) -> &'static str {
        "FetchExample"
    }

    async fn data(&self) -> HookResult<Data> {
        Ok(Data::from([
            ("photos".to_string(), json!([])),
            ("is_loading".to_string(), json!(true)),
            ("error".to_string(), json!(null)),
        ]))
    }

    async fn mounted(&self) -> HookResult<Option<Script>> {
        Ok(Some(
            s::try_(this().set("photos", s::fetch("https://picsum.photos/v2/list?limit=16")))
                .catch(this().set("error", local().get("error.message")))
                .finally(this().set("is_loading", false))
                .into(),
        ))
    }

    async fn template(&self, _req: &RequestContext) -> HookResult<Template> {
        let [title, source_link] = heading(
            "Pue - Fetch Example",
            "https://github.com/thejchap/pue/blob/main/example.py",
        );
        Ok(h::div([
            title,
            source_link,
            s::if_(
                this().get("error"),
                h::div([h::div([h::div([h::p([this().get("error")])
                    .class("text-sm font-medium text-red-800")
                    .into()])
                .class("flex-shrink-0")
                .into()])
                .class("flex")
                .into()])
                .class("rounded-md bg-red-50 p-4"),
            ),
            s::if_else(
                this().get("is_loading"),
                h::div([]).class(
                    "animate-spin inline-block w-12 h-12 border-[3px] border-current border-t-transparent text-indigo-600 rounded-full dark:text-indigo-500",
                ),
                h::div([s::map(
                    this().get("photos"),
                    "photo",
                    h::div([
                        h::div([h::img()
                            .attr("src", local().get("photo.download_url"))
                            .class("h-full w-full object-cover object-center lg:h-full lg:w-full")
                            .into()])
                        .class("aspect-h-1 aspect-w-1 w-full overflow-hidden rounded-md bg-gray-200 lg:aspect-none group-hover:opacity-75 lg:h-80")
                        .into(),
                        h::div([h::h3([local().get("photo.author")])
                            .class("text-sm text-gray-700")
                            .into()])
                        .class("mt-4 flex justify-between")
                        .into(),
                    ])
                    .class("group relative"),
                )])
                .class("mt-6 grid grid-cols-1 gap-x-6 gap-y-10 sm:grid-cols-2 lg:grid-cols-4 xl:gap-x-8"),
            ),
        ])
        .into())
    }
}

fn heading(title: &str, code_ptr: &str) -> [Template; 2] {
    [
        h::h1([title.into()])
            .class("text-3xl font-bold tracking-tight text-gray-90")
            .into(),
        h::p([
            h::a(["Click here".into()])
                .attr("href", code_ptr)
                .attr("target", "_blank")
                .class("font-semibold text-indigo-600 hover:text-indigo-500")
                .into(),
            " to view source code".into(),
        ])
        .class("mt-4 mb-6 text-lg leading-8 text-gray-600")
        .into(),
    ]
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt().init();

    let app = Pue::new(vec![
        Route::new("/")
            .with_component(ComponentRef::new::<App>())
            .with_children([
                Route::new("").with_name("Index").with_redirect("todos"),
                Route::new("todos")
                    .with_name("Todos")
                    .with_component(ComponentRef::new::<Todos>()),
                Route::new("fetch")
                    .with_name("Fetch")
                    .with_component(ComponentRef::new::<FetchExample>()),
            ]),
    ]);

    let addr = std::env::var("PUE_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    app.serve(&addr).await
}
