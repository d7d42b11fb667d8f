#![allow(non_snake_case)]

mod api;
mod config;
mod hooks;
mod models;
mod query;
mod screens;
mod session;
mod ui;

use api::{ClientError, ConsoleClient};
use config::AppConfig;
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use hooks::query::use_query_state_provider;
use once_cell::sync::OnceCell;
use tracing::{error, info};
use ui::screen::ScreenPage;
use ui::shell::Shell;

pub(crate) static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();
pub(crate) static API_CLIENT: OnceCell<ConsoleClient> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    bootstrap_infrastructure();
    launch(App);
}

fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(tracing::Level::INFO);
    });
}

fn bootstrap_infrastructure() {
    let config = AppConfig::from_env();
    info!(profile = ?config.profile, api = %config.api_base_url, "console configuration loaded");
    let _ = APP_CONFIG.set(config.clone());

    match ConsoleClient::new(config) {
        Ok(client) => {
            let _ = API_CLIENT.set(client);
            info!("api client initialized");
        }
        Err(err) => {
            report_client_error("api client setup failed", &err);
        }
    }
}

fn report_client_error(context: &str, err: &ClientError) {
    error!(%context, ?err, status = ?err.status(), "api bootstrap error");
}

#[component]
fn App() -> Element {
    use_query_state_provider();

    rsx! {
        Router::<Route> {}
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub(crate) enum Route {
    #[layout(Shell)]
        #[route("/")]
        Dashboard {},
        #[route("/orders")]
        Orders {},
        #[route("/employees")]
        Employees {},
        #[route("/materials")]
        Materials {},
        #[route("/materials/categories/:id")]
        MaterialCategory { id: String },
        #[route("/packages")]
        Packages {},
        #[route("/expenses")]
        Expenses {},
        #[route("/clients")]
        Clients {},
    #[end_layout]
    #[route("/login")]
    Login {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

// Keys force a fresh controller whenever the path changes.

#[component]
fn Dashboard() -> Element {
    rsx! { ScreenPage { key: "{screens::DASHBOARD.id}", descriptor: &screens::DASHBOARD, path_id: None } }
}

#[component]
fn Orders() -> Element {
    rsx! { ScreenPage { key: "{screens::ORDERS.id}", descriptor: &screens::ORDERS, path_id: None } }
}

#[component]
fn Employees() -> Element {
    rsx! { ScreenPage { key: "{screens::EMPLOYEES.id}", descriptor: &screens::EMPLOYEES, path_id: None } }
}

#[component]
fn Materials() -> Element {
    rsx! { ScreenPage { key: "{screens::MATERIALS.id}", descriptor: &screens::MATERIALS, path_id: None } }
}

#[component]
fn MaterialCategory(id: String) -> Element {
    rsx! {
        ScreenPage {
            key: "{screens::MATERIAL_CATEGORY.id}-{id}",
            descriptor: &screens::MATERIAL_CATEGORY,
            path_id: Some(id.clone()),
        }
    }
}

#[component]
fn Packages() -> Element {
    rsx! { ScreenPage { key: "{screens::PACKAGES.id}", descriptor: &screens::PACKAGES, path_id: None } }
}

#[component]
fn Expenses() -> Element {
    rsx! { ScreenPage { key: "{screens::EXPENSES.id}", descriptor: &screens::EXPENSES, path_id: None } }
}

#[component]
fn Clients() -> Element {
    rsx! { ScreenPage { key: "{screens::CLIENTS.id}", descriptor: &screens::CLIENTS, path_id: None } }
}

#[component]
fn Login() -> Element {
    let cookie = APP_CONFIG
        .get()
        .map(|config| config.session_cookie.clone())
        .unwrap_or_default();

    rsx! {
        div { class: "mx-auto mt-24 max-w-sm rounded-lg border border-slate-200 bg-white p-6 shadow-sm space-y-3",
            h1 { class: "text-lg font-semibold text-slate-900", "Sign in required" }
            p { class: "text-sm text-slate-600",
                "No active session was found. Sign in through the account portal, then return to the console."
            }
            p { class: "text-xs text-slate-400", "Expected session cookie: {cookie}" }
            Link { class: "text-sm text-slate-900 underline", to: Route::Dashboard {}, "Try again" }
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div { class: "mx-auto mt-24 max-w-sm space-y-2 text-center",
            h1 { class: "text-lg font-semibold text-slate-900", "Page not found" }
            p { class: "text-sm text-slate-500", "/{path}" }
            Link { class: "text-sm text-slate-900 underline", to: Route::Dashboard {}, "Back to dashboard" }
        }
    }
}
