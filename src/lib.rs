pub mod api;
pub mod app;
pub mod auth;
pub mod comments;
pub mod components;
pub mod config;
pub mod content;
pub mod error;
#[cfg(feature = "ssr")]
pub mod fileserv;
pub mod interaction;
pub mod models;
pub mod routes;
pub mod stats;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    if let Err(err) = config::Config::init() {
        tracing::warn!("{err}");
    }
    leptos::mount_to_body(app::App);
}
