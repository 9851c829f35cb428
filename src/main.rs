mod api;
mod app;
mod browser;
mod charts;
mod components;
mod config;
mod error;
mod logging;
mod pages;
mod state;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use app::App;
use config::Bootstrap;

/// Element the app mounts into; `<body>` when the page has none.
const MOUNT_POINT_ID: &str = "app";

fn mount_point() -> Option<web_sys::HtmlElement> {
    let document = web_sys::window()?.document()?;
    document
        .get_element_by_id(MOUNT_POINT_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body())
}

fn main() {
    let bootstrap = match Bootstrap::from_document() {
        Ok(bootstrap) => bootstrap,
        Err(e) => {
            logging::init("info");
            tracing::error!("Cannot start: {}", e);
            return;
        }
    };
    logging::init(&bootstrap.config.log_level);

    let Some(root) = mount_point() else {
        tracing::error!("No element to mount into");
        return;
    };
    leptos::mount::mount_to(root, move || view! { <App bootstrap=bootstrap /> }).forget();
}
