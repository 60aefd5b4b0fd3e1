/// Tracker Bypass - Chrome Extension that skips tracking redirects
/// Built with Rust + WASM + Yew

mod background;
mod browser;
mod config;
mod error;
mod link_state;
mod message;
mod page;
mod resolver;
mod trackers;
mod utm;
pub mod ui;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub use error::BypassError;
pub use message::TabOpener;
pub use resolver::{get_bypassed_url, Hop, Outcome, Transport};
pub use trackers::TrackerList;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export core URL functions for JavaScript access
#[wasm_bindgen]
pub fn is_tracking_url(url: &str, prefixes: Vec<String>) -> bool {
    trackers::is_tracking_url(url, &prefixes)
}

#[wasm_bindgen]
pub fn remove_utm_params(url: &str) -> String {
    utm::remove_utm_params(url)
}

// Decorate the current page and keep watching it for new links
#[wasm_bindgen]
pub fn start_content_script() {
    spawn_local(page::run());
}

// Background message listener; resolves to true when a tab was opened
#[wasm_bindgen]
pub async fn handle_background_message(message: JsValue) -> Result<bool, JsValue> {
    background::handle_message(message, &browser::ChromeTabs).await
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
