/// Background process: opens tabs on behalf of content scripts

use wasm_bindgen::prelude::*;

use crate::error::BypassError;
use crate::message::{parse_open_request, TabOpener};

/// Handle one runtime message; resolves to `true` when a tab was opened
pub async fn handle_message<O: TabOpener>(message: JsValue, tabs: &O) -> Result<bool, JsValue> {
    let value = match serde_wasm_bindgen::from_value::<serde_json::Value>(message) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("[tracker-bypass] unreadable message: {}", e);
            return Ok(false);
        }
    };

    handle_request(value, tabs)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Open exactly one tab for an `{ open: url }` request; ignore anything else
pub async fn handle_request<O: TabOpener>(
    message: serde_json::Value,
    tabs: &O,
) -> Result<bool, BypassError> {
    log::debug!("[tracker-bypass] background received: {}", message);

    let Some(url) = parse_open_request(message) else {
        return Ok(false);
    };

    tabs.open_tab(&url).await.map_err(|e| {
        log::error!("[tracker-bypass] could not open {}: {}", url, e);
        e
    })?;

    log::info!("[tracker-bypass] opened tab: {}", url);
    Ok(true)
}
