/// Browser glue: fetch, extension runtime and tabs

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestRedirect, Response};

use crate::error::BypassError;
use crate::message::{OpenTab, OpenTabReply, TabOpener};
use crate::resolver::{Hop, Transport};
use crate::trackers::TrackerList;

// Import JS bridge functions
#[wasm_bindgen(module = "/extension/runtime.js")]
extern "C" {
    fn extensionUrl(path: &str) -> String;

    #[wasm_bindgen(catch)]
    async fn fetchWith(request: Request) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(url: &str) -> Result<(), JsValue>;
}

/// Resolves redirect chains with `fetch(url, { method: "HEAD", redirect: "follow" })`
///
/// The browser walks the chain itself, so every answer is `Hop::Landed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn head(&self, url: &str) -> Result<Hop, BypassError> {
        let opts = RequestInit::new();
        opts.set_method("HEAD");
        opts.set_redirect(RequestRedirect::Follow);

        let response = fetch(url, &opts).await?;

        if !response.ok() {
            return Err(BypassError::Status {
                url: response.url(),
                status: response.status(),
            });
        }

        let landed = response.url();
        if landed.is_empty() {
            return Err(BypassError::OpaqueResponse(url.to_string()));
        }

        Ok(Hop::Landed(landed))
    }
}

async fn fetch(url: &str, opts: &RequestInit) -> Result<Response, BypassError> {
    let request = Request::new_with_str_and_init(url, opts)
        .map_err(|e| BypassError::InvalidUrl {
            url: url.to_string(),
            reason: BypassError::describe_js(&e),
        })?;

    let value = fetchWith(request)
        .await
        .map_err(|e| BypassError::Network(BypassError::describe_js(&e)))?;

    value
        .dyn_into::<Response>()
        .map_err(|e| BypassError::Network(format!("unexpected fetch result: {:?}", e)))
}

/// Fetch and parse the bundled tracker list
pub async fn load_tracker_list(path: &str) -> Result<TrackerList, BypassError> {
    let resource = extensionUrl(path);
    let opts = RequestInit::new();
    opts.set_method("GET");

    let response = fetch(&resource, &opts)
        .await
        .map_err(|e| BypassError::ListLoad(e.to_string()))?;

    if !response.ok() {
        return Err(BypassError::ListLoad(format!(
            "{} answered with HTTP {}",
            resource,
            response.status()
        )));
    }

    let text_promise = response
        .text()
        .map_err(|e| BypassError::ListLoad(BypassError::describe_js(&e)))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| BypassError::ListLoad(BypassError::describe_js(&e)))?
        .as_string()
        .ok_or_else(|| BypassError::ListLoad(format!("{} is not text", resource)))?;

    let trackers = TrackerList::parse(&text);
    log::info!("[tracker-bypass] loaded {} tracker prefixes from {}", trackers.len(), resource);
    Ok(trackers)
}

/// Content-script side: sends `{ open: url }` to the background process
#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeTabs;

impl TabOpener for RuntimeTabs {
    async fn open_tab(&self, url: &str) -> Result<(), BypassError> {
        let message = serde_wasm_bindgen::to_value(&OpenTab::new(url))
            .map_err(|e| BypassError::Messaging(format!("failed to serialize: {}", e)))?;

        let reply = sendRuntimeMessage(message)
            .await
            .map_err(|e| BypassError::Messaging(BypassError::describe_js(&e)))?;

        let reply: OpenTabReply = if reply.is_null() || reply.is_undefined() {
            OpenTabReply::default()
        } else {
            serde_wasm_bindgen::from_value(reply)
                .map_err(|e| BypassError::Messaging(format!("unreadable reply: {}", e)))?
        };

        if reply.opened {
            Ok(())
        } else {
            Err(BypassError::Messaging(
                reply.error.unwrap_or_else(|| "background did not open a tab".to_string()),
            ))
        }
    }
}

/// Background side: `chrome.tabs.create`
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeTabs;

impl TabOpener for ChromeTabs {
    async fn open_tab(&self, url: &str) -> Result<(), BypassError> {
        createTab(url)
            .await
            .map_err(|e| BypassError::Messaging(BypassError::describe_js(&e)))
    }
}
