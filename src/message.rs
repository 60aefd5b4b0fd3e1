/// Messages between the content script and the background process
use serde::{Deserialize, Serialize};

use crate::error::BypassError;

/// `{ open: <url> }`: open one new tab at `open`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTab {
    pub open: String,
}

impl OpenTab {
    pub fn new(url: &str) -> OpenTab {
        OpenTab { open: url.to_string() }
    }
}

/// Background reply to an `OpenTab` request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenTabReply {
    #[serde(default)]
    pub opened: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Extract the URL from an open-tab request; any other shape is not ours
pub fn parse_open_request(message: serde_json::Value) -> Option<String> {
    serde_json::from_value::<OpenTab>(message)
        .ok()
        .map(|request| request.open)
        .filter(|url| !url.is_empty())
}

/// Something that can put a URL in a new tab
///
/// Content scripts ask the background process; the background process
/// calls `chrome.tabs` directly.
#[allow(async_fn_in_trait)]
pub trait TabOpener {
    async fn open_tab(&self, url: &str) -> Result<(), BypassError>;
}
