/// Error types for tracker bypass
use thiserror::Error;

/// Everything that can stop a tracking link from being bypassed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BypassError {
    /// The bundled tracker list could not be fetched or read
    #[error("could not load tracker list: {0}")]
    ListLoad(String),

    /// The HEAD request itself failed (DNS, TLS, CORS, offline...)
    #[error("network error: {0}")]
    Network(String),

    /// The redirect chain ended on a non-success status
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The browser hid the final response from us
    #[error("response for {0} is opaque, final URL unknown")]
    OpaqueResponse(String),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("more than {0} redirects")]
    TooManyRedirects(u32),

    /// The background process could not be reached
    #[error("messaging failed: {0}")]
    Messaging(String),
}

impl BypassError {
    /// Convert a rejected JS promise into a readable message
    pub fn describe_js(value: &wasm_bindgen::JsValue) -> String {
        value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(value, &"message".into())
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value))
    }
}
