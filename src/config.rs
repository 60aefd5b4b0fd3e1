/// Static settings shared by the content script and popup

/// Bundled tracker list, relative to the extension root
pub const TRACKER_LIST_PATH: &str = "tracker-urls.txt";

/// Same limit the Fetch standard applies to `redirect: "follow"`
pub const MAX_REDIRECTS: u32 = 20;

/// Background colour of flagged links
pub const HIGHLIGHT_COLOR: &str = "yellow";
