/// Tracker prefix list: parsing and matching

/// Ordered list of URL prefixes identifying known tracking redirectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerList {
    prefixes: Vec<String>,
}

impl TrackerList {
    pub fn new(prefixes: Vec<String>) -> TrackerList {
        TrackerList { prefixes }
    }

    /// Parse the newline-delimited resource
    ///
    /// Each line is trimmed, blank lines are dropped and order is kept.
    /// A repeated prefix keeps its first position. `\r\n` line endings are
    /// accepted.
    pub fn parse(text: &str) -> TrackerList {
        let mut prefixes: Vec<String> = Vec::new();

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if !prefixes.iter().any(|seen| seen == line) {
                prefixes.push(line.to_string());
            }
        }

        TrackerList { prefixes }
    }

    /// True iff `url` starts with any configured prefix (case-sensitive)
    pub fn matches(&self, url: &str) -> bool {
        is_tracking_url(url, &self.prefixes)
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Byte-for-byte prefix test against every entry
pub fn is_tracking_url<S: AsRef<str>>(url: &str, prefixes: &[S]) -> bool {
    prefixes.iter().any(|prefix| url.starts_with(prefix.as_ref()))
}
