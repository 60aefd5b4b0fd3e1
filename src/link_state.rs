/// Per-link lifecycle on a page

/// Anchor attribute mirroring the state
pub const STATE_ATTR: &str = "data-tracker-bypass";

/// Where a link is in its lifecycle
///
/// ```text
/// Unscanned ──scan──> Ignored
///           └─scan──> Highlighted ──click──> Resolving ──> Navigated
///                                                     └──> Suppressed
/// ```
///
/// A click while resolving is dropped. `Navigated` and `Suppressed` accept a
/// new click, the same as the page listener that fires on every click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Unscanned,
    Ignored,
    Highlighted,
    Resolving,
    Navigated,
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Scanned { tracked: bool },
    Clicked,
    Finished { navigated: bool },
}

impl LinkState {
    /// Next state, or `None` when the event does not apply
    pub fn next(self, event: LinkEvent) -> Option<LinkState> {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (Unscanned, Scanned { tracked: true }) => Some(Highlighted),
            (Unscanned, Scanned { tracked: false }) => Some(Ignored),
            (Highlighted | Navigated | Suppressed, Clicked) => Some(Resolving),
            (Resolving, Finished { navigated: true }) => Some(Navigated),
            (Resolving, Finished { navigated: false }) => Some(Suppressed),
            _ => None,
        }
    }

    pub fn as_attr(self) -> &'static str {
        match self {
            LinkState::Unscanned => "unscanned",
            LinkState::Ignored => "ignored",
            LinkState::Highlighted => "highlighted",
            LinkState::Resolving => "resolving",
            LinkState::Navigated => "navigated",
            LinkState::Suppressed => "suppressed",
        }
    }

    /// Read back a mirrored state; a missing attribute means unscanned
    pub fn from_attr(value: Option<&str>) -> LinkState {
        match value {
            Some("ignored") => LinkState::Ignored,
            Some("highlighted") => LinkState::Highlighted,
            Some("resolving") => LinkState::Resolving,
            Some("navigated") => LinkState::Navigated,
            Some("suppressed") => LinkState::Suppressed,
            _ => LinkState::Unscanned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_transitions() {
        assert_eq!(
            LinkState::Unscanned.next(LinkEvent::Scanned { tracked: true }),
            Some(LinkState::Highlighted)
        );
        assert_eq!(
            LinkState::Unscanned.next(LinkEvent::Scanned { tracked: false }),
            Some(LinkState::Ignored)
        );
    }

    #[test]
    fn test_links_are_scanned_once() {
        for state in [LinkState::Ignored, LinkState::Highlighted, LinkState::Navigated] {
            assert_eq!(state.next(LinkEvent::Scanned { tracked: true }), None);
        }
    }

    #[test]
    fn test_click_lifecycle() {
        let resolving = LinkState::Highlighted.next(LinkEvent::Clicked).unwrap();
        assert_eq!(resolving, LinkState::Resolving);

        assert_eq!(
            resolving.next(LinkEvent::Finished { navigated: true }),
            Some(LinkState::Navigated)
        );
        assert_eq!(
            resolving.next(LinkEvent::Finished { navigated: false }),
            Some(LinkState::Suppressed)
        );
    }

    #[test]
    fn test_click_while_resolving_is_dropped() {
        assert_eq!(LinkState::Resolving.next(LinkEvent::Clicked), None);
    }

    #[test]
    fn test_ignored_links_never_resolve() {
        assert_eq!(LinkState::Ignored.next(LinkEvent::Clicked), None);
        assert_eq!(LinkState::Unscanned.next(LinkEvent::Clicked), None);
    }

    #[test]
    fn test_terminal_states_accept_new_click() {
        assert_eq!(LinkState::Navigated.next(LinkEvent::Clicked), Some(LinkState::Resolving));
        assert_eq!(LinkState::Suppressed.next(LinkEvent::Clicked), Some(LinkState::Resolving));
    }

    #[test]
    fn test_attr_round_trip() {
        for state in [
            LinkState::Ignored,
            LinkState::Highlighted,
            LinkState::Resolving,
            LinkState::Navigated,
            LinkState::Suppressed,
        ] {
            assert_eq!(LinkState::from_attr(Some(state.as_attr())), state);
        }
        assert_eq!(LinkState::from_attr(None), LinkState::Unscanned);
        assert_eq!(LinkState::from_attr(Some("bogus")), LinkState::Unscanned);
    }
}
