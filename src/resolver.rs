/// Tracking-link bypass: classify, clean and follow redirects

use url::Url;

use crate::error::BypassError;
use crate::trackers::TrackerList;
use crate::utm::remove_utm_params;

/// Result of trying to bypass one URL
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Final destination of the redirect chain
    Bypassed(String),
    /// Not a tracking link; navigate normally
    NotTracked,
    Failed(BypassError),
}

/// Answer to a single HEAD request
#[derive(Debug, Clone, PartialEq)]
pub enum Hop {
    /// The server redirected; value is the raw `Location`
    Redirect(String),
    /// The chain ended here
    Landed(String),
}

/// Issues HEAD requests for the resolver
///
/// Browser fetch follows redirects itself and always answers `Landed`;
/// transports that see individual responses answer `Redirect` per hop.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn head(&self, url: &str) -> Result<Hop, BypassError>;
}

/// Resolve `url` to its destination, or explain why not
///
/// 1. Test the candidate against the tracker list; untracked URLs stop here
///    without touching the network
/// 2. Strip `utm_*` parameters
/// 3. HEAD the cleaned URL and follow the redirect chain up to `max_redirects`
/// 4. Report the landing URL, or why it could not be found
pub async fn get_bypassed_url<T: Transport>(
    url: &str,
    trackers: &TrackerList,
    transport: &T,
    max_redirects: u32,
) -> Outcome {
    if !trackers.matches(url) {
        log::debug!("[tracker-bypass] not a tracking URL: {}", url);
        return Outcome::NotTracked;
    }

    let clean_url = remove_utm_params(url);

    match follow_redirects(&clean_url, transport, max_redirects).await {
        Ok(destination) => {
            log::info!("[tracker-bypass] bypassed URL: {}", destination);
            Outcome::Bypassed(destination)
        }
        Err(e) => {
            log::error!("[tracker-bypass] error bypassing {}: {}", url, e);
            Outcome::Failed(e)
        }
    }
}

/// Walk the redirect chain starting at `start`
///
/// `max_redirects` counts redirects, so up to `max_redirects + 1` requests
/// are made.
pub async fn follow_redirects<T: Transport>(
    start: &str,
    transport: &T,
    max_redirects: u32,
) -> Result<String, BypassError> {
    let mut current = parse_http_url(start)?;

    for _ in 0..=max_redirects {
        match transport.head(current.as_str()).await? {
            Hop::Landed(destination) => {
                return parse_http_url(&destination).map(String::from);
            }
            Hop::Redirect(location) => {
                current = current.join(&location).map_err(|e| BypassError::InvalidUrl {
                    url: location.clone(),
                    reason: e.to_string(),
                })?;
                check_scheme(&current)?;
            }
        }
    }

    Err(BypassError::TooManyRedirects(max_redirects))
}

fn parse_http_url(raw: &str) -> Result<Url, BypassError> {
    let url = Url::parse(raw).map_err(|e| BypassError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    check_scheme(&url)?;
    Ok(url)
}

fn check_scheme(url: &Url) -> Result<(), BypassError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BypassError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const TRACKER_URL: &str = "https://pmwebq.clicks.mlsend.com/tj/c/eyJ2Ijoie1wiYVwiOjEyMzU0MDB9";
    const EXPECTED_URL: &str = "https://www.infoq.com/articles/microservices-traffic-mirroring-istio-vpc/";

    /// Scripted server: maps a URL to its hop and records every request
    struct ScriptedTransport {
        hops: HashMap<String, Result<Hop, BypassError>>,
        requests: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(hops: Vec<(&str, Result<Hop, BypassError>)>) -> Self {
            ScriptedTransport {
                hops: hops.into_iter().map(|(url, hop)| (url.to_string(), hop)).collect(),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for ScriptedTransport {
        async fn head(&self, url: &str) -> Result<Hop, BypassError> {
            self.requests.borrow_mut().push(url.to_string());
            self.hops
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(BypassError::Network(format!("no route to {}", url))))
        }
    }

    /// Redirects forever to the next numbered page
    struct EndlessRedirects {
        count: RefCell<u32>,
    }

    impl Transport for EndlessRedirects {
        async fn head(&self, _url: &str) -> Result<Hop, BypassError> {
            let mut count = self.count.borrow_mut();
            *count += 1;
            Ok(Hop::Redirect(format!("/page/{}", *count)))
        }
    }

    fn trackers() -> TrackerList {
        TrackerList::parse("https://pmwebq.clicks.mlsend.com/\nhttps://click.example.net/r/\n")
    }

    #[test]
    fn test_untracked_url_makes_no_request() {
        let transport = ScriptedTransport::new(vec![]);

        let outcome = block_on(get_bypassed_url(
            "https://www.infoq.com/articles/",
            &trackers(),
            &transport,
            20,
        ));

        assert_eq!(outcome, Outcome::NotTracked);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_bypass_follows_chain_to_destination() {
        let transport = ScriptedTransport::new(vec![
            (TRACKER_URL, Ok(Hop::Redirect("https://mlsend.com/hop".to_string()))),
            ("https://mlsend.com/hop", Ok(Hop::Redirect(EXPECTED_URL.to_string()))),
            (EXPECTED_URL, Ok(Hop::Landed(EXPECTED_URL.to_string()))),
        ]);

        let outcome = block_on(get_bypassed_url(TRACKER_URL, &trackers(), &transport, 20));

        assert_eq!(outcome, Outcome::Bypassed(EXPECTED_URL.to_string()));
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn test_browser_style_single_landing() {
        let transport = ScriptedTransport::new(vec![(
            TRACKER_URL,
            Ok(Hop::Landed(EXPECTED_URL.to_string())),
        )]);

        let outcome = block_on(get_bypassed_url(TRACKER_URL, &trackers(), &transport, 20));

        assert_eq!(outcome, Outcome::Bypassed(EXPECTED_URL.to_string()));
    }

    #[test]
    fn test_utm_params_stripped_before_request() {
        let transport = ScriptedTransport::new(vec![(
            "https://click.example.net/r/42?id=5",
            Ok(Hop::Landed("https://dest.example.org/".to_string())),
        )]);

        let outcome = block_on(get_bypassed_url(
            "https://click.example.net/r/42?utm_source=mail&id=5&utm_medium=email",
            &trackers(),
            &transport,
            20,
        ));

        assert_eq!(outcome, Outcome::Bypassed("https://dest.example.org/".to_string()));
        assert_eq!(transport.requests(), vec!["https://click.example.net/r/42?id=5"]);
    }

    #[test]
    fn test_relative_redirect_resolved_against_current_hop() {
        let transport = ScriptedTransport::new(vec![
            ("https://click.example.net/r/1", Ok(Hop::Redirect("/landing?x=1".to_string()))),
            (
                "https://click.example.net/landing?x=1",
                Ok(Hop::Landed("https://click.example.net/landing?x=1".to_string())),
            ),
        ]);

        let result = block_on(follow_redirects("https://click.example.net/r/1", &transport, 20));

        assert_eq!(result, Ok("https://click.example.net/landing?x=1".to_string()));
    }

    #[test]
    fn test_network_failure_yields_failed() {
        let transport = ScriptedTransport::new(vec![(
            TRACKER_URL,
            Err(BypassError::Network("Failed to fetch".to_string())),
        )]);

        let outcome = block_on(get_bypassed_url(TRACKER_URL, &trackers(), &transport, 20));

        assert_eq!(
            outcome,
            Outcome::Failed(BypassError::Network("Failed to fetch".to_string()))
        );
    }

    #[test]
    fn test_redirect_cap_is_enforced() {
        let transport = EndlessRedirects { count: RefCell::new(0) };

        let result = block_on(follow_redirects("https://click.example.net/r/1", &transport, 20));

        assert_eq!(result, Err(BypassError::TooManyRedirects(20)));
        // initial request plus twenty redirects
        assert_eq!(*transport.count.borrow(), 21);
    }

    #[test]
    fn test_chain_of_exactly_cap_length_succeeds() {
        let mut hops = Vec::new();
        let urls: Vec<String> = (0..=3).map(|i| format!("https://click.example.net/{}", i)).collect();
        for i in 0..3 {
            hops.push((urls[i].as_str(), Ok(Hop::Redirect(urls[i + 1].clone()))));
        }
        hops.push((urls[3].as_str(), Ok(Hop::Landed(urls[3].clone()))));
        let transport = ScriptedTransport::new(hops);

        assert_eq!(block_on(follow_redirects(&urls[0], &transport, 3)), Ok(urls[3].clone()));
        assert_eq!(
            block_on(follow_redirects(&urls[0], &transport, 2)),
            Err(BypassError::TooManyRedirects(2))
        );
    }

    #[test]
    fn test_redirect_to_non_http_scheme_rejected() {
        let transport = ScriptedTransport::new(vec![(
            "https://click.example.net/r/1",
            Ok(Hop::Redirect("javascript:alert(1)".to_string())),
        )]);

        let result = block_on(follow_redirects("https://click.example.net/r/1", &transport, 20));

        assert_eq!(result, Err(BypassError::UnsupportedScheme("javascript".to_string())));
    }

    #[test]
    fn test_tracked_but_unparseable_url_fails_without_request() {
        let list = TrackerList::new(vec!["not a url".to_string()]);
        let transport = ScriptedTransport::new(vec![]);

        let outcome = block_on(get_bypassed_url("not a url/x", &list, &transport, 20));

        assert!(matches!(outcome, Outcome::Failed(BypassError::InvalidUrl { .. })));
        assert!(transport.requests().is_empty());
    }
}
