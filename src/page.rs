/// Content script: flag tracking links and bypass them on click

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlAnchorElement, MouseEvent, MutationObserver, MutationObserverInit};

use crate::browser::{load_tracker_list, FetchTransport, RuntimeTabs};
use crate::config::{HIGHLIGHT_COLOR, MAX_REDIRECTS, TRACKER_LIST_PATH};
use crate::link_state::{LinkEvent, LinkState, STATE_ATTR};
use crate::message::TabOpener;
use crate::resolver::{get_bypassed_url, Outcome, Transport};
use crate::trackers::TrackerList;

/// Anchors that have not been looked at yet
const UNSCANNED_LINKS: &str = "a[href]:not([data-tracker-bypass])";

/// Shared by every click handler on the page
pub struct LinkDecorator<T, O> {
    trackers: TrackerList,
    transport: T,
    tabs: O,
}

impl<T: Transport, O: TabOpener> LinkDecorator<T, O> {
    pub fn new(trackers: TrackerList, transport: T, tabs: O) -> Rc<LinkDecorator<T, O>> {
        Rc::new(LinkDecorator { trackers, transport, tabs })
    }
}

/// Load the tracker list once, decorate the page and keep watching it
pub async fn run() {
    log::info!("[tracker-bypass] content script loaded");

    let trackers = match load_tracker_list(TRACKER_LIST_PATH).await {
        Ok(trackers) => trackers,
        Err(e) => {
            log::error!("[tracker-bypass] {}", e);
            return;
        }
    };

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("[tracker-bypass] no document to decorate");
        return;
    };

    let decorator = LinkDecorator::new(trackers, FetchTransport, RuntimeTabs);

    let flagged = scan_document(&document, &decorator);
    log::info!("[tracker-bypass] flagged {} tracking links", flagged);

    if let Err(e) = observe_document(&document, decorator) {
        log::error!("[tracker-bypass] could not watch for new links: {:?}", e);
    }
}

/// Decorate every unscanned anchor; returns how many were flagged
pub fn scan_document<T, O>(document: &Document, decorator: &Rc<LinkDecorator<T, O>>) -> usize
where
    T: Transport + 'static,
    O: TabOpener + 'static,
{
    let links = match document.query_selector_all(UNSCANNED_LINKS) {
        Ok(links) => links,
        Err(e) => {
            log::error!("[tracker-bypass] link query failed: {:?}", e);
            return 0;
        }
    };

    (0..links.length())
        .filter_map(|i| links.item(i))
        .filter_map(|node| node.dyn_into::<HtmlAnchorElement>().ok())
        .filter(|anchor| decorate(anchor, decorator))
        .count()
}

/// Scan one anchor; true when it was flagged as a tracking link
fn decorate<T, O>(anchor: &HtmlAnchorElement, decorator: &Rc<LinkDecorator<T, O>>) -> bool
where
    T: Transport + 'static,
    O: TabOpener + 'static,
{
    let tracked = decorator.trackers.matches(&anchor.href());

    if advance(anchor, LinkEvent::Scanned { tracked }).is_none() || !tracked {
        return false;
    }

    log::debug!("[tracker-bypass] tracking link: {}", anchor.href());

    if let Err(e) = anchor.style().set_property("background-color", HIGHLIGHT_COLOR) {
        log::warn!("[tracker-bypass] could not highlight link: {:?}", e);
    }

    if let Err(e) = intercept_clicks(anchor, decorator) {
        log::error!("[tracker-bypass] could not attach click handler: {:?}", e);
    }

    true
}

fn intercept_clicks<T, O>(anchor: &HtmlAnchorElement, decorator: &Rc<LinkDecorator<T, O>>) -> Result<(), JsValue>
where
    T: Transport + 'static,
    O: TabOpener + 'static,
{
    let link = anchor.clone();
    let decorator = Rc::clone(decorator);

    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        let href = link.href();

        // href may have been rewritten since the scan
        if !decorator.trackers.matches(&href) {
            return;
        }

        event.prevent_default();

        if advance(&link, LinkEvent::Clicked).is_none() {
            log::debug!("[tracker-bypass] already resolving: {}", href);
            return;
        }

        let link = link.clone();
        let decorator = Rc::clone(&decorator);
        spawn_local(async move {
            let navigated = follow_link(&decorator, &href).await;
            advance(&link, LinkEvent::Finished { navigated });
        });
    });

    anchor.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

/// Resolve a clicked link and act on the outcome; true if the user was sent somewhere
///
/// A failed resolution sends the user nowhere: no tab, no navigation.
async fn follow_link<T: Transport, O: TabOpener>(decorator: &LinkDecorator<T, O>, href: &str) -> bool {
    let outcome = get_bypassed_url(href, &decorator.trackers, &decorator.transport, MAX_REDIRECTS).await;

    match outcome {
        Outcome::Bypassed(destination) => match decorator.tabs.open_tab(&destination).await {
            Ok(()) => {
                log::info!("[tracker-bypass] message sent: {}", destination);
                true
            }
            Err(e) => {
                log::error!("[tracker-bypass] {}", e);
                false
            }
        },
        Outcome::NotTracked => navigate_here(href),
        Outcome::Failed(_) => {
            log::warn!("[tracker-bypass] navigation suppressed for {}", href);
            false
        }
    }
}

fn navigate_here(url: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };

    match window.location().set_href(url) {
        Ok(()) => true,
        Err(e) => {
            log::error!("[tracker-bypass] could not navigate to {}: {:?}", url, e);
            false
        }
    }
}

/// Apply `event` to the state mirrored on `element`
fn advance(element: &Element, event: LinkEvent) -> Option<LinkState> {
    let current = LinkState::from_attr(element.get_attribute(STATE_ATTR).as_deref());
    let next = current.next(event)?;

    if let Err(e) = element.set_attribute(STATE_ATTR, next.as_attr()) {
        log::warn!("[tracker-bypass] could not record link state: {:?}", e);
    }

    Some(next)
}

/// Rescan after every batch of DOM insertions
fn observe_document<T, O>(document: &Document, decorator: Rc<LinkDecorator<T, O>>) -> Result<(), JsValue>
where
    T: Transport + 'static,
    O: TabOpener + 'static,
{
    let root = document
        .document_element()
        .ok_or_else(|| JsValue::from_str("document has no root element"))?;

    let scanned = document.clone();
    let on_mutation = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |_records: js_sys::Array, _observer: MutationObserver| {
            let flagged = scan_document(&scanned, &decorator);
            if flagged > 0 {
                log::debug!("[tracker-bypass] flagged {} inserted tracking links", flagged);
            }
        },
    );

    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&root, &options)?;

    on_mutation.forget();
    Ok(())
}
