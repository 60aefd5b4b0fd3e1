/// Popup UI: inspect the tracker list and check a URL by hand

use std::rc::Rc;

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;

use crate::browser::{load_tracker_list, FetchTransport};
use crate::config::{MAX_REDIRECTS, TRACKER_LIST_PATH};
use crate::resolver::get_bypassed_url;
use crate::trackers::TrackerList;
use crate::ui::components::{CheckReport, CheckReportView, PrefixList};
use crate::utm::remove_utm_params;

#[derive(Clone, PartialEq)]
enum ListState {
    Loading,
    Loaded(Rc<TrackerList>),
    Error(String),
}

#[derive(Clone, PartialEq)]
enum CheckState {
    Idle,
    Resolving(String),
    Done(CheckReport),
}

#[derive(Clone, PartialEq)]
enum ActiveTab {
    Trackers,
    CheckUrl,
}

#[function_component(App)]
pub fn app() -> Html {
    let list_state = use_state(|| ListState::Loading);
    let check_state = use_state(|| CheckState::Idle);
    let url_input = use_state(String::new);
    let active_tab = use_state(|| ActiveTab::Trackers);

    // Load the tracker list once on mount
    {
        let list_state = list_state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_tracker_list(TRACKER_LIST_PATH).await {
                    Ok(trackers) => list_state.set(ListState::Loaded(Rc::new(trackers))),
                    Err(e) => {
                        log::error!("[tracker-bypass] {}", e);
                        list_state.set(ListState::Error(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_url_input = {
        let url_input = url_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                url_input.set(input.value());
            }
        })
    };

    // Check URL handler
    let on_check = {
        let list_state = list_state.clone();
        let check_state = check_state.clone();
        let url_input = url_input.clone();

        Callback::from(move |_| {
            let ListState::Loaded(trackers) = &*list_state else {
                return;
            };

            let url = url_input.trim().to_string();
            if url.is_empty() {
                return;
            }

            let trackers = Rc::clone(trackers);
            let check_state = check_state.clone();
            check_state.set(CheckState::Resolving(url.clone()));

            spawn_local(async move {
                let outcome = get_bypassed_url(&url, &trackers, &FetchTransport, MAX_REDIRECTS).await;

                check_state.set(CheckState::Done(CheckReport {
                    tracked: trackers.matches(&url),
                    cleaned: remove_utm_params(&url),
                    url,
                    outcome,
                }));
            });
        })
    };

    let is_busy = matches!(*check_state, CheckState::Resolving(_))
        || !matches!(*list_state, ListState::Loaded(_));

    // Tab click handlers
    let on_tab_click = {
        let active_tab = active_tab.clone();
        move |tab: ActiveTab| {
            let active_tab = active_tab.clone();
            Callback::from(move |_| {
                active_tab.set(tab.clone());
            })
        }
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tracker Bypass"}</h1>

            // Tab navigation
            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    <li class={if *active_tab == ActiveTab::Trackers { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }}>
                        <button
                            class="pf-v5-c-tabs__link"
                            onclick={on_tab_click(ActiveTab::Trackers)}
                        >
                            <span class="pf-v5-c-tabs__item-text">{"Trackers"}</span>
                        </button>
                    </li>
                    <li class={if *active_tab == ActiveTab::CheckUrl { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }}>
                        <button
                            class="pf-v5-c-tabs__link"
                            onclick={on_tab_click(ActiveTab::CheckUrl)}
                        >
                            <span class="pf-v5-c-tabs__item-text">{"Check URL"}</span>
                        </button>
                    </li>
                </ul>
            </div>

            // List status
            {match &*list_state {
                ListState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading tracker list..."}</p>
                    </div>
                },
                ListState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Could not load tracker list"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                ListState::Loaded(_) => html! {}
            }}

            // Tab content
            <div class="tab-pane-content">
                {match &*active_tab {
                    ActiveTab::Trackers => match &*list_state {
                        ListState::Loaded(trackers) => html! {
                            <PrefixList prefixes={trackers.prefixes().to_vec()} />
                        },
                        _ => html! {},
                    },
                    ActiveTab::CheckUrl => html! {
                        <div class="flex-column-gap">
                            <input
                                type="text"
                                placeholder="Paste a link to check..."
                                value={(*url_input).clone()}
                                oninput={on_url_input}
                                class="search-input"
                            />
                            <Button onclick={on_check} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                                {"Resolve"}
                            </Button>

                            {match &*check_state {
                                CheckState::Idle => html! {},
                                CheckState::Resolving(url) => html! {
                                    <div class="loading-text-center">
                                        <Spinner />
                                        <p class="loading-text">{format!("Resolving {}", url)}</p>
                                    </div>
                                },
                                CheckState::Done(report) => html! {
                                    <CheckReportView report={report.clone()} />
                                },
                            }}
                        </div>
                    },
                }}
            </div>

            <p class="footer-popup">
                {concat!("Tracker Bypass v", env!("CARGO_PKG_VERSION"))}
            </p>
        </div>
    }
}
