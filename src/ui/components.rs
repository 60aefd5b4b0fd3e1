/// Reusable popup components

use yew::prelude::*;

use crate::resolver::Outcome;

#[derive(Properties, PartialEq)]
pub struct PrefixListProps {
    pub prefixes: Vec<String>,
}

/// Ordered list of tracker prefixes
#[function_component(PrefixList)]
pub fn prefix_list(props: &PrefixListProps) -> Html {
    if props.prefixes.is_empty() {
        return html! {
            <div class="empty-state">
                <p>{"No tracker prefixes configured."}</p>
                <p class="empty-state-hint">{"Add one prefix per line to tracker-urls.txt."}</p>
            </div>
        };
    }

    html! {
        <div class="stats-container">
            <h2 class="stats-title">{format!("{} tracker prefixes", props.prefixes.len())}</h2>
            <ol class="stats-box">
                {for props.prefixes.iter().map(|prefix| html! {
                    <li key={prefix.clone()} class="stat-item">
                        <span class="stat-domain">{prefix}</span>
                    </li>
                })}
            </ol>
        </div>
    }
}

/// What the popup learned about one URL
#[derive(Clone, PartialEq)]
pub struct CheckReport {
    pub url: String,
    pub tracked: bool,
    pub cleaned: String,
    pub outcome: Outcome,
}

#[derive(Properties, PartialEq)]
pub struct CheckReportViewProps {
    pub report: CheckReport,
}

#[function_component(CheckReportView)]
pub fn check_report_view(props: &CheckReportViewProps) -> Html {
    let report = &props.report;

    let (bg_color, border_color, verdict) = match &report.outcome {
        Outcome::Bypassed(_) => ("#e8f5e9", "#4caf50", "Bypassed".to_string()),
        Outcome::NotTracked => ("#e3f2fd", "#2196f3", "Not a tracking link".to_string()),
        Outcome::Failed(e) => ("#ffebee", "#f44336", format!("Failed: {}", e)),
    };

    html! {
        <div style={format!("padding: 12px; border-radius: 4px; background-color: {}; border-left: 4px solid {}; margin: 10px 0;", bg_color, border_color)}>
            <p class="message-paragraph"><strong>{verdict}</strong></p>
            if report.tracked {
                <p class="message-paragraph">{"Cleaned: "}<code>{&report.cleaned}</code></p>
            }
            if let Outcome::Bypassed(destination) = &report.outcome {
                <p class="message-paragraph">
                    {"Destination: "}
                    <a href={destination.clone()} target="_blank" rel="noopener noreferrer">{destination}</a>
                </p>
            }
        </div>
    }
}
