use workflow::{Phase, WorkflowSnapshot};
use yew::prelude::*;

pub fn render_results(snapshot: &WorkflowSnapshot) -> Html {
    let Some(result) = &snapshot.result else {
        return if snapshot.phase == Phase::Submitting {
            html! { <p class="no-results-message">{"Running detection..."}</p> }
        } else {
            html! { <p class="no-results-message">{"Result will appear here."}</p> }
        };
    };

    let parts = result.label_parts();
    let confidence = result.confidence_percent;

    html! {
        <div class={classes!("results-container", if parts.is_healthy() { "healthy" } else { "diseased" })}>
            <div class="result-header">
                <h2 title={result.label.clone()}>
                    {
                        if parts.is_healthy() {
                            html! { <><i class="fa-solid fa-leaf"></i>{" Healthy"}</> }
                        } else {
                            html! { <><i class="fa-solid fa-bug"></i>{ format!(" {}", parts.condition) }</> }
                        }
                    }
                    {
                        if let Some(crop) = &parts.crop {
                            html! { <span class="crop-name">{format!("({})", crop)}</span> }
                        } else {
                            html! {}
                        }
                    }
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                    </div>
                    <div class="meter-value">{format!("{}%", confidence)}</div>
                </div>
            </div>
            <div class="detailed-results">
                <h3>{"Description"}</h3>
                <p>{ text_or_dash(&result.description) }</p>
                <h3>{"Suggested Treatment"}</h3>
                <p>{ text_or_dash(&result.treatment) }</p>
            </div>
        </div>
    }
}

fn text_or_dash(text: &str) -> String {
    if text.trim().is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}
