use super::super::{Model, Msg};
use workflow::HistoryEntry;
use yew::prelude::*;

pub fn render_history(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    html! {
        <section class="history-section">
            <div class="history-header">
                <h2><i class="fa-solid fa-clock-rotate-left"></i>{" Your Detections"}</h2>
                <button class="analyze-btn" onclick={link.callback(|_| Msg::RefreshHistory)}>
                    <i class="fa-solid fa-rotate"></i>{" Refresh"}
                </button>
            </div>
            {
                if model.snapshot.history.is_empty() {
                    html! { <p class="no-results-message">{"No detections yet."}</p> }
                } else {
                    html! {
                        <div class="history-list">
                            { for model.snapshot.history.iter().map(|entry| render_history_item(model, ctx, entry)) }
                        </div>
                    }
                }
            }
        </section>
    }
}

fn render_history_item(model: &Model, ctx: &Context<Model>, entry: &HistoryEntry) -> Html {
    let id = entry.prediction_id.clone();
    let parts = entry.label_parts();
    let busy = model.snapshot.phase.is_busy();

    html! {
        <div class="history-item" key={entry.prediction_id.to_string()}>
            {
                match entry.image_url(&model.workflow.config().base_url) {
                    Some(url) => html! { <img class="history-thumb" src={url} alt={entry.label.clone()} /> },
                    None => html! { <div class="history-thumb preview-placeholder">{"No preview"}</div> },
                }
            }
            <div class="history-details">
                <p class="history-label">
                    { parts.condition.clone() }
                    { parts.crop.as_ref().map(|crop| format!(" ({})", crop)).unwrap_or_default() }
                </p>
                <p class="history-meta">
                    { format!("{}% · {}", entry.confidence_percent(), entry.created_at.format("%Y-%m-%d %H:%M")) }
                </p>
            </div>
            <button
                class="analyze-btn"
                title="Run detection again on this image"
                disabled={busy || entry.image_url(&model.workflow.config().base_url).is_none()}
                onclick={ctx.link().callback(move |_| Msg::ReDetect(id.clone()))}
            >
                <i class="fa-solid fa-repeat"></i>{" Re-detect"}
            </button>
        </div>
    }
}
