use super::super::{Model, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(image) = &model.snapshot.image else {
        return html! {};
    };

    let link = ctx.link().clone();
    let busy = model.snapshot.phase.is_busy();

    html! {
        <div id="preview-container">
            {
                match &model.preview {
                    Some(preview) => html! {
                        <img id="actual-image-preview"
                            src={preview.to_string()}
                            alt={image.file_name.clone()}
                            style="max-width:100%; max-height: 300px; object-fit: contain; margin-bottom: 10px;" />
                    },
                    None => html! {
                        <div class="preview-placeholder">
                            <p>{"Preview unavailable"}</p>
                        </div>
                    },
                }
            }
            <div class="button-container">
                <button
                    class="analyze-btn"
                    onclick={link.callback(|_| Msg::Submit)}
                    disabled={busy}
                >
                    { render_detect_button_content(busy) }
                </button>
                <button
                    id="clear-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Clear)
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear"}
                </button>
            </div>
        </div>
    }
}

fn render_detect_button_content(busy: bool) -> Html {
    if busy {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Detect Disease"}</> }
    }
}
