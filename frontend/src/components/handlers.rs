use super::super::{Model, Msg};
use super::utils::first_image_file;
use gloo_file::File as GlooFile;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use workflow::{ImagePayload, PredictionId};
use yew::prelude::*;

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    model.notice = None;
    let link = ctx.link().clone();

    spawn_local(async move {
        match gloo_file::futures::read_as_bytes(&file).await {
            Ok(bytes) => {
                let image = ImagePayload::new(file.name(), file.raw_mime_type(), bytes);
                link.send_message(Msg::ImageLoaded(image));
            }
            Err(e) => {
                log::error!("Failed to read {}: {:?}", file.name(), e);
                link.send_message(Msg::SetNotice(Some(format!(
                    "Could not read {}.",
                    file.name()
                ))));
            }
        }
    });

    true
}

pub fn handle_image_loaded(model: &mut Model, image: ImagePayload) -> bool {
    model.workflow.select_image(image);
    true
}

pub fn handle_clear(model: &mut Model) -> bool {
    model.notice = None;
    model.workflow.clear();
    true
}

pub fn handle_submit(model: &mut Model) -> bool {
    let workflow = model.workflow.clone();
    spawn_local(async move {
        workflow.submit().await;
    });
    false
}

pub fn handle_re_detect(model: &mut Model, id: PredictionId) -> bool {
    let Some(entry) = model
        .snapshot
        .history
        .iter()
        .find(|entry| entry.prediction_id == id)
        .cloned()
    else {
        log::warn!("Re-detect requested for unknown prediction {}", id);
        return false;
    };

    let workflow = model.workflow.clone();
    spawn_local(async move {
        workflow.re_detect(&entry).await;
    });
    true
}

pub fn handle_refresh_history(model: &mut Model) -> bool {
    let workflow = model.workflow.clone();
    spawn_local(async move {
        workflow.refresh_history().await;
    });
    false
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let file = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|files| first_image_file(&files));

    match file {
        Some(file) => ctx.link().send_message(Msg::FileChosen(file)),
        None => model.notice = Some("Only image files can be analyzed.".into()),
    }

    true
}
