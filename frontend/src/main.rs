mod components;
mod session;

use components::handlers;
use components::header::render_header;
use components::history::render_history;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_file::{Blob, File as GlooFile, ObjectUrl};
use session::LocalStorageSession;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use workflow::{
    DetectionWorkflow, HttpPredictionService, ImagePayload, PredictionId, SessionStore,
    WorkflowConfig, WorkflowSnapshot,
};
use yew::prelude::*;

type Workflow = DetectionWorkflow<HttpPredictionService, LocalStorageSession>;

enum Msg {
    // Image selection
    FileChosen(GlooFile),
    ImageLoaded(ImagePayload),
    Clear,

    // Detection
    Submit,
    ReDetect(PredictionId),
    RefreshHistory,
    WorkflowChanged,

    // UI states
    SetNotice(Option<String>),
    SetDragging(bool),
    HandleDrop(DragEvent),
}

struct Model {
    workflow: Rc<Workflow>,
    snapshot: WorkflowSnapshot,
    // Object URL over the bytes the workflow holds, rebuilt when they change
    preview: Option<ObjectUrl>,
    user_id: Option<String>,
    notice: Option<String>,
    is_dragging: bool,
}

fn preview_of(image: &ImagePayload) -> ObjectUrl {
    ObjectUrl::from(Blob::new_with_options(
        &image.bytes[..],
        Some(image.mime_type.as_str()),
    ))
}

fn app_config() -> WorkflowConfig {
    let config = match option_env!("CROPGUARD_API_BASE_URL") {
        Some(base_url) => WorkflowConfig::default().with_base_url(base_url),
        None => WorkflowConfig::default(),
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::error!("Ignoring build-time API configuration: {}", e);
            WorkflowConfig::default()
        }
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = app_config();
        log::info!("Prediction service at {}", config.base_url);

        let session = LocalStorageSession::new(config.token_key.clone());
        let user_id = session.display_user_id();
        let service = HttpPredictionService::new(config.clone());
        let workflow = Rc::new(DetectionWorkflow::new(config, service, session));

        let link = ctx.link().clone();
        workflow.set_observer(move || link.send_message(Msg::WorkflowChanged));

        spawn_local({
            let workflow = workflow.clone();
            async move {
                workflow.activate().await;
            }
        });

        Self {
            snapshot: workflow.snapshot(),
            workflow,
            preview: None,
            user_id,
            notice: None,
            is_dragging: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::ImageLoaded(image) => handlers::handle_image_loaded(self, image),
            Msg::Clear => handlers::handle_clear(self),

            Msg::Submit => handlers::handle_submit(self),
            Msg::ReDetect(id) => handlers::handle_re_detect(self, id),
            Msg::RefreshHistory => handlers::handle_refresh_history(self),
            Msg::WorkflowChanged => {
                let snapshot = self.workflow.snapshot();
                if snapshot.image != self.snapshot.image {
                    self.preview = snapshot.image.as_ref().map(preview_of);
                }
                self.snapshot = snapshot;
                true
            }

            Msg::SetNotice(notice) => {
                self.notice = notice;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container" data-phase={self.snapshot.phase.to_string()}>
                { render_header(self.user_id.as_deref()) }

                <main class="main-content">
                    <div class="detect-grid">
                        <div class="upload-section">
                            { render_upload_section(self, ctx) }
                            { render_preview_area(self, ctx) }
                        </div>
                        <div class="result-section">
                            { render_error_message(self) }
                            { render_results(&self.snapshot) }
                        </div>
                    </div>
                    { render_history(self, ctx) }
                </main>

                <footer class="app-footer">
                    <p>{"CropGuard | Crop Disease Detection"}</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.workflow.deactivate();
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
