mod api;
mod components;

use api::HttpScanBackend;
use components::handlers;
use components::header::render_header;
use components::progress::render_progress;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{Event, ImageFile, Phase, ScanConfig, ScanWorkflow};
use std::rc::Rc;
use web_sys::DragEvent;
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // File operations
    FilesAdded(Vec<GlooFile>),
    FileRead(ImageFile, ObjectUrl),

    // Scan operations
    Workflow(Event),
    NewScan,

    // UI states
    SetError(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
}

// Main component
pub struct Model {
    workflow: ScanWorkflow,
    backend: Rc<HttpScanBackend>,
    preview_url: Option<ObjectUrl>,
    error: Option<String>,
    is_dragging: bool,
    reading_file: bool,
    completed_at: Option<String>,
}

fn load_config() -> ScanConfig {
    match ScanConfig::from_yaml_str(include_str!("../../config/scan.yaml")) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Falling back to default scan config: {}", e);
            ScanConfig::default()
        }
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let config = load_config();
        log::info!(
            "Uploading to {}, predicting with {}",
            config.media_host.upload_url(),
            config.prediction.predict_url()
        );

        Self {
            workflow: ScanWorkflow::new(config.step_sequence()),
            backend: Rc::new(HttpScanBackend::new(&config)),
            preview_url: None,
            error: None,
            is_dragging: false,
            reading_file: false,
            completed_at: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FilesAdded(files) => handlers::handle_files_added(self, ctx, files),
            Msg::FileRead(file, preview_url) => {
                handlers::handle_file_read(self, ctx, file, preview_url)
            }

            Msg::Workflow(event) => handlers::handle_workflow_event(self, ctx, event),
            Msg::NewScan => handlers::handle_new_scan(self),

            Msg::SetError(error) => {
                self.error = error;
                self.reading_file = false;
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
        let phase = self.workflow.phase();

        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                {
                    match phase {
                        Phase::Idle => render_upload_section(self, ctx),
                        Phase::Results | Phase::Error => render_results(self, ctx),
                        _ => render_progress(self),
                    }
                }
                { render_error_message(self) }
                </main>

                <footer class="app-footer">
                    <p>{"TumorSense | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
