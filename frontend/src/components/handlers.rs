use super::super::Model;
use super::super::Msg;
use super::utils::{first_image_file, local_time_of_day};
use crate::api::BrowserTimer;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::workflow::run_effect;
use shared::{Effect, Event, ImageFile, Timer};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use yew::prelude::*;

pub fn handle_files_added(model: &mut Model, ctx: &Context<Model>, files: Vec<GlooFile>) -> bool {
    if model.workflow.is_busy() || model.reading_file {
        log::warn!("Scan already in progress, ignoring new selection");
        return false;
    }

    let Some(file) = files.into_iter().next() else {
        return false;
    };

    model.error = None;
    model.reading_file = true;
    read_selected_file(ctx, file);
    true
}

fn read_selected_file(ctx: &Context<Model>, file: GlooFile) {
    let link = ctx.link().clone();
    let preview_url = ObjectUrl::from(file.clone());

    spawn_local(async move {
        match gloo_file::futures::read_as_bytes(&file).await {
            Ok(bytes) => {
                let image = ImageFile::new(file.name(), file.raw_mime_type(), bytes);
                link.send_message(Msg::FileRead(image, preview_url));
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", file.name(), e);
                link.send_message(Msg::SetError(Some(format!(
                    "Could not read \"{}\": {}",
                    file.name(),
                    e
                ))));
            }
        }
    });
}

pub fn handle_file_read(
    model: &mut Model,
    ctx: &Context<Model>,
    file: ImageFile,
    preview_url: ObjectUrl,
) -> bool {
    model.reading_file = false;
    if model.workflow.is_busy() {
        return false;
    }

    model.preview_url = Some(preview_url);
    model.completed_at = None;

    let event = Event::FileSelected {
        file,
        at_ms: BrowserTimer.now_ms(),
    };
    handle_workflow_event(model, ctx, event)
}

pub fn handle_workflow_event(model: &mut Model, ctx: &Context<Model>, event: Event) -> bool {
    let effect = model.workflow.handle(event);

    if model.workflow.phase().is_finished() && model.completed_at.is_none() {
        model.completed_at = Some(local_time_of_day());
    }

    if let Some(effect) = effect {
        spawn_effect(model, ctx, effect);
    }

    true
}

pub fn spawn_effect(model: &Model, ctx: &Context<Model>, effect: Effect) {
    let link = ctx.link().clone();
    let backend = Rc::clone(&model.backend);

    spawn_local(async move {
        let event = run_effect(effect, backend.as_ref(), &BrowserTimer).await;
        link.send_message(Msg::Workflow(event));
    });
}

pub fn handle_new_scan(model: &mut Model) -> bool {
    if model.workflow.is_busy() {
        return false;
    }

    model.workflow.handle(Event::NewScan);
    model.preview_url = None;
    model.completed_at = None;
    model.error = None;
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file) = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| first_image_file(&file_list))
    {
        ctx.link().send_message(Msg::FilesAdded(vec![file]));
    }

    true
}
