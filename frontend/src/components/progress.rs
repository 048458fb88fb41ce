use super::super::Model;
use yew::prelude::*;

pub fn render_progress(model: &Model) -> Html {
    let current_step = model.workflow.state().current_step;
    let labels = model.workflow.steps().progress_labels();
    let status_text = current_step
        .and_then(|index| labels.get(index).copied())
        .unwrap_or("Processing...");

    html! {
        <div class="processing-overlay">
            {
                if let Some(url) = &model.preview_url {
                    html! { <img class="processing-preview" src={url.to_string()} alt="Scan preview" /> }
                } else {
                    html! {}
                }
            }
            <div class="spinner"><i class="fa-solid fa-spinner fa-spin fa-2x"></i></div>
            <div class="step-list">
                { for labels.iter().enumerate().map(|(index, label)| {
                    let status = match current_step {
                        Some(current) if index < current => "done",
                        Some(current) if index == current => "active",
                        _ => "pending",
                    };
                    html! {
                        <div class={classes!("step-item", status)} key={index.to_string()}>
                            <span class="step-indicator"></span>
                            <p>{ *label }</p>
                        </div>
                    }
                })}
            </div>
            <p class="step-status">{ status_text }</p>
        </div>
    }
}
