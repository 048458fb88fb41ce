use super::super::{Model, Msg};
use super::utils::{debounce, format_process_time};
use shared::Phase;
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let state = model.workflow.state();
    let failed = state.phase == Phase::Error;
    let confidence = state.confidence_percent.unwrap_or(0);
    let diagnosis = state.diagnosis.clone().unwrap_or_default();
    let process_time = state
        .process_time
        .map(format_process_time)
        .unwrap_or_else(|| "-".to_string());

    // Fall back to the local preview when the image never reached the host
    let image_src = state
        .hosted_image_url
        .clone()
        .or_else(|| model.preview_url.as_ref().map(|url| url.to_string()));

    let link = ctx.link().clone();

    html! {
        <div class={classes!("results-container", if failed { "analysis-failed" } else { "analysis-complete" })}>
            <div class="result-header">
                <span class="status-dot"></span>
                <span>{ if failed { "Analysis Failed" } else { "Analysis Complete" } }</span>
            </div>
            {
                if let Some(src) = image_src {
                    html! { <img class="analyzed-image" src={src} alt="Analyzed image" /> }
                } else {
                    html! {}
                }
            }
            <h2>{"AI Analysis Results"}</h2>
            <div class="stats-grid">
                <div class="stat">
                    <div class="stat-value">{ format!("{}%", confidence) }</div>
                    <div class="stat-label">{"Confidence"}</div>
                </div>
                <div class="stat">
                    <div class="stat-value">{ process_time }</div>
                    <div class="stat-label">{"Process Time"}</div>
                </div>
            </div>
            <div class="confidence-meter">
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                </div>
            </div>
            <div class="diagnosis">
                <div class="diagnosis-label">{"Diagnosis:"}</div>
                <div class="diagnosis-value">{ diagnosis }</div>
            </div>
            {
                if let Some(message) = &state.error_message {
                    html! { <p class="error-detail">{ message }</p> }
                } else {
                    html! {}
                }
            }
            <div class="result-footer">
                <span>{ format!("Processed: {}", model.completed_at.clone().unwrap_or_default()) }</span>
            </div>
            <div class="button-container">
                <button
                    class="analyze-btn"
                    onclick={debounce(300, move || link.send_message(Msg::NewScan))}
                >
                    <i class="fa-solid fa-rotate-right"></i>{" New Scan"}
                </button>
            </div>
        </div>
    }
}
