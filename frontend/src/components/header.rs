use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-brain"></i> {" TumorSense"}</h1>
            <p class="subtitle">{"Upload a scan image to begin AI analysis"}</p>
        </header>
    }
}
