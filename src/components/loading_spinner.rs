use leptos::prelude::*;

#[component]
pub fn LoadingSpinner(#[prop(into)] visible: Signal<bool>) -> impl IntoView {
    view! {
        <Show when=move || visible.get()>
            <div class="loading-overlay">
                <div class="spinner"></div>
            </div>
        </Show>
    }
}
