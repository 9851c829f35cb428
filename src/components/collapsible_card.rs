use leptos::prelude::*;

#[component]
pub fn CollapsibleCard(
    #[prop(into)] title: String,
    #[prop(default = true)] initially_open: bool,
    children: Children,
) -> impl IntoView {
    let (open, set_open) = signal(initially_open);

    view! {
        <div class="collapsible-card" class:active=move || open.get()>
            <div class="collapsible-header" on:click=move |_| set_open.update(|o| *o = !*o)>
                <h3>{title}</h3>
                <span class="collapsible-icon">{move || if open.get() { "\u{25be}" } else { "\u{25b8}" }}</span>
            </div>
            <div class="collapsible-body">{children()}</div>
        </div>
    }
}
