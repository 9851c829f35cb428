use std::time::Duration;

use leptos::prelude::*;

use crate::browser;

const RIPPLE_LIFETIME: Duration = Duration::from_millis(600);

/// Dashboard shortcut link with a click ripple.
#[component]
pub fn QuickAction(
    #[prop(into)] href: String,
    #[prop(into)] label: String,
) -> impl IntoView {
    let (ripples, set_ripples) = signal::<Vec<u32>>(vec![]);
    let next = StoredValue::new(0u32);

    let on_click = move |_| {
        next.update_value(|n| *n += 1);
        let id = next.get_value();
        set_ripples.update(|r| r.push(id));
        browser::set_timeout(RIPPLE_LIFETIME, move || {
            set_ripples.update(|r| r.retain(|&x| x != id));
        });
    };

    view! {
        <a href=href class="quick-action-btn" on:click=on_click>
            {label}
            <For each=move || ripples.get() key=|id| *id let:_id>
                <span class="ripple"></span>
            </For>
        </a>
    }
}
