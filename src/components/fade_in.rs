use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::state::reveal::Reveal;

/// Share of the element that must be visible before it fades in.
const VISIBLE_THRESHOLD: f64 = 0.1;

/// Wraps `children` and plays the fade-in animation the first time the
/// wrapper scrolls into view.
#[component]
pub fn FadeIn(
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let el = NodeRef::<Div>::new();
    let (revealed, set_revealed) = signal(false);

    Effect::new(move |_| {
        let Some(target) = el.get() else {
            return;
        };
        let mut reveal = Reveal::default();
        let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: web_sys::IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<web_sys::IntersectionObserverEntry>() else {
                        continue;
                    };
                    if reveal.observe(entry.is_intersecting()) {
                        set_revealed.set(true);
                        observer.unobserve(&entry.target());
                    }
                }
            },
        );

        let options = web_sys::IntersectionObserverInit::new();
        options.set_threshold(&VISIBLE_THRESHOLD.into());
        match web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => observer.observe(&target),
            Err(e) => {
                // Without an observer just show the content.
                tracing::debug!("IntersectionObserver unavailable: {:?}", e);
                set_revealed.set(true);
            }
        }
        callback.forget();
    });

    view! {
        <div node_ref=el class=class class:fade-in=move || revealed.get()>
            {children()}
        </div>
    }
}
