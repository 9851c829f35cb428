use leptos::prelude::*;

use crate::browser;
use crate::state::counter::{format_thousands, CounterAnimation};

/// Statistic card whose number counts up from zero on mount.
#[component]
pub fn StatCounter(
    #[prop(into)] label: String,
    target: u64,
    /// Extra class for the card, e.g. "stat-issued"
    #[prop(optional, into)]
    class: String,
) -> impl IntoView {
    let (shown, set_shown) = signal(0u64);

    Effect::new(move |_| {
        let mut anim = CounterAnimation::new(target);
        let period = anim.frame_interval();
        browser::run_interval(period, move || match anim.tick() {
            Some(value) => {
                set_shown.set(value);
                !anim.is_finished()
            }
            None => false,
        });
    });

    view! {
        <div class=format!("stat-card {}", class)>
            <span class="stat-number" data-count=target.to_string()>
                {move || format_thousands(shown.get())}
            </span>
            <span class="stat-label">{label}</span>
        </div>
    }
}
