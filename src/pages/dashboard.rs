use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::api;
use crate::browser;
use crate::charts;
use crate::components::fade_in::FadeIn;
use crate::components::quick_action::QuickAction;
use crate::components::stat_counter::StatCounter;
use crate::state::dashboard::DashboardSnapshot;

const CHART_TITLES: [&str; 4] = [
    "Book Status",
    "Monthly Issue Trend",
    "Most Issued Books",
    "Books by Category",
];

const QUICK_ACTIONS: &[(&str, &str)] = &[
    ("/addbook/", "Add Book"),
    ("/issuebook/", "Issue Book"),
    ("/addstudent/", "Add Student"),
    ("/viewissuedbook/", "Issued Books"),
];

#[component]
pub fn DashboardPage(snapshot: DashboardSnapshot) -> impl IntoView {
    let canvases: [NodeRef<Canvas>; 4] = std::array::from_fn(|_| NodeRef::new());
    let specs = StoredValue::new(charts::dashboard_charts(&snapshot));

    // Runs once after mount; each chart is drawn or skipped on its own.
    Effect::new(move |_| {
        let specs = specs.get_value();
        let mut drawn = 0;
        for (canvas, spec) in canvases.iter().zip(specs) {
            if charts::render(canvas.get_untracked(), spec).is_some() {
                drawn += 1;
            }
        }
        tracing::info!("Dashboard ready, {} of {} charts drawn", drawn, canvases.len());
    });

    browser::on_window_event("keydown", |ev| {
        let Some(key) = ev.dyn_ref::<web_sys::KeyboardEvent>() else {
            return;
        };
        if key.key() == "r" && (key.ctrl_key() || key.meta_key()) {
            ev.prevent_default();
            api::reload_page();
        }
    });

    let chart_cards = canvases
        .into_iter()
        .zip(CHART_TITLES)
        .map(|(canvas, title)| {
            view! {
                <FadeIn class="reveal chart-card">
                    <h3 class="chart-title">{title}</h3>
                    <div class="chart-container">
                        <canvas node_ref=canvas></canvas>
                    </div>
                </FadeIn>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="page dashboard-page">
            <style>{include_str!("dashboard.css")}</style>
            <h2>"Library Dashboard"</h2>

            <div class="stats-grid">
                <FadeIn class="reveal">
                    <StatCounter label="Available Books" target=snapshot.available class="stat-available" />
                </FadeIn>
                <FadeIn class="reveal">
                    <StatCounter label="Issued Books" target=snapshot.issued class="stat-issued" />
                </FadeIn>
                <FadeIn class="reveal">
                    <StatCounter label="Overdue Books" target=snapshot.overdue class="stat-overdue" />
                </FadeIn>
            </div>

            <div class="charts-grid">{chart_cards}</div>

            <div class="quick-actions">
                <h3>"Quick Actions"</h3>
                <div class="quick-actions-grid">
                    {QUICK_ACTIONS
                        .iter()
                        .map(|&(href, label)| view! { <QuickAction href=href label=label /> })
                        .collect::<Vec<_>>()}
                </div>
            </div>
        </div>
    }
}
