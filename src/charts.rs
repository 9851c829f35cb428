//! Dashboard charts, drawn by the page's Chart.js.
//!
//! Chart configs are built here as JSON; per-slice tooltip text is computed
//! up front and served to Chart.js through a label callback.

use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

use crate::state::dashboard::{slice_tooltips, DashboardSnapshot};

#[wasm_bindgen]
extern "C" {
    /// The global `Chart` class from Chart.js.
    #[wasm_bindgen(js_name = Chart)]
    pub type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &web_sys::HtmlCanvasElement, config: &JsValue) -> Result<ChartJs, JsValue>;
}

const STATUS_COLORS: &[&str] = &["#27ae60", "#f39c12", "#e74c3c"];
const BAR_COLORS: &[&str] = &["#4b7bec", "#3498db", "#5b5fc7", "#2980b9", "#1a5f8f"];
const CATEGORY_COLORS: &[&str] = &[
    "#4b7bec", "#27ae60", "#f39c12", "#e74c3c", "#9b59b6", "#1abc9c", "#34495e",
];
const ISSUED_COLOR: &str = "#4b7bec";
const RETURNED_COLOR: &str = "#27ae60";
const FONT_FAMILY: &str = "'Poppins', sans-serif";

/// A chart ready to hand to Chart.js.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub name: &'static str,
    pub config: Value,
    /// Tooltip label per data point; `None` keeps Chart.js defaults.
    pub tooltips: Option<Vec<String>>,
}

fn cycle_colors(palette: &[&str], n: usize) -> Vec<String> {
    palette.iter().cycle().take(n.max(1)).map(|c| c.to_string()).collect()
}

fn legend(position: &str) -> Value {
    json!({
        "position": position,
        "labels": {
            "font": { "family": FONT_FAMILY, "size": 12, "weight": "600" },
            "padding": 20,
            "color": "#2c2c2c",
            "usePointStyle": true
        }
    })
}

fn tooltip_style() -> Value {
    json!({
        "backgroundColor": "rgba(0, 0, 0, 0.8)",
        "padding": 12,
        "titleFont": { "family": FONT_FAMILY, "size": 13, "weight": "700" },
        "bodyFont": { "family": FONT_FAMILY, "size": 12 },
        "callbacks": {}
    })
}

fn axes(step_size: Option<u32>) -> Value {
    let mut y_ticks = json!({ "font": { "family": FONT_FAMILY, "size": 11 }, "color": "#7f8c8d" });
    if let Some(step) = step_size {
        y_ticks["stepSize"] = json!(step);
    }
    json!({
        "y": { "beginAtZero": true, "grid": { "color": "rgba(200, 200, 200, 0.1)" }, "ticks": y_ticks },
        "x": { "grid": { "display": false }, "ticks": { "font": { "family": FONT_FAMILY, "size": 11 }, "color": "#7f8c8d" } }
    })
}

fn pie_like(kind: &str, slices: &[(String, u64)], colors: Vec<String>) -> Value {
    let labels: Vec<&str> = slices.iter().map(|(l, _)| l.as_str()).collect();
    let data: Vec<u64> = slices.iter().map(|(_, v)| *v).collect();
    json!({
        "type": kind,
        "data": {
            "labels": labels,
            "datasets": [{
                "data": data,
                "backgroundColor": colors,
                "borderColor": "#ffffff",
                "borderWidth": 3,
                "hoverOffset": 10,
                "borderRadius": 5
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": legend("bottom"), "tooltip": tooltip_style() }
        }
    })
}

/// Available / issued / overdue doughnut.
pub fn status_chart(snapshot: &DashboardSnapshot) -> ChartSpec {
    let slices = snapshot.status_slices();
    ChartSpec {
        name: "status",
        config: pie_like("doughnut", &slices, cycle_colors(STATUS_COLORS, slices.len())),
        tooltips: Some(slice_tooltips(&slices)),
    }
}

/// Books issued and returned per month.
pub fn trend_chart(snapshot: &DashboardSnapshot) -> ChartSpec {
    let months: Vec<&str> = snapshot.trend.iter().map(|p| p.month.as_str()).collect();
    let issued: Vec<u64> = snapshot.trend.iter().map(|p| p.issued).collect();
    let returned: Vec<u64> = snapshot.trend.iter().map(|p| p.returned).collect();
    let series = |label: &str, data: Vec<u64>, color: &str, fill: &str| {
        json!({
            "label": label,
            "data": data,
            "borderColor": color,
            "backgroundColor": fill,
            "borderWidth": 3,
            "fill": true,
            "tension": 0.4,
            "pointBackgroundColor": color,
            "pointBorderColor": "#ffffff",
            "pointBorderWidth": 2,
            "pointRadius": 5,
            "pointHoverRadius": 7
        })
    };
    let mut tooltip = tooltip_style();
    tooltip["mode"] = json!("index");
    tooltip["intersect"] = json!(false);

    ChartSpec {
        name: "trend",
        config: json!({
            "type": "line",
            "data": {
                "labels": months,
                "datasets": [
                    series("Books Issued", issued, ISSUED_COLOR, "rgba(75, 123, 236, 0.1)"),
                    series("Books Returned", returned, RETURNED_COLOR, "rgba(39, 174, 96, 0.1)"),
                ]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": legend("top"), "tooltip": tooltip },
                "scales": axes(None)
            }
        }),
        tooltips: None,
    }
}

/// Most issued books.
pub fn top_books_chart(snapshot: &DashboardSnapshot) -> ChartSpec {
    let (labels, counts) = snapshot.top_book_bars();
    let tooltips = counts.iter().map(|c| format!("Issues: {}", c)).collect();
    let colors = cycle_colors(BAR_COLORS, labels.len());
    ChartSpec {
        name: "top_books",
        config: json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Times Issued",
                    "data": counts,
                    "backgroundColor": colors,
                    "borderColor": colors,
                    "borderWidth": 2,
                    "borderRadius": 5,
                    "hoverBackgroundColor": "#3498db",
                    "hoverBorderColor": "#2980b9"
                }]
            },
            "options": {
                "indexAxis": "x",
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": legend("top"), "tooltip": tooltip_style() },
                "scales": axes(Some(1))
            }
        }),
        tooltips: Some(tooltips),
    }
}

/// Share of books per category.
pub fn category_chart(snapshot: &DashboardSnapshot) -> ChartSpec {
    let slices = snapshot.category_slices();
    ChartSpec {
        name: "category",
        config: pie_like("pie", &slices, cycle_colors(CATEGORY_COLORS, slices.len())),
        tooltips: Some(slice_tooltips(&slices)),
    }
}

pub fn dashboard_charts(snapshot: &DashboardSnapshot) -> [ChartSpec; 4] {
    [
        status_chart(snapshot),
        trend_chart(snapshot),
        top_books_chart(snapshot),
        category_chart(snapshot),
    ]
}

fn chart_library_loaded() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("Chart")).unwrap_or(false)
}

fn js_path(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    path.iter().try_fold(root.clone(), |node, key| {
        js_sys::Reflect::get(&node, &JsValue::from_str(key))
            .ok()
            .filter(|v| v.is_object())
    })
}

/// Draw `spec` on `canvas`. A missing canvas, a missing Chart.js or a
/// rejected config only skips this chart; the failure is logged.
pub fn render(canvas: Option<web_sys::HtmlCanvasElement>, spec: ChartSpec) -> Option<ChartJs> {
    let Some(canvas) = canvas else {
        tracing::warn!("{} chart canvas not found, skipping", spec.name);
        return None;
    };
    if !chart_library_loaded() {
        tracing::warn!("Chart.js is not loaded, skipping {} chart", spec.name);
        return None;
    }

    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let config = match spec.config.serialize(&serializer) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Could not convert {} chart config: {}", spec.name, e);
            return None;
        }
    };

    if let Some(labels) = spec.tooltips {
        let callback = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |ctx: JsValue| {
            let index = js_sys::Reflect::get(&ctx, &JsValue::from_str("dataIndex"))
                .ok()
                .and_then(|v| v.as_f64())
                .map(|v| v as usize);
            match index.and_then(|i| labels.get(i)) {
                Some(label) => JsValue::from_str(label),
                None => JsValue::UNDEFINED,
            }
        });
        if let Some(callbacks) = js_path(&config, &["options", "plugins", "tooltip", "callbacks"]) {
            let _ = js_sys::Reflect::set(&callbacks, &JsValue::from_str("label"), callback.as_ref());
        }
        // The chart lives as long as the page.
        callback.forget();
    }

    match ChartJs::new(&canvas, &config) {
        Ok(chart) => {
            tracing::debug!("Rendered {} chart", spec.name);
            Some(chart)
        }
        Err(e) => {
            tracing::error!("Chart.js rejected the {} chart: {:?}", spec.name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::dashboard::{CategoryCount, TopBook, TrendPoint};

    fn make_snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            available: 8,
            issued: 1,
            overdue: 1,
            trend: vec![
                TrendPoint { month: "Mar".into(), issued: 4, returned: 2 },
                TrendPoint { month: "Apr".into(), issued: 6, returned: 5 },
            ],
            categories: (0..9)
                .map(|i| CategoryCount { category: format!("C{}", i), count: i + 1 })
                .collect(),
            top_books: vec![TopBook { title: "Dune".into(), times_issued: 12 }],
        }
    }

    #[test]
    fn test_status_chart_data_and_tooltips() {
        let spec = status_chart(&make_snapshot());
        assert_eq!(spec.config["type"], "doughnut");
        assert_eq!(spec.config["data"]["datasets"][0]["data"], json!([8, 1, 1]));
        assert_eq!(
            spec.tooltips.unwrap(),
            vec!["Available: 8 (80.0%)", "Issued: 1 (10.0%)", "Overdue: 1 (10.0%)"]
        );
    }

    #[test]
    fn test_trend_chart_has_two_series() {
        let spec = trend_chart(&make_snapshot());
        let datasets = spec.config["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0]["data"], json!([4, 6]));
        assert_eq!(datasets[1]["data"], json!([2, 5]));
        assert_eq!(spec.config["data"]["labels"], json!(["Mar", "Apr"]));
    }

    #[test]
    fn test_category_colors_cycle() {
        let spec = category_chart(&make_snapshot());
        let colors = spec.config["data"]["datasets"][0]["backgroundColor"].as_array().unwrap();
        assert_eq!(colors.len(), 9);
        assert_eq!(colors[7], colors[0]);
    }

    #[test]
    fn test_top_books_tooltips() {
        let spec = top_books_chart(&make_snapshot());
        assert_eq!(spec.tooltips.unwrap(), vec!["Issues: 12"]);
        assert_eq!(spec.config["options"]["scales"]["y"]["ticks"]["stepSize"], 1);
    }

    #[test]
    fn test_every_chart_has_callback_slot() {
        for spec in dashboard_charts(&make_snapshot()) {
            assert!(
                spec.config["options"]["plugins"]["tooltip"]["callbacks"].is_object(),
                "{} chart lacks tooltip callbacks object",
                spec.name
            );
        }
    }
}
