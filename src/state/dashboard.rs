use serde::{Deserialize, Serialize};

/// Maximum characters of a book title shown as a bar label.
const MAX_LABEL_CHARS: usize = 25;
/// Characters kept when a label has to be shortened.
const TRUNCATED_LABEL_CHARS: usize = 22;

/// One month on the issued/returned trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub issued: u64,
    pub returned: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBook {
    pub title: String,
    pub times_issued: u64,
}

/// Statistics rendered into the dashboard page by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub available: u64,
    pub issued: u64,
    pub overdue: u64,
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
    #[serde(default)]
    pub categories: Vec<CategoryCount>,
    #[serde(default)]
    pub top_books: Vec<TopBook>,
}

impl DashboardSnapshot {
    pub fn status_slices(&self) -> Vec<(String, u64)> {
        vec![
            ("Available".to_string(), self.available),
            ("Issued".to_string(), self.issued),
            ("Overdue".to_string(), self.overdue),
        ]
    }

    pub fn category_slices(&self) -> Vec<(String, u64)> {
        self.categories
            .iter()
            .map(|c| (c.category.clone(), c.count))
            .collect()
    }

    /// Bar labels and values for the top-books chart. An empty list yields a
    /// single "No data" bar so the chart still renders axes.
    pub fn top_book_bars(&self) -> (Vec<String>, Vec<u64>) {
        if self.top_books.is_empty() {
            return (vec!["No data".to_string()], vec![0]);
        }
        self.top_books
            .iter()
            .map(|b| (truncate_label(&b.title), b.times_issued))
            .unzip()
    }
}

/// Shorten long titles to 22 characters plus an ellipsis.
pub fn truncate_label(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() > MAX_LABEL_CHARS {
        let head: String = title.chars().take(TRUNCATED_LABEL_CHARS).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// Share of each value in tenths of a percent, rounded by largest remainder
/// so the result always sums to exactly 1000 (100.0%) when `values` has a
/// non-zero total. All zeros otherwise.
pub fn percentage_tenths(values: &[u64]) -> Vec<u64> {
    let total: u128 = values.iter().map(|&v| v as u128).sum();
    if total == 0 {
        return vec![0; values.len()];
    }

    let mut shares: Vec<u64> = Vec::with_capacity(values.len());
    let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        let scaled = v as u128 * 1000;
        shares.push((scaled / total) as u64);
        remainders.push((i, scaled % total));
    }

    let assigned: u64 = shares.iter().sum();
    let missing = 1000u64.saturating_sub(assigned) as usize;
    // Largest remainder first; ties go to the earlier slice.
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for &(i, _) in remainders.iter().take(missing) {
        shares[i] += 1;
    }
    shares
}

/// Tooltip lines of the form `Label: 12 (34.5%)` for a set of slices.
pub fn slice_tooltips(slices: &[(String, u64)]) -> Vec<String> {
    let values: Vec<u64> = slices.iter().map(|(_, v)| *v).collect();
    let tenths = percentage_tenths(&values);
    slices
        .iter()
        .zip(tenths)
        .map(|((label, value), t)| format!("{}: {} ({}.{}%)", label, value, t / 10, t % 10))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            available: 120,
            issued: 30,
            overdue: 5,
            trend: vec![
                TrendPoint { month: "Jan".into(), issued: 10, returned: 8 },
                TrendPoint { month: "Feb".into(), issued: 14, returned: 12 },
            ],
            categories: vec![
                CategoryCount { category: "Novel".into(), count: 1 },
                CategoryCount { category: "History".into(), count: 1 },
                CategoryCount { category: "Science".into(), count: 1 },
            ],
            top_books: vec![],
        }
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        for values in [
            vec![1, 1, 1],
            vec![120, 30, 5],
            vec![20, 15, 12, 10, 8, 5, 3],
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
            vec![999_999, 1],
        ] {
            let tenths = percentage_tenths(&values);
            assert_eq!(tenths.iter().sum::<u64>(), 1000, "values {:?} -> {:?}", values, tenths);
        }
    }

    #[test]
    fn test_thirds_round_by_largest_remainder() {
        assert_eq!(percentage_tenths(&[1, 1, 1]), vec![334, 333, 333]);
    }

    #[test]
    fn test_zero_total_is_all_zero() {
        assert_eq!(percentage_tenths(&[0, 0, 0]), vec![0, 0, 0]);
        assert!(percentage_tenths(&[]).is_empty());
    }

    #[test]
    fn test_status_tooltips() {
        let snap = make_snapshot();
        let tips = slice_tooltips(&snap.status_slices());
        assert_eq!(tips[0], "Available: 120 (77.4%)");
        assert_eq!(tips[1], "Issued: 30 (19.4%)");
        assert_eq!(tips[2], "Overdue: 5 (3.2%)");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Short title"), "Short title");
        assert_eq!(truncate_label("Exactly twenty-five chars"), "Exactly twenty-five chars");
        assert_eq!(
            truncate_label("A Very Long Book Title That Keeps Going"),
            "A Very Long Book Title..."
        );
    }

    #[test]
    fn test_empty_top_books_renders_placeholder() {
        let snap = make_snapshot();
        let (labels, values) = snap.top_book_bars();
        assert_eq!(labels, vec!["No data".to_string()]);
        assert_eq!(values, vec![0]);
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_lists() {
        let snap: DashboardSnapshot =
            serde_json::from_str(r#"{"available": 3, "issued": 2, "overdue": 1}"#).unwrap();
        assert_eq!(snap.available, 3);
        assert!(snap.trend.is_empty());
        assert!(snap.categories.is_empty());
    }
}
