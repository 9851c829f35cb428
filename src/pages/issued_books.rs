use leptos::prelude::*;

use crate::components::list_editor::{ListEditor, ListTargets};
use crate::components::notification::{NotificationBanner, Notifier};
use crate::config::{AppConfig, TableSeed};
use crate::state::table::{Column, CommitTarget, RowSchema};

/// Issued books are edited in the background and returned one row at a time;
/// they cannot be bulk-deleted.
pub const ISSUED_BOOK_SCHEMA: RowSchema = RowSchema {
    entity: "issued_books",
    columns: &[
        Column { field: "student_name", header: "Student Name" },
        Column { field: "enrollment", header: "Enrollment" },
        Column { field: "book_name", header: "Book Name" },
        Column { field: "issue_date", header: "Issue Date" },
        Column { field: "return_date", header: "Return Date" },
    ],
    selection: None,
    commit: CommitTarget::Endpoint,
    returnable: true,
};

#[component]
pub fn IssuedBooksPage(seed: TableSeed, config: AppConfig) -> impl IntoView {
    let notifier = Notifier::new(config.notification_lifetime());
    let targets = ListTargets {
        delete_url: None,
        commit_url: config.endpoints.update_issued_books.clone(),
        return_url: Some(config.endpoints.return_issued_book.clone()),
    };

    view! {
        <div class="page issued-books-page">
            <NotificationBanner notifier=notifier />
            <h2>"Issued Books"</h2>
            <ListEditor schema=ISSUED_BOOK_SCHEMA rows=seed.rows targets=targets config=config notifier=notifier />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::state::table::{return_action_url, TableRow, TableSession};

    #[test]
    fn test_return_names_student_and_book() {
        let row = TableRow {
            id: "12".to_string(),
            cells: ["Ann Lee", "EN-4", "Dune", "2024-01-02", "2024-01-17"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        };
        let session = TableSession::new(ISSUED_BOOK_SCHEMA, vec![row]);
        let request = session.return_request("12").unwrap();
        assert_eq!(request.student_name, "Ann Lee");
        assert_eq!(request.book_name, "Dune");

        let base = Endpoints::default().return_issued_book;
        assert_eq!(
            return_action_url(&base, &request.issued_book_id),
            "/return-issued-book/?issuedbook_id=12"
        );
    }

    #[test]
    fn test_issued_books_cannot_be_bulk_deleted() {
        assert!(ISSUED_BOOK_SCHEMA.selection.is_none());
        assert_eq!(ISSUED_BOOK_SCHEMA.commit, CommitTarget::Endpoint);
    }
}
