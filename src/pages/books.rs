use leptos::prelude::*;

use crate::components::list_editor::{ListEditor, ListTargets};
use crate::components::notification::{NotificationBanner, Notifier};
use crate::config::{AppConfig, TableSeed};
use crate::state::table::{Column, CommitTarget, RowSchema};

pub const BOOK_SCHEMA: RowSchema = RowSchema {
    entity: "books",
    columns: &[
        Column { field: "name", header: "Book Name" },
        Column { field: "quantity", header: "Quantity" },
        Column { field: "author", header: "Author" },
        Column { field: "category", header: "Category" },
        Column { field: "language", header: "Language" },
    ],
    selection: Some("selected_books"),
    commit: CommitTarget::HiddenField { input_name: "books_data" },
    returnable: false,
};

#[component]
pub fn BooksPage(seed: TableSeed, config: AppConfig) -> impl IntoView {
    let notifier = Notifier::new(config.notification_lifetime());
    let targets = ListTargets {
        delete_url: Some(config.endpoints.delete_books.clone()),
        commit_url: config.endpoints.update_books.clone(),
        return_url: None,
    };

    view! {
        <div class="page books-page">
            <NotificationBanner notifier=notifier />
            <h2>"Books"</h2>
            <ListEditor schema=BOOK_SCHEMA rows=seed.rows targets=targets config=config notifier=notifier />
        </div>
    }
}
