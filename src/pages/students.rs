use leptos::prelude::*;

use crate::components::list_editor::{ListEditor, ListTargets, SubmitNotices};
use crate::components::notification::{NotificationBanner, Notifier};
use crate::config::{AppConfig, TableSeed};
use crate::state::table::{Column, CommitTarget, RowSchema};

pub const STUDENT_SCHEMA: RowSchema = RowSchema {
    entity: "students",
    columns: &[
        Column { field: "name", header: "Name" },
        Column { field: "enrollment", header: "Enrollment" },
        Column { field: "address", header: "Address" },
        Column { field: "phone", header: "Phone" },
        Column { field: "gender", header: "Gender" },
    ],
    selection: Some("selected_students"),
    commit: CommitTarget::HiddenField { input_name: "students_data" },
    returnable: false,
};

const NOTICES: SubmitNotices = SubmitNotices {
    edited: "Student(s) edited successfully",
    deleted: "Student(s) deleted successfully",
};

#[component]
pub fn StudentsPage(seed: TableSeed, config: AppConfig) -> impl IntoView {
    let notifier = Notifier::new(config.notification_lifetime());
    let targets = ListTargets {
        delete_url: Some(config.endpoints.delete_students.clone()),
        commit_url: config.endpoints.update_students.clone(),
        return_url: None,
    };

    view! {
        <div class="page students-page">
            <NotificationBanner notifier=notifier />
            <h2>"Students"</h2>
            <ListEditor
                schema=STUDENT_SCHEMA
                rows=seed.rows
                targets=targets
                config=config
                notifier=notifier
                notices=NOTICES
            />
        </div>
    }
}
