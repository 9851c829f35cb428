//! Shared view / select-and-delete / inline-edit session behind the books,
//! students and issued-books lists.

use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// How a finished edit batch reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTarget {
    /// JSON array placed in a hidden input and sent with a regular form post.
    HiddenField { input_name: &'static str },
    /// `books_data=<json>` posted in the background; the page reloads on success.
    Endpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
}

/// Static description of one entity's list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSchema {
    pub entity: &'static str,
    pub columns: &'static [Column],
    /// Name of the id field posted by the delete form. `None` disables
    /// select-and-delete for this list.
    pub selection: Option<&'static str>,
    pub commit: CommitTarget,
    /// Rows offer a "return" action.
    pub returnable: bool,
}

impl RowSchema {
    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field == field)
    }
}

/// A row as rendered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableRow {
    pub id: String,
    #[serde(default)]
    pub cells: Vec<String>,
}

/// One row of an edit batch: the id followed by every editable field in
/// column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub id: String,
    pub fields: Vec<(&'static str, String)>,
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Viewing,
    /// Checkboxes are visible. `confirming` is set while the delete
    /// confirmation dialog is open.
    Selecting { confirming: bool },
    Editing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    ToggleSelect,
    ToggleEdit,
    Cancel,
    SetChecked { id: String, checked: bool },
    SetAllChecked(bool),
    EditCell { row: usize, column: usize, value: String },
    ConfirmDelete,
    DismissDelete,
    CommitFinished { request: u64, ok: bool },
}

/// Work the page has to carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEffect {
    /// Open the delete confirmation dialog.
    AskDeleteConfirmation { count: usize },
    /// Post the delete form with these ids, in row order.
    SubmitDelete { request: u64, ids: Vec<String> },
    /// Send the edit batch.
    SubmitEdits { request: u64, records: Vec<RowRecord> },
    /// The batch was accepted; reload to show server state.
    Reload,
}

/// Row details shown in the return confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRequest {
    pub issued_book_id: String,
    pub student_name: String,
    pub book_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSession {
    schema: RowSchema,
    rows: Vec<TableRow>,
    mode: TableMode,
    selected: HashSet<String>,
    shadow: Vec<Vec<String>>,
    in_flight: Option<u64>,
    last_request: u64,
}

impl TableSession {
    /// Rows whose cell count does not match the schema are padded or cut so
    /// every row has one cell per column.
    pub fn new(schema: RowSchema, rows: Vec<TableRow>) -> Self {
        let width = schema.columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.cells.resize(width, String::new());
                row
            })
            .collect();
        Self {
            schema,
            rows,
            mode: TableMode::Viewing,
            selected: HashSet::new(),
            shadow: Vec::new(),
            in_flight: None,
            last_request: 0,
        }
    }

    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn mode(&self) -> TableMode {
        self.mode
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.mode, TableMode::Selecting { .. })
    }

    pub fn is_editing(&self) -> bool {
        self.mode == TableMode::Editing
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn all_checked(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| self.selected.contains(&r.id))
    }

    /// Text shown for a cell: the shadow value while editing, the server
    /// value otherwise.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        let source = if self.is_editing() {
            self.shadow.get(row)
        } else {
            self.rows.get(row).map(|r| &r.cells)
        };
        source
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn select_label(&self) -> &'static str {
        if self.is_selecting() {
            "Delete Selected"
        } else {
            "Select"
        }
    }

    pub fn edit_label(&self) -> &'static str {
        if self.is_busy() && self.is_editing() {
            "Saving..."
        } else if self.is_editing() {
            "Save Changes"
        } else {
            "Edit"
        }
    }

    pub fn can_cancel(&self) -> bool {
        !self.is_busy() && self.mode != TableMode::Viewing
    }

    pub fn handle(&mut self, event: TableEvent) -> Option<TableEffect> {
        if let TableEvent::CommitFinished { request, ok } = event {
            return self.finish_commit(request, ok);
        }
        if self.is_busy() {
            return None;
        }

        match (self.mode, event) {
            (TableMode::Viewing, TableEvent::ToggleSelect) if self.schema.selection.is_some() => {
                self.selected.clear();
                self.mode = TableMode::Selecting { confirming: false };
                None
            }
            (TableMode::Selecting { confirming: false }, TableEvent::ToggleSelect) => {
                if self.selected.is_empty() {
                    self.mode = TableMode::Viewing;
                    None
                } else {
                    self.mode = TableMode::Selecting { confirming: true };
                    Some(TableEffect::AskDeleteConfirmation {
                        count: self.selected.len(),
                    })
                }
            }
            (TableMode::Selecting { confirming: false }, TableEvent::SetChecked { id, checked }) => {
                if !self.rows.iter().any(|r| r.id == id) {
                    return None;
                }
                if checked {
                    self.selected.insert(id);
                } else {
                    self.selected.remove(&id);
                }
                None
            }
            (TableMode::Selecting { confirming: false }, TableEvent::SetAllChecked(checked)) => {
                self.selected.clear();
                if checked {
                    self.selected.extend(self.rows.iter().map(|r| r.id.clone()));
                }
                None
            }
            (TableMode::Selecting { confirming: true }, TableEvent::ConfirmDelete) => {
                let ids = self
                    .rows
                    .iter()
                    .filter(|r| self.selected.contains(&r.id))
                    .map(|r| r.id.clone())
                    .collect();
                // The delete form navigates away; nothing else may run meanwhile.
                self.last_request += 1;
                self.in_flight = Some(self.last_request);
                Some(TableEffect::SubmitDelete {
                    request: self.last_request,
                    ids,
                })
            }
            (TableMode::Selecting { confirming: true }, TableEvent::DismissDelete) => {
                self.mode = TableMode::Selecting { confirming: false };
                None
            }
            (TableMode::Selecting { confirming: false }, TableEvent::Cancel) => {
                self.selected.clear();
                self.mode = TableMode::Viewing;
                None
            }
            (TableMode::Viewing, TableEvent::ToggleEdit) => {
                self.shadow = self.rows.iter().map(|r| r.cells.clone()).collect();
                self.mode = TableMode::Editing;
                None
            }
            (TableMode::Editing, TableEvent::ToggleEdit) => {
                self.last_request += 1;
                self.in_flight = Some(self.last_request);
                Some(TableEffect::SubmitEdits {
                    request: self.last_request,
                    records: self.records(),
                })
            }
            (TableMode::Editing, TableEvent::EditCell { row, column, value }) => {
                if let Some(cell) = self.shadow.get_mut(row).and_then(|r| r.get_mut(column)) {
                    *cell = value;
                }
                None
            }
            (TableMode::Editing, TableEvent::Cancel) => {
                self.shadow.clear();
                self.mode = TableMode::Viewing;
                None
            }
            // Everything else, including entering one mode while the other
            // is active, leaves the session as it is.
            _ => None,
        }
    }

    fn finish_commit(&mut self, request: u64, ok: bool) -> Option<TableEffect> {
        if self.in_flight != Some(request) {
            return None;
        }
        self.in_flight = None;
        if !ok {
            if self.is_selecting() {
                self.mode = TableMode::Selecting { confirming: false };
            }
            return None;
        }
        for (row, edited) in self.rows.iter_mut().zip(self.shadow.drain(..)) {
            row.cells = edited;
        }
        self.mode = TableMode::Viewing;
        Some(TableEffect::Reload)
    }

    /// Every row in table order with its current (possibly edited) values.
    pub fn records(&self) -> Vec<RowRecord> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| RowRecord {
                id: row.id.clone(),
                fields: self
                    .schema
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(c, col)| (col.field, self.cell(i, c).to_string()))
                    .collect(),
            })
            .collect()
    }

    /// Details for the return dialog; only offered while plainly viewing.
    pub fn return_request(&self, row_id: &str) -> Option<ReturnRequest> {
        if !self.schema.returnable || self.mode != TableMode::Viewing || self.is_busy() {
            return None;
        }
        let row = self.rows.iter().find(|r| r.id == row_id)?;
        let value = |field: &str| {
            self.schema
                .column_index(field)
                .and_then(|i| row.cells.get(i))
                .cloned()
                .unwrap_or_default()
        };
        Some(ReturnRequest {
            issued_book_id: row.id.clone(),
            student_name: value("student_name"),
            book_name: value("book_name"),
        })
    }
}

/// `base` with its query replaced by `?issuedbook_id=<id>`.
pub fn return_action_url(base: &str, issued_book_id: &str) -> String {
    let path = base.split('?').next().unwrap_or_default();
    format!("{}?issuedbook_id={}", path, urlencoding::encode(issued_book_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[Column] = &[
        Column { field: "name", header: "Name" },
        Column { field: "quantity", header: "Quantity" },
    ];

    const SCHEMA: RowSchema = RowSchema {
        entity: "books",
        columns: COLUMNS,
        selection: Some("selected_books"),
        commit: CommitTarget::HiddenField { input_name: "books_data" },
        returnable: false,
    };

    const ISSUED_COLUMNS: &[Column] = &[
        Column { field: "student_name", header: "Student" },
        Column { field: "book_name", header: "Book" },
    ];

    const ISSUED: RowSchema = RowSchema {
        entity: "issued_books",
        columns: ISSUED_COLUMNS,
        selection: None,
        commit: CommitTarget::Endpoint,
        returnable: true,
    };

    fn row(id: &str, cells: &[&str]) -> TableRow {
        TableRow {
            id: id.to_string(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn make_session() -> TableSession {
        TableSession::new(
            SCHEMA,
            vec![
                row("3", &["Dune", "4"]),
                row("1", &["Emma", "2"]),
                row("7", &["Ulysses", "1"]),
            ],
        )
    }

    fn check(session: &mut TableSession, id: &str) {
        session.handle(TableEvent::SetChecked { id: id.to_string(), checked: true });
    }

    #[test]
    fn test_edit_then_cancel_restores_cells() {
        let mut session = make_session();
        let before: Vec<String> = (0..3).map(|r| session.cell(r, 0).to_string()).collect();

        session.handle(TableEvent::ToggleEdit);
        assert!(session.is_editing());
        session.handle(TableEvent::EditCell { row: 0, column: 0, value: "Dune Messiah".into() });
        assert_eq!(session.cell(0, 0), "Dune Messiah");

        assert_eq!(session.handle(TableEvent::Cancel), None);
        assert_eq!(session.mode(), TableMode::Viewing);
        let after: Vec<String> = (0..3).map(|r| session.cell(r, 0).to_string()).collect();
        assert_eq!(before, after);
        assert_eq!(session.cell(0, 1), "4");
    }

    #[test]
    fn test_commit_sends_every_row_in_order() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleEdit);
        session.handle(TableEvent::EditCell { row: 1, column: 1, value: "5".into() });

        let effect = session.handle(TableEvent::ToggleEdit).expect("commit effect");
        let TableEffect::SubmitEdits { request, records } = effect else {
            panic!("expected SubmitEdits, got {:?}", effect);
        };
        assert_eq!(request, 1);
        assert_eq!(records.len(), 3);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "7"]);
        assert_eq!(records[1].fields, vec![("name", "Emma".to_string()), ("quantity", "5".to_string())]);
        assert!(session.is_busy());
    }

    #[test]
    fn test_record_serializes_id_first() {
        let record = RowRecord {
            id: "9".into(),
            fields: vec![("name", "Dune".into()), ("quantity", "4".into())],
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":"9","name":"Dune","quantity":"4"}"#
        );
    }

    #[test]
    fn test_commit_result_handling() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleEdit);
        session.handle(TableEvent::EditCell { row: 2, column: 0, value: "Odyssey".into() });
        let Some(TableEffect::SubmitEdits { request, .. }) = session.handle(TableEvent::ToggleEdit) else {
            panic!("expected SubmitEdits");
        };

        // Edits are frozen while the batch is in flight.
        session.handle(TableEvent::EditCell { row: 2, column: 0, value: "Iliad".into() });
        assert_eq!(session.cell(2, 0), "Odyssey");

        assert_eq!(session.handle(TableEvent::CommitFinished { request, ok: false }), None);
        assert!(session.is_editing(), "failed batch keeps edits");
        assert_eq!(session.cell(2, 0), "Odyssey");

        let Some(TableEffect::SubmitEdits { request: retry, .. }) = session.handle(TableEvent::ToggleEdit) else {
            panic!("expected SubmitEdits");
        };
        assert_eq!(session.handle(TableEvent::CommitFinished { request, ok: true }), None, "stale");
        assert_eq!(
            session.handle(TableEvent::CommitFinished { request: retry, ok: true }),
            Some(TableEffect::Reload)
        );
        assert_eq!(session.mode(), TableMode::Viewing);
        assert_eq!(session.cell(2, 0), "Odyssey");
    }

    #[test]
    fn test_select_nothing_returns_silently() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleSelect);
        assert_eq!(session.select_label(), "Delete Selected");
        assert_eq!(session.handle(TableEvent::ToggleSelect), None);
        assert_eq!(session.mode(), TableMode::Viewing);
        assert_eq!(session.select_label(), "Select");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleSelect);
        check(&mut session, "7");
        check(&mut session, "3");

        assert_eq!(
            session.handle(TableEvent::ToggleSelect),
            Some(TableEffect::AskDeleteConfirmation { count: 2 })
        );
        assert_eq!(
            session.handle(TableEvent::ConfirmDelete),
            Some(TableEffect::SubmitDelete { request: 1, ids: vec!["3".into(), "7".into()] })
        );
        assert!(session.is_busy());
    }

    #[test]
    fn test_failed_delete_submission_reopens_selection() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleSelect);
        check(&mut session, "1");
        session.handle(TableEvent::ToggleSelect);
        let Some(TableEffect::SubmitDelete { request, .. }) = session.handle(TableEvent::ConfirmDelete) else {
            panic!("expected SubmitDelete");
        };
        session.handle(TableEvent::CommitFinished { request, ok: false });
        assert!(!session.is_busy());
        assert_eq!(session.mode(), TableMode::Selecting { confirming: false });
        assert!(session.is_checked("1"));
    }

    #[test]
    fn test_dismissing_confirmation_keeps_selection() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleSelect);
        check(&mut session, "1");
        session.handle(TableEvent::ToggleSelect);
        session.handle(TableEvent::DismissDelete);
        assert_eq!(session.mode(), TableMode::Selecting { confirming: false });
        assert!(session.is_checked("1"));
    }

    #[test]
    fn test_cancel_selecting_clears_checks() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleSelect);
        session.handle(TableEvent::SetAllChecked(true));
        assert!(session.all_checked());
        session.handle(TableEvent::Cancel);
        assert_eq!(session.mode(), TableMode::Viewing);
        assert_eq!(session.selected_count(), 0);
    }

    #[test]
    fn test_unknown_row_cannot_be_checked() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleSelect);
        check(&mut session, "42");
        assert_eq!(session.selected_count(), 0);
    }

    #[test]
    fn test_modes_are_mutually_exclusive() {
        let mut session = make_session();
        session.handle(TableEvent::ToggleEdit);
        assert_eq!(session.handle(TableEvent::ToggleSelect), None);
        assert_eq!(session.mode(), TableMode::Editing);

        session.handle(TableEvent::Cancel);
        session.handle(TableEvent::ToggleSelect);
        assert_eq!(session.handle(TableEvent::ToggleEdit), None);
        assert_eq!(session.mode(), TableMode::Selecting { confirming: false });
    }

    #[test]
    fn test_rows_padded_to_schema_width() {
        let session = TableSession::new(SCHEMA, vec![row("1", &["Only name"])]);
        assert_eq!(session.rows()[0].cells, vec!["Only name".to_string(), String::new()]);
    }

    #[test]
    fn test_selection_disabled_without_delete_target() {
        let mut session = TableSession::new(ISSUED, vec![row("5", &["Sam", "Dune"])]);
        session.handle(TableEvent::ToggleSelect);
        assert_eq!(session.mode(), TableMode::Viewing);
    }

    #[test]
    fn test_return_request_only_while_viewing() {
        let mut session = TableSession::new(ISSUED, vec![row("5", &["Sam", "Dune"])]);
        assert_eq!(
            session.return_request("5"),
            Some(ReturnRequest {
                issued_book_id: "5".into(),
                student_name: "Sam".into(),
                book_name: "Dune".into(),
            })
        );
        assert_eq!(session.return_request("6"), None);
        session.handle(TableEvent::ToggleEdit);
        assert_eq!(session.return_request("5"), None);
        assert!(make_session().return_request("3").is_none(), "books rows are not returnable");
    }

    #[test]
    fn test_return_action_url() {
        assert_eq!(
            return_action_url("/return-issued-book/", "12"),
            "/return-issued-book/?issuedbook_id=12"
        );
        assert_eq!(
            return_action_url("/return-issued-book/?issuedbook_id=3", "12"),
            "/return-issued-book/?issuedbook_id=12"
        );
    }
}
