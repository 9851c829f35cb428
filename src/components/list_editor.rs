//! Table with select-and-delete and inline editing, shared by the books,
//! students and issued-books pages.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::notification::Notifier;
use crate::config::AppConfig;
use crate::error::Operation;
use crate::state::table::{
    return_action_url, CommitTarget, ReturnRequest, RowSchema, TableEffect, TableEvent, TableMode, TableRow,
    TableSession,
};

/// Where a list page sends its deletes, edits and returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTargets {
    pub delete_url: Option<String>,
    pub commit_url: String,
    pub return_url: Option<String>,
}

/// Messages flashed right before a form post leaves the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitNotices {
    pub edited: &'static str,
    pub deleted: &'static str,
}

#[derive(Clone, Copy)]
struct Editor {
    session: RwSignal<TableSession>,
    config: StoredValue<AppConfig>,
    targets: StoredValue<ListTargets>,
    notifier: Notifier,
    notices: Option<SubmitNotices>,
}

impl Editor {
    fn dispatch(self, event: TableEvent) {
        tracing::debug!("list event: {:?}", event);
        if let Some(effect) = self.session.try_update(|s| s.handle(event)).flatten() {
            self.run(effect);
        }
    }

    fn run(self, effect: TableEffect) {
        match effect {
            // The dialog is driven by the session mode.
            TableEffect::AskDeleteConfirmation { count } => {
                tracing::debug!("asking to delete {} row(s)", count);
            }
            TableEffect::SubmitDelete { request, ids } => {
                let schema = self.session.with_untracked(|s| *s.schema());
                let (Some(field), Some(url)) = (schema.selection, self.targets.with_value(|t| t.delete_url.clone()))
                else {
                    self.fail(request, "Delete is not available for this list.");
                    return;
                };
                if let Some(notices) = self.notices {
                    self.notifier.success(notices.deleted);
                }
                let fields: Vec<(&str, String)> = ids.into_iter().map(|id| (field, id)).collect();
                let sent = self.config.with_value(|config| api::submit_form(config, &url, &fields));
                if let Err(e) = sent {
                    tracing::error!("delete form failed: {}", e);
                    self.fail(request, "Error deleting rows. Please try again.");
                }
            }
            TableEffect::SubmitEdits { request, records } => {
                let schema = self.session.with_untracked(|s| *s.schema());
                let url = self.targets.with_value(|t| t.commit_url.clone());
                match schema.commit {
                    CommitTarget::HiddenField { input_name } => {
                        if let Some(notices) = self.notices {
                            self.notifier.success(notices.edited);
                        }
                        let sent = serde_json::to_string(&records)
                            .map_err(|e| e.to_string())
                            .and_then(|json| {
                                self.config
                                    .with_value(|config| api::submit_form(config, &url, &[(input_name, json)]))
                                    .map_err(String::from)
                            });
                        if let Err(e) = sent {
                            tracing::error!("edit form failed: {}", e);
                            self.fail(request, Operation::UpdateRows.fallback_message());
                        }
                    }
                    CommitTarget::Endpoint => {
                        let config = self.config.get_value();
                        spawn_local(async move {
                            match api::update_rows(&config, &url, &records).await {
                                Ok(()) => {
                                    self.notifier.success("Changes saved successfully!");
                                    self.dispatch(TableEvent::CommitFinished { request, ok: true });
                                }
                                Err(e) => {
                                    tracing::error!("row update failed: {}", e);
                                    self.fail(request, &e.user_message(Operation::UpdateRows));
                                }
                            }
                        });
                    }
                }
            }
            TableEffect::Reload => api::reload_page(),
        }
    }

    fn fail(self, request: u64, message: &str) {
        self.notifier.error(message);
        self.dispatch(TableEvent::CommitFinished { request, ok: false });
    }
}

#[component]
pub fn ListEditor(
    schema: RowSchema,
    rows: Vec<TableRow>,
    targets: ListTargets,
    config: AppConfig,
    notifier: Notifier,
    #[prop(optional)] notices: Option<SubmitNotices>,
) -> impl IntoView {
    let row_count = rows.len();
    let session = RwSignal::new(TableSession::new(schema, rows));
    let editor = Editor {
        session,
        config: StoredValue::new(config),
        targets: StoredValue::new(targets),
        notifier,
        notices,
    };

    // Memos so cell inputs are built once per mode change, not per keystroke.
    let editing = Memo::new(move |_| session.with(TableSession::is_editing));
    let selecting = Memo::new(move |_| session.with(TableSession::is_selecting));
    let busy = Memo::new(move |_| session.with(TableSession::is_busy));
    let confirming = Memo::new(move |_| {
        session.with(|s| s.mode() == TableMode::Selecting { confirming: true } && !s.is_busy())
    });

    let (pending_return, set_pending_return) = signal::<Option<ReturnRequest>>(None);
    let return_url = editor.targets.with_value(|t| t.return_url.clone());

    let delete_message = Signal::derive(move || {
        let count = session.with(TableSession::selected_count);
        format!(
            "Are you sure you want to delete {} selected {}? This cannot be undone.",
            count,
            schema.entity.replace('_', " ")
        )
    });
    let return_message = Signal::derive(move || {
        pending_return
            .get()
            .map(|r| format!("Return \"{}\" issued to {}?", r.book_name, r.student_name))
            .unwrap_or_default()
    });

    let on_return_confirm = {
        let config = editor.config;
        move |()| {
            let Some(request) = pending_return.get_untracked() else {
                return;
            };
            set_pending_return.set(None);
            let Some(base) = return_url.as_deref() else {
                return;
            };
            let action = return_action_url(base, &request.issued_book_id);
            if let Err(e) = config.with_value(|c| api::submit_form(c, &action, &[])) {
                tracing::error!("return form failed: {}", e);
                notifier.error("Error returning book. Please try again.");
            }
        }
    };

    let header_cells = schema
        .columns
        .iter()
        .map(|col| view! { <th>{col.header}</th> })
        .collect::<Vec<_>>();

    let body_rows = (0..row_count)
        .map(|r| {
            let id = session.with_untracked(|s| s.rows()[r].id.clone());
            let check_id = id.clone();
            let toggle_id = id.clone();
            let cells = (0..schema.columns.len())
                .map(|c| {
                    let shown = move || session.with(|s| s.cell(r, c).to_string());
                    view! {
                        <td>
                            {move || {
                                if editing.get() {
                                    view! {
                                        <input
                                            type="text"
                                            class="form-control cell-input"
                                            prop:value=session.with_untracked(|s| s.cell(r, c).to_string())
                                            disabled=move || busy.get()
                                            on:input=move |ev| {
                                                editor
                                                    .dispatch(TableEvent::EditCell {
                                                        row: r,
                                                        column: c,
                                                        value: event_target_value(&ev),
                                                    })
                                            }
                                        />
                                    }
                                        .into_any()
                                } else {
                                    view! { <span class="cell-text">{shown}</span> }.into_any()
                                }
                            }}
                        </td>
                    }
                })
                .collect::<Vec<_>>();

            let return_cell = schema.returnable.then(|| {
                let id = id.clone();
                view! {
                    <td>
                        <button
                            class="btn btn-sm btn-warning"
                            disabled=move || editing.get() || selecting.get() || busy.get()
                            on:click=move |_| {
                                if let Some(request) = session.with_untracked(|s| s.return_request(&id)) {
                                    set_pending_return.set(Some(request));
                                }
                            }
                        >
                            "Return"
                        </button>
                    </td>
                }
            });

            view! {
                <tr class:row-checked=move || session.with(|s| s.is_checked(&check_id))>
                    <Show when=move || selecting.get()>
                        <td class="select-cell">
                            <input
                                type="checkbox"
                                prop:checked={
                                    let id = toggle_id.clone();
                                    move || session.with(|s| s.is_checked(&id))
                                }
                                on:change={
                                    let id = toggle_id.clone();
                                    move |ev| {
                                        editor
                                            .dispatch(TableEvent::SetChecked {
                                                id: id.clone(),
                                                checked: event_target_checked(&ev),
                                            })
                                    }
                                }
                            />
                        </td>
                    </Show>
                    {cells}
                    {return_cell}
                </tr>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="list-editor">
            <div class="list-toolbar">
                {schema.selection.is_some().then(|| view! {
                    <button
                        class="btn btn-danger"
                        disabled=move || editing.get() || busy.get()
                        on:click=move |_| editor.dispatch(TableEvent::ToggleSelect)
                    >
                        {move || session.with(TableSession::select_label)}
                    </button>
                })}
                <button
                    class="btn btn-primary"
                    disabled=move || selecting.get() || busy.get()
                    on:click=move |_| editor.dispatch(TableEvent::ToggleEdit)
                >
                    {move || session.with(TableSession::edit_label)}
                </button>
                <Show when=move || session.with(TableSession::can_cancel)>
                    <button class="btn btn-secondary" on:click=move |_| editor.dispatch(TableEvent::Cancel)>
                        "Cancel"
                    </button>
                </Show>
            </div>

            <table class="table list-table" class:editing=move || editing.get()>
                <thead>
                    <tr>
                        <Show when=move || selecting.get()>
                            <th class="select-cell">
                                <input
                                    type="checkbox"
                                    title="Select all"
                                    prop:checked=move || session.with(TableSession::all_checked)
                                    on:change=move |ev| {
                                        editor.dispatch(TableEvent::SetAllChecked(event_target_checked(&ev)))
                                    }
                                />
                            </th>
                        </Show>
                        {header_cells}
                        {schema.returnable.then(|| view! { <th>"Action"</th> })}
                    </tr>
                </thead>
                <tbody>
                    {body_rows}
                </tbody>
            </table>
            {(row_count == 0).then(|| view! { <p class="empty-list">"No records found."</p> })}

            <ConfirmDialog
                open=confirming
                title="Confirm Delete"
                message=delete_message
                confirm_label="Delete"
                on_confirm=move |_| editor.dispatch(TableEvent::ConfirmDelete)
                on_cancel=move |_| editor.dispatch(TableEvent::DismissDelete)
            />
            <ConfirmDialog
                open=Signal::derive(move || pending_return.get().is_some())
                title="Confirm Return"
                message=return_message
                confirm_label="Return"
                on_confirm=on_return_confirm
                on_cancel=move |_| set_pending_return.set(None)
            />
        </div>
    }
}

fn event_target_checked(ev: &leptos::ev::Event) -> bool {
    use wasm_bindgen::JsCast;
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|e| e.checked())
        .unwrap_or(false)
}
