use leptos::prelude::*;

/// Modal asking the user to confirm a destructive action.
#[component]
pub fn ConfirmDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: String,
    /// Body text; reactive so it can name the rows involved.
    #[prop(into)]
    message: Signal<String>,
    #[prop(default = "Confirm")] confirm_label: &'static str,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="modal-backdrop" on:click=move |_| on_cancel.run(())></div>
            <div class="modal-dialog" role="dialog" aria-modal="true">
                <div class="modal-header">
                    <h5 class="modal-title">{title.clone()}</h5>
                </div>
                <div class="modal-body">
                    <p>{move || message.get()}</p>
                </div>
                <div class="modal-footer">
                    <button class="btn btn-secondary" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn-danger" on:click=move |_| on_confirm.run(())>
                        {confirm_label}
                    </button>
                </div>
            </div>
        </Show>
    }
}
