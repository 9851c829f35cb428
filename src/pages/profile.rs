use std::time::Duration;

use leptos::html::Input;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::browser;
use crate::components::collapsible_card::CollapsibleCard;
use crate::components::loading_spinner::LoadingSpinner;
use crate::components::notification::{NotificationBanner, Notifier};
use crate::config::{AppConfig, ProfileSeed};
use crate::error::Operation;
use crate::state::photo::{check_file, PhotoUploadState};
use crate::state::profile::{initials, CancelOutcome, ProfileEditor, ProfileField, SaveError};

const DISCARD_PROMPT: &str = "You have unsaved changes. Are you sure you want to discard them?";

/// (field, label, input type) for the single-line inputs, in form order.
const TEXT_FIELDS: &[(ProfileField, &str, &str)] = &[
    (ProfileField::FullName, "Full Name", "text"),
    (ProfileField::Email, "Email Address", "email"),
    (ProfileField::Phone, "Phone Number", "tel"),
    (ProfileField::DateOfBirth, "Date of Birth", "date"),
];

#[component]
pub fn ProfilePage(seed: ProfileSeed, config: AppConfig) -> impl IntoView {
    let notifier = Notifier::new(config.notification_lifetime());
    let min_age = config.min_age_years;
    let config = StoredValue::new(config);
    let editor = RwSignal::new(ProfileEditor::new(seed.draft));
    let photo = RwSignal::new(PhotoUploadState::new(seed.photo_url));
    let name_input = NodeRef::<Input>::new();

    let start_edit = move || {
        if editor.try_update(ProfileEditor::begin_edit).unwrap_or(false) {
            tracing::debug!("Editing profile");
            // Give the inputs a tick to become enabled before focusing.
            browser::set_timeout(Duration::ZERO, move || {
                if let Some(input) = name_input.get_untracked() {
                    let _ = input.focus();
                }
            });
        }
    };

    let cancel = move || match editor.try_update(ProfileEditor::request_cancel) {
        Some(CancelOutcome::NeedsConfirmation) => {
            if browser::confirm(DISCARD_PROMPT) {
                editor.update(ProfileEditor::confirm_cancel);
            }
        }
        Some(CancelOutcome::Reverted) => tracing::debug!("Edit cancelled, nothing changed"),
        Some(CancelOutcome::Ignored) | None => {}
    };

    let save = move || {
        let today = chrono::Local::now().date_naive();
        let ticket = match editor.try_update(|e| e.begin_save(today, min_age)) {
            Some(Ok(ticket)) => ticket,
            Some(Err(SaveError::Invalid(e))) => {
                notifier.error(e);
                return;
            }
            Some(Err(e)) => {
                tracing::debug!("Save ignored: {}", e);
                return;
            }
            None => return,
        };
        let config = config.get_value();
        spawn_local(async move {
            match api::update_profile(&config, &ticket.update).await {
                Ok(()) => {
                    if editor.try_update(|e| e.save_succeeded(ticket.request)).unwrap_or(false) {
                        notifier.success("Profile information updated successfully!");
                    }
                }
                Err(e) => {
                    tracing::error!("Profile update failed: {}", e);
                    if editor.try_update(|ed| ed.save_failed(ticket.request)).unwrap_or(false) {
                        notifier.error(e.user_message(Operation::SaveProfile));
                    }
                }
            }
        });
    };

    let on_photo_change = move |ev: leptos::ev::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Allow picking the same file again after a failure.
        input.set_value("");

        let max_bytes = config.with_value(|c| c.max_photo_bytes);
        if let Err(e) = check_file(&file.type_(), file.size() as u64, max_bytes) {
            notifier.error(e.to_string());
            return;
        }
        let Some(preview) = browser::object_url(&file) else {
            notifier.error(Operation::UploadPhoto.fallback_message());
            return;
        };
        let request = match photo.try_update(|p| p.begin_upload(preview.clone())) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                browser::revoke_object_url(&preview);
                notifier.error(e.to_string());
                return;
            }
            None => return,
        };

        let config = config.get_value();
        spawn_local(async move {
            match api::upload_profile_photo(&config, &file).await {
                Ok(()) => {
                    if let Some(replaced) = photo.try_update(|p| p.upload_succeeded(request)).flatten() {
                        if let Some(old) = replaced {
                            browser::revoke_object_url(&old);
                        }
                        notifier.success("Profile photo updated successfully!");
                    }
                }
                Err(e) => {
                    tracing::error!("Photo upload failed: {}", e);
                    if let Some(discarded) = photo.try_update(|p| p.upload_failed(request)).flatten() {
                        browser::revoke_object_url(&discarded);
                        notifier.error(e.user_message(Operation::UploadPhoto));
                    }
                }
            }
        });
    };

    browser::on_window_event("keydown", move |ev| {
        let escape = ev
            .dyn_ref::<web_sys::KeyboardEvent>()
            .is_some_and(|key| key.key() == "Escape");
        if escape && editor.try_with_untracked(ProfileEditor::is_editing).unwrap_or(false) {
            cancel();
        }
    });

    browser::on_window_event("beforeunload", move |ev| {
        let unsaved = editor
            .try_with_untracked(|e| e.is_editing() && e.is_dirty())
            .unwrap_or(false);
        if unsaved {
            ev.prevent_default();
            if let Some(unload) = ev.dyn_ref::<web_sys::BeforeUnloadEvent>() {
                unload.set_return_value(DISCARD_PROMPT);
            }
        }
    });

    let editing = Memo::new(move |_| editor.with(ProfileEditor::is_editing));
    let fields_disabled = move || !editor.with(ProfileEditor::fields_enabled);
    let busy = Signal::derive(move || editor.with(ProfileEditor::is_saving) || photo.with(PhotoUploadState::is_uploading));

    let text_inputs = TEXT_FIELDS
        .iter()
        .map(|&(field, label, kind)| {
            let id = format!("profile-{:?}", field).to_lowercase();
            let label_for = id.clone();
            let node_ref = if field == ProfileField::FullName { name_input } else { NodeRef::new() };
            view! {
                <div class="form-group">
                    <label for=label_for>{label}</label>
                    <input
                        id=id
                        type=kind
                        class="form-control"
                        node_ref=node_ref
                        prop:value=move || editor.with(|e| e.current().get(field).to_string())
                        disabled=fields_disabled
                        on:input=move |ev| editor.update(|e| e.set_field(field, event_target_value(&ev)))
                    />
                </div>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="page profile-page">
            <NotificationBanner notifier=notifier />
            <LoadingSpinner visible=busy />

            <div class="profile-header">
                <label class="profile-avatar" class:has-photo=move || photo.with(PhotoUploadState::has_photo)>
                    {move || match photo.with(|p| p.displayed().map(str::to_string)) {
                        Some(src) => view! { <img src=src alt="Profile photo" /> }.into_any(),
                        None => view! {
                            <span class="avatar-initials">
                                {move || editor.with(|e| initials(&e.original().full_name))}
                            </span>
                        }
                            .into_any(),
                    }}
                    <input
                        type="file"
                        accept="image/*"
                        class="photo-input"
                        hidden=true
                        disabled=move || photo.with(PhotoUploadState::is_uploading)
                        on:change=on_photo_change
                    />
                </label>
                <div class="profile-title">
                    <h2>{move || editor.with(|e| e.original().full_name.clone())}</h2>
                    <p class="profile-email">{move || editor.with(|e| e.original().email.clone())}</p>
                </div>
            </div>

            <CollapsibleCard title="Personal Information">
                <form
                    class="profile-form"
                    class:editing=move || editing.get()
                    on:submit=move |ev| {
                        ev.prevent_default();
                        save();
                    }
                >
                    {text_inputs}
                    <div class="form-group">
                        <label for="profile-address">"Address"</label>
                        <textarea
                            id="profile-address"
                            class="form-control"
                            rows="3"
                            prop:value=move || editor.with(|e| e.current().address.clone())
                            disabled=fields_disabled
                            on:input=move |ev| editor.update(|e| e.set_field(ProfileField::Address, event_target_value(&ev)))
                        ></textarea>
                    </div>

                    <div class="form-actions">
                        <Show
                            when=move || editing.get() || editor.with(ProfileEditor::is_saving)
                            fallback=move || view! {
                                <button type="button" class="btn btn-primary" on:click=move |_| start_edit()>
                                    "Edit Profile"
                                </button>
                            }
                        >
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || !editor.with(ProfileEditor::can_save)
                            >
                                {move || if editor.with(ProfileEditor::is_saving) { "Saving..." } else { "Save Changes" }}
                            </button>
                            <button
                                type="button"
                                class="btn btn-secondary"
                                disabled=move || !editing.get()
                                on:click=move |_| cancel()
                            >
                                "Cancel"
                            </button>
                        </Show>
                    </div>
                </form>
            </CollapsibleCard>

            <CollapsibleCard title="Security" initially_open=false>
                <p class="card-text">"Keep your account safe with a strong password."</p>
                <button
                    type="button"
                    class="btn btn-outline"
                    on:click=move |_| notifier.success("Password change feature coming soon!")
                >
                    "Change Password"
                </button>
            </CollapsibleCard>
        </div>
    }
}
