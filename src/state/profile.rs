use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::{self, ValidationError};

/// Editable profile fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FullName,
    Email,
    Phone,
    DateOfBirth,
    Address,
}

/// Values of the personal-information form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub address: String,
}

impl ProfileDraft {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.full_name,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
            ProfileField::DateOfBirth => &self.date_of_birth,
            ProfileField::Address => &self.address,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::FullName => self.full_name = value,
            ProfileField::Email => self.email = value,
            ProfileField::Phone => self.phone = value,
            ProfileField::DateOfBirth => self.date_of_birth = value,
            ProfileField::Address => self.address = value,
        }
    }

    /// Copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date_of_birth: self.date_of_birth.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }

    /// Form-encoded body for the profile update endpoint.
    pub fn to_update(&self) -> ProfileUpdate {
        let clean = self.trimmed();
        let (first_name, last_name) = split_full_name(&clean.full_name);
        ProfileUpdate {
            first_name,
            last_name,
            email: clean.email,
            phone: clean.phone,
            date_of_birth: clean.date_of_birth,
            address: clean.address,
        }
    }
}

/// Fields sent to `/update-profile/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
}

/// First whitespace-separated token is the first name, the rest is the last name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// Avatar initials: first letters of the first and last name, or "U" when
/// there is no name at all.
pub fn initials(full_name: &str) -> String {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    let first_char = |s: &str| s.chars().next().map(|c| c.to_uppercase().collect::<String>());
    match parts.as_slice() {
        [] => "U".to_string(),
        [only] => first_char(only).unwrap_or_else(|| "U".to_string()),
        [first, .., last] => {
            let mut out = first_char(first).unwrap_or_default();
            out.push_str(&first_char(last).unwrap_or_default());
            out
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    ReadOnly,
    Editing,
    /// A save request is in flight.
    Saving { request: u64 },
}

/// What a cancel request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Nothing to discard; the form went back to read-only.
    Reverted,
    /// Unsaved edits exist; call [`ProfileEditor::confirm_cancel`] once the
    /// user agrees to lose them.
    NeedsConfirmation,
    /// Not editing, nothing happened.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("The profile is not being edited.")]
    NotEditing,

    #[error("A save is already in progress.")]
    AlreadySaving,
}

/// A save the caller should now send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub request: u64,
    pub update: ProfileUpdate,
}

/// Personal-information form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEditor {
    mode: EditMode,
    original: ProfileDraft,
    current: ProfileDraft,
    submitted: Option<ProfileDraft>,
    last_request: u64,
}

impl ProfileEditor {
    pub fn new(initial: ProfileDraft) -> Self {
        let original = initial.trimmed();
        Self {
            mode: EditMode::ReadOnly,
            current: original.clone(),
            original,
            submitted: None,
            last_request: 0,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn current(&self) -> &ProfileDraft {
        &self.current
    }

    pub fn original(&self) -> &ProfileDraft {
        &self.original
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.mode, EditMode::Saving { .. })
    }

    /// Inputs accept typing only while editing.
    pub fn fields_enabled(&self) -> bool {
        self.is_editing()
    }

    pub fn is_dirty(&self) -> bool {
        self.current.trimmed() != self.original
    }

    pub fn can_save(&self) -> bool {
        self.is_editing() && self.is_dirty()
    }

    pub fn begin_edit(&mut self) -> bool {
        if self.mode != EditMode::ReadOnly {
            return false;
        }
        self.mode = EditMode::Editing;
        true
    }

    pub fn set_field(&mut self, field: ProfileField, value: String) {
        if self.is_editing() {
            self.current.set(field, value);
        }
    }

    pub fn request_cancel(&mut self) -> CancelOutcome {
        if !self.is_editing() {
            return CancelOutcome::Ignored;
        }
        if self.is_dirty() {
            return CancelOutcome::NeedsConfirmation;
        }
        self.revert();
        CancelOutcome::Reverted
    }

    /// Discard unsaved edits after the user confirmed.
    pub fn confirm_cancel(&mut self) {
        if self.is_editing() {
            self.revert();
        }
    }

    fn revert(&mut self) {
        self.current = self.original.clone();
        self.mode = EditMode::ReadOnly;
    }

    /// Validate and move to `Saving`. Validation failures leave the form in
    /// `Editing` untouched.
    pub fn begin_save(&mut self, today: NaiveDate, min_age: u32) -> Result<SaveTicket, SaveError> {
        match self.mode {
            EditMode::ReadOnly => return Err(SaveError::NotEditing),
            EditMode::Saving { .. } => return Err(SaveError::AlreadySaving),
            EditMode::Editing => {}
        }
        validation::validate(&self.current, today, min_age)?;

        self.last_request += 1;
        let request = self.last_request;
        let snapshot = self.current.trimmed();
        let update = snapshot.to_update();
        self.submitted = Some(snapshot);
        self.mode = EditMode::Saving { request };
        Ok(SaveTicket { request, update })
    }

    fn is_in_flight(&self, request: u64) -> bool {
        self.mode == EditMode::Saving { request }
    }

    /// Apply a successful save. Returns `false` for a stale response, which
    /// is ignored.
    pub fn save_succeeded(&mut self, request: u64) -> bool {
        if !self.is_in_flight(request) {
            return false;
        }
        if let Some(saved) = self.submitted.take() {
            self.original = saved;
        }
        self.current = self.original.clone();
        self.mode = EditMode::ReadOnly;
        true
    }

    /// Apply a failed save: back to editing with input intact. Returns
    /// `false` for a stale response.
    pub fn save_failed(&mut self, request: u64) -> bool {
        if !self.is_in_flight(request) {
            return false;
        }
        self.submitted = None;
        self.mode = EditMode::Editing;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn make_editor() -> ProfileEditor {
        ProfileEditor::new(ProfileDraft {
            full_name: "Grace Brewster Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: "5550102030".to_string(),
            date_of_birth: "1986-12-09".to_string(),
            address: "Arlington".to_string(),
        })
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Grace Brewster Hopper"),
            ("Grace".to_string(), "Brewster Hopper".to_string())
        );
        assert_eq!(split_full_name("Plato"), ("Plato".to_string(), String::new()));
        assert_eq!(split_full_name("  Ada   Lovelace "), ("Ada".to_string(), "Lovelace".to_string()));
        assert_eq!(split_full_name(""), (String::new(), String::new()));
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials(""), "U");
        assert_eq!(initials("   "), "U");
        assert_eq!(initials("plato"), "P");
        assert_eq!(initials("grace brewster hopper"), "GH");
    }

    #[test]
    fn test_dirty_round_trip() {
        let mut editor = make_editor();
        assert!(editor.begin_edit());
        assert!(!editor.is_dirty());
        assert!(!editor.can_save());

        editor.set_field(ProfileField::Phone, "5550109999".to_string());
        assert!(editor.is_dirty());
        assert!(editor.can_save());

        editor.set_field(ProfileField::Phone, "5550102030".to_string());
        assert!(!editor.is_dirty(), "reverting the only change should clear dirty");
    }

    #[test]
    fn test_whitespace_only_change_is_not_dirty() {
        let mut editor = make_editor();
        editor.begin_edit();
        editor.set_field(ProfileField::Address, "Arlington  ".to_string());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_typing_ignored_when_read_only() {
        let mut editor = make_editor();
        editor.set_field(ProfileField::Email, "x@y.zz".to_string());
        assert_eq!(editor.current().email, "grace@example.com");
    }

    #[test]
    fn test_cancel_clean_reverts_without_confirmation() {
        let mut editor = make_editor();
        editor.begin_edit();
        assert_eq!(editor.request_cancel(), CancelOutcome::Reverted);
        assert_eq!(editor.mode(), EditMode::ReadOnly);
    }

    #[test]
    fn test_cancel_dirty_needs_confirmation() {
        let mut editor = make_editor();
        editor.begin_edit();
        editor.set_field(ProfileField::FullName, "Amazing Grace".to_string());
        assert_eq!(editor.request_cancel(), CancelOutcome::NeedsConfirmation);
        assert!(editor.is_editing(), "must stay editing until confirmed");

        editor.confirm_cancel();
        assert_eq!(editor.mode(), EditMode::ReadOnly);
        assert_eq!(editor.current(), editor.original());
        assert_eq!(editor.current().full_name, "Grace Brewster Hopper");
    }

    #[test]
    fn test_save_success_replaces_snapshot() {
        let mut editor = make_editor();
        editor.begin_edit();
        editor.set_field(ProfileField::FullName, " Grace Hopper ".to_string());
        let ticket = editor.begin_save(today(), 13).unwrap();
        assert_eq!(ticket.update.first_name, "Grace");
        assert_eq!(ticket.update.last_name, "Hopper");
        assert!(editor.is_saving());

        assert!(editor.save_succeeded(ticket.request));
        assert_eq!(editor.mode(), EditMode::ReadOnly);
        assert_eq!(editor.original().full_name, "Grace Hopper");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_save_failure_keeps_input() {
        let mut editor = make_editor();
        editor.begin_edit();
        editor.set_field(ProfileField::Address, "Yale".to_string());
        let ticket = editor.begin_save(today(), 13).unwrap();
        assert!(editor.save_failed(ticket.request));
        assert!(editor.is_editing());
        assert_eq!(editor.current().address, "Yale");
        assert_eq!(editor.original().address, "Arlington");
    }

    #[test]
    fn test_invalid_draft_never_leaves_editing() {
        let mut editor = make_editor();
        editor.begin_edit();
        editor.set_field(ProfileField::Email, "bad".to_string());
        let err = editor.begin_save(today(), 13).unwrap_err();
        assert_eq!(err, SaveError::Invalid(ValidationError::EmailInvalid));
        assert!(editor.is_editing());
    }

    #[test]
    fn test_second_save_rejected_while_in_flight() {
        let mut editor = make_editor();
        editor.begin_edit();
        editor.set_field(ProfileField::Address, "Yale".to_string());
        editor.begin_save(today(), 13).unwrap();
        assert_eq!(editor.begin_save(today(), 13), Err(SaveError::AlreadySaving));
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut editor = make_editor();
        editor.begin_edit();
        editor.set_field(ProfileField::Address, "Yale".to_string());
        let first = editor.begin_save(today(), 13).unwrap();
        assert!(editor.save_failed(first.request));

        editor.set_field(ProfileField::Address, "Vassar".to_string());
        let second = editor.begin_save(today(), 13).unwrap();

        // A late answer to the first request must not touch the second.
        assert!(!editor.save_succeeded(first.request));
        assert!(editor.is_saving());
        assert!(editor.save_succeeded(second.request));
        assert_eq!(editor.original().address, "Vassar");
    }
}
