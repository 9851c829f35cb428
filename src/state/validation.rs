use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use thiserror::Error;

use super::profile::ProfileDraft;

const MIN_NAME_CHARS: usize = 3;
const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

/// Date format produced by `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// First rule a profile draft breaks. The display text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Full name is required.")]
    NameRequired,

    #[error("Full name must be at least 3 characters long.")]
    NameTooShort,

    #[error("Email address is required.")]
    EmailRequired,

    #[error("Please enter a valid email address.")]
    EmailInvalid,

    #[error("Please enter a valid phone number (10-15 digits).")]
    PhoneInvalid,

    #[error("Invalid date of birth.")]
    DateOfBirthInvalid,

    #[error("Date of birth cannot be in the future.")]
    DateOfBirthInFuture,

    #[error("You must be at least {0} years old.")]
    TooYoung(u32),
}

impl From<ValidationError> for String {
    fn from(err: ValidationError) -> Self {
        err.to_string()
    }
}

/// Check a draft against the profile rules in order and stop at the first
/// failure. `today` is passed in so callers control the clock.
pub fn validate(draft: &ProfileDraft, today: NaiveDate, min_age: u32) -> Result<(), ValidationError> {
    let name = draft.full_name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }

    let email = draft.email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::EmailInvalid);
    }

    let phone = draft.phone.trim();
    if !phone.is_empty() && !is_valid_phone(phone) {
        return Err(ValidationError::PhoneInvalid);
    }

    let dob = draft.date_of_birth.trim();
    if !dob.is_empty() {
        let born = NaiveDate::parse_from_str(dob, DATE_FORMAT)
            .map_err(|_| ValidationError::DateOfBirthInvalid)?;
        if born > today {
            return Err(ValidationError::DateOfBirthInFuture);
        }
        if age_on(born, today) < min_age {
            return Err(ValidationError::TooYoung(min_age));
        }
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Phone numbers may contain any punctuation; only the digit count matters.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// Completed years between `born` and `today`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    years.max(0) as u32
}
