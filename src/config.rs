//! Page bootstrap: the JSON document the server renders into every page.
//!
//! ```html
//! <script type="application/json" id="page-bootstrap">
//!   {"config": {"csrf_token": "..."}, "page": {"kind": "books", "rows": [...]}}
//! </script>
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::state::dashboard::DashboardSnapshot;
use crate::state::profile::ProfileDraft;
use crate::state::table::TableRow;

/// Id of the `<script type="application/json">` element holding the bootstrap.
pub const BOOTSTRAP_ELEMENT_ID: &str = "page-bootstrap";

/// Server routes the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub update_profile: String,
    pub upload_photo: String,
    pub delete_books: String,
    pub update_books: String,
    pub delete_students: String,
    pub update_students: String,
    pub update_issued_books: String,
    pub return_issued_book: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            update_profile: "/update-profile/".to_string(),
            upload_photo: "/upload-profile-photo/".to_string(),
            delete_books: "/deletebooks/".to_string(),
            update_books: "/updatebooks/".to_string(),
            delete_students: "/deletestudents/".to_string(),
            update_students: "/updatestudents/".to_string(),
            update_issued_books: "/update-issued-books/".to_string(),
            return_issued_book: "/return-issued-book/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoints: Endpoints,
    /// Token for the `X-CSRFToken` header and `csrfmiddlewaretoken` field.
    /// When absent the cookie or a rendered hidden input is used instead.
    pub csrf_token: Option<String>,
    pub request_timeout_secs: u64,
    pub max_photo_bytes: u64,
    pub notification_ms: u64,
    pub min_age_years: u32,
    /// `tracing` filter directive, e.g. `"info"` or `"librarian=debug"`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            csrf_token: None,
            request_timeout_secs: 30,
            max_photo_bytes: 5 * 1024 * 1024,
            notification_ms: 5000,
            min_age_years: 13,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

/// Initial values of the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileSeed {
    #[serde(flatten)]
    pub draft: ProfileDraft,
    /// URL of the current avatar photo, if the user has one.
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableSeed {
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageData {
    Dashboard(DashboardSnapshot),
    Profile(ProfileSeed),
    Books(TableSeed),
    Students(TableSeed),
    IssuedBooks(TableSeed),
}

impl PageData {
    pub fn kind(&self) -> &'static str {
        match self {
            PageData::Dashboard(_) => "dashboard",
            PageData::Profile(_) => "profile",
            PageData::Books(_) => "books",
            PageData::Students(_) => "students",
            PageData::IssuedBooks(_) => "issued_books",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub config: AppConfig,
    pub page: PageData,
}

impl Bootstrap {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse the bootstrap element from the current document.
    pub fn from_document() -> Result<Self, AppError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| AppError::Browser("no document".to_string()))?;
        let element = document
            .get_element_by_id(BOOTSTRAP_ELEMENT_ID)
            .ok_or_else(|| AppError::MissingBootstrap(BOOTSTRAP_ELEMENT_ID.to_string()))?;
        Self::from_json(&element.text_content().unwrap_or_default())
    }
}
