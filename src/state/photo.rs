use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoError {
    #[error("Please select a valid image file.")]
    NotAnImage,

    #[error("Image size must be less than {}MB.", .max_bytes / (1024 * 1024))]
    TooLarge { size: u64, max_bytes: u64 },

    #[error("A photo upload is already in progress.")]
    UploadInProgress,
}

/// Reject anything that is not an image or is larger than `max_bytes`
/// before it reaches the network.
pub fn check_file(mime_type: &str, size: u64, max_bytes: u64) -> Result<(), PhotoError> {
    if !mime_type.starts_with("image/") {
        return Err(PhotoError::NotAnImage);
    }
    if size > max_bytes {
        return Err(PhotoError::TooLarge { size, max_bytes });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingUpload {
    request: u64,
    preview: String,
}

/// Avatar photo with at most one optimistic upload on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoUploadState {
    confirmed: Option<String>,
    pending: Option<PendingUpload>,
    last_request: u64,
}

impl PhotoUploadState {
    pub fn new(confirmed: Option<String>) -> Self {
        Self {
            confirmed: confirmed.filter(|src| !src.is_empty()),
            pending: None,
            last_request: 0,
        }
    }

    /// Image the avatar should currently show: the preview while uploading,
    /// otherwise the confirmed photo.
    pub fn displayed(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(|p| p.preview.as_str())
            .or(self.confirmed.as_deref())
    }

    pub fn has_photo(&self) -> bool {
        self.displayed().is_some()
    }

    pub fn had_confirmed_photo(&self) -> bool {
        self.confirmed.is_some()
    }

    pub fn is_uploading(&self) -> bool {
        self.pending.is_some()
    }

    /// Show `preview` right away and hand back the request number to tag the
    /// upload with.
    pub fn begin_upload(&mut self, preview: String) -> Result<u64, PhotoError> {
        if self.pending.is_some() {
            return Err(PhotoError::UploadInProgress);
        }
        self.last_request += 1;
        self.pending = Some(PendingUpload {
            request: self.last_request,
            preview,
        });
        Ok(self.last_request)
    }

    /// Promote the preview to the confirmed photo. Returns the photo it
    /// replaced, if any, so the caller can release it; `None` for a stale
    /// response.
    pub fn upload_succeeded(&mut self, request: u64) -> Option<Option<String>> {
        let pending = self.take_pending(request)?;
        Some(self.confirmed.replace(pending.preview))
    }

    /// Drop the preview and fall back to whatever was confirmed before the
    /// attempt. Returns the discarded preview, or `None` for a stale response.
    pub fn upload_failed(&mut self, request: u64) -> Option<String> {
        self.take_pending(request).map(|p| p.preview)
    }

    fn take_pending(&mut self, request: u64) -> Option<PendingUpload> {
        match &self.pending {
            Some(p) if p.request == request => self.pending.take(),
            _ => None,
        }
    }
}
