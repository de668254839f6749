//! Outbound HTTP bridge to the automation webhooks.
//!
//! Two integrations share one client:
//!
//! - the booking webhook receives a full booking document whenever staff
//!   confirm a booking (fire-and-forget; callers spawn the push so a dead
//!   webhook can never fail the API request);
//! - the chat webhook answers customer chat messages, proxied through
//!   `/api/chat`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use motoshop_core::types::DbId;

/// HTTP request timeout for a single webhook call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    /// The webhook URL is not configured.
    #[error("automation webhook is not configured")]
    NotConfigured,

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// AutomationClient
// ---------------------------------------------------------------------------

/// HTTP client for the booking and chat automation webhooks.
pub struct AutomationClient {
    client: reqwest::Client,
    booking_webhook_url: Option<String>,
    chat_webhook_url: Option<String>,
    secret: Option<String>,
    uploads_dir: PathBuf,
}

impl AutomationClient {
    pub fn new(
        booking_webhook_url: Option<String>,
        chat_webhook_url: Option<String>,
        secret: Option<String>,
        uploads_dir: impl Into<PathBuf>,
    ) -> Result<Self, AutomationError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            booking_webhook_url: booking_webhook_url.filter(|u| !u.is_empty()),
            chat_webhook_url: chat_webhook_url.filter(|u| !u.is_empty()),
            secret: secret.filter(|s| !s.is_empty()),
            uploads_dir: uploads_dir.into(),
        })
    }

    /// Builds a client from `BOOKING_WEBHOOK_URL`, `CHAT_WEBHOOK_URL`, and
    /// `AUTOMATION_SECRET`. Missing variables leave the corresponding
    /// integration disabled.
    pub fn from_env(uploads_dir: impl Into<PathBuf>) -> Result<Self, AutomationError> {
        Self::new(
            std::env::var("BOOKING_WEBHOOK_URL").ok(),
            std::env::var("CHAT_WEBHOOK_URL").ok(),
            std::env::var("AUTOMATION_SECRET").ok(),
            uploads_dir,
        )
    }

    pub fn has_booking_webhook(&self) -> bool {
        self.booking_webhook_url.is_some()
    }

    pub fn has_chat_webhook(&self) -> bool {
        self.chat_webhook_url.is_some()
    }

    /// POST a confirmed-booking document to the booking webhook.
    ///
    /// The caller assembles the document; this adds the shared-secret
    /// header when configured. Failures are logged and returned, never
    /// panicked on.
    pub async fn push_booking(
        &self,
        document: &serde_json::Value,
    ) -> Result<(), AutomationError> {
        let url = self
            .booking_webhook_url
            .as_deref()
            .ok_or(AutomationError::NotConfigured)?;

        let mut request = self.client.post(url).json(document);
        if let Some(secret) = &self.secret {
            request = request.header("x-automation-secret", secret.as_str());
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(url, status, "booking webhook rejected the push");
            return Err(AutomationError::HttpStatus(status));
        }
        Ok(())
    }

    /// POST a chat message to the chat webhook and return the raw JSON reply.
    pub async fn send_chat(
        &self,
        message: &str,
        user_id: Option<DbId>,
        username: Option<&str>,
    ) -> Result<serde_json::Value, AutomationError> {
        let url = self
            .chat_webhook_url
            .as_deref()
            .ok_or(AutomationError::NotConfigured)?;

        let payload = serde_json::json!({
            "message": message,
            "userId": user_id,
            "username": username,
            "timestamp": Utc::now(),
        });

        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AutomationError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Base64-encodes the booking's slip image for the webhook document.
    ///
    /// The webhook contract always expects an attachment, so when there is
    /// no usable image a placeholder text body is sent instead:
    /// a stored path whose file is gone, an unreadable file, and the
    /// no-slip "Payment at Shop" case each get their own filename.
    pub fn slip_attachment(&self, slip_image: Option<&str>) -> (String, String) {
        match slip_image {
            Some(stored_path) => {
                // Stored as "uploads/slip-<uuid>.<ext>"; resolve the
                // basename against the configured uploads dir.
                let file_name = Path::new(stored_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                let Some(file_name) = file_name else {
                    return placeholder("Slip image file not found on server.", "error_slip_missing.txt");
                };
                let full_path = self.uploads_dir.join(&file_name);
                if !full_path.exists() {
                    return placeholder("Slip image file not found on server.", "error_slip_missing.txt");
                }
                match std::fs::read(&full_path) {
                    Ok(bytes) => (BASE64.encode(bytes), file_name),
                    Err(err) => {
                        tracing::error!(path = %full_path.display(), error = %err, "failed to read slip image");
                        placeholder("Error reading slip image.", "error_reading_slip.txt")
                    }
                }
            }
            None => placeholder(
                "No slip image provided (Payment at Shop)",
                "no_slip_shop_payment.txt",
            ),
        }
    }
}

fn placeholder(text: &str, filename: &str) -> (String, String) {
    (BASE64.encode(text.as_bytes()), filename.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
