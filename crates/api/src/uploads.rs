//! Payment-slip upload storage.
//!
//! Slip images arrive as a multipart field on `POST /api/bookings`. They are
//! written to the configured uploads directory as `slip-<uuid>.<ext>` and
//! served read-only at `/uploads/*`.

use std::path::Path;

use uuid::Uuid;

/// Maximum accepted slip size: 5 MiB.
pub const MAX_SLIP_BYTES: usize = 5 * 1024 * 1024;

/// File extensions accepted for slip uploads.
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "webp"];

/// Why a slip upload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SlipError {
    #[error("Only image files (jpeg, jpg, png, webp) are allowed")]
    UnsupportedType,
    #[error("Slip image must not exceed 5MB")]
    TooLarge,
    #[error("Failed to store slip image: {0}")]
    Io(#[from] std::io::Error),
}

/// Validates and stores an uploaded slip image.
///
/// Returns the path stored on the booking row (`uploads/slip-<uuid>.<ext>`),
/// which doubles as the URL path the frontend loads the image from.
pub async fn save_slip(
    uploads_dir: &Path,
    original_filename: Option<&str>,
    bytes: &[u8],
) -> Result<String, SlipError> {
    if bytes.len() > MAX_SLIP_BYTES {
        return Err(SlipError::TooLarge);
    }

    let ext = original_filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(SlipError::UnsupportedType)?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(SlipError::UnsupportedType);
    }

    tokio::fs::create_dir_all(uploads_dir).await?;

    let file_name = format!("slip-{}.{ext}", Uuid::new_v4());
    tokio::fs::write(uploads_dir.join(&file_name), bytes).await?;

    Ok(format!("uploads/{file_name}"))
}

/// Removes a stored slip, given the path recorded on the booking row.
///
/// Used when a booking is rejected after its slip was already written, so
/// the uploads directory does not accumulate orphans. A missing file is not
/// an error.
pub async fn remove_slip(uploads_dir: &Path, stored_path: &str) -> std::io::Result<()> {
    let file_name = stored_path.strip_prefix("uploads/").unwrap_or(stored_path);
    match tokio::fs::remove_file(uploads_dir.join(file_name)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
