//! Upload acceptance rules and on-disk naming.
//!
//! Three intakes share the same rules with different limits: general
//! display assets (images and PDFs), the singleton logo, and widget images.

use crate::error::CoreError;
use crate::file_record::FileKind;

/// MIME types accepted as images.
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// MIME type accepted as a PDF.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Size limit for display assets (50 MiB).
pub const MAX_ASSET_BYTES: u64 = 50 * 1024 * 1024;

/// Size limit for the logo and widget images (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Which intake an upload arrives through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProfile {
    /// Slideshow asset: image or PDF, multipart field `file`.
    Asset,
    /// Singleton logo: image, multipart field `logo`.
    Logo,
    /// Clock-screen widget image: image, multipart field `image`.
    WidgetImage,
}

impl UploadProfile {
    /// Multipart field carrying the file.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Asset => "file",
            Self::Logo => "logo",
            Self::WidgetImage => "image",
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            Self::Asset => MAX_ASSET_BYTES,
            Self::Logo | Self::WidgetImage => MAX_IMAGE_BYTES,
        }
    }

    fn rejection_message(self) -> &'static str {
        match self {
            Self::Asset => "Invalid file type. Allowed: images (JPG, PNG, GIF, WEBP) and PDFs.",
            Self::Logo | Self::WidgetImage => "Only images (JPG, PNG, GIF, WEBP) are allowed.",
        }
    }

    /// Check `mime` against this intake and return the resulting file kind.
    pub fn validate(self, mime: &str) -> Result<FileKind, CoreError> {
        match (self, classify(mime)) {
            (Self::Asset, Some(kind)) => Ok(kind),
            (_, Some(FileKind::Image)) => Ok(FileKind::Image),
            _ => Err(CoreError::Validation(self.rejection_message().into())),
        }
    }

    /// Error for a body that exceeded [`Self::max_bytes`].
    pub fn too_large(self) -> CoreError {
        CoreError::Validation(format!(
            "File too large. Maximum size is {} MB.",
            self.max_bytes() / (1024 * 1024)
        ))
    }
}

/// Map a MIME type (parameters ignored, case-insensitive) to a file kind.
pub fn classify(mime: &str) -> Option<FileKind> {
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    if essence == PDF_MIME_TYPE {
        Some(FileKind::Pdf)
    } else if IMAGE_MIME_TYPES.contains(&essence.as_str()) {
        Some(FileKind::Image)
    } else {
        None
    }
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_filename(original: &str) -> String {
    original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Split `name` into stem and extension (with its dot).
///
/// A leading dot does not start an extension and the extension needs at
/// least one character after the dot.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => name.split_at(pos),
        _ => (name, ""),
    }
}

/// On-disk name for an uploaded asset: `{stem}_{millis}{ext}` of the
/// sanitized original name.
pub fn stored_filename(original: &str, millis: i64) -> String {
    let sanitized = sanitize_filename(original);
    let (stem, ext) = split_extension(&sanitized);
    let stem = if stem.is_empty() { "file" } else { stem };
    format!("{stem}_{millis}{ext}")
}

/// Extension for a logo or widget image: the original's extension when it
/// is plain alphanumeric, otherwise one derived from the MIME type.
pub fn image_extension(original: &str, mime: &str) -> String {
    let (_, ext) = split_extension(original);
    let bare = ext.trim_start_matches('.');
    if !bare.is_empty() && bare.chars().all(|c| c.is_ascii_alphanumeric()) {
        return format!(".{}", bare.to_ascii_lowercase());
    }
    match mime.split(';').next().unwrap_or("").trim() {
        "image/png" => ".png".into(),
        "image/gif" => ".gif".into(),
        "image/webp" => ".webp".into(),
        _ => ".jpg".into(),
    }
}

/// Whether `name` is safe to join onto an asset directory.
pub fn is_safe_asset_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Content type for serving a stored file, by extension.
pub fn content_type_for_extension(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn classify_known_types() {
        assert_eq!(classify("image/png"), Some(FileKind::Image));
        assert_eq!(classify("IMAGE/JPEG"), Some(FileKind::Image));
        assert_eq!(classify("application/pdf"), Some(FileKind::Pdf));
        assert_eq!(classify("image/webp; q=1"), Some(FileKind::Image));
        assert_eq!(classify("text/plain"), None);
        assert_eq!(classify("image/svg+xml"), None);
    }

    #[test]
    fn asset_profile_accepts_pdf() {
        assert_eq!(UploadProfile::Asset.validate("application/pdf").unwrap(), FileKind::Pdf);
        assert_eq!(UploadProfile::Asset.validate("image/gif").unwrap(), FileKind::Image);
    }

    #[test]
    fn image_profiles_reject_pdf() {
        assert_matches!(
            UploadProfile::Logo.validate("application/pdf"),
            Err(CoreError::Validation(msg)) if msg.contains("Only images")
        );
        assert_matches!(
            UploadProfile::WidgetImage.validate("application/pdf"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn asset_profile_rejects_other_types() {
        assert_matches!(
            UploadProfile::Asset.validate("application/zip"),
            Err(CoreError::Validation(msg)) if msg.contains("PDF")
        );
    }

    #[test]
    fn limits_and_fields() {
        assert_eq!(UploadProfile::Asset.max_bytes(), 50 * 1024 * 1024);
        assert_eq!(UploadProfile::Logo.max_bytes(), 5 * 1024 * 1024);
        assert_eq!(UploadProfile::Asset.field_name(), "file");
        assert_eq!(UploadProfile::Logo.field_name(), "logo");
        assert_eq!(UploadProfile::WidgetImage.field_name(), "image");
        assert_matches!(UploadProfile::Logo.too_large(), CoreError::Validation(msg) if msg.contains("5 MB"));
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("Menü Woche 1.pdf"), "Men__Woche_1.pdf");
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_filename("ok-name.png"), "ok-name.png");
    }

    #[test]
    fn stored_filename_inserts_timestamp_before_extension() {
        assert_eq!(stored_filename("photo.jpg", 1700), "photo_1700.jpg");
        assert_eq!(stored_filename("my photo.final.png", 5), "my_photo.final_5.png");
        assert_eq!(stored_filename(".hidden", 9), ".hidden_9");
        assert_eq!(stored_filename("", 9), "file_9");
        assert_eq!(stored_filename("noext", 3), "noext_3");
    }

    #[test]
    fn image_extension_falls_back_to_mime() {
        assert_eq!(image_extension("Logo.PNG", "image/png"), ".png");
        assert_eq!(image_extension("logo", "image/png"), ".png");
        assert_eq!(image_extension("logo", "image/jpeg"), ".jpg");
        assert_eq!(image_extension("logo.p g", "image/webp"), ".webp");
        assert_eq!(image_extension("logo", "image/gif"), ".gif");
    }

    #[test]
    fn safe_asset_names() {
        assert!(is_safe_asset_name("widget-0190a1b2.png"));
        assert!(!is_safe_asset_name("../config.json"));
        assert!(!is_safe_asset_name("a/b.png"));
        assert!(!is_safe_asset_name(".env"));
        assert!(!is_safe_asset_name(""));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for_extension("/x/a.JPG"), "image/jpeg");
        assert_eq!(content_type_for_extension("a_page1.png"), "image/png");
        assert_eq!(content_type_for_extension("a.bin"), "application/octet-stream");
    }
}
