use crate::error::{Result, ServiceError};

pub const ALLOWED_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".bmp", ".webp"];

/// Checks the claimed upload filename. Advisory only: the bytes are not
/// inspected here.
pub fn validate_filename(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ServiceError::InvalidFormat(
            "Uploaded image must include a filename.".into(),
        ));
    }
    let lowered = name.to_lowercase();
    if !ALLOWED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
        return Err(ServiceError::InvalidFormat(format!(
            "Unsupported image format. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        for name in ["photo.png", "scan.JPG", "a.jpeg", "b.Bmp", "c.webp"] {
            assert!(validate_filename(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = validate_filename("photo.exe").unwrap_err();
        assert_eq!(err.code(), "INVALID_IMAGE_FORMAT");
        assert_eq!(
            err.message(),
            "Unsupported image format. Allowed: .jpg, .jpeg, .png, .bmp, .webp"
        );
    }

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(validate_filename(""), Err(ServiceError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_extension_without_dot() {
        assert!(validate_filename("png").is_err());
    }
}
