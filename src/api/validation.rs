use std::path::Path;

use validator::Validate;

use crate::api::errors::ApiError;

pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::BadRequest(format!("Validation failed: {err}")))
}

pub(crate) fn validate_image_upload(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

fn mime_allowed_for_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "jpg" | "jpeg" => matches!(mime, "image/jpeg" | "image/jpg"),
        "png" => mime == "image/png",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
    }

    #[test]
    fn accepts_matching_extension_and_mime() {
        assert!(validate_image_upload("crash.jpg", "image/jpeg", &allowed()).is_ok());
        assert!(validate_image_upload("crash.PNG", "image/png", &allowed()).is_ok());
    }

    #[test]
    fn rejects_missing_extension() {
        let err = validate_image_upload("crash", "image/jpeg", &allowed()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn rejects_disallowed_extension() {
        let err = validate_image_upload("crash.gif", "image/gif", &allowed()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn rejects_mime_extension_mismatch() {
        let err = validate_image_upload("crash.png", "image/jpeg", &allowed()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
