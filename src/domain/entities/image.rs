/// Encodings the media store accepts for project images.
pub const ALLOWED_IMAGE_FORMATS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// An image received with a project form, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: Option<String>, // client-declared, e.g. "image/png"
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(data: Vec<u8>, content_type: Option<String>, file_name: Option<String>) -> Self {
        ImageUpload { data, content_type, file_name }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Sniffs the real encoding from the payload's magic bytes; the declared
    /// content type is only a hint and is never trusted.
    pub fn detect_format(&self) -> Option<&'static str> {
        infer::get(&self.data).map(|kind| kind.extension())
    }

    /// MIME type matching the sniffed encoding.
    pub fn detect_mime(&self) -> Option<&'static str> {
        infer::get(&self.data).map(|kind| kind.mime_type())
    }

    pub fn is_allowed_format(&self) -> bool {
        self.detect_format()
            .is_some_and(|ext| ALLOWED_IMAGE_FORMATS.contains(&ext))
    }

    /// Name sent along with the upload, falling back to a generic one.
    pub fn upload_name(&self) -> String {
        match (&self.file_name, self.detect_format()) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(ext)) => format!("image.{}", ext),
            _ => "image".to_string(),
        }
    }
}
