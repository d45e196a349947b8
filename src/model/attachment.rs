/// Backend-assigned identifier of a stored document.
pub type AttachmentId = u64;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// A document stored by the backend and attached to a node or submenu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    pub mime_type: Option<String>,
    /// Raw storage path. Kept even when a signed URL exists, as a display-only fallback.
    pub storage_path: String,
    pub signed_url: Option<String>,
}

/// How the viewer should present an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Image,
    Pdf,
    Other,
}

impl Attachment {
    /// The URL to fetch: the signed URL when present, the storage path otherwise.
    pub fn display_url(&self) -> &str {
        self.signed_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.storage_path)
    }

    pub fn kind(&self) -> AttachmentKind {
        let mime = self.mime_type.as_deref().unwrap_or_default();
        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if mime.starts_with("image/") || IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            AttachmentKind::Image
        } else if mime == "application/pdf" || extension == "pdf" {
            AttachmentKind::Pdf
        } else {
            AttachmentKind::Other
        }
    }

    /// Images and PDFs can be shown inline; everything else is download-only.
    pub fn is_viewable(&self) -> bool {
        !matches!(self.kind(), AttachmentKind::Other)
    }
}
