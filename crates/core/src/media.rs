//! Storage for uploaded identity images, supporting documents and drawn
//! signatures. Anything that fails here is an `ExternalService` error and
//! aborts the mutation that asked for it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use eyre::WrapErr;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::app_state::MediaInfo;
use loanline_primitives::models::dtos::loan_dto::SIGNATURE_PREFIX;
use loanline_primitives::models::dtos::upload_dto::Upload;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
    Heic,
}

impl ImageFormat {
    /// Recognizes the container from its leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c' | b'f' | b'x', ..] => {
                Some(Self::Heic)
            }
            [_, _, _, _, b'f', b't', b'y', b'p', b'm', b'i', b'f', b'1', ..] => Some(Self::Heic),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Heic => "heic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

pub trait ImageNormalizer: Send + Sync {
    /// Checks and re-encodes an uploaded image. Nothing is written yet.
    fn normalize(&self, upload: &Upload) -> Result<NormalizedImage, ApiError>;

    /// Writes bytes under `category` and returns the stored relative path.
    fn persist(&self, category: &str, file_name: &str, bytes: &[u8]) -> Result<String, ApiError>;

    fn max_upload_bytes(&self) -> usize;
}

/// Keeps files on the local disk under the configured upload directory.
pub struct LocalImageStore {
    root: PathBuf,
    max_upload_bytes: usize,
}

impl LocalImageStore {
    pub fn new(info: &MediaInfo) -> eyre::Result<Self> {
        fs::create_dir_all(&info.upload_dir).wrap_err_with(|| {
            format!("cannot create upload dir {}", info.upload_dir.display())
        })?;

        Ok(Self {
            root: info.upload_dir.clone(),
            max_upload_bytes: info.max_upload_bytes,
        })
    }
}

impl ImageNormalizer for LocalImageStore {
    fn normalize(&self, upload: &Upload) -> Result<NormalizedImage, ApiError> {
        check_size(upload, self.max_upload_bytes)?;

        let format = ImageFormat::sniff(&upload.bytes).ok_or_else(|| {
            ApiError::ExternalService(format!("{} is not a supported image", upload.file_name))
        })?;

        Ok(NormalizedImage {
            file_name: format!("{}.{}", Uuid::new_v4(), format.extension()),
            format,
            bytes: upload.bytes.clone(),
        })
    }

    fn persist(&self, category: &str, file_name: &str, bytes: &[u8]) -> Result<String, ApiError> {
        let dir = self.root.join(category);
        let path = dir.join(file_name);

        fs::create_dir_all(&dir)
            .and_then(|_| fs::write(&path, bytes))
            .map_err(|e| {
                error!(path = %path.display(), "media.persist: write failed: {}", e);
                ApiError::ExternalService("Could not store uploaded file".into())
            })?;

        info!(path = %path.display(), size = bytes.len(), "media.persist: stored");
        Ok(format!("{}/{}", category, file_name))
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

fn check_size(upload: &Upload, max: usize) -> Result<(), ApiError> {
    if upload.is_empty() {
        return Err(ApiError::ExternalService(format!(
            "{} is empty",
            upload.file_name
        )));
    }
    if upload.bytes.len() > max {
        return Err(ApiError::ExternalService(format!(
            "{} exceeds the {} byte upload limit",
            upload.file_name, max
        )));
    }
    Ok(())
}

/// Normalizes and stores an identity image.
pub fn store_image(
    media: &dyn ImageNormalizer,
    category: &str,
    upload: &Upload,
) -> Result<String, ApiError> {
    let image = media.normalize(upload)?;
    media.persist(category, &image.file_name, &image.bytes)
}

/// Stores a supporting document as uploaded, subject only to the size limit.
pub fn store_document(
    media: &dyn ImageNormalizer,
    category: &str,
    upload: &Upload,
) -> Result<String, ApiError> {
    check_size(upload, media.max_upload_bytes())?;

    let extension = upload
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".into());

    media.persist(
        category,
        &format!("{}.{}", Uuid::new_v4(), extension),
        &upload.bytes,
    )
}

/// Decodes a `data:image/...;base64,...` payload drawn on the signature pad.
pub fn decode_signature(payload: &str) -> Result<Vec<u8>, ApiError> {
    let payload = payload.trim();
    if !payload.starts_with(SIGNATURE_PREFIX) {
        return Err(ApiError::Invalid("Invalid signature data".into()));
    }

    let (_, encoded) = payload
        .split_once(";base64,")
        .ok_or_else(|| ApiError::Invalid("Invalid signature data".into()))?;

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| ApiError::Invalid("Invalid signature data".into()))?;

    if bytes.is_empty() {
        return Err(ApiError::Invalid("Invalid signature data".into()));
    }
    Ok(bytes)
}

/// Stores decoded signature bytes as `<stem>.png`.
pub fn store_signature(
    media: &dyn ImageNormalizer,
    stem: &str,
    bytes: &[u8],
) -> Result<String, ApiError> {
    media.persist("signatures", &format!("{}.png", stem), bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max: usize) -> (LocalImageStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("loanline-media-{}", Uuid::new_v4()));
        let info = MediaInfo {
            upload_dir: dir.clone(),
            max_upload_bytes: max,
        };
        (LocalImageStore::new(&info).unwrap(), dir)
    }

    fn upload(name: &str, bytes: &[u8]) -> Upload {
        Upload {
            file_name: name.into(),
            content_type: None,
            bytes: bytes.to_vec(),
        }
    }

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[test]
    fn sniffs_common_containers() {
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE1]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(PNG), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::sniff(b"\0\0\0\x18ftypheic"), Some(ImageFormat::Heic));
        assert_eq!(ImageFormat::sniff(b"%PDF-1.7"), None);
    }

    #[test]
    fn stores_valid_image_under_category() {
        let (media, root) = store(1024);
        let path = store_image(&media, "id_cards", &upload("front.png", PNG)).unwrap();

        assert!(path.starts_with("id_cards/"));
        assert!(path.ends_with(".png"));
        assert_eq!(fs::read(root.join(&path)).unwrap(), PNG);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn oversize_and_unknown_uploads_fail() {
        let (media, root) = store(4);
        assert!(matches!(
            store_image(&media, "id_cards", &upload("big.png", PNG)),
            Err(ApiError::ExternalService(_))
        ));

        let (media, root2) = store(1024);
        assert!(matches!(
            store_image(&media, "id_cards", &upload("doc.pdf", b"%PDF-1.7")),
            Err(ApiError::ExternalService(_))
        ));
        let _ = fs::remove_dir_all(root);
        let _ = fs::remove_dir_all(root2);
    }

    #[test]
    fn signature_is_decoded_from_data_url() {
        let bytes = decode_signature("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");

        assert!(matches!(
            decode_signature("data:image/png;base64,***"),
            Err(ApiError::Invalid(_))
        ));
        assert!(matches!(
            decode_signature("data:image/png,plain"),
            Err(ApiError::Invalid(_))
        ));
    }

    #[test]
    fn documents_keep_their_extension() {
        let (media, root) = store(1024);
        let path = store_document(&media, "income_proofs", &upload("payslip.PDF", b"%PDF-1.7")).unwrap();
        assert!(path.ends_with(".pdf"));
        let _ = fs::remove_dir_all(root);
    }
}
