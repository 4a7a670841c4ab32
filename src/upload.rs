use std::sync::Arc;
use image::RgbaImage;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("'{name}' is not an image ({mime})")]
    InvalidFileType { name: String, mime: String },
}

/// Longest preview edge. WebGL2 only guarantees 2048 px textures.
pub const PREVIEW_MAX_SIDE: u32 = 2048;

#[derive(Clone)]
pub struct UploadedImage {
    pub bytes: Arc<[u8]>,
    pub name: String,
    pub mime: String,
    pub size: Option<(u32, u32)>, // Decoded size of the original
    pub preview: Option<Arc<RgbaImage>>, // None when the bytes could not be decoded
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .field("size", &self.size)
            .finish()
    }
}

impl UploadedImage {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.size
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Media type for a file the platform did not label: the extension first,
/// then the magic bytes.
pub fn guess_mime(name: &str, bytes: &[u8]) -> &'static str {
    image::ImageFormat::from_path(name)
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

pub fn check_mime(mime: &str, name: &str) -> Result<(), UploadError> {
    if is_image_mime(mime) {
        Ok(())
    } else {
        Err(UploadError::InvalidFileType {
            name: name.to_string(),
            mime: mime.to_string(),
        })
    }
}

fn decode_preview(bytes: &[u8], name: &str) -> Option<(u32, u32, RgbaImage)> {
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("No preview for {}: {}", name, e);
            return None;
        }
    };
    let (w, h) = (img.width(), img.height());
    let img = if w > PREVIEW_MAX_SIDE || h > PREVIEW_MAX_SIDE {
        log::debug!("Scaling preview of {} down from {}x{}", name, w, h);
        img.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE)
    } else {
        img
    };
    Some((w, h, img.to_rgba8()))
}

/// Gates on the media type, then decodes a size-capped preview. Decoding is
/// the slow part, so the app runs this on its loader, not in the frame.
pub fn load_image_from_bytes(
    bytes: impl Into<Arc<[u8]>>,
    mime: &str,
    name: &str,
) -> Result<UploadedImage, UploadError> {
    check_mime(mime, name)?;

    let bytes: Arc<[u8]> = bytes.into();
    let decoded = decode_preview(&bytes, name);

    Ok(UploadedImage {
        name: name.to_string(),
        mime: mime.to_string(),
        size: decoded.as_ref().map(|(w, h, _)| (*w, *h)),
        preview: decoded.map(|(_, _, rgba)| Arc::new(rgba)),
        bytes,
    })
}

/// Raw file contents plus the metadata needed for submission.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Prefers the platform-reported type, falls back to guessing.
    pub fn new(name: String, reported_mime: Option<&str>, bytes: Vec<u8>) -> Self {
        let mime = match reported_mime {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => guess_mime(&name, &bytes).to_string(),
        };
        Self { name, mime, bytes }
    }

    pub fn decode(self) -> Result<UploadedImage, UploadError> {
        load_image_from_bytes(self.bytes, &self.mime, &self.name)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read_picked_file(path: &Path) -> anyhow::Result<PickedFile> {
    let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(PickedFile::new(name, None, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 200, 200, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn rejects_non_image_types() {
        let err = load_image_from_bytes(vec![1u8, 2, 3], "application/pdf", "report.pdf").unwrap_err();
        assert_eq!(
            err,
            UploadError::InvalidFileType { name: "report.pdf".into(), mime: "application/pdf".into() }
        );
    }

    #[test]
    fn decodes_preview_for_real_png() {
        let img = load_image_from_bytes(png(3, 2), "image/png", "xray.png").unwrap();
        assert_eq!(img.dimensions(), Some((3, 2)));
        assert_eq!(img.name, "xray.png");
    }

    #[test]
    fn undecodable_image_is_still_accepted() {
        let img = load_image_from_bytes(vec![0u8; 16], "image/png", "broken.png").unwrap();
        assert!(img.preview.is_none());
        assert_eq!(img.bytes.len(), 16);
    }

    #[test]
    fn wide_scan_preview_is_capped() {
        let img = load_image_from_bytes(png(5000, 100), "image/png", "wide.png").unwrap();
        assert_eq!(img.dimensions(), Some((5000, 100)));
        let preview = img.preview.as_ref().unwrap();
        assert!(preview.width() <= PREVIEW_MAX_SIDE, "preview width {}", preview.width());
        assert!(preview.height() <= PREVIEW_MAX_SIDE);
        assert!(preview.width() > preview.height());
    }

    #[test]
    fn small_images_keep_full_resolution() {
        let img = load_image_from_bytes(png(640, 480), "image/png", "small.png").unwrap();
        assert_eq!(img.preview.as_ref().unwrap().dimensions(), (640, 480));
    }

    #[test]
    fn guesses_types_from_extension() {
        assert_eq!(guess_mime("Chest.PNG", &[]), "image/png");
        assert_eq!(guess_mime("scan.jpeg", &[]), "image/jpeg");
        assert_eq!(guess_mime("report.pdf", b"%PDF-1.7"), "application/octet-stream");
        assert_eq!(guess_mime("noext", &[]), "application/octet-stream");
    }

    #[test]
    fn extensionless_png_is_sniffed() {
        assert_eq!(guess_mime("scan", &png(2, 2)), "image/png");
        let f = PickedFile::new("scan".into(), None, png(2, 2));
        assert!(f.decode().is_ok());
    }

    #[test]
    fn picked_file_prefers_reported_mime() {
        let f = PickedFile::new("a.bin".into(), Some("image/png"), vec![]);
        assert_eq!(f.mime, "image/png");
        let f = PickedFile::new("a.png".into(), Some(""), vec![]);
        assert_eq!(f.mime, "image/png");
    }
}
