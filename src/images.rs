use anyhow::{Context, Result};
use base64::engine::general_purpose;
use base64::Engine;
use std::path::{Path, PathBuf};

/// Largest number of files accepted in one selection
pub const MAX_IMAGES: usize = 5;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// One selected image file, read lazily when it is encoded
#[derive(Debug, Clone)]
pub struct ImageFile {
    name: String,
    mime: Option<String>,
    source: ImageSource,
}

impl ImageFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            mime: None,
            source: ImageSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            source: ImageSource::Bytes(bytes),
        }
    }

    /// Override the detected media type
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the file and encode it as a base64 `data:` URI
    pub async fn read_as_data_url(&self) -> Result<String> {
        let bytes = match &self.source {
            ImageSource::Path(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read image {}", path.display()))?,
            ImageSource::Bytes(bytes) => bytes.clone(),
        };

        let mime = self
            .mime
            .clone()
            .or_else(|| mime_from_extension(Path::new(&self.name)).map(str::to_string))
            .or_else(|| sniff_mime(&bytes).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        Ok(encode_data_url(&mime, &bytes))
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let base64_string = general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, base64_string)
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn bytes_are_encoded_with_extension_mime() {
        let file = ImageFile::from_bytes("room.PNG", b"hello".to_vec());
        let url = file.read_as_data_url().await.unwrap();
        assert_eq!(url, "data:image/png;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn unknown_type_is_sniffed_or_falls_back() {
        let jpeg = ImageFile::from_bytes("blob", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert!(jpeg.read_as_data_url().await.unwrap().starts_with("data:image/jpeg;base64,"));

        let unknown = ImageFile::from_bytes("blob", vec![1, 2, 3]);
        assert_eq!(
            unknown.read_as_data_url().await.unwrap(),
            "data:application/octet-stream;base64,AQID"
        );
    }

    #[tokio::test]
    async fn explicit_mime_wins() {
        let file = ImageFile::from_bytes("a.png", vec![0]).with_mime("image/webp");
        assert!(file.read_as_data_url().await.unwrap().starts_with("data:image/webp;"));
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        tmp.write_all(b"jpeg-ish").unwrap();

        let file = ImageFile::from_path(tmp.path());
        let url = file.read_as_data_url().await.unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let file = ImageFile::from_path("/definitely/not/here.png");
        assert!(file.read_as_data_url().await.is_err());
    }
}
