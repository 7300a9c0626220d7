//! Saving the displayed design to a local file.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::core::image::{ImageRef, ImageRefError};

pub const DEFAULT_EXTENSION: &str = "png";
const FILE_PREFIX: &str = "ispace-design";

#[derive(Debug)]
pub enum ExportError {
    /// Remote references carry no bytes to write without a download.
    RemoteReference(String),
    InvalidImage(ImageRefError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::RemoteReference(url) => {
                write!(f, "Cannot export a remote image reference: {url}")
            }
            ExportError::InvalidImage(err) => write!(f, "Cannot export image: {err}"),
            ExportError::Io { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for ExportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ExportError::InvalidImage(err) => Some(err),
            ExportError::Io { source, .. } => Some(source),
            ExportError::RemoteReference(_) => None,
        }
    }
}

/// Local file-save collaborator.
pub trait FileSaver {
    fn save(&self, image: &ImageRef, file_name: &str) -> Result<PathBuf, ExportError>;
}

/// Writes images into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, image: &ImageRef, file_name: &str) -> Result<PathBuf, ExportError> {
        let data = match image {
            ImageRef::Data(data) => data,
            ImageRef::Remote(url) => return Err(ExportError::RemoteReference(url.clone())),
        };
        let bytes = data.decode().map_err(ExportError::InvalidImage)?;

        let io_err = |source| ExportError::Io {
            path: self.dir.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let target = self.dir.join(file_name);
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        temp_file.write_all(&bytes).map_err(io_err)?;
        temp_file.as_file_mut().sync_all().map_err(io_err)?;
        temp_file.persist(&target).map_err(|err| ExportError::Io {
            path: target.clone(),
            source: err.error,
        })?;
        Ok(target)
    }
}

/// File extension implied by the image's embedded format, or
/// [`DEFAULT_EXTENSION`].
pub fn extension_for(image: &ImageRef) -> &str {
    image
        .as_data()
        .and_then(|data| data.image_subtype())
        .unwrap_or(DEFAULT_EXTENSION)
}

pub fn suggested_file_name(image: &ImageRef, at: DateTime<Utc>) -> String {
    format!(
        "{FILE_PREFIX}-{}.{}",
        at.timestamp_millis(),
        extension_for(image)
    )
}

pub fn export_image(image: &ImageRef, saver: &dyn FileSaver) -> Result<PathBuf, ExportError> {
    let file_name = suggested_file_name(image, Utc::now());
    let path = saver.save(image, &file_name)?;
    info!(path = %path.display(), "Exported design");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image::DataUri;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn data_image(mime: &str, bytes: &[u8]) -> ImageRef {
        ImageRef::Data(DataUri::from_bytes(mime, bytes))
    }

    #[test]
    fn extension_follows_embedded_format() {
        assert_eq!(extension_for(&data_image("image/jpeg", b"x")), "jpeg");
        assert_eq!(extension_for(&data_image("image/webp", b"x")), "webp");
        assert_eq!(extension_for(&data_image("image/svg+xml", b"x")), "svg+xml");
    }

    #[test]
    fn extension_defaults_to_png() {
        assert_eq!(extension_for(&data_image("image/x-icon", b"x")), "png");
        assert_eq!(extension_for(&data_image("application/octet-stream", b"x")), "png");
        assert_eq!(
            extension_for(&ImageRef::Remote("https://img.test/room.jpg".into())),
            "png"
        );
    }

    #[test]
    fn file_name_uses_millisecond_timestamp() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            suggested_file_name(&data_image("image/png", b"x"), at),
            "ispace-design-1700000000123.png"
        );
    }

    #[test]
    fn directory_saver_writes_decoded_bytes() {
        let temp_dir = TempDir::new().expect("temp dir");
        let out = temp_dir.path().join("exports");
        let saver = DirectorySaver::new(&out);

        let path = export_image(&data_image("image/webp", b"room-bytes"), &saver).unwrap();

        assert_eq!(path.parent(), Some(out.as_path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("webp"));
        assert_eq!(fs::read(&path).unwrap(), b"room-bytes");
    }

    #[test]
    fn directory_saver_refuses_remote_references() {
        let temp_dir = TempDir::new().expect("temp dir");
        let saver = DirectorySaver::new(temp_dir.path());
        let err = saver
            .save(&ImageRef::Remote("https://img.test/a.png".into()), "a.png")
            .unwrap_err();
        assert!(matches!(err, ExportError::RemoteReference(_)));
    }

    #[test]
    fn directory_saver_reports_corrupt_payload() {
        let temp_dir = TempDir::new().expect("temp dir");
        let saver = DirectorySaver::new(temp_dir.path());
        let image = ImageRef::Data(DataUri::from_base64("image/png", "***not base64***"));
        let err = saver.save(&image, "a.png").unwrap_err();
        assert!(matches!(err, ExportError::InvalidImage(_)));
    }
}
