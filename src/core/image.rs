//! Image references exchanged with the generation backend.
//!
//! Generated images come back inline as `data:<mime>;base64,<payload>` URIs.
//! User attachments are read from disk and converted into the same shape so
//! the rest of the crate only ever deals with [`ImageRef`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_ATTACHMENT_MIME: &str = "image/png";

#[derive(Debug)]
pub enum ImageRefError {
    /// Not a `data:` URI or an `http(s)` URL.
    Unrecognized(String),
    /// A `data:` URI without a MIME type or payload separator.
    Malformed(String),
    /// Only base64-encoded data URIs are supported.
    UnsupportedEncoding(String),
    Decode(base64::DecodeError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ImageRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRefError::Unrecognized(value) => {
                write!(f, "Unrecognized image reference: {}", preview(value))
            }
            ImageRefError::Malformed(value) => {
                write!(f, "Malformed data URI: {}", preview(value))
            }
            ImageRefError::UnsupportedEncoding(header) => {
                write!(f, "Data URI is not base64 encoded: data:{header}")
            }
            ImageRefError::Decode(err) => write!(f, "Invalid base64 image payload: {err}"),
            ImageRefError::Io { path, source } => {
                write!(f, "Failed to read image {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for ImageRefError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ImageRefError::Decode(err) => Some(err),
            ImageRefError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn preview(value: &str) -> String {
    const LIMIT: usize = 48;
    match value.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}…", &value[..idx]),
        None => value.to_string(),
    }
}

/// Inline base64 image payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime: String,
    payload: String,
}

impl DataUri {
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            payload: BASE64.encode(bytes),
        }
    }

    /// Wraps an already base64-encoded payload, as returned by the backend.
    pub fn from_base64(mime: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            payload: payload.into(),
        }
    }

    pub fn parse(value: &str) -> Result<Self, ImageRefError> {
        let rest = value
            .strip_prefix("data:")
            .ok_or_else(|| ImageRefError::Unrecognized(value.to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageRefError::Malformed(value.to_string()))?;
        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim();
        if mime.is_empty() {
            return Err(ImageRefError::Malformed(value.to_string()));
        }
        if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
            return Err(ImageRefError::UnsupportedEncoding(header.to_string()));
        }
        Ok(Self {
            mime: mime.to_ascii_lowercase(),
            payload: payload.trim().to_string(),
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>, ImageRefError> {
        BASE64.decode(&self.payload).map_err(ImageRefError::Decode)
    }

    /// Approximate decoded size without decoding.
    pub fn approx_len(&self) -> usize {
        self.payload.len() / 4 * 3
    }

    /// The `<subtype>` of an `image/<subtype>` MIME type, when it is made of
    /// ASCII letters and `+` only (e.g. `png`, `jpeg`, `svg+xml`).
    pub fn image_subtype(&self) -> Option<&str> {
        let subtype = self.mime.strip_prefix("image/")?;
        let valid = !subtype.is_empty()
            && subtype
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c == '+');
        valid.then_some(subtype)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

/// A reference to an image: inline data or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageRef {
    Data(DataUri),
    Remote(String),
}

impl ImageRef {
    pub fn parse(value: &str) -> Result<Self, ImageRefError> {
        let trimmed = value.trim();
        if trimmed.starts_with("data:") {
            return DataUri::parse(trimmed).map(ImageRef::Data);
        }
        if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            return Ok(ImageRef::Remote(trimmed.to_string()));
        }
        Err(ImageRefError::Unrecognized(trimmed.to_string()))
    }

    /// Reads a local image file into an inline reference. The MIME type is
    /// guessed from the extension.
    pub fn from_file(path: &Path) -> Result<Self, ImageRefError> {
        let bytes = fs::read(path).map_err(|source| ImageRefError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mime = mime_for_path(path).unwrap_or(DEFAULT_ATTACHMENT_MIME);
        Ok(ImageRef::Data(DataUri::from_bytes(mime, &bytes)))
    }

    pub fn as_data(&self) -> Option<&DataUri> {
        match self {
            ImageRef::Data(data) => Some(data),
            ImageRef::Remote(_) => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageRef::Remote(_))
    }

    /// Compact description for transcripts and listings; never includes the
    /// base64 payload.
    pub fn label(&self) -> String {
        match self {
            ImageRef::Data(data) => {
                format!("[{} image, {} KB]", data.mime(), data.approx_len().div_ceil(1024))
            }
            ImageRef::Remote(url) => format!("[image {}]", preview(url)),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Data(data) => fmt::Display::fmt(data, f),
            ImageRef::Remote(url) => f.write_str(url),
        }
    }
}

impl TryFrom<String> for ImageRef {
    type Error = ImageRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.to_string()
    }
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}
