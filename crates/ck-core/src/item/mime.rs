use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type of one concrete selection representation.
///
/// Special atoms (copied-file lists, HTML, XML) must be fetched and
/// re-offered under their own type; coercing them to plain text loses
/// structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn text_plain() -> Self {
        Self("text/plain".into())
    }

    pub fn text_html() -> Self {
        Self("text/html".into())
    }

    pub fn application_xml() -> Self {
        Self("application/xml".into())
    }

    pub fn uri_list() -> Self {
        Self("text/uri-list".into())
    }

    /// File-manager copy/cut list as offered by GNOME-family applications.
    pub fn copied_files() -> Self {
        Self("x-special/gnome-copied-files".into())
    }

    pub fn image_png() -> Self {
        Self("image/png".into())
    }

    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }

    pub fn is_file_list(&self) -> bool {
        *self == Self::uri_list() || *self == Self::copied_files()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MimeType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
