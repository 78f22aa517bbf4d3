//! Data sources: uploaded files and published spreadsheet URLs

use crate::constants::{CSV_EXTENSION, SHEET_ID_MARKER, XLSX_EXTENSION};
use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use url::Url;

/// Where a raw table comes from
#[derive(Clone, PartialEq, Eq)]
pub enum Source {
    /// Uploaded file contents; the format follows the name's extension
    File { name: String, bytes: Vec<u8> },
    /// Link to a published spreadsheet
    Url(String),
}

impl Source {
    pub fn file(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::File {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file into a source
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::File { name, bytes })
    }

    /// Interpret a command-line argument as a URL or a local path
    pub fn from_arg(arg: &str) -> Result<Self> {
        let lowered = arg.trim().to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Ok(Self::Url(arg.trim().to_string()))
        } else {
            Self::from_path(Path::new(arg))
        }
    }

    /// Name used in logs and errors
    pub fn describe(&self) -> &str {
        match self {
            Self::File { name, .. } => name,
            Self::Url(url) => url,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { name, bytes } => f
                .debug_struct("File")
                .field("name", name)
                .field("bytes", &bytes.len())
                .finish(),
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

/// Uploaded file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Format of a file name, by case-insensitive extension
    ///
    /// # Errors
    /// Returns `Error::UnsupportedFormat` naming the extension (empty if none).
    pub fn from_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            CSV_EXTENSION => Ok(Self::Csv),
            XLSX_EXTENSION => Ok(Self::Xlsx),
            _ => Err(Error::unsupported_format(extension)),
        }
    }
}

/// Identifier and tab of a published spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUrl {
    host: String,
    spreadsheet_id: String,
    /// `/d/e/<id>` links published to the web use a different export endpoint
    published: bool,
    gid: Option<String>,
}

impl SheetUrl {
    /// Parse a spreadsheet link served by `allowed_host`
    ///
    /// The path must contain a `/d/<id>` segment pair. A tab is taken from a
    /// `gid` query parameter or `#gid=` fragment.
    ///
    /// # Errors
    /// Returns `Error::InvalidSource` for malformed URLs, other hosts, or
    /// paths without an identifier.
    pub fn parse(raw: &str, allowed_host: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| Error::invalid_source(raw, format!("not a valid URL ({})", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_source(
                raw,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let host = url.host_str().unwrap_or_default();
        if !host.eq_ignore_ascii_case(allowed_host) {
            return Err(Error::invalid_source(
                raw,
                format!("expected host {}, found '{}'", allowed_host, host),
            ));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let marker = segments
            .iter()
            .position(|segment| *segment == SHEET_ID_MARKER)
            .ok_or_else(|| {
                Error::invalid_source(raw, "no spreadsheet identifier (/d/<id>/) in path")
            })?;

        let (published, id) = match segments.get(marker + 1) {
            Some(&"e") => (true, segments.get(marker + 2).copied()),
            other => (false, other.copied()),
        };

        let spreadsheet_id = id
            .filter(|id| is_valid_id(id))
            .ok_or_else(|| Error::invalid_source(raw, "missing or malformed spreadsheet identifier"))?
            .to_string();

        let gid = url
            .query_pairs()
            .find(|(key, _)| key == "gid")
            .map(|(_, value)| value.into_owned())
            .or_else(|| {
                url.fragment()
                    .and_then(|fragment| fragment.strip_prefix("gid="))
                    .and_then(|rest| rest.split('&').next())
                    .map(str::to_string)
            })
            .filter(|gid| !gid.is_empty());

        if let Some(gid) = &gid {
            if !gid.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::invalid_source(raw, format!("malformed tab id '{}'", gid)));
            }
        }

        Ok(Self {
            host: allowed_host.to_ascii_lowercase(),
            spreadsheet_id,
            published,
            gid,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn gid(&self) -> Option<&str> {
        self.gid.as_deref()
    }

    /// CSV export endpoint for the sheet
    pub fn export_url(&self) -> String {
        let mut export = if self.published {
            format!(
                "https://{}/spreadsheets/d/e/{}/pub?output=csv",
                self.host, self.spreadsheet_id
            )
        } else {
            format!(
                "https://{}/spreadsheets/d/{}/export?format=csv",
                self.host, self.spreadsheet_id
            )
        };

        if let Some(gid) = &self.gid {
            export.push_str("&gid=");
            export.push_str(gid);
        }
        export
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "docs.google.com";

    #[test]
    fn test_file_format_by_extension() {
        assert_eq!(FileFormat::from_name("data.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_name("DATA.XLSX").unwrap(), FileFormat::Xlsx);

        match FileFormat::from_name("report.txt") {
            Err(Error::UnsupportedFormat { extension }) => assert_eq!(extension, "txt"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
        assert!(matches!(
            FileFormat::from_name("README"),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_sheet_url_export() {
        let sheet = SheetUrl::parse(
            "https://docs.google.com/spreadsheets/d/1AbC-d_9/edit#gid=0",
            HOST,
        )
        .unwrap();

        assert_eq!(sheet.spreadsheet_id(), "1AbC-d_9");
        assert_eq!(sheet.gid(), Some("0"));
        assert_eq!(
            sheet.export_url(),
            "https://docs.google.com/spreadsheets/d/1AbC-d_9/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_sheet_url_without_tab() {
        let sheet =
            SheetUrl::parse("https://docs.google.com/spreadsheets/d/abc123/", HOST).unwrap();
        assert_eq!(sheet.gid(), None);
        assert_eq!(
            sheet.export_url(),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv"
        );
    }

    #[test]
    fn test_published_sheet_url() {
        let sheet = SheetUrl::parse(
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vR/pubhtml?gid=42",
            HOST,
        )
        .unwrap();
        assert_eq!(
            sheet.export_url(),
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vR/pub?output=csv&gid=42"
        );
    }

    #[test]
    fn test_invalid_sheet_urls() {
        for raw in [
            "https://docs.google.com/spreadsheets/abc123",
            "https://docs.google.com/spreadsheets/d/",
            "https://example.com/spreadsheets/d/abc123/",
            "ftp://docs.google.com/spreadsheets/d/abc123/",
            "not a url",
            "https://docs.google.com/spreadsheets/d/abc123/edit?gid=x1",
        ] {
            assert!(
                matches!(SheetUrl::parse(raw, HOST), Err(Error::InvalidSource { .. })),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_source_from_arg() {
        assert_eq!(
            Source::from_arg("https://docs.google.com/spreadsheets/d/x/").unwrap(),
            Source::Url("https://docs.google.com/spreadsheets/d/x/".to_string())
        );
        assert!(matches!(
            Source::from_arg("/nonexistent/upload.csv"),
            Err(Error::Io { .. })
        ));
    }
}
