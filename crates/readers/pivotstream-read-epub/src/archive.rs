//! Byte access to the ZIP container.

use std::borrow::Cow;
use std::io::{Cursor, Read};

use pivotstream_core::{ExtractError, ExtractWarning, Result, Severity, WarningKind};
use zip::ZipArchive;
use zip::result::ZipError;

pub(crate) struct Archive<'a> {
    zip: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Archive<'a> {
    pub(crate) fn open(bytes: &'a [u8]) -> Result<Self> {
        let zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractError::InvalidArchive(e.to_string()))?;
        Ok(Self { zip })
    }

    /// Contents of the entry `path`, `Ok(None)` if there is no such entry.
    pub(crate) fn read(&mut self, path: &str) -> std::result::Result<Option<Vec<u8>>, ZipError> {
        let mut file = match self.zip.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(Some(contents))
    }

    /// Read the first of `paths` that exists.
    pub(crate) fn read_any(
        &mut self,
        paths: &[&str],
    ) -> std::result::Result<Option<Vec<u8>>, ZipError> {
        for path in paths {
            if let Some(contents) = self.read(path)? {
                return Ok(Some(contents));
            }
        }
        Ok(None)
    }
}

/// Strip UTF-8 BOM if present.
fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}

/// Decode a text entry as UTF-8, falling back to Windows-1252.
///
/// Windows-1252 is a superset of Latin-1 and never fails, so every entry
/// decodes to something. A fallback is reported as a warning.
pub(crate) fn decode_text<'b>(
    bytes: &'b [u8],
    path: &str,
    warnings: &mut Vec<ExtractWarning>,
) -> Cow<'b, str> {
    let bytes = strip_bom(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            log::debug!("{path} is not valid UTF-8, decoding as windows-1252");
            warnings.push(ExtractWarning::new(
                Severity::Minor,
                WarningKind::DecodeFallback(path.to_string()),
                format!("{path} is not valid UTF-8; decoded as Latin-1"),
            ));
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text
        }
    }
}
