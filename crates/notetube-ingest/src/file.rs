//! File text extraction for uploaded documents.
//!
//! Extraction works on in-memory bytes plus the client-supplied filename;
//! the extension alone decides the format.

use std::io::Read;

use notetube_core::{Error, Result};
use tracing::{debug, warn};

/// Maximum decompressed size of `word/document.xml` (zip-bomb protection).
const MAX_DOCX_XML_BYTES: u64 = 50 * 1024 * 1024;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    PlainText,
    Markdown,
    Pdf,
    Docx,
    /// Legacy Word; parsed as DOCX, which fails for true binary `.doc` files.
    Doc,
    Image,
    Unknown,
}

impl FileType {
    /// Detect file type from extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" => Self::PlainText,
            "md" | "markdown" => Self::Markdown,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "jpg" | "jpeg" | "png" => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a filename such as `notes.PDF`.
    pub fn from_filename(filename: &str) -> Self {
        std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Turns uploaded bytes into plain text.
pub trait DocumentExtractor: Send + Sync {
    /// Whether the filename's format is accepted at all.
    fn supports(&self, filename: &str) -> bool;

    /// Extract text. Unsupported formats and parse failures are errors,
    /// never panics.
    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String>;
}

/// Built-in extractor for text, Markdown, PDF and Word documents.
#[derive(Debug, Default, Clone)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for FileExtractor {
    fn supports(&self, filename: &str) -> bool {
        FileType::from_filename(filename).is_supported()
    }

    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String> {
        let file_type = FileType::from_filename(filename);
        debug!("Extracting {} ({:?}, {} bytes)", filename, file_type, bytes.len());

        match file_type {
            FileType::PlainText | FileType::Markdown => Ok(decode_utf8(bytes, filename)),
            FileType::Pdf => pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| Error::Extraction(format!("{}: {}", filename, e))),
            FileType::Docx | FileType::Doc => extract_docx(bytes)
                .map_err(|e| Error::Extraction(format!("{}: {}", filename, e))),
            FileType::Image => Err(Error::Extraction(format!(
                "{}: image text recognition is not available",
                filename
            ))),
            FileType::Unknown => Err(Error::UnsupportedFormat(filename.to_string())),
        }
    }
}

fn decode_utf8(bytes: &[u8], filename: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            warn!("{} is not valid UTF-8, decoding lossily", filename);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Extract paragraph text from a DOCX archive, one paragraph per line.
fn extract_docx(bytes: &[u8]) -> std::result::Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|_| "word/document.xml not found".to_string())?;

    let mut xml = Vec::new();
    entry
        .take(MAX_DOCX_XML_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| e.to_string())?;
    if xml.len() as u64 >= MAX_DOCX_XML_BYTES {
        return Err("word/document.xml exceeds size limit".to_string());
    }

    paragraphs_from_document_xml(&xml)
}

fn paragraphs_from_document_xml(xml: &[u8]) -> std::result::Result<String, String> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}
