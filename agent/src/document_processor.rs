use crate::models::*;
use anyhow::{bail, Context, Result};
use pdf_extract::extract_text_from_mem;
use regex::Regex;
use std::fs;
use std::process::Command;
use uuid::Uuid;

/// Turns uploaded file bytes into a [`Document`] with extracted text.
///
/// PDFs go through `pdf-extract`, PNG/JPG images go through the `tesseract`
/// CLI, and TXT files are decoded as UTF-8. Anything else is rejected before
/// we get here (see [`DocumentFormat::from_filename`]).
pub struct DocumentProcessor {
    re_blank_lines: Regex,
    re_spaces: Regex,
}

impl DocumentProcessor {
    pub fn new() -> Self {
        Self {
            re_blank_lines: Regex::new(r"\n{3,}").unwrap(),
            re_spaces: Regex::new(r"[ \t]+").unwrap(),
        }
    }

    /// Extract text from an uploaded file and wrap it in a `Document`.
    /// Empty extraction output is an error so no blank document ever
    /// reaches the LLM.
    pub fn process_form(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        let format = match DocumentFormat::from_filename(filename) {
            Some(format) => format,
            None => {
                // DOC/DOCX need a dedicated parser we deliberately don't ship.
                let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
                if extension == "doc" || extension == "docx" {
                    bail!("file type .{} not supported for automated extraction", extension);
                }
                bail!("unsupported file type: {}", filename);
            }
        };

        log::info!("Processing upload: {} ({})", filename, format);

        let raw_text = self.extract_text(bytes, format)?;
        let text = self.normalize_text(&raw_text);
        if text.is_empty() {
            bail!("no usable text extracted from {}", filename);
        }

        Ok(Document {
            id: Uuid::new_v4().to_string(),
            name: filename.to_string(),
            format,
            text,
        })
    }

    fn extract_text(&self, bytes: &[u8], format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Pdf => {
                let text = extract_text_from_mem(bytes).context("failed to extract text from PDF")?;
                if text.trim().is_empty() {
                    bail!("no usable text extracted from PDF");
                }
                Ok(text)
            }
            DocumentFormat::Png | DocumentFormat::Jpg => self.ocr_image(bytes, format),
            DocumentFormat::Txt => {
                String::from_utf8(bytes.to_vec()).context("TXT file is not valid UTF-8")
            }
        }
    }

    /// OCR an image by shelling out to the `tesseract` binary. The bytes are
    /// written to a temp file because tesseract only reads from disk.
    fn ocr_image(&self, bytes: &[u8], format: DocumentFormat) -> Result<String> {
        let temp_dir = tempfile::tempdir().context("failed to create temp directory for OCR")?;
        let image_path = temp_dir.path().join(format!("upload.{}", format));
        fs::write(&image_path, bytes).context("failed to write image for OCR")?;

        let output = Command::new("tesseract")
            .arg(&image_path)
            .arg("stdout")
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg("1")
            .output()
            .context("failed to run tesseract, is tesseract-ocr installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("OCR failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Collapse runs of spaces and excess blank lines left behind by PDF
    /// extraction and OCR, keeping paragraph structure intact.
    fn normalize_text(&self, text: &str) -> String {
        let collapsed = self.re_spaces.replace_all(text, " ");
        let collapsed = self.re_blank_lines.replace_all(&collapsed, "\n\n");
        collapsed
            .lines()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// True when the `tesseract` binary is on PATH.
    pub fn is_ocr_available() -> bool {
        Command::new("tesseract").arg("--version").output().is_ok()
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}
