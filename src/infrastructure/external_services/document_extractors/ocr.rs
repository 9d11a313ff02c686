use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::application::ports::document_extractor::DocumentExtractionError;

const TESSERACT: &str = "tesseract";
const PDFTOPPM: &str = "pdftoppm";
const OCR_LANGUAGE: &str = "eng";
const RASTER_DPI: &str = "150";

async fn is_installed(program: &str) -> bool {
    Command::new(program)
        .arg("-v")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .is_ok()
}

pub async fn has_tesseract() -> bool {
    is_installed(TESSERACT).await
}

pub async fn has_pdftoppm() -> bool {
    is_installed(PDFTOPPM).await
}

/// Runs `tesseract <image> stdout -l eng` and returns the recognised text.
pub async fn ocr_image(path: &Path) -> Result<String, DocumentExtractionError> {
    let output = Command::new(TESSERACT)
        .arg(path)
        .arg("stdout")
        .args(["-l", OCR_LANGUAGE])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            DocumentExtractionError::OcrUnavailable(format!("failed to run {}: {}", TESSERACT, e))
        })?;

    if !output.status.success() {
        return Err(DocumentExtractionError::ExtractionFailed(format!(
            "{} exited with {}: {}",
            TESSERACT,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Rasterises every page of a PDF into PNGs inside `out_dir`, in page order.
pub async fn rasterize_pdf(
    pdf: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, DocumentExtractionError> {
    let prefix = out_dir.join("page");
    let output = Command::new(PDFTOPPM)
        .args(["-png", "-r", RASTER_DPI])
        .arg(pdf)
        .arg(&prefix)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            DocumentExtractionError::OcrUnavailable(format!("failed to run {}: {}", PDFTOPPM, e))
        })?;

    if !output.status.success() {
        return Err(DocumentExtractionError::ExtractionFailed(format!(
            "{} exited with {}: {}",
            PDFTOPPM,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let mut pages = Vec::new();
    let mut entries = tokio::fs::read_dir(out_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "png") {
            pages.push(path);
        }
    }

    // page-1.png, page-2.png ... zero padded by pdftoppm for larger documents
    pages.sort_by_key(|p| page_number(p));
    Ok(pages)
}

fn page_number(path: &Path) -> u32 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit('-').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}
