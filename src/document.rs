use pdfium_render::prelude::*;
use std::path::Path;
use tracing::info;

use crate::error::{PluckError, PluckResult};

/// Opens PDF documents through PDFium.
///
/// Binds to a pdfium library shipped next to the executable when present,
/// falling back to the system library.
pub struct PdfLoader {
    pdfium: Pdfium,
}

impl PdfLoader {
    pub fn new() -> PluckResult<Self> {
        let bindings =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| {
                    PluckError::pdf_processing_with_source("failed to initialize PDFium", e)
                })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Open a document. Missing files and unreadable PDFs are fatal; there is
    /// no recovery path at this level.
    pub fn load(&self, path: &Path) -> PluckResult<PdfDocument<'_>> {
        if !path.exists() {
            return Err(PluckError::file_io(
                path.display().to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }

        let document = self.pdfium.load_pdf_from_file(path, None).map_err(|e| {
            PluckError::pdf_processing_with_source(
                format!("failed to open {}", path.display()),
                e,
            )
        })?;

        info!(
            "loaded {} ({} pages)",
            path.display(),
            document.pages().len()
        );

        Ok(document)
    }
}
