//! Page-range extraction: the shared runner plus the two output sinks.
//!
//! Both pipelines have the same shape (open document, iterate a page range,
//! one extraction call per page); they differ only in what a page turns into.
//! `pluck_pages` owns the iteration and the skip-and-log policy, the
//! [`PageSink`] implementations own the per-page work.

use pdfium_render::prelude::*;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PluckError, PluckResult};

/// Inclusive 1-based page bounds, the way a human reads them off the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl PageRange {
    pub fn new(first: u32, last: u32) -> PluckResult<Self> {
        if first == 0 {
            return Err(PluckError::configuration(
                "page numbers are 1-based; the first page must be at least 1",
            ));
        }
        if first > last {
            return Err(PluckError::configuration(format!(
                "first page {first} is past last page {last}"
            )));
        }

        Ok(Self { first, last })
    }

    /// Clamp to the document and convert to zero-based indices.
    ///
    /// Pages beyond the end of the document are silently dropped; a range
    /// that starts past the last page resolves to nothing.
    pub fn resolve(&self, page_count: u16) -> Range<u16> {
        let start = (self.first - 1).min(page_count as u32) as u16;
        let end = self.last.min(page_count as u32) as u16;
        start..end
    }
}

/// What happened during a run: pages emitted vs. pages skipped after a
/// per-page failure.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Per-page output strategy. `page_number` is 1-based.
pub trait PageSink {
    fn emit(&mut self, page_number: u32, page: &PdfPage) -> PluckResult<()>;
}

/// Iterate the resolved page range and feed each page to the sink.
///
/// A failure on one page is logged and the run continues with the next page;
/// nothing here aborts the whole run.
pub fn pluck_pages(
    document: &PdfDocument,
    range: PageRange,
    sink: &mut dyn PageSink,
) -> ExtractSummary {
    let page_count = document.pages().len();
    let indices = range.resolve(page_count);

    if indices.is_empty() {
        warn!(
            "page range {}..={} selects nothing in a {page_count}-page document",
            range.first, range.last
        );
    }

    let mut summary = ExtractSummary::default();
    for index in indices {
        let page_number = u32::from(index) + 1;
        let result = document
            .pages()
            .get(index)
            .map_err(|e| {
                PluckError::pdf_processing_with_source(
                    format!("failed to load page {page_number}"),
                    e,
                )
            })
            .and_then(|page| sink.emit(page_number, &page));

        match result {
            Ok(()) => summary.processed += 1,
            Err(e) => {
                warn!("skipping page {page_number}: {e}");
                summary.skipped += 1;
            }
        }
    }

    summary
}

/// Header line printed before each page's text.
pub fn page_header(page_number: u32) -> String {
    format!("--- PAGE {page_number} ---")
}

/// File name for a rendered page, 1-based and zero-padded so the files sort.
pub fn image_file_name(page_number: u32) -> String {
    format!("page_{page_number:03}.png")
}

/// Prints each page's extracted text behind a page-number header.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> PageSink for TextSink<W> {
    fn emit(&mut self, page_number: u32, page: &PdfPage) -> PluckResult<()> {
        let text = page
            .text()
            .map_err(|e| {
                PluckError::pdf_processing_with_source(
                    format!("text extraction failed on page {page_number}"),
                    e,
                )
            })?
            .all();

        writeln!(self.out, "\n{}", page_header(page_number))
            .and_then(|()| writeln!(self.out, "{text}"))
            .map_err(|e| PluckError::file_io("<stdout>", e))?;

        Ok(())
    }
}

/// Renders each page to a PNG at a fixed magnification, and prints a text
/// preview of the first page it emits.
#[derive(Debug)]
pub struct ImageSink<W: Write> {
    output_dir: PathBuf,
    scale: f32,
    preview_chars: usize,
    pub preview_out: W,
    preview_done: bool,
}

impl<W: Write> ImageSink<W> {
    /// Creates the output directory up front; that failure is fatal, unlike
    /// the per-page ones.
    pub fn create(
        output_dir: &Path,
        scale: f32,
        preview_chars: usize,
        preview_out: W,
    ) -> PluckResult<Self> {
        if !(scale > 0.0) {
            return Err(PluckError::configuration(format!(
                "magnification factor must be positive, got {scale}"
            )));
        }

        fs::create_dir_all(output_dir)
            .map_err(|e| PluckError::file_io(output_dir.display().to_string(), e))?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            scale,
            preview_chars,
            preview_out,
            preview_done: false,
        })
    }
}

impl<W: Write> PageSink for ImageSink<W> {
    fn emit(&mut self, page_number: u32, page: &PdfPage) -> PluckResult<()> {
        let render_config = PdfRenderConfig::new().scale_page_by_factor(self.scale);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| PluckError::page_render(page_number, e.to_string()))?;

        let path = self.output_dir.join(image_file_name(page_number));
        bitmap.as_image().save(&path).map_err(|e| {
            PluckError::page_render(
                page_number,
                format!("failed to write {}: {e}", path.display()),
            )
        })?;
        debug!("saved {}", path.display());

        if !self.preview_done {
            self.preview_done = true;
            let text = page.text().map(|t| t.all()).unwrap_or_default();
            let preview: String = text.chars().take(self.preview_chars).collect();
            writeln!(
                self.preview_out,
                "\nPage {page_number} content preview:\n{preview}"
            )
            .map_err(|e| PluckError::file_io("<stdout>", e))?;
        }

        Ok(())
    }
}
