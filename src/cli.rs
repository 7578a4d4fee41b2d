use anyhow::Result;
use tracing::info;

use crate::config::PluckConfig;
use crate::document::PdfLoader;
use crate::extract::{pluck_pages, ImageSink, PageRange, TextSink};
use crate::toc;

/// Print extracted text for the configured page range to stdout.
pub fn text_command(config: &PluckConfig) -> Result<()> {
    let source = config.require_source()?;
    let range = PageRange::new(config.text.first_page, config.text.last_page)?;
    info!(
        "extracting text from {}, pages {}..={}",
        source.display(),
        range.first,
        range.last
    );

    let loader = PdfLoader::new()?;
    let document = loader.load(source)?;

    let stdout = std::io::stdout();
    let mut sink = TextSink::new(stdout.lock());
    let summary = pluck_pages(&document, range, &mut sink);

    info!(
        "done: {} pages extracted, {} skipped",
        summary.processed, summary.skipped
    );
    Ok(())
}

/// Dump the table of contents, then render the configured page range to PNG
/// files with a text preview of the first rendered page.
pub fn images_command(config: &PluckConfig) -> Result<()> {
    let source = config.require_source()?;
    let range = PageRange::new(config.images.first_page, config.images.last_page)?;
    info!(
        "rendering {} pages {}..={} at {}x into {}",
        source.display(),
        range.first,
        range.last,
        config.images.scale,
        config.images.output_dir.display()
    );

    let loader = PdfLoader::new()?;
    let document = loader.load(source)?;

    let entries = toc::read_toc(source)?;
    println!("Full table of contents:");
    if entries.is_empty() {
        println!("  (no outline)");
    }
    for entry in &entries {
        println!("  {entry}");
    }

    let stdout = std::io::stdout();
    let mut sink = ImageSink::create(
        &config.images.output_dir,
        config.images.scale,
        config.images.preview_chars,
        stdout.lock(),
    )?;
    let summary = pluck_pages(&document, range, &mut sink);

    println!(
        "\nRendered {} pages to {} ({} skipped)",
        summary.processed,
        config.images.output_dir.display(),
        summary.skipped
    );
    Ok(())
}

/// Print the table of contents on its own, as indented text or JSON.
pub fn toc_command(config: &PluckConfig, json: bool) -> Result<()> {
    let source = config.require_source()?;
    let entries = toc::read_toc(source)?;
    info!("{} outline entries in {}", entries.len(), source.display());

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("(no outline)");
    } else {
        for entry in &entries {
            println!("{entry}");
        }
    }

    Ok(())
}
