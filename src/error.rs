use thiserror::Error;

/// Main error type for pagepluck
#[derive(Error, Debug)]
pub enum PluckError {
    #[error("PDF processing failed: {message}")]
    PdfProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File I/O error: {path}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to render page {page_number}: {message}")]
    PageRender { page_number: u32, message: String },

    #[error("General error: {0}")]
    General(#[from] anyhow::Error),
}

pub type PluckResult<T> = Result<T, PluckError>;

impl PluckError {
    /// Create a PDF processing error with context
    pub fn pdf_processing(message: impl Into<String>) -> Self {
        Self::PdfProcessing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a PDF processing error with source
    pub fn pdf_processing_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::PdfProcessing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a file I/O error
    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a per-page render error
    pub fn page_render(page_number: u32, message: impl Into<String>) -> Self {
        Self::PageRender {
            page_number,
            message: message.into(),
        }
    }

    /// Check if error is recoverable (the run can continue with the next page)
    pub fn is_recoverable(&self) -> bool {
        match self {
            PluckError::PageRender { .. } => true,
            PluckError::PdfProcessing { .. } => true,
            PluckError::FileIo { .. } => false,
            PluckError::Configuration { .. } => false,
            PluckError::General(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_errors_are_recoverable() {
        assert!(PluckError::page_render(61, "bitmap allocation failed").is_recoverable());
        assert!(PluckError::pdf_processing("corrupt page object").is_recoverable());
    }

    #[test]
    fn configuration_errors_are_fatal() {
        let err = PluckError::configuration("first page must be at least 1");
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("Configuration error"));
    }
}
