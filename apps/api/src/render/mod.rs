// Resume rendering: text sanitization, fixed-layout PDF assembly, QR embedding.
// Assembly is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod assembler;
pub mod font_metrics;
pub mod pdf;
pub mod qr;
pub mod sanitize;
pub mod wrap;

use thiserror::Error;

pub use assembler::DocumentAssembler;
pub use sanitize::sanitize;

/// Download name offered for every rendered resume.
pub const FILE_NAME: &str = "Resume.pdf";
pub const MIME_TYPE: &str = "application/pdf";
pub const ATTACHMENT_DISPOSITION: &str = "attachment; filename=\"Resume.pdf\"";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("QR code could not encode the video URL: {0}")]
    Qr(qrcode::types::QrError),

    #[error("QR image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF serialization failed: {0}")]
    Pdf(String),
}

/// A finished PDF, ready to hand to the caller for download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_names_the_download_file() {
        assert!(ATTACHMENT_DISPOSITION.contains(FILE_NAME));
        assert!(ATTACHMENT_DISPOSITION.starts_with("attachment"));
    }
}
