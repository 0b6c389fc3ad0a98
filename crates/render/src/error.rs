//! Error types for rendering and logo resolution.

/// Failure while turning report HTML into a PDF document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An `<img>` source was not a usable `data:` URI.
    #[error("Invalid image source: {0}")]
    InvalidImageSource(String),

    /// Embedded image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure while resolving the optional report logo.
#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    /// The HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Logo URL returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Logo response was empty")]
    Empty,

    #[error("Logo exceeds {max} bytes")]
    TooLarge { max: usize },

    /// The fetched bytes are not a recognizable image format.
    #[error("Unrecognized image format")]
    UnrecognizedFormat,

    /// A known image format this build cannot decode.
    #[error("Unsupported logo format: {0}")]
    UnsupportedFormat(&'static str),
}

impl LogoError {
    /// Whether generation should continue with a placeholder logo.
    ///
    /// Transport problems and image formats this build cannot decode
    /// degrade; content that was fetched but is not an image aborts
    /// generation.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LogoError::UnrecognizedFormat)
    }
}
