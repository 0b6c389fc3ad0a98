//! Logo resolution for generated reports.
//!
//! A logo URL becomes one of four markups: nothing, an "SVG not supported"
//! placeholder, a generic placeholder when the fetch fails, or the fetched
//! image embedded as a base64 data URI.

use std::time::Duration;

use base64::Engine;

use crate::error::LogoError;

/// Default HTTP timeout for fetching a logo.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on the logo response body.
pub const DEFAULT_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Logo markup inserted into the report header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoMarkup {
    None,
    /// SVG logos cannot be embedded.
    SvgPlaceholder,
    /// The logo could not be fetched.
    Placeholder,
    Image { mime: &'static str, base64: String },
}

impl LogoMarkup {
    pub fn to_html(&self) -> String {
        match self {
            LogoMarkup::None => String::new(),
            LogoMarkup::SvgPlaceholder => {
                r#"<div class="logo-placeholder">Logo<br/>(Use PNG/JPG)</div>"#.to_string()
            }
            LogoMarkup::Placeholder => r#"<div class="logo-placeholder">Logo</div>"#.to_string(),
            LogoMarkup::Image { mime, base64 } => {
                format!(r#"<img class="logo" src="data:{mime};base64,{base64}" alt="Logo" />"#)
            }
        }
    }
}

/// Embed raw image bytes, identifying the format from their content.
///
/// Formats the renderer cannot decode are refused here so they never reach
/// the PDF engine.
pub fn markup_from_bytes(bytes: &[u8]) -> Result<LogoMarkup, LogoError> {
    let format = image::guess_format(bytes).map_err(|_| LogoError::UnrecognizedFormat)?;
    if !format.reading_enabled() {
        return Err(LogoError::UnsupportedFormat(format.to_mime_type()));
    }
    Ok(LogoMarkup::Image {
        mime: format.to_mime_type(),
        base64: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}

/// Fetches and embeds report logos.
#[derive(Debug, Clone)]
pub struct LogoResolver {
    client: reqwest::Client,
    max_bytes: usize,
}

impl LogoResolver {
    /// Build a resolver with a bounded request timeout and body size.
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, LogoError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, max_bytes })
    }

    /// Resolve an optional logo URL into header markup.
    ///
    /// Network failures and undecodable formats degrade to
    /// [`LogoMarkup::Placeholder`]; fetched bytes that are not an image are an
    /// error.
    pub async fn resolve(&self, url: Option<&str>) -> Result<LogoMarkup, LogoError> {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(LogoMarkup::None);
        };

        if url.to_ascii_lowercase().contains(".svg") {
            return Ok(LogoMarkup::SvgPlaceholder);
        }

        match self.fetch(url).await.and_then(|bytes| markup_from_bytes(&bytes)) {
            Ok(markup) => Ok(markup),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(url, error = %e, "Logo fetch failed, using placeholder");
                Ok(LogoMarkup::Placeholder)
            }
            Err(e) => Err(e),
        }
    }

    /// GET `url`, reading at most `max_bytes` of body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LogoError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LogoError::HttpStatus(status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(LogoError::TooLarge {
                max: self.max_bytes,
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(LogoError::TooLarge {
                    max: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(LogoError::Empty);
        }
        Ok(body)
    }
}
