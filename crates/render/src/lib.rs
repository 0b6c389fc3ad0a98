//! Report rendering: HTML template, logo embedding and a small HTML-to-PDF
//! engine.
//!
//! [`ReportRenderer`] is the seam the lifecycle service renders through.
//! [`HtmlPdfRenderer`] implements it for the HTML subset produced by
//! [`template::report_html`]: parse ([`html`]), lay out onto pages
//! ([`layout`]), then serialize ([`document`]).

pub mod document;
pub mod error;
pub mod html;
pub mod layout;
pub mod logo;
pub mod template;

pub use document::{PageStamp, RenderedDocument};
pub use error::{LogoError, RenderError};
pub use logo::{LogoMarkup, LogoResolver};

use layout::PageGeometry;

/// Paper size in PostScript points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Portrait width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,
}

impl RenderOptions {
    /// Width and height of a page in points, after orientation.
    pub fn dimensions(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Renders HTML into a paginated document.
///
/// Rendering is CPU-bound; async callers should run it on a blocking thread.
pub trait ReportRenderer: Send + Sync {
    fn render(
        &self,
        html: &str,
        options: &RenderOptions,
    ) -> Result<RenderedDocument, RenderError>;
}

/// Built-in renderer for the report template's HTML subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPdfRenderer;

impl ReportRenderer for HtmlPdfRenderer {
    fn render(
        &self,
        html: &str,
        options: &RenderOptions,
    ) -> Result<RenderedDocument, RenderError> {
        let mut parsed = html::parse(html)?;
        let title = parsed.title.take();
        let (width, height) = options.dimensions();
        let laid = layout::layout(parsed, &PageGeometry::new(width, height));
        tracing::debug!(pages = laid.pages.len(), images = laid.images.len(), "Rendered report");
        Ok(RenderedDocument::new(width, height, title, laid))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pdfdesk_core::validation::ReportInput;

    use super::*;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    fn report(content: String) -> String {
        let input = ReportInput {
            title: "Monthly Report".into(),
            institution_name: "Acme U".into(),
            address: "123 Main St".into(),
            phone: Some("555-0100".into()),
            logo_url: None,
            content,
        };
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();
        template::report_html(&input, &LogoMarkup::SvgPlaceholder, at)
    }

    #[test]
    fn gif_logo_is_embedded() {
        const GIF_1X1: &[u8] = &[
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
            0x00, 0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c,
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00,
            0x3b,
        ];
        let logo = logo::markup_from_bytes(GIF_1X1).unwrap();
        let input = ReportInput {
            title: "Monthly Report".into(),
            institution_name: "Acme U".into(),
            address: "123 Main St".into(),
            phone: None,
            logo_url: None,
            content: "Hello world".into(),
        };
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();
        let html = template::report_html(&input, &logo, at);

        let doc = HtmlPdfRenderer
            .render(&html, &RenderOptions::default())
            .unwrap();
        assert!(contains(&doc.to_bytes(), "/XObject << /Im1"));
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let opts = RenderOptions {
            page_size: PageSize::Letter,
            orientation: Orientation::Landscape,
        };
        assert_eq!(opts.dimensions(), (792.0, 612.0));
    }

    #[test]
    fn renders_template_to_pdf() {
        let doc = HtmlPdfRenderer
            .render(&report("Hello world".into()), &RenderOptions::default())
            .unwrap();
        assert_eq!(doc.page_count(), 1);

        let bytes = doc.to_bytes();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(contains(&bytes, "/Title (Monthly Report)"));
        assert!(contains(&bytes, "(Acme U) Tj"));
        assert!(contains(&bytes, "(Phone: 555-0100) Tj"));
        assert!(contains(&bytes, "(\\(Use PNG/JPG\\)) Tj"));
        assert!(contains(&bytes, "(16 October 2026 10:00) Tj"));
        assert!(contains(&bytes, "(Hello world) Tj"));
    }

    #[test]
    fn long_content_paginates_and_stamps_every_page() {
        let content = (1..=150)
            .map(|i| format!("Line {i} of the monthly figures"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut doc = HtmlPdfRenderer
            .render(&report(content), &RenderOptions::default())
            .unwrap();
        let total = doc.page_count();
        assert!(total > 1);

        doc.stamp(&PageStamp::new(480.0, 820.0, "Page {page} of {total}"));
        let bytes = doc.to_bytes();
        assert!(contains(&bytes, &format!("/Count {total}")));
        for page in 1..=total {
            assert!(contains(&bytes, &format!("(Page {page} of {total}) Tj")));
        }
        assert!(contains(&bytes, "(Line 150 of the monthly figures) Tj"));
    }
}
