//! Rendered document, page stamping and PDF 1.4 serialization.

use std::fmt::Write as _;

use crate::html::{RasterImage, TextStyle};
use crate::layout::{text_op, LaidOut};

/// Text drawn on every page after layout, e.g. a footer.
///
/// `{page}` and `{total}` in the template are replaced with the 1-based page
/// number and the page count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageStamp {
    pub x: f32,
    /// Distance of the baseline from the top edge of the page.
    pub y_from_top: f32,
    pub size: f32,
    pub template: String,
}

impl PageStamp {
    pub fn new(x: f32, y_from_top: f32, template: impl Into<String>) -> Self {
        Self {
            x,
            y_from_top,
            size: 9.0,
            template: template.into(),
        }
    }

    fn text_for(&self, page: usize, total: usize) -> String {
        self.template
            .replace("{page}", &page.to_string())
            .replace("{total}", &total.to_string())
    }
}

/// A laid-out PDF held in memory until serialized.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    width: f32,
    height: f32,
    title: Option<String>,
    pages: Vec<String>,
    images: Vec<RasterImage>,
}

impl RenderedDocument {
    pub fn new(width: f32, height: f32, title: Option<String>, laid: LaidOut) -> Self {
        Self {
            width,
            height,
            title,
            pages: laid.pages,
            images: laid.images,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page width and height in points.
    pub fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Draw `stamp` on every page.
    pub fn stamp(&mut self, stamp: &PageStamp) {
        let total = self.pages.len();
        let style = TextStyle {
            size: stamp.size,
            muted: true,
            ..TextStyle::default()
        };
        let baseline = self.height - stamp.y_from_top;
        for (index, page) in self.pages.iter_mut().enumerate() {
            text_op(page, stamp.x, baseline, &style, &stamp.text_for(index + 1, total));
        }
    }

    /// Serialize to PDF bytes.
    ///
    /// Object layout: 1 catalog, 2 page tree, then a page and content
    /// stream per page, the two fonts, one XObject per image, and finally
    /// the info dictionary.
    pub fn to_bytes(&self) -> Vec<u8> {
        let page_count = self.pages.len();
        let font_id = 3 + page_count * 2;
        let image_start = font_id + 2;
        let info_id = image_start + self.images.len();

        let mut pdf: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::with_capacity(info_id);

        pdf.extend_from_slice(b"%PDF-1.4\n");
        pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        offsets.push(pdf.len());
        pdf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", 3 + i * 2))
            .collect();
        offsets.push(pdf.len());
        pdf.extend_from_slice(
            format!(
                "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {page_count} >>\nendobj\n",
                kids.join(" ")
            )
            .as_bytes(),
        );

        let mut xobjects = String::new();
        for i in 0..self.images.len() {
            let _ = write!(xobjects, " /Im{} {} 0 R", i + 1, image_start + i);
        }
        let xobject_dict = if xobjects.is_empty() {
            String::new()
        } else {
            format!(" /XObject <<{xobjects} >>")
        };

        for (i, content) in self.pages.iter().enumerate() {
            let page_id = 3 + i * 2;
            offsets.push(pdf.len());
            pdf.extend_from_slice(
                format!(
                    "{page_id} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R /Resources << /Font << /F1 {font_id} 0 R /F2 {} 0 R >>{xobject_dict} >> >>\nendobj\n",
                    self.width,
                    self.height,
                    page_id + 1,
                    font_id + 1,
                )
                .as_bytes(),
            );

            offsets.push(pdf.len());
            pdf.extend_from_slice(
                format!(
                    "{} 0 obj\n<< /Length {} >>\nstream\n{content}\nendstream\nendobj\n",
                    page_id + 1,
                    content.len(),
                )
                .as_bytes(),
            );
        }

        for (offset, base_font) in [(0, "Helvetica"), (1, "Helvetica-Bold")] {
            offsets.push(pdf.len());
            pdf.extend_from_slice(
                format!(
                    "{} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>\nendobj\n",
                    font_id + offset
                )
                .as_bytes(),
            );
        }

        for (i, image) in self.images.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(
                format!(
                    "{} 0 obj\n<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8 /Length {} >>\nstream\n",
                    image_start + i,
                    image.width,
                    image.height,
                    image.rgb.len()
                )
                .as_bytes(),
            );
            pdf.extend_from_slice(&image.rgb);
            pdf.extend_from_slice(b"\nendstream\nendobj\n");
        }

        let title = self
            .title
            .as_deref()
            .map(|t| format!(" /Title ({})", crate::layout::escape_pdf_string(t)))
            .unwrap_or_default();
        offsets.push(pdf.len());
        pdf.extend_from_slice(
            format!("{info_id} 0 obj\n<<{title} /Producer (pdfdesk) >>\nendobj\n").as_bytes(),
        );

        let xref_start = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for pos in &offsets {
            pdf.extend_from_slice(format!("{pos:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
                offsets.len() + 1
            )
            .as_bytes(),
        );

        pdf
    }
}
