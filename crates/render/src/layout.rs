//! Page layout: turns parsed blocks into per-page PDF content streams.
//!
//! Layout works in top-origin points and converts to PDF's bottom-origin
//! coordinates only when emitting operators. The header block is laid out
//! once and repeated at the top of every page; body blocks flow below it
//! and break onto new pages as needed.

use std::fmt::Write as _;

use crate::html::{Align, Block, ParsedHtml, RasterImage, TextStyle};

/// Logos and placeholders are drawn inside a square of this many points.
pub const LOGO_BOX: f32 = 80.0;

const LINE_SPACING: f32 = 1.35;
const HEADER_GUTTER: f32 = 14.0;
const MUTED_GRAY: f32 = 0.4;

/// Page dimensions and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Bottom margin, kept clear for footer stamps.
    pub margin_bottom: f32,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: 50.0,
            margin_bottom: 60.0,
        }
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

/// Laid-out document ready for serialization.
#[derive(Debug, Clone)]
pub struct LaidOut {
    pub pages: Vec<String>,
    /// Images referenced from content streams as `/Im{index + 1}`.
    pub images: Vec<RasterImage>,
}

/// An indivisible vertical unit of layout.
#[derive(Debug, Clone)]
enum Piece {
    Line { text: String, style: TextStyle },
    Image { id: usize, width: f32, height: f32 },
    Placeholder { lines: Vec<String> },
    Rule,
    Gap(f32),
}

impl Piece {
    fn height(&self) -> f32 {
        match self {
            Piece::Line { style, .. } => style.size * LINE_SPACING,
            Piece::Image { height, .. } => *height + 6.0,
            Piece::Placeholder { .. } => LOGO_BOX + 6.0,
            Piece::Rule => 12.0,
            Piece::Gap(h) => *h,
        }
    }

    /// Append drawing operators for this piece with its top edge at `top`.
    fn draw(&self, out: &mut String, x: f32, width: f32, top: f32, page_height: f32) {
        match self {
            Piece::Line { text, style } => {
                let text_x = match style.align {
                    Align::Left => x,
                    Align::Center => x + ((width - text_width(text, style)) / 2.0).max(0.0),
                };
                let baseline = page_height - (top + style.size);
                text_op(out, text_x, baseline, style, text);
            }
            Piece::Image { id, width, height } => {
                let bottom = page_height - (top + height);
                let _ = writeln!(
                    out,
                    "q {width:.2} 0 0 {height:.2} {x:.2} {bottom:.2} cm /Im{} Do Q",
                    id + 1
                );
            }
            Piece::Placeholder { lines } => {
                let bottom = page_height - (top + LOGO_BOX);
                let _ = writeln!(
                    out,
                    "q 0.6 G 0.75 w {x:.2} {bottom:.2} {LOGO_BOX:.2} {LOGO_BOX:.2} re S Q"
                );
                let style = TextStyle {
                    size: 8.0,
                    bold: false,
                    align: Align::Center,
                    muted: true,
                };
                let line_height = style.size * LINE_SPACING;
                let block_height = line_height * lines.len() as f32;
                let mut line_top = top + (LOGO_BOX - block_height) / 2.0;
                for line in lines {
                    Piece::Line {
                        text: line.clone(),
                        style,
                    }
                    .draw(out, x, LOGO_BOX, line_top, page_height);
                    line_top += line_height;
                }
            }
            Piece::Rule => {
                let y = page_height - (top + 6.0);
                let _ = writeln!(
                    out,
                    "q 0.7 G 0.75 w {x:.2} {y:.2} m {:.2} {y:.2} l S Q",
                    x + width
                );
            }
            Piece::Gap(_) => {}
        }
    }
}

/// Lay out a parsed document onto pages of the given geometry.
///
/// Always produces at least one page.
pub fn layout(parsed: ParsedHtml, geom: &PageGeometry) -> LaidOut {
    let mut images = Vec::new();
    let ParsedHtml { header, body, .. } = parsed;

    let (header_stream, body_top) = layout_header(header, geom, &mut images);
    let width = geom.content_width();
    let body_pieces = pieces(body, width, &mut images);

    let bottom = geom.height - geom.margin_bottom;
    let mut pages = Vec::new();
    let mut current = header_stream.clone();
    let mut y = body_top;

    for piece in body_pieces {
        let height = piece.height();
        if let Piece::Gap(_) = piece {
            if y > body_top {
                y += height;
            }
            continue;
        }
        if y + height > bottom && y > body_top {
            pages.push(std::mem::replace(&mut current, header_stream.clone()));
            y = body_top;
        }
        piece.draw(&mut current, geom.margin, width, y, geom.height);
        y += height;
    }
    pages.push(current);

    LaidOut { pages, images }
}

/// Lay out the header once. Returns its content stream and the top of the
/// body area.
fn layout_header(
    header: Vec<Block>,
    geom: &PageGeometry,
    images: &mut Vec<RasterImage>,
) -> (String, f32) {
    let top = geom.margin;
    if header.is_empty() {
        return (String::new(), top);
    }

    let mut out = String::new();
    let mut blocks = header.into_iter().peekable();
    let mut column_x = geom.margin;
    let mut column_width = geom.content_width();
    let mut logo_height = 0.0_f32;

    let leads_with_logo = matches!(
        blocks.peek(),
        Some(Block::Image(_)) | Some(Block::Placeholder { .. })
    );
    if leads_with_logo {
        if let Some(logo) = blocks.next() {
            for piece in pieces(vec![logo], LOGO_BOX, images) {
                piece.draw(&mut out, geom.margin, LOGO_BOX, top, geom.height);
                logo_height = logo_height.max(piece.height());
            }
        }
        column_x += LOGO_BOX + HEADER_GUTTER;
        column_width -= LOGO_BOX + HEADER_GUTTER;
    }

    let mut y = top;
    let column: Vec<Piece> = pieces(blocks.collect(), column_width, images);
    let trailing_gaps = column
        .iter()
        .rev()
        .take_while(|p| matches!(p, Piece::Gap(_)))
        .count();
    for piece in &column[..column.len() - trailing_gaps] {
        piece.draw(&mut out, column_x, column_width, y, geom.height);
        y += piece.height();
    }

    let header_bottom = y.max(top + logo_height);
    Piece::Rule.draw(
        &mut out,
        geom.margin,
        geom.content_width(),
        header_bottom,
        geom.height,
    );
    (out, header_bottom + Piece::Rule.height() + 6.0)
}

/// Break blocks into pieces, wrapping text to `width` and registering images.
fn pieces(blocks: Vec<Block>, width: f32, images: &mut Vec<RasterImage>) -> Vec<Piece> {
    let mut out = Vec::new();
    for block in blocks {
        match block {
            Block::Text { lines, style } => {
                if style.size >= 12.0 && !out.is_empty() {
                    out.push(Piece::Gap(style.size * 0.4));
                }
                for line in &lines {
                    if line.is_empty() {
                        out.push(Piece::Gap(style.size * LINE_SPACING));
                        continue;
                    }
                    for wrapped in wrap(line, width, &style) {
                        out.push(Piece::Line {
                            text: wrapped,
                            style,
                        });
                    }
                }
                out.push(Piece::Gap(style.size * 0.6));
            }
            Block::Image(image) => {
                let scale = (LOGO_BOX / image.width.max(1) as f32)
                    .min(LOGO_BOX / image.height.max(1) as f32)
                    .min(1.0);
                let piece = Piece::Image {
                    id: images.len(),
                    width: image.width as f32 * scale,
                    height: image.height as f32 * scale,
                };
                images.push(image);
                out.push(piece);
            }
            Block::Placeholder { lines } => out.push(Piece::Placeholder { lines }),
            Block::Rule => out.push(Piece::Rule),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Text metrics
// ---------------------------------------------------------------------------

/// Approximate Helvetica advance width in ems.
fn char_em(c: char, bold: bool) -> f32 {
    let base = match c {
        'i' | 'j' | 'l' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.25,
        ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '/' | '-' => 0.32,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.85,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.556,
        _ => 0.52,
    };
    if bold {
        base * 1.06
    } else {
        base
    }
}

pub fn text_width(text: &str, style: &TextStyle) -> f32 {
    text.chars().map(|c| char_em(c, style.bold)).sum::<f32>() * style.size
}

/// Greedy word wrap. Words wider than the line are split by character.
pub fn wrap(text: &str, width: f32, style: &TextStyle) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, style) <= width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, style) <= width {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if text_width(&current, style) > width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Append a single-line text operator. `y` is the PDF baseline.
pub fn text_op(out: &mut String, x: f32, y: f32, style: &TextStyle, text: &str) {
    let font = if style.bold { "F2" } else { "F1" };
    let gray = if style.muted { MUTED_GRAY } else { 0.0 };
    let _ = writeln!(
        out,
        "BT /{font} {:.1} Tf {gray:.2} g {x:.2} {y:.2} Td ({}) Tj ET",
        style.size,
        escape_pdf_string(text)
    );
}

/// Escape text for a PDF literal string in WinAnsiEncoding.
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '\n' | '\r' | '\t' => result.push(' '),
            '\u{20ac}' => result.push_str("\\200"),
            '\u{2018}' => result.push_str("\\221"),
            '\u{2019}' => result.push_str("\\222"),
            '\u{201c}' => result.push_str("\\223"),
            '\u{201d}' => result.push_str("\\224"),
            '\u{2022}' => result.push_str("\\225"),
            '\u{2013}' => result.push_str("\\226"),
            '\u{2014}' => result.push_str("\\227"),
            '\u{2122}' => result.push_str("\\231"),
            _ if c.is_ascii() && !c.is_ascii_control() => result.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(result, "\\{:03o}", c as u32);
            }
            _ => result.push('?'),
        }
    }
    result
}
