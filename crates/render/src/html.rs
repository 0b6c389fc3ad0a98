//! Parser for the HTML subset produced by the report template.
//!
//! The output is a flat list of blocks split into the repeating page header
//! (everything inside `<header>`) and the flowing body. Inline markup is
//! flattened into its enclosing block; styling comes from the block tag and
//! a handful of class hints (`center`, `muted`, `small`, `logo-placeholder`).

use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;

use crate::error::RenderError;

/// Raster logos are downscaled to this many pixels on their longest side.
const MAX_IMAGE_PIXELS: u32 = 160;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<!(?:[^>]*)>|<(/?)([A-Za-z][A-Za-z0-9]*)([^>]*)>|([^<]+)")
        .expect("valid token regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Visual style of a text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: Align,
    pub muted: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 11.0,
            bold: false,
            align: Align::Left,
            muted: false,
        }
    }
}

/// Decoded RGB image ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Row-major 8-bit RGB samples.
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Text split into hard lines (`<br>`); soft wrapping happens in layout.
    Text { lines: Vec<String>, style: TextStyle },
    Image(RasterImage),
    /// Empty box standing in for a logo that could not be embedded.
    Placeholder { lines: Vec<String> },
    Rule,
}

/// Result of parsing a report document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedHtml {
    pub title: Option<String>,
    pub header: Vec<Block>,
    pub body: Vec<Block>,
}

#[derive(Debug, Clone)]
struct Frame {
    tag: String,
    style: TextStyle,
}

#[derive(Default)]
struct Parser {
    stack: Vec<Frame>,
    out: ParsedHtml,
    in_header: bool,
    in_title: bool,
    skip_depth: usize,
    /// Stack depth of an open `logo-placeholder` element.
    placeholder_depth: Option<usize>,
    title: String,
    text: String,
    text_style: Option<TextStyle>,
}

/// Parse report HTML into blocks.
pub fn parse(html: &str) -> Result<ParsedHtml, RenderError> {
    let mut parser = Parser::default();

    for caps in TOKEN_RE.captures_iter(html) {
        if let Some(name) = caps.get(2) {
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let tag = name.as_str().to_ascii_lowercase();
            let attrs = caps.get(3).map_or("", |m| m.as_str());
            if closing {
                parser.close(&tag);
            } else {
                parser.open(&tag, attrs)?;
            }
        } else if let Some(text) = caps.get(4) {
            parser.text(text.as_str());
        }
    }

    parser.flush();
    let title = parser.title.trim().to_string();
    parser.out.title = (!title.is_empty()).then_some(title);
    Ok(parser.out)
}

impl Parser {
    fn current_style(&self) -> TextStyle {
        self.stack.last().map(|f| f.style).unwrap_or_default()
    }

    fn open(&mut self, tag: &str, attrs: &str) -> Result<(), RenderError> {
        if self.skip_depth > 0 {
            if matches!(tag, "style" | "script") {
                self.skip_depth += 1;
            }
            return Ok(());
        }

        match tag {
            "style" | "script" => {
                self.skip_depth = 1;
                return Ok(());
            }
            "title" => {
                self.in_title = true;
                return Ok(());
            }
            "br" => {
                self.text.push('\n');
                return Ok(());
            }
            "hr" => {
                self.flush();
                self.push_block(Block::Rule);
                return Ok(());
            }
            "img" => {
                self.flush();
                let src = attr(attrs, "src").unwrap_or_default();
                let image = decode_data_uri(&src)?;
                self.push_block(Block::Image(image));
                return Ok(());
            }
            "meta" | "link" | "input" => return Ok(()),
            _ => {}
        }

        if is_block(tag) {
            self.flush();
        }
        if tag == "header" {
            self.in_header = true;
        }

        let classes = attr(attrs, "class").unwrap_or_default();
        let mut style = self.current_style();
        match tag {
            "h1" => {
                style.size = 18.0;
                style.bold = true;
            }
            "h2" => {
                style.size = 14.0;
                style.bold = true;
            }
            "h3" => {
                style.size = 12.0;
                style.bold = true;
            }
            "strong" | "b" | "th" => style.bold = true,
            _ => {}
        }
        for class in classes.split_whitespace() {
            match class {
                "center" => style.align = Align::Center,
                "muted" => style.muted = true,
                "small" => style.size = 9.0,
                "logo-placeholder" if self.placeholder_depth.is_none() => {
                    self.placeholder_depth = Some(self.stack.len());
                }
                _ => {}
            }
        }

        let self_closing = attrs.trim_end().ends_with('/');
        if !self_closing {
            self.stack.push(Frame {
                tag: tag.to_string(),
                style,
            });
        }
        Ok(())
    }

    fn close(&mut self, tag: &str) {
        if self.skip_depth > 0 {
            if matches!(tag, "style" | "script") {
                self.skip_depth -= 1;
            }
            return;
        }
        if tag == "title" {
            self.in_title = false;
            return;
        }

        let Some(pos) = self.stack.iter().rposition(|f| f.tag == tag) else {
            return;
        };

        if self.placeholder_depth == Some(pos) {
            let lines = take_lines(&mut self.text);
            self.text_style = None;
            self.stack.truncate(pos);
            self.placeholder_depth = None;
            self.push_block(Block::Placeholder { lines });
            return;
        }

        if is_block(tag) {
            self.flush();
        }
        self.stack.truncate(pos);
        if tag == "header" {
            self.in_header = false;
        }
    }

    fn text(&mut self, raw: &str) {
        if self.skip_depth > 0 {
            return;
        }
        let decoded = html_escape::decode_html_entities(raw);
        if self.in_title {
            self.title.push_str(&collapse_whitespace(&decoded));
            return;
        }
        if self.stack.iter().any(|f| f.tag == "head") {
            return;
        }

        let collapsed = collapse_whitespace(&decoded);
        if collapsed.trim().is_empty() && self.text.is_empty() {
            return;
        }
        if self.text_style.is_none() {
            self.text_style = Some(self.current_style());
        }
        self.text.push_str(&collapsed);
    }

    /// Emit buffered text as a block.
    fn flush(&mut self) {
        if self.placeholder_depth.is_some() {
            return;
        }
        let style = self.text_style.take().unwrap_or_default();
        let lines = take_lines(&mut self.text);
        if !lines.is_empty() {
            self.push_block(Block::Text { lines, style });
        }
    }

    fn push_block(&mut self, block: Block) {
        if self.in_header {
            self.out.header.push(block);
        } else {
            self.out.body.push(block);
        }
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "html"
            | "body"
            | "header"
            | "footer"
            | "main"
            | "section"
            | "article"
            | "div"
            | "p"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "ul"
            | "ol"
            | "li"
            | "table"
            | "tr"
    )
}

/// Drain the text buffer into trimmed hard lines, dropping blank ones at
/// the edges.
fn take_lines(buffer: &mut String) -> Vec<String> {
    let text = std::mem::take(buffer);
    let mut lines: Vec<String> = text.split('\n').map(|l| l.trim().to_string()).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading);
    lines
}

fn attr(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(attrs).find_map(|caps| {
        let key = caps.get(1)?.as_str();
        if !key.eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .map(|v| html_escape::decode_html_entities(v.as_str()).into_owned())
    })
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() && c != '\u{a0}' {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(if c == '\u{a0}' { ' ' } else { c });
            in_space = false;
        }
    }
    out
}

/// Decode a base64 `data:` URI into RGB pixels, compositing any alpha
/// channel over white.
fn decode_data_uri(src: &str) -> Result<RasterImage, RenderError> {
    let payload = src
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, data)| data)
        .ok_or_else(|| RenderError::InvalidImageSource(truncate(src, 40)))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::InvalidImageSource(e.to_string()))?;

    let decoded = image::load_from_memory(&bytes)?;
    let decoded = if decoded.width() > MAX_IMAGE_PIXELS || decoded.height() > MAX_IMAGE_PIXELS {
        decoded.thumbnail(MAX_IMAGE_PIXELS, MAX_IMAGE_PIXELS)
    } else {
        decoded
    };

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let alpha = u16::from(a);
        for channel in [r, g, b] {
            let blended = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
            rgb.push(blended as u8);
        }
    }

    Ok(RasterImage { width, height, rgb })
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
