//! HTML template for generated reports.

use pdfdesk_core::types::Timestamp;
use pdfdesk_core::validation::ReportInput;

use crate::logo::LogoMarkup;

const STYLE: &str = "\
body { font-family: Helvetica, Arial, sans-serif; font-size: 11pt; color: #222; margin: 0; }
header { display: flex; align-items: center; border-bottom: 2px solid #333; padding-bottom: 10px; }
header .logo { max-width: 80px; max-height: 80px; margin-right: 14px; }
.logo-placeholder { width: 80px; height: 80px; border: 1px dashed #999; text-align: center; font-size: 8pt; color: #999; }
h1 { font-size: 18pt; margin: 24px 0 4px; }
.muted { color: #666; }
.small { font-size: 9pt; }
.center { text-align: center; }
";

/// Escape `text` and turn its line breaks into `<br>`.
fn escape_multiline(text: &str) -> String {
    html_escape::encode_text(&text.replace("\r\n", "\n")).replace('\n', "<br>\n")
}

/// Build the report document for `input`.
pub fn report_html(input: &ReportInput, logo: &LogoMarkup, generated_at: Timestamp) -> String {
    let title = html_escape::encode_text(&input.title);
    let phone = input
        .phone
        .as_deref()
        .map(|p| {
            format!(
                "<p class=\"muted small\">Phone: {}</p>\n",
                html_escape::encode_text(p)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{STYLE}</style>
</head>
<body>
<header>
{logo}
<div class="institution">
<h2>{institution}</h2>
<p class="muted small">{address}</p>
{phone}</div>
</header>
<h1 class="center">{title}</h1>
<p class="center muted small">{date}</p>
<hr>
<div class="content">
<p>{content}</p>
</div>
</body>
</html>
"#,
        logo = logo.to_html(),
        institution = html_escape::encode_text(&input.institution_name),
        address = escape_multiline(&input.address),
        date = generated_at.format("%d %B %Y %H:%M"),
        content = escape_multiline(&input.content),
    )
}
