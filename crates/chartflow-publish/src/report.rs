//! Report documents rendered to HTML or Markdown

use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chartflow_core::Table;
use chartflow_render::RenderedImage;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stylesheet embedded in HTML reports unless replaced
pub const DEFAULT_STYLESHEET: &str = "\
body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; background: #f5f6fa; color: #2c3e50; }
main { max-width: 1100px; margin: 0 auto; padding: 32px; }
h1 { margin-bottom: 4px; }
.subtitle { color: #7f8c8d; margin-top: 0; }
.stats { display: flex; gap: 16px; flex-wrap: wrap; margin: 24px 0; }
.stat-card { flex: 1; min-width: 160px; background: #fff; border-radius: 8px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.stat-card .value { font-size: 28px; font-weight: bold; }
.stat-card .label { color: #7f8c8d; font-size: 14px; }
.highlight { background: #fdecea; border-left: 4px solid #e74c3c; padding: 12px 16px; margin: 16px 0; }
table { border-collapse: collapse; width: 100%; background: #fff; margin: 16px 0; }
th, td { border: 1px solid #dfe4ea; padding: 8px 12px; text-align: left; }
th { background: #34495e; color: #fff; }
figure { margin: 24px 0; text-align: center; }
figure img { max-width: 100%; }
figcaption { color: #7f8c8d; }
footer { color: #95a5a6; font-size: 12px; margin-top: 32px; }
";

/// Where an image comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// PNG bytes embedded as a data URI
    Inline(Vec<u8>),
    /// Reference relative to the report
    Path(String),
}

impl ImageSource {
    /// Value of an `src` attribute or Markdown link target
    pub fn uri(&self) -> String {
        match self {
            ImageSource::Inline(bytes) => format!("data:image/png;base64,{}", STANDARD.encode(bytes)),
            ImageSource::Path(path) => path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    /// Call-out box
    Highlight(String),
    /// `(label, value)` cards
    Stats(Vec<(String, String)>),
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Image { alt: String, source: ImageSource },
    List(Vec<String>),
    /// `(term, description)` items
    Findings(Vec<(String, String)>),
}

/// An ordered list of blocks under a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
    pub blocks: Vec<Block>,
    pub stylesheet: String,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            footer: None,
            blocks: Vec::new(),
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_stylesheet(mut self, css: impl Into<String>) -> Self {
        self.stylesheet = css.into();
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn heading(self, level: u8, text: impl Into<String>) -> Self {
        self.block(Block::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        })
    }

    pub fn paragraph(self, text: impl Into<String>) -> Self {
        self.block(Block::Paragraph(text.into()))
    }

    pub fn highlight(self, text: impl Into<String>) -> Self {
        self.block(Block::Highlight(text.into()))
    }

    pub fn stats<L: Into<String>, V: Into<String>>(self, cards: Vec<(L, V)>) -> Self {
        self.block(Block::Stats(
            cards.into_iter().map(|(l, v)| (l.into(), v.into())).collect(),
        ))
    }

    pub fn table(self, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        self.block(Block::Table { headers, rows })
    }

    /// Table cells formatted at each column's declared precision
    pub fn table_from(self, table: &Table) -> Self {
        let headers = table.column_names().map(str::to_string).collect();
        let rows = (0..table.n_rows())
            .map(|r| {
                (0..table.n_columns())
                    .map(|c| table.format_cell(c, r).unwrap_or_default())
                    .collect()
            })
            .collect();
        self.table(headers, rows)
    }

    /// Embed a rendered chart as PNG
    pub fn image_inline(self, alt: impl Into<String>, image: &RenderedImage) -> Result<Self> {
        let png = image.to_png()?;
        Ok(self.block(Block::Image {
            alt: alt.into(),
            source: ImageSource::Inline(png),
        }))
    }

    pub fn image_path(self, alt: impl Into<String>, path: impl Into<String>) -> Self {
        self.block(Block::Image {
            alt: alt.into(),
            source: ImageSource::Path(path.into()),
        })
    }

    pub fn list<S: Into<String>>(self, items: Vec<S>) -> Self {
        self.block(Block::List(items.into_iter().map(Into::into).collect()))
    }

    pub fn findings<T: Into<String>, D: Into<String>>(self, items: Vec<(T, D)>) -> Self {
        self.block(Block::Findings(
            items.into_iter().map(|(t, d)| (t.into(), d.into())).collect(),
        ))
    }

    /// Standalone HTML page with the stylesheet inlined
    pub fn to_html(&self) -> String {
        HtmlView(self).to_string()
    }

    /// Markdown with pipe tables and image links
    pub fn to_markdown(&self) -> String {
        MarkdownView(self).to_string()
    }
}

struct HtmlView<'a>(&'a ReportDocument);

impl fmt::Display for HtmlView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.0;
        let title = encode_text(&doc.title);
        writeln!(f, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>")?;
        writeln!(f, "<meta charset=\"utf-8\">")?;
        writeln!(f, "<title>{title}</title>")?;
        writeln!(f, "<style>\n{}</style>\n</head>\n<body>\n<main>", doc.stylesheet)?;
        writeln!(f, "<h1>{title}</h1>")?;
        if let Some(subtitle) = &doc.subtitle {
            writeln!(f, "<p class=\"subtitle\">{}</p>", encode_text(subtitle))?;
        }

        for block in &doc.blocks {
            match block {
                Block::Heading { level, text } => {
                    writeln!(f, "<h{level}>{}</h{level}>", encode_text(text))?;
                }
                Block::Paragraph(text) => writeln!(f, "<p>{}</p>", encode_text(text))?,
                Block::Highlight(text) => {
                    writeln!(f, "<div class=\"highlight\">{}</div>", encode_text(text))?;
                }
                Block::Stats(cards) => {
                    writeln!(f, "<div class=\"stats\">")?;
                    for (label, value) in cards {
                        writeln!(
                            f,
                            "<div class=\"stat-card\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>",
                            encode_text(value),
                            encode_text(label)
                        )?;
                    }
                    writeln!(f, "</div>")?;
                }
                Block::Table { headers, rows } => {
                    writeln!(f, "<table>\n<thead><tr>")?;
                    for h in headers {
                        write!(f, "<th>{}</th>", encode_text(h))?;
                    }
                    writeln!(f, "</tr></thead>\n<tbody>")?;
                    for row in rows {
                        write!(f, "<tr>")?;
                        for cell in row {
                            write!(f, "<td>{}</td>", encode_text(cell))?;
                        }
                        writeln!(f, "</tr>")?;
                    }
                    writeln!(f, "</tbody>\n</table>")?;
                }
                Block::Image { alt, source } => {
                    writeln!(
                        f,
                        "<figure><img src=\"{}\" alt=\"{}\"><figcaption>{}</figcaption></figure>",
                        encode_double_quoted_attribute(&source.uri()),
                        encode_double_quoted_attribute(alt),
                        encode_text(alt)
                    )?;
                }
                Block::List(items) => {
                    writeln!(f, "<ul>")?;
                    for item in items {
                        writeln!(f, "<li>{}</li>", encode_text(item))?;
                    }
                    writeln!(f, "</ul>")?;
                }
                Block::Findings(items) => {
                    writeln!(f, "<ul class=\"findings\">")?;
                    for (term, text) in items {
                        writeln!(
                            f,
                            "<li><strong>{}:</strong> {}</li>",
                            encode_text(term),
                            encode_text(text)
                        )?;
                    }
                    writeln!(f, "</ul>")?;
                }
            }
        }

        if let Some(footer) = &doc.footer {
            writeln!(f, "<footer>{}</footer>", encode_text(footer))?;
        }
        writeln!(f, "</main>\n</body>\n</html>")
    }
}

struct MarkdownView<'a>(&'a ReportDocument);

impl fmt::Display for MarkdownView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.0;
        writeln!(f, "# {}\n", doc.title)?;
        if let Some(subtitle) = &doc.subtitle {
            writeln!(f, "_{subtitle}_\n")?;
        }

        for block in &doc.blocks {
            match block {
                Block::Heading { level, text } => {
                    writeln!(f, "{} {text}\n", "#".repeat(*level as usize))?;
                }
                Block::Paragraph(text) => writeln!(f, "{text}\n")?,
                Block::Highlight(text) => writeln!(f, "> {text}\n")?,
                Block::Stats(cards) => {
                    for (label, value) in cards {
                        writeln!(f, "- **{label}:** {value}")?;
                    }
                    writeln!(f)?;
                }
                Block::Table { headers, rows } => {
                    f.write_str(&pipe_row(headers))?;
                    f.write_str(&pipe_row(&vec!["---".to_string(); headers.len()]))?;
                    for row in rows {
                        f.write_str(&pipe_row(row))?;
                    }
                    writeln!(f)?;
                }
                Block::Image { alt, source } => writeln!(f, "![{alt}]({})\n", source.uri())?,
                Block::List(items) => {
                    for item in items {
                        writeln!(f, "- {item}")?;
                    }
                    writeln!(f)?;
                }
                Block::Findings(items) => {
                    for (term, text) in items {
                        writeln!(f, "- **{term}:** {text}")?;
                    }
                    writeln!(f)?;
                }
            }
        }

        if let Some(footer) = &doc.footer {
            writeln!(f, "---\n\n_{footer}_")?;
        }
        Ok(())
    }
}

fn pipe_row(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
    format!("| {} |\n", cells.join(" | "))
}
