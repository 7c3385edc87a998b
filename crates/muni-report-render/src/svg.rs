//! SVG backend.
//!
//! Consumes composed pages and emits the downloadable document artifact:
//! one `<svg>` element per page, stacked inside a single outer `<svg>` so
//! the whole document is one file.

use core::fmt::Write as _;

use crate::render_ir::{DrawCommand, RenderPage, TextAlign};
use crate::render_layout::LayoutConfig;

/// Render one page as a standalone `<svg>` element.
pub fn render_page(page: &RenderPage, cfg: &LayoutConfig) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = cfg.page_width,
        h = cfg.page_height,
    );
    let _ = write!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" stroke=\"#cccccc\" stroke-width=\"0.2\"/>",
        cfg.page_width, cfg.page_height,
    );
    for cmd in page.commands() {
        push_command(&mut out, cmd);
    }
    out.push_str("</svg>");
    out
}

/// Render the whole document as one artifact: pages stacked vertically in a
/// single outer `<svg>`.
pub fn render_document(pages: &[RenderPage], cfg: &LayoutConfig) -> String {
    let gap = 4.0;
    let total_height = pages.len() as f32 * (cfg.page_height + gap);
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = cfg.page_width,
        h = total_height,
    );
    for (i, page) in pages.iter().enumerate() {
        let offset = i as f32 * (cfg.page_height + gap);
        let _ = write!(out, "<g transform=\"translate(0 {offset})\">");
        let _ = write!(
            out,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" stroke=\"#cccccc\" stroke-width=\"0.2\"/>",
            cfg.page_width, cfg.page_height,
        );
        for cmd in page.commands() {
            push_command(&mut out, cmd);
        }
        out.push_str("</g>");
    }
    out.push_str("</svg>");
    out
}

fn push_command(out: &mut String, cmd: &DrawCommand) {
    match cmd {
        DrawCommand::Text(text) => {
            let anchor = match text.align {
                TextAlign::Left => "start",
                TextAlign::Center => "middle",
                TextAlign::Right => "end",
            };
            let weight = if text.bold { " font-weight=\"bold\"" } else { "" };
            let _ = write!(
                out,
                "<text x=\"{}\" y=\"{}\" font-family=\"Helvetica, sans-serif\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{}\"{}>{}</text>",
                text.x,
                text.y,
                text.tier.size(),
                text.color.to_hex(),
                anchor,
                weight,
                escape(&text.text),
            );
        }
        DrawCommand::Line(line) => {
            let _ = write!(
                out,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                line.x1,
                line.y1,
                line.x2,
                line.y2,
                line.color.to_hex(),
                line.width,
            );
        }
        DrawCommand::Rect(rect) => {
            let style = if rect.fill {
                format!("fill=\"{}\"", rect.color.to_hex())
            } else {
                format!(
                    "fill=\"none\" stroke=\"{}\" stroke-width=\"0.3\"",
                    rect.color.to_hex()
                )
            };
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}/>",
                rect.x, rect.y, rect.width, rect.height, style,
            );
        }
        DrawCommand::Polygon(polygon) => {
            let mut points = String::new();
            for (x, y) in &polygon.points {
                if !points.is_empty() {
                    points.push(' ');
                }
                let _ = write!(points, "{x},{y}");
            }
            let _ = write!(
                out,
                "<polygon points=\"{}\" fill=\"{}\"/>",
                points,
                polygon.color.to_hex(),
            );
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_ir::{Color, FontTier, PolygonCommand, TextCommand};

    #[test]
    fn page_svg_wraps_commands_in_one_svg_element() {
        let mut page = RenderPage::new(1);
        page.push_content(DrawCommand::Text(TextCommand::plain(
            10.0,
            20.0,
            "Totals & <details>",
            FontTier::Body,
        )));
        let svg = render_page(&page, &LayoutConfig::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Totals &amp; &lt;details&gt;"));
    }

    #[test]
    fn polygons_emit_their_vertex_list() {
        let mut page = RenderPage::new(1);
        page.push_content(DrawCommand::Polygon(PolygonCommand {
            points: vec![(0.0, 0.0), (10.0, 0.0), (5.0, 5.0)],
            color: Color::rgb(54, 162, 235),
        }));
        let svg = render_page(&page, &LayoutConfig::default());
        assert!(svg.contains("<polygon points=\"0,0 10,0 5,5\" fill=\"#36a2eb\"/>"));
    }

    #[test]
    fn document_svg_stacks_every_page() {
        let pages = vec![RenderPage::new(1), RenderPage::new(2)];
        let svg = render_document(&pages, &LayoutConfig::default());
        assert_eq!(svg.matches("<g transform=").count(), 2);
    }
}
