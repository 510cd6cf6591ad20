//! SVG serialization of paint commands

use super::paint::{PaintCommand, Rgba};
use crate::view::escape_html;
use std::fmt::Write as _;

fn color(c: Rgba) -> String {
    if c.3 == 255 {
        format!("#{:02x}{:02x}{:02x}", c.0, c.1, c.2)
    } else {
        format!("rgba({},{},{},{:.3})", c.0, c.1, c.2, c.3 as f32 / 255.0)
    }
}

/// Serialize `cmds` into a standalone `<svg>` element.
pub fn to_svg(width: u32, height: u32, cmds: &[PaintCommand]) -> crate::Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" class=\"pedigree\">",
        w = width,
        h = height
    )?;
    for cmd in cmds {
        match cmd {
            PaintCommand::SolidRect { x, y, width, height, rgba, stroke, stroke_width } => writeln!(
                out,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                x,
                y,
                width,
                height,
                color(*rgba),
                color(*stroke),
                stroke_width
            )?,
            PaintCommand::Ellipse { cx, cy, rx, ry, rgba, stroke } => writeln!(
                out,
                "  <ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\"/>",
                cx,
                cy,
                rx,
                ry,
                color(*rgba),
                color(*stroke)
            )?,
            PaintCommand::Line { x1, y1, x2, y2, stroke } => writeln!(
                out,
                "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\"/>",
                x1,
                y1,
                x2,
                y2,
                color(*stroke)
            )?,
            PaintCommand::Text { x, y, text } => writeln!(
                out,
                "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"13\" fill=\"#000000\">{}</text>",
                x,
                y,
                escape_html(text)
            )?,
        }
    }
    out.push_str("</svg>\n");
    Ok(out)
}
