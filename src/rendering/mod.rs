//! Pedigree rendering: layout, paint commands and SVG output

pub mod layout;
pub mod paint;
pub mod svg;

use crate::pedigree::Pedigree;
use crate::Result;

/// Lay out, paint and serialize the pedigree as an inline SVG element.
pub fn render_pedigree_svg(pedigree: &Pedigree) -> Result<String> {
    let layout = layout::layout_pedigree(pedigree)?;
    let cmds = paint::paint_layout(&layout);
    svg::to_svg(layout.width, layout.height, &cmds)
}
