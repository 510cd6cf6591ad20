//! Paint command set for the pedigree chart

use super::layout::{PedigreeLayout, Shape};

pub type Rgba = (u8, u8, u8, u8);

const STROKE: Rgba = (0, 0, 0, 255);
const FILL: Rgba = (255, 255, 255, 255);
const PROBAND_FILL: Rgba = (255, 244, 204, 255);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: Rgba,
        stroke: Rgba,
        stroke_width: u32,
    },
    Ellipse {
        cx: i32,
        cy: i32,
        rx: u32,
        ry: u32,
        rgba: Rgba,
        stroke: Rgba,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        stroke: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
    },
}

/// Turn a layout into paint commands: connectors first so node symbols are
/// drawn on top of them, then one symbol and one label per node.
pub fn paint_layout(layout: &PedigreeLayout) -> Vec<PaintCommand> {
    let mut cmds = Vec::with_capacity(layout.edges.len() + layout.nodes.len() * 2);
    for (a, b) in &layout.edges {
        cmds.push(PaintCommand::Line { x1: a.x, y1: a.y, x2: b.x, y2: b.y, stroke: STROKE });
    }
    for node in &layout.nodes {
        let r = node.rect;
        let cmd = match node.shape {
            Shape::Square => PaintCommand::SolidRect {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                rgba: FILL,
                stroke: STROKE,
                stroke_width: 1,
            },
            Shape::Proband => PaintCommand::SolidRect {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                rgba: PROBAND_FILL,
                stroke: STROKE,
                stroke_width: 2,
            },
            Shape::Circle => PaintCommand::Ellipse {
                cx: r.center_x(),
                cy: r.y + (r.height / 2) as i32,
                rx: r.width / 2,
                ry: r.height / 2,
                rgba: FILL,
                stroke: STROKE,
            },
        };
        cmds.push(cmd);
        cmds.push(PaintCommand::Text {
            x: r.center_x(),
            y: r.y + (r.height / 2) as i32 + 5,
            text: node.label.clone(),
        });
    }
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::Pedigree;
    use crate::record::ClinicalRecord;
    use crate::rendering::layout::layout_pedigree;

    #[test]
    fn lines_are_painted_before_nodes() {
        let r = ClinicalRecord::sample();
        let p = Pedigree::build(&r.patient, &r.family_history).unwrap();
        let cmds = paint_layout(&layout_pedigree(&p).unwrap());
        assert_eq!(cmds.len(), 6 + 5 * 2);
        assert!(cmds[..6].iter().all(|c| matches!(c, PaintCommand::Line { .. })));
        let texts: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"John Doe"));
    }
}
