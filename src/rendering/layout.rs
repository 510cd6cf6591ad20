//! Layered layout for the pedigree chart

use crate::pedigree::{Pedigree, Role};
use crate::record::Relative;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn center_x(&self) -> i32 {
        self.x + (self.width / 2) as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Conventional pedigree symbols: squares for males, circles for females.
/// The proband gets its own outlined box since sex is not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    Circle,
    Proband,
}

impl Shape {
    fn for_role(role: Role) -> Shape {
        match role {
            Role::Patient => Shape::Proband,
            Role::Relative(Relative::Father | Relative::Brother) => Shape::Square,
            Role::Relative(Relative::Mother | Relative::Sister) => Shape::Circle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub shape: Shape,
    pub generation: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct PedigreeLayout {
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<LayoutNode>,
    /// Connector segments from parent bottom-center to child top-center
    pub edges: Vec<(Point, Point)>,
}

const MARGIN: u32 = 20;
const H_GAP: u32 = 30;
const V_GAP: u32 = 60;
const BOX_HEIGHT: u32 = 40;
const MIN_BOX_WIDTH: u32 = 90;
// char width 8px, same estimate the text layout uses
const CHAR_WIDTH: u32 = 8;

/// Compute a layered layout: one row per generation, rows centered
/// horizontally, nodes kept in insertion order within a row.
pub fn layout_pedigree(pedigree: &Pedigree) -> Result<PedigreeLayout> {
    let generations = pedigree.generations()?;

    let box_w = generations
        .iter()
        .map(|(n, _)| n.label.chars().count() as u32 * CHAR_WIDTH + 20)
        .max()
        .unwrap_or(0)
        .max(MIN_BOX_WIDTH);

    let depth = generations.iter().map(|(_, g)| *g).max().map_or(0, |g| g + 1);
    let mut rows: Vec<Vec<(&crate::pedigree::PedigreeNode, usize)>> = vec![Vec::new(); depth];
    for (node, g) in &generations {
        rows[*g].push((*node, *g));
    }

    let row_width = |n: usize| -> u32 {
        if n == 0 {
            0
        } else {
            n as u32 * box_w + (n as u32 - 1) * H_GAP
        }
    };
    let widest = rows.iter().map(|r| row_width(r.len())).max().unwrap_or(0);
    let width = widest + MARGIN * 2;
    let height = if depth == 0 {
        MARGIN * 2
    } else {
        depth as u32 * BOX_HEIGHT + (depth as u32 - 1) * V_GAP + MARGIN * 2
    };

    let mut nodes = Vec::with_capacity(generations.len());
    for (g, row) in rows.iter().enumerate() {
        let x0 = MARGIN + (widest - row_width(row.len())) / 2;
        let y = MARGIN + g as u32 * (BOX_HEIGHT + V_GAP);
        for (i, (node, generation)) in row.iter().enumerate() {
            nodes.push(LayoutNode {
                id: node.id.clone(),
                label: node.label.clone(),
                shape: Shape::for_role(node.role),
                generation: *generation,
                rect: Rect {
                    x: (x0 + i as u32 * (box_w + H_GAP)) as i32,
                    y: y as i32,
                    width: box_w,
                    height: BOX_HEIGHT,
                },
            });
        }
    }

    let rect_of = |id: &str| nodes.iter().find(|n| n.id == id).map(|n| n.rect);
    let edges = pedigree
        .edges()
        .into_iter()
        .filter_map(|(from, to)| {
            let (a, b) = (rect_of(from)?, rect_of(to)?);
            Some((
                Point { x: a.center_x(), y: a.bottom() },
                Point { x: b.center_x(), y: b.y },
            ))
        })
        .collect();

    Ok(PedigreeLayout { width, height, nodes, edges })
}
