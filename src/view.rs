//! View assembly: pairs each table of the record with per-cell styles and
//! hands the result to a [`TableRenderer`].
//!
//! Assembly borrows the record and copies cell text out of it, so rendering
//! can never mutate the underlying tables. Row order is preserved.

use crate::highlight::{biochemical_row_styles, tint_styles, TableCategory, ABNORMAL_STYLE};
use crate::record::{
    BiochemicalReading, ClinicalRecord, FamilyHistoryEntry, GenomicFinding, ImagingFinding,
    RiskScoreEntry,
};
use crate::{Error, Result};
use log::debug;
use std::fmt::Write as _;

/// A table ready for rendering: cell text plus one style string per cell,
/// aligned by row and column index. An empty style means "unstyled".
#[derive(Debug, Clone, PartialEq)]
pub struct StyledTable {
    pub category: TableCategory,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub styles: Vec<Vec<String>>,
}

impl StyledTable {
    pub fn title(&self) -> &'static str {
        self.category.title()
    }

    /// True when `styles` has exactly one entry per cell
    pub fn is_aligned(&self) -> bool {
        self.styles.len() == self.rows.len()
            && self
                .rows
                .iter()
                .zip(&self.styles)
                .all(|(r, s)| r.len() == self.headers.len() && s.len() == r.len())
    }

    /// Whether row `i` carries the abnormal highlight
    pub fn is_highlighted(&self, i: usize) -> bool {
        self.styles
            .get(i)
            .map(|s| s.iter().any(|c| c == ABNORMAL_STYLE))
            .unwrap_or(false)
    }
}

/// Format a measured value without a trailing `.0` for whole numbers.
pub fn format_value(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{}", v)
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn tinted(category: TableCategory, header_names: &[&str], rows: Vec<Vec<String>>) -> StyledTable {
    let cols = header_names.len();
    let styles = tint_styles(category, rows.len(), cols);
    debug!("assembled {} table with {} rows", category.title(), rows.len());
    StyledTable { category, headers: headers(header_names), rows, styles }
}

pub fn assemble_biochemical(readings: &[BiochemicalReading]) -> StyledTable {
    let header_names = ["Parameter", "Value", "Reference Range"];
    let rows: Vec<Vec<String>> = readings
        .iter()
        .map(|r| vec![r.parameter.clone(), format_value(r.value), r.reference_range.clone()])
        .collect();
    let styles = readings
        .iter()
        .map(|r| biochemical_row_styles(r, header_names.len()))
        .collect();
    debug!("assembled biochemical table with {} rows", rows.len());
    StyledTable {
        category: TableCategory::Biochemical,
        headers: headers(&header_names),
        rows,
        styles,
    }
}

pub fn assemble_pharmacogenomics(findings: &[GenomicFinding]) -> StyledTable {
    let rows = findings.iter().map(|f| vec![f.gene.clone(), f.genotype.clone()]).collect();
    tinted(TableCategory::Pharmacogenomics, &["Gene", "Genotype"], rows)
}

pub fn assemble_risk_scores(entries: &[RiskScoreEntry]) -> StyledTable {
    let rows = entries.iter().map(|e| vec![e.trait_name.clone(), e.risk.clone()]).collect();
    tinted(TableCategory::RiskScore, &["Trait", "Risk Score"], rows)
}

pub fn assemble_family_history(entries: &[FamilyHistoryEntry]) -> StyledTable {
    let rows = entries
        .iter()
        .map(|e| vec![e.relative.label().to_string(), e.condition.clone()])
        .collect();
    tinted(TableCategory::FamilyHistory, &["Relative", "Condition"], rows)
}

/// Imaging tables share one shape; `category` selects Echo or MRI tinting.
pub fn assemble_imaging(category: TableCategory, findings: &[ImagingFinding]) -> StyledTable {
    let rows = findings.iter().map(|f| vec![f.finding.clone(), f.result.clone()]).collect();
    tinted(category, &["Finding", "Result"], rows)
}

/// Every table of the record in page order
pub fn assemble_all(record: &ClinicalRecord) -> Vec<StyledTable> {
    vec![
        assemble_biochemical(&record.biochemical),
        assemble_pharmacogenomics(&record.pharmacogenomics),
        assemble_risk_scores(&record.risk_scores),
        assemble_family_history(&record.family_history),
        assemble_imaging(TableCategory::Echo, &record.echo),
        assemble_imaging(TableCategory::Mri, &record.mri),
    ]
}

/// Rendering collaborator for styled tables
pub trait TableRenderer {
    /// Render a single table
    fn render_table(&self, table: &StyledTable) -> Result<String>;

    /// Render several tables one after another
    fn render_tables(&self, tables: &[StyledTable]) -> Result<String> {
        let mut out = String::new();
        for t in tables {
            out.push_str(&self.render_table(t)?);
        }
        Ok(out)
    }
}

fn check_aligned(table: &StyledTable) -> Result<()> {
    if table.is_aligned() {
        Ok(())
    } else {
        Err(Error::Render(format!(
            "{} table has styles that do not match its cells",
            table.title()
        )))
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Emits `<table>` markup with an inline `style` on every styled cell
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl TableRenderer for HtmlRenderer {
    fn render_table(&self, table: &StyledTable) -> Result<String> {
        check_aligned(table)?;
        let mut html = String::new();
        writeln!(html, "<table class=\"data\" id=\"{}-table\">", table.category.slug())?;
        html.push_str("<thead><tr>");
        for h in &table.headers {
            write!(html, "<th>{}</th>", escape_html(h))?;
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for (row, styles) in table.rows.iter().zip(&table.styles) {
            html.push_str("<tr>");
            for (cell, style) in row.iter().zip(styles) {
                if style.is_empty() {
                    write!(html, "<td>{}</td>", escape_html(cell))?;
                } else {
                    write!(html, "<td style=\"{}\">{}</td>", escape_html(style), escape_html(cell))?;
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
        Ok(html)
    }
}

/// Plain-text grid for terminals. Highlighted rows are prefixed with `!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TableRenderer for TextRenderer {
    fn render_table(&self, table: &StyledTable) -> Result<String> {
        check_aligned(table)?;
        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
        for row in &table.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        writeln!(out, "{}", table.title())?;
        writeln!(out, "{}", "=".repeat(table.title().len()))?;
        writeln!(out, "  {}", line(&table.headers))?;
        for (i, row) in table.rows.iter().enumerate() {
            let marker = if table.is_highlighted(i) { '!' } else { ' ' };
            writeln!(out, "{} {}", marker, line(row))?;
        }
        out.push('\n');
        Ok(out)
    }
}
