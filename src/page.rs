//! Full dashboard page.
//!
//! The page is rebuilt from the record on every call; nothing is cached
//! between renders.

use crate::pedigree::Pedigree;
use crate::record::ClinicalRecord;
use crate::rendering::render_pedigree_svg;
use crate::theme::Theme;
use crate::view::{assemble_all, escape_html, HtmlRenderer, TableRenderer};
use crate::{DashboardConfig, Result};
use base64::Engine as _;
use log::debug;
use std::fmt::Write as _;

pub const DASHBOARD_HEADING: &str = "Patient Biochemical Parameters Dashboard";
pub const LOGO_CAPTION: &str = "Curiosity - Powered by NMC Genetics";

/// Per-view choices made by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageOptions {
    pub theme: Theme,
    pub show_reference_ranges: bool,
}

impl PageOptions {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            theme: config.default_theme,
            show_reference_ranges: config.show_reference_ranges,
        }
    }
}

const BASE_CSS: &str = "\
*{box-sizing:border-box;}
body{margin:0;font-family:Arial,Helvetica,sans-serif;display:flex;min-height:100vh;}
.sidebar{width:260px;padding:16px;background:rgba(128,128,128,0.12);}
main{flex:1;padding:20px 32px;}
h1{margin:8px 0 16px 0;font-size:26px;}
h2{margin:24px 0 8px 0;font-size:20px;}
.logo img{width:100%;max-height:60px;object-fit:contain;}
figure{margin:0 0 12px 0;}
figcaption{font-size:12px;opacity:0.8;}
table.data{border-collapse:collapse;min-width:420px;}
table.data th,table.data td{border:1px solid #ccc;padding:4px 10px;text-align:left;color:black;}
table.data th{background:#e8e8e8;}
svg.pedigree{background:#fff;border:1px solid #ddd;}
fieldset{border:none;padding:0;margin:0 0 12px 0;}
";

/// An inline SVG placeholder as a base64 `data:` URI, so the page renders
/// without network access.
pub fn placeholder_image(width: u32, height: u32, text: &str) -> String {
    let svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\"><rect width=\"100%\" height=\"100%\" fill=\"#cccccc\"/><text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"14\" fill=\"#555555\">{t}</text></svg>",
        w = width,
        h = height,
        t = escape_html(text)
    );
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
    )
}

fn write_sidebar(html: &mut String, options: &PageOptions, config: &DashboardConfig) -> Result<()> {
    html.push_str("<aside class=\"sidebar\">\n<h2>Instructions</h2>\n<ol>\n");
    html.push_str("<li>Build the dashboard: <code>cargo build --release</code></li>\n");
    writeln!(
        html,
        "<li>Start the server: <code>curiosity serve --addr {}</code></li>",
        escape_html(&config.addr)
    )?;
    writeln!(html, "<li>Open <code>http://{}/</code> in a browser</li>", escape_html(&config.addr))?;
    html.push_str("</ol>\n<h2>Settings</h2>\n<form method=\"get\" action=\"/\" id=\"settings\">\n");
    html.push_str("<fieldset><legend>Choose Theme</legend>\n");
    for theme in Theme::ALL {
        writeln!(
            html,
            "<label><input type=\"radio\" name=\"theme\" value=\"{name}\"{checked}/> {name}</label><br/>",
            name = theme.name(),
            checked = if theme == options.theme { " checked" } else { "" }
        )?;
    }
    html.push_str("</fieldset>\n");
    if options.show_reference_ranges {
        html.push_str("<input type=\"hidden\" name=\"ranges\" value=\"on\"/>\n");
    }
    html.push_str("<button type=\"submit\">Apply</button>\n</form>\n</aside>\n");
    Ok(())
}

fn write_patient(html: &mut String, record: &ClinicalRecord, config: &DashboardConfig) -> Result<()> {
    let photo = config
        .photo_url
        .clone()
        .unwrap_or_else(|| placeholder_image(150, 150, "Patient"));
    let p = &record.patient;
    html.push_str("<section id=\"patient\">\n<h2>Patient Information</h2>\n");
    writeln!(
        html,
        "<figure><img src=\"{}\" alt=\"Patient Photo\" width=\"150\"/><figcaption>Patient Photo</figcaption></figure>",
        escape_html(&photo)
    )?;
    writeln!(html, "<p><strong>Name:</strong> {}</p>", escape_html(&p.name))?;
    writeln!(html, "<p><strong>Age:</strong> {}</p>", p.age)?;
    writeln!(
        html,
        "<p><strong>Clinical Classification:</strong> {}</p>",
        escape_html(&p.clinical_classification)
    )?;
    html.push_str("</section>\n");
    Ok(())
}

fn write_reference_ranges(html: &mut String, record: &ClinicalRecord, options: &PageOptions) -> Result<()> {
    html.push_str("<form method=\"get\" action=\"/\" id=\"ranges-toggle\">\n");
    writeln!(html, "<input type=\"hidden\" name=\"theme\" value=\"{}\"/>", options.theme.name())?;
    writeln!(
        html,
        "<label><input type=\"checkbox\" name=\"ranges\" value=\"on\"{}/> Show Reference Ranges</label>",
        if options.show_reference_ranges { " checked" } else { "" }
    )?;
    html.push_str("<button type=\"submit\">Update</button>\n</form>\n");

    if options.show_reference_ranges {
        html.push_str("<section id=\"reference-ranges\">\n<p><strong>Reference Ranges:</strong></p>\n<ul>\n");
        for r in &record.biochemical {
            writeln!(
                html,
                "<li>{}: {}</li>",
                escape_html(&r.parameter),
                escape_html(&r.reference_range)
            )?;
        }
        html.push_str("</ul>\n</section>\n");
    }
    Ok(())
}

/// Render the complete dashboard document for `record`.
pub fn render_page(record: &ClinicalRecord, options: &PageOptions, config: &DashboardConfig) -> Result<String> {
    let tables = assemble_all(record);
    let pedigree = Pedigree::build(&record.patient, &record.family_history)?;
    let pedigree_svg = render_pedigree_svg(&pedigree)?;
    let logo = config
        .logo_url
        .clone()
        .unwrap_or_else(|| placeholder_image(150, 50, "Curiosity"));

    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\"/>\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n");
    writeln!(html, "<title>{}</title>", escape_html(&config.page_title))?;
    writeln!(html, "<style>\n{}</style>", BASE_CSS)?;
    writeln!(html, "{}", options.theme.style_directive())?;
    html.push_str("</head>\n");
    writeln!(html, "<body class=\"theme-{}\">", options.theme.name().to_ascii_lowercase())?;

    write_sidebar(&mut html, options, config)?;

    html.push_str("<main>\n");
    writeln!(
        html,
        "<figure class=\"logo\"><img src=\"{}\" alt=\"Curiosity logo\"/><figcaption>{}</figcaption></figure>",
        escape_html(&logo),
        LOGO_CAPTION
    )?;
    writeln!(html, "<h1>{}</h1>", DASHBOARD_HEADING)?;
    write_patient(&mut html, record, config)?;

    let renderer = HtmlRenderer;
    for table in &tables {
        writeln!(
            html,
            "<section id=\"{}\">\n<h2>{}</h2>",
            table.category.slug(),
            table.title()
        )?;
        html.push_str(&renderer.render_table(table)?);
        html.push_str("</section>\n");
    }

    html.push_str("<section id=\"pedigree\">\n<h2>Pedigree Chart</h2>\n");
    html.push_str(&pedigree_svg);
    html.push_str("</section>\n");

    write_reference_ranges(&mut html, record, options)?;

    html.push_str("</main>\n</body>\n</html>\n");
    debug!(
        "rendered page ({} bytes, theme {}, ranges {})",
        html.len(),
        options.theme,
        options.show_reference_ranges
    );
    Ok(html)
}
