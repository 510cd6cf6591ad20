//! Structural checks of the rendered dashboard page

use curiosity::record::BiochemicalReading;
use curiosity::view::assemble_biochemical;
use curiosity::{
    render_page, ClinicalRecord, DashboardConfig, HtmlRenderer, PageOptions, TableRenderer, Theme,
};
use scraper::{Html, Selector};

fn render(options: PageOptions) -> Html {
    let html = render_page(&ClinicalRecord::sample(), &options, &DashboardConfig::default())
        .expect("render page");
    Html::parse_document(&html)
}

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

#[test]
fn title_and_headings() {
    let doc = render(PageOptions::default());
    let title: String = doc.select(&sel("title")).next().unwrap().text().collect();
    assert_eq!(title, "Curiosity Dashboard");
    let h1: String = doc.select(&sel("h1")).next().unwrap().text().collect();
    assert_eq!(h1, "Patient Biochemical Parameters Dashboard");

    let sidebar: Vec<String> = doc
        .select(&sel("aside.sidebar h2"))
        .map(|h| h.text().collect())
        .collect();
    assert_eq!(sidebar, vec!["Instructions", "Settings"]);
}

#[test]
fn biochemical_rows_are_highlighted_in_order() {
    let doc = render(PageOptions::default());
    let rows: Vec<_> = doc.select(&sel("#biochemical-table tbody tr")).collect();
    assert_eq!(rows.len(), 6);

    let td = sel("td");
    let params: Vec<String> = rows
        .iter()
        .map(|r| r.select(&td).next().unwrap().text().collect())
        .collect();
    assert_eq!(
        params,
        vec!["Cholesterol", "HDL", "LDL", "Triglycerides", "Blood Glucose", "Blood Pressure"]
    );
    for row in &rows {
        for cell in row.select(&td) {
            assert_eq!(cell.value().attr("style"), Some("background-color: red"));
        }
    }
}

#[test]
fn tinted_tables() {
    let doc = render(PageOptions::default());
    for (id, color) in [
        ("#pharmacogenomics-table td", "lightblue"),
        ("#risk-score-table td", "lightyellow"),
        ("#family-history-table td", "lightgreen"),
        ("#echo-table td", "lightcoral"),
        ("#mri-table td", "lightcyan"),
    ] {
        let cells: Vec<_> = doc.select(&sel(id)).collect();
        assert!(!cells.is_empty(), "no cells for {}", id);
        let expected = format!("background-color: {}", color);
        for c in cells {
            assert_eq!(c.value().attr("style"), Some(expected.as_str()));
        }
    }
}

#[test]
fn pedigree_and_reference_ranges() {
    let doc = render(PageOptions { theme: Theme::Light, show_reference_ranges: true });
    assert_eq!(doc.select(&sel("#pedigree svg")).count(), 1);
    let items: Vec<String> = doc
        .select(&sel("#reference-ranges li"))
        .map(|li| li.text().collect())
        .collect();
    assert_eq!(items.len(), 6);
    assert_eq!(items[1], "HDL: > 40 mg/dL");

    let checked: Vec<_> = doc
        .select(&sel("input[name=theme][checked]"))
        .filter_map(|i| i.value().attr("value"))
        .collect();
    assert_eq!(checked, vec!["Light"]);
}

#[test]
fn rendering_does_not_mutate_the_record() {
    let record = ClinicalRecord::sample();
    let before = record.clone();
    render_page(&record, &PageOptions::default(), &DashboardConfig::default()).unwrap();
    assert_eq!(record, before);
}

fn ferritin() -> BiochemicalReading {
    BiochemicalReading {
        parameter: "Ferritin".into(),
        value: 9999.0,
        reference_range: "20-250 ng/mL".into(),
    }
}

#[test]
fn unknown_parameter_renders_unstyled() {
    let table = assemble_biochemical(&[ferritin()]);
    assert!(table.styles[0].iter().all(|s| s.is_empty()));
    assert!(!table.is_highlighted(0));

    let html = HtmlRenderer.render_table(&table).unwrap();
    assert!(html.contains("<td>Ferritin</td><td>9999</td><td>20-250 ng/mL</td>"));
    assert!(!html.contains("style="));
}

#[test]
fn unknown_parameter_row_on_the_page() {
    let mut record = ClinicalRecord::sample();
    record.biochemical.push(ferritin());
    let html = render_page(&record, &PageOptions::default(), &DashboardConfig::default()).unwrap();
    let doc = Html::parse_document(&html);

    let rows: Vec<_> = doc.select(&sel("#biochemical-table tbody tr")).collect();
    assert_eq!(rows.len(), 7);
    let td = sel("td");
    let last: Vec<_> = rows[6].select(&td).collect();
    assert_eq!(last[0].text().collect::<String>(), "Ferritin");
    assert!(last.iter().all(|c| c.value().attr("style").is_none()));
    // the known rows keep their highlight
    assert_eq!(rows[0].select(&td).next().unwrap().value().attr("style"), Some("background-color: red"));
}
