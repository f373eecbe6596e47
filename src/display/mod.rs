use std::fmt::{Display, Write};

use se_material_checker_lib::blueprint::AggregationReport;

/// Indentation of the rows within a section
const INDENT: &str = "  ";

/// Writes a titled, two column section. The value column is right aligned.
fn write_section<'a, V: Display + 'a, I: Iterator<Item = (&'a String, V)> + Clone>(
    out: &mut String,
    title: &str,
    rows: I,
) {
    let _ = writeln!(out, "{}:", title);
    let width = rows.clone().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let values: Vec<(&String, String)> = rows.map(|(k, v)| (k, v.to_string())).collect();
    if values.is_empty() {
        let _ = writeln!(out, "{}none", INDENT);
        return;
    }
    let value_width = values.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    for (key, value) in values {
        let _ = writeln!(
            out,
            "{}{:<width$}  {:>value_width$}",
            INDENT,
            key,
            value,
            width = width,
            value_width = value_width
        );
    }
}

/// Writes a titled comma separated list, or `none`.
fn write_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        let _ = writeln!(out, "{}: none", title);
    } else {
        let _ = writeln!(out, "{}: {}", title, items.join(", "));
    }
}

/// Renders the report into the text that is shown to the user.
pub fn render_report(report: &AggregationReport) -> String {
    let mut out = String::new();
    write_section(
        &mut out,
        &format!("Blocks ({})", report.total_blocks()),
        report.blocks.iter(),
    );
    write_section(&mut out, "Components", report.components.iter());
    write_section(
        &mut out,
        "Materials (estimate)",
        report
            .materials_estimate
            .iter()
            .map(|(k, v)| (k, format!("{:.2}", v))),
    );
    write_list(&mut out, "Unknown blocks", &report.unknown_blocks);
    write_list(&mut out, "Unknown components", &report.unknown_components);
    if !report.fallback_names.is_empty() {
        let _ = writeln!(
            out,
            "Note: these block names were guessed from the block attributes and may be wrong: {}",
            report.fallback_names.join(", ")
        );
    }
    for anomaly in &report.anomalies {
        let _ = writeln!(out, "Warning: {}", anomaly);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_render_report() {
        let report = AggregationReport {
            blocks: BTreeMap::from([("Rail".to_owned(), 2), ("Widget".to_owned(), 1)]),
            components: BTreeMap::from([("Steel".to_owned(), 24)]),
            unknown_blocks: vec!["Widget".to_owned()],
            materials_estimate: BTreeMap::from([("Iron".to_owned(), 504.0)]),
            unknown_components: Vec::new(),
            fallback_names: Vec::new(),
            anomalies: Vec::new(),
        };
        assert_eq!(
            render_report(&report),
            "Blocks (3):\n  Rail    2\n  Widget  1\nComponents:\n  Steel  24\nMaterials (estimate):\n  Iron  504.00\nUnknown blocks: Widget\nUnknown components: none\n"
        );
    }

    #[test]
    fn test_render_empty() {
        let rendered = render_report(&AggregationReport::default());
        assert!(rendered.starts_with("Blocks (0):\n  none\n"));
        assert!(!rendered.contains("Note:"));
    }

    #[test]
    fn test_render_fallback_note() {
        let report = AggregationReport {
            fallback_names: vec!["Door".to_owned()],
            ..Default::default()
        };
        assert!(render_report(&report).contains("may be wrong: Door"));
    }
}
