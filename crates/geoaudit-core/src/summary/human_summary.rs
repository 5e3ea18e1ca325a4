//! Human-readable report renderer for a run summary.

use crate::summary::model::{HumanSummary, LineCounts};

/// Render the report body for `summary`.
///
/// One section per nonempty category, in the order fleet, schedules,
/// spatial, silent spatial alert, other layers. Returns `None` when nothing
/// changed so delivery can fall back to a neutral message.
pub fn render_report(summary: &HumanSummary) -> Option<String> {
    let totals = summary.totals();
    if totals.is_zero() {
        return None;
    }

    let mut out = String::new();

    if totals.fleet_churn > 0 {
        out.push_str("🚌 Fleet by Operator\n\n");
        for (op, delta) in summary.fleet() {
            if *delta != 0 {
                out.push_str(&format!("• {}: {:+} vehicles\n", op, delta));
            }
        }
        out.push('\n');
    }

    if totals.schedule_churn > 0 {
        out.push_str("🕒 Line Schedules\n\n");
        for (op, lines) in summary.schedules() {
            let rows: Vec<String> = lines
                .iter()
                .filter(|(_, counts)| !counts.is_empty())
                .map(|(line, counts)| schedule_row(line, counts))
                .collect();
            push_group(&mut out, op, &rows);
        }
    }

    if totals.spatial_changes > 0 {
        out.push_str("📍 Route Geometry\n\n");
        for (op, lines) in summary.spatial() {
            let rows: Vec<String> = lines
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(line, count)| format!("• Line {}: {} changes", line, count))
                .collect();
            push_group(&mut out, op, &rows);
        }

        let silent = summary.silent_spatial_changes();
        if !silent.is_empty() {
            out.push_str("⚠️ Spatial change without trip changes\n\n");
            let mut current: Option<&str> = None;
            for (op, line) in &silent {
                if current != Some(op.as_str()) {
                    if current.is_some() {
                        out.push('\n');
                    }
                    out.push_str(&format!("{}\n", op));
                    current = Some(op.as_str());
                }
                out.push_str(&format!("• Line {}\n", line));
            }
            out.push('\n');
        }
    }

    if totals.generic_churn > 0 {
        out.push_str("🗂️ Other Layers\n\n");
        for (layer, counts) in summary.generic() {
            if !counts.is_empty() {
                out.push_str(&format!(
                    "• {}: +{} added | -{} removed\n",
                    layer, counts.added, counts.removed
                ));
            }
        }
        out.push('\n');
    }

    Some(out.trim_end().to_string())
}

/// `• Line <l>: +a | -r trips (net ±n)`, omitting zero parts.
fn schedule_row(line: &str, counts: &LineCounts) -> String {
    let mut parts = Vec::new();
    if counts.added > 0 {
        parts.push(format!("+{}", counts.added));
    }
    if counts.removed > 0 {
        parts.push(format!("-{}", counts.removed));
    }
    format!(
        "• Line {}: {} trips (net {:+})",
        line,
        parts.join(" | "),
        counts.net()
    )
}

fn push_group(out: &mut String, operator: &str, rows: &[String]) {
    if rows.is_empty() {
        return;
    }
    out.push_str(operator);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out.push('\n');
}
