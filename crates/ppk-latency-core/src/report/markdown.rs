//! Markdown rendering of a latency report

use super::LatencyReport;

/// Text rendered when there is nothing to summarise
pub const NO_DATA: &str = "No measurements available.";

const TABLE_HEADER: &str =
    "| Packet Number | TX Trigger Time (ms) | RX Trigger Time (ms) | Latency (ms) |\n";
const TABLE_RULE: &str =
    "|---------------|---------------------|---------------------|-------------|\n";

/// Render `report` as a markdown document
///
/// Summary statistics use three decimals, table cells two.
pub fn render(report: &LatencyReport) -> String {
    let Some(summary) = report.summary else {
        return NO_DATA.to_string();
    };

    let mut out = String::from("## UDP Latency Analysis Results\n\n");
    out.push_str("**Summary Statistics:**\n");
    out.push_str(&format!("- Total Packets: {}\n", summary.count));
    out.push_str(&format!("- Average Latency: {:.3} ms\n", summary.mean));
    out.push_str(&format!("- Minimum Latency: {:.3} ms\n", summary.min));
    out.push_str(&format!("- Maximum Latency: {:.3} ms\n\n", summary.max));

    out.push_str(TABLE_HEADER);
    out.push_str(TABLE_RULE);
    for m in &report.measurements {
        out.push_str(&format!(
            "| {} | {:.2} | {:.2} | {:.2} |\n",
            m.index, m.send_time, m.receive_time, m.latency
        ));
    }

    out.push_str(TABLE_RULE);
    out.push_str(&summary_row("Average", summary.mean));
    out.push_str(&summary_row("Minimum", summary.min));
    out.push_str(&summary_row("Maximum", summary.max));

    if !report.unmatched.is_empty() {
        out.push_str("\n### Unmatched TX Triggers\n\n");
        out.push_str("| Packet Number | TX Trigger Time (ms) |\n");
        out.push_str("|---------------|---------------------|\n");
        for u in &report.unmatched {
            out.push_str(&format!("| {} | {:.2} |\n", u.index, u.send_time));
        }
    }

    out
}

fn summary_row(label: &str, value: f64) -> String {
    format!("| **{label}** | - | - | **{value:.2}** |\n")
}
