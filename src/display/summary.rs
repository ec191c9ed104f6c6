//! summary.rs
//! Aligned text table of a node's statistics.

use crate::analysis::Stats;
use std::fmt::Write;

/// Renders `stats` as a two-column table titled after `node`.
pub fn format_stats(node: &str, stats: &Stats) -> String {
    let rows: Vec<(&str, String)> = stats.entries().iter().map(|(k, v)| (*k, format!("{:.4}", v))).collect();
    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let val_width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    let title = format!("Stats for {}", node);
    let full_width = (key_width + val_width + 3).max(title.len());

    let mut out = String::new();
    let _ = writeln!(out, "{:^width$}", title, width = full_width);
    let _ = writeln!(out, "{}", "-".repeat(full_width));
    for (k, v) in rows {
        let _ = writeln!(out, "{:<kw$} # {:>vw$}", k, v, kw = key_width, vw = val_width);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_aligned() {
        let stats = Stats::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        let table = format_stats("profit", &stats);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0].trim(), "Stats for profit");
        assert_eq!(lines.len(), 9);
        assert!(lines[2].starts_with("mean   # "));
        assert!(lines[2].ends_with("2.5000"));
        let widths: Vec<usize> = lines[2..].iter().map(|l| l.len()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
