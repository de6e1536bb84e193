use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::compare::{Comparison, Side};
use crate::range::GameweekRow;
use crate::scoring::{Category, CategoryLine, Reconciliation, ScoreResult};
use crate::value::ValueRow;

/// Width of the category column; fits "Defensive Contribution".
const CATEGORY_WIDTH: usize = 22;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a percentage with one decimal ("12.5%")
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

fn format_line(line: &CategoryLine, use_colors: bool) -> String {
    let label = format!("{:<width$}", line.category.label(), width = CATEGORY_WIDTH);
    let points = format!("{:>6}", line.points);
    let count = if line.category == Category::Unattributed {
        format!("{:>6}", "-")
    } else {
        format!("{:>6}", line.count)
    };
    let percent = format!("{:>8}", format_percent(line.percent));

    let (label, points) = if use_colors {
        let points = if line.points < 0 {
            points.red().to_string()
        } else if line.points > 0 {
            points.green().to_string()
        } else {
            points.dimmed().to_string()
        };
        let label = if line.category == Category::Unattributed {
            label.yellow().to_string()
        } else {
            label
        };
        (label, points)
    } else {
        (label, points)
    };

    format!("{}{}{}{}", label, points, count, percent)
}

/// Summary of how the reconstructed total lines up with the provider's total.
pub fn format_reconciliation(reconciliation: &Reconciliation) -> String {
    if reconciliation.is_balanced() {
        format!("Total: {} pts (fully attributed)", reconciliation.authoritative_total)
    } else {
        format!(
            "Total: {} pts (rules {}, unattributed {:+})",
            reconciliation.authoritative_total,
            reconciliation.computed_total,
            reconciliation.residual
        )
    }
}

/// Format a category breakdown as a table with a reconciliation footer
pub fn format_breakdown(result: &ScoreResult, use_colors: bool) -> String {
    let header = format!(
        "{:<width$}{:>6}{:>6}{:>8}",
        "Category",
        "Pts",
        "Count",
        "Share",
        width = CATEGORY_WIDTH
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let mut lines = vec![header];
    lines.extend(
        result
            .breakdown
            .lines
            .iter()
            .map(|line| format_line(line, use_colors)),
    );
    lines.push(format_reconciliation(&result.reconciliation));
    lines.join("\n")
}

/// Format per-gameweek rows; outlier weeks are marked with "!".
///
/// `opponent_name` resolves an opponent id to a display name.
pub fn format_gameweek_rows<F>(rows: &[GameweekRow], opponent_name: F, use_colors: bool) -> String
where
    F: Fn(u32) -> Option<String>,
{
    if rows.is_empty() {
        return "No gameweeks in range.".to_string();
    }

    let labels: Vec<String> = rows
        .iter()
        .map(|row| row.label(opponent_name(row.opponent).as_deref()))
        .collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    rows.iter()
        .zip(labels)
        .map(|(row, label)| {
            let line = format!(
                "{:<width$}  {:>4}  {:>7}",
                label,
                row.points,
                format_percent(row.percent),
                width = label_width
            );
            match (row.outlier, use_colors) {
                (true, true) => format!("{} {}", line.bold(), "!".red().bold()),
                (true, false) => format!("{} !", line),
                (false, _) => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render weekly points as a unicode sparkline, scaled between the lowest
/// and highest week.
pub fn format_sparkline(points: &[i64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let (min, max) = match (points.iter().min(), points.iter().max()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => return String::new(),
    };
    let span = (max - min) as f64;

    points
        .iter()
        .map(|&p| {
            if span == 0.0 {
                BARS[0]
            } else {
                let idx = ((p - min) as f64 / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

fn comparison_cell(line: Option<&CategoryLine>, won: bool, total: i64) -> String {
    match line {
        None => "n/a".to_string(),
        Some(line) => {
            let share = crate::scoring::percent_of(line.points, total);
            let star = if won { " *" } else { "" };
            format!("{} ({}){}", line.points, format_percent(share), star)
        }
    }
}

/// Side-by-side comparison; the winner of each category is marked with "*".
///
/// Shares are relative to each player's own total.
pub fn format_comparison(
    comparison: &Comparison,
    names: (&str, &str),
    totals: (i64, i64),
    use_colors: bool,
) -> String {
    let column = 18;
    let header = format!(
        "{:<width$}{:>col$}{:>col$}",
        "Category",
        truncate_name(names.0, column - 2),
        truncate_name(names.1, column - 2),
        width = CATEGORY_WIDTH,
        col = column
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let mut lines = vec![header];
    for row in &comparison.rows {
        let left = comparison_cell(row.left.as_ref(), row.winner == Some(Side::Left), totals.0);
        let right = comparison_cell(row.right.as_ref(), row.winner == Some(Side::Right), totals.1);
        let left = format!("{:>col$}", left, col = column);
        let right = format!("{:>col$}", right, col = column);
        let (left, right) = if use_colors {
            match row.winner {
                Some(Side::Left) => (left.green().to_string(), right),
                Some(Side::Right) => (left, right.green().to_string()),
                None => (left, right),
            }
        } else {
            (left, right)
        };
        lines.push(format!(
            "{:<width$}{}{}",
            row.category.label(),
            left,
            right,
            width = CATEGORY_WIDTH
        ));
    }
    lines.push(format!(
        "{:<width$}{:>col$}{:>col$}",
        "Total",
        totals.0,
        totals.1,
        width = CATEGORY_WIDTH,
        col = column
    ));
    lines.join("\n")
}

/// Format the value table: one player per line with index, points and
/// value metrics. Names are truncated to fit the terminal.
pub fn format_value_table(rows: &[ValueRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No players found.".to_string();
    }

    // Index, Pos, Team, Pts, Price, Sel%, PPM, Template, Diff
    let fixed_width = 4 + 5 + 14 + 6 + 8 + 8 + 7 + 10 + 10;
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => (width - fixed_width).min(20),
        Some(_) => 10,
        None => 20,
    };

    let header = format!(
        "{:>3} {:<nw$}{:<5}{:<14}{:>6}{:>8}{:>8}{:>7}{:>10}{:>10}",
        "#",
        "Player",
        "Pos",
        "Team",
        "Pts",
        "Price",
        "Sel%",
        "PPM",
        "Template",
        "Diff",
        nw = name_width + 1
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let mut lines = vec![header];
    for (idx, row) in rows.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let index_str = if use_colors {
            index_str.dimmed().to_string()
        } else {
            index_str
        };
        lines.push(format!(
            "{} {:<nw$}{:<5}{:<14}{:>6}{:>8}{:>8.2}{:>7.2}{:>10.2}{:>10.2}",
            index_str,
            truncate_name(&row.name, name_width),
            row.position.code(),
            truncate_name(&row.team, 13),
            row.points,
            format!("£{:.1}", row.price),
            row.selected_pct,
            row.points_per_million,
            row.template_value,
            row.differential_value,
            nw = name_width + 1
        ));
    }
    lines.join("\n")
}

/// Format the value table as tab-separated values for scripting
/// Columns: name, team, position, points, price, selected, ppm, template, differential
pub fn format_tsv(rows: &[ValueRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{:.1}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                row.name,
                row.team,
                row.position.code(),
                row.points,
                row.price,
                row.selected_pct,
                row.points_per_million,
                row.template_value,
                row.differential_value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
