pub mod formatter;

pub use formatter::{
    format_breakdown, format_comparison, format_gameweek_rows, format_percent,
    format_reconciliation, format_sparkline, format_tsv, format_value_table, should_use_colors,
};
