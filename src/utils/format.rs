//! Table formatting and output utilities

use crossterm::style::{Color as CrosstermColor, Stylize};
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Padding, Style},
    Table,
};

const MASK: &str = "********";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Raw,
}

/// Apply the standard table style
pub fn format_table(mut table: Table, no_color: bool) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Padding::new(1, 1, 0, 0));

    if !no_color {
        table.with(Modify::new(Rows::first()).with(Color::FG_BLUE));
    }

    table.to_string()
}

/// Plain table without borders, for piping into other tools
pub fn format_raw_table(mut table: Table) -> String {
    table.with(Style::empty());
    table.to_string()
}

/// Hide a secret value, keeping empty values recognisable
pub fn mask_value(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        MASK.to_string()
    }
}

/// Render a comparison result, green for a match and red otherwise
pub fn format_bool(value: bool, no_color: bool) -> String {
    let text = value.to_string();
    if no_color {
        text
    } else if value {
        text.with(CrosstermColor::Green).to_string()
    } else {
        text.with(CrosstermColor::Red).to_string()
    }
}
