use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use llmledger::error::AppError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormat {
    group_sep: char,
    decimal_sep: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_sep: ',',
            decimal_sep: '.',
        }
    }
}

impl NumberFormat {
    pub(crate) fn from_locale(locale: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = locale else {
            return Ok(NumberFormat::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(NumberFormat::default());
        }
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        let format = match base.as_str() {
            "de" => NumberFormat {
                group_sep: '.',
                decimal_sep: ',',
            },
            "fr" | "ru" => NumberFormat {
                group_sep: ' ',
                decimal_sep: ',',
            },
            "en" | "zh" => NumberFormat::default(),
            _ => {
                return Err(AppError::UnsupportedLocale {
                    input: trimmed.to_string(),
                });
            }
        };

        Ok(format)
    }
}

/// Options shared by every table view
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TableOptions {
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
}

impl TableOptions {
    pub(super) fn cyan(&self) -> Option<Color> {
        self.use_color.then_some(Color::Cyan)
    }

    pub(super) fn green(&self) -> Option<Color> {
        self.use_color.then_some(Color::Green)
    }
}

pub(super) fn format_number(n: i64, format: NumberFormat) -> String {
    let (sign, digits) = if n < 0 {
        ("-", n.unsigned_abs().to_string())
    } else {
        ("", n.to_string())
    };
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(format.group_sep);
        }
        result.push(c);
    }
    let formatted: String = result.chars().rev().collect();
    format!("{sign}{formatted}")
}

/// Format number in compact form (K, M, B suffixes)
pub(super) fn format_compact(n: i64, format: NumberFormat) -> String {
    let (sign, value) = if n < 0 { ("-", -n) } else { ("", n) };
    let (scaled, suffix) = if value >= 1_000_000_000 {
        (value as f64 / 1_000_000_000.0, "B")
    } else if value >= 1_000_000 {
        (value as f64 / 1_000_000.0, "M")
    } else if value >= 1_000 {
        (value as f64 / 1_000.0, "K")
    } else {
        return format!("{sign}{value}");
    };
    format!("{sign}{}{suffix}", localize_decimal(format!("{scaled:.1}"), format))
}

/// Seconds with one decimal, e.g. `12.5s`
pub(super) fn format_seconds(seconds: f64, format: NumberFormat) -> String {
    format!("{}s", localize_decimal(format!("{seconds:.1}"), format))
}

fn localize_decimal(s: String, format: NumberFormat) -> String {
    if format.decimal_sep == '.' {
        s
    } else {
        s.replace('.', &format.decimal_sep.to_string())
    }
}

/// Token count as a table cell: grouped digits, or K/M/B in compact mode
pub(super) fn token_cell(n: i64, options: &TableOptions, color: Option<Color>, bold: bool) -> Cell {
    let text = if options.compact {
        format_compact(n, options.number_format)
    } else {
        format_number(n, options.number_format)
    };
    right_cell(&text, color, bold)
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

pub(super) fn header_row(labels: &[&str], use_color: bool) -> Vec<Cell> {
    labels.iter().map(|l| header_cell(l, use_color)).collect()
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

/// Pretty JSON, falling back to `fallback` if serialization fails
pub(super) fn to_pretty_json<T: serde::Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Failed to serialize JSON output: {}", e);
        fallback.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::{NumberFormat, format_compact, format_number, format_seconds};

    #[test]
    fn format_number_with_commas() {
        let fmt = NumberFormat::default();
        assert_eq!(format_number(0, fmt), "0");
        assert_eq!(format_number(999, fmt), "999");
        assert_eq!(format_number(1000, fmt), "1,000");
        assert_eq!(format_number(1_234_567, fmt), "1,234,567");
    }

    #[test]
    fn format_number_negative() {
        let fmt = NumberFormat::default();
        assert_eq!(format_number(-1234, fmt), "-1,234");
    }

    #[test]
    fn format_compact_units() {
        let fmt = NumberFormat::default();
        assert_eq!(format_compact(999, fmt), "999");
        assert_eq!(format_compact(1_500, fmt), "1.5K");
        assert_eq!(format_compact(2_500_000, fmt), "2.5M");
        assert_eq!(format_compact(1_000_000_000, fmt), "1.0B");
    }

    #[test]
    fn format_seconds_uses_locale_decimal() {
        assert_eq!(format_seconds(12.5, NumberFormat::default()), "12.5s");
        let de = NumberFormat::from_locale(Some("de")).unwrap();
        assert_eq!(format_seconds(12.5, de), "12,5s");
    }

    #[test]
    fn from_locale_none_and_empty_return_default() {
        let fmt = NumberFormat::from_locale(None).unwrap();
        assert_eq!(format_number(1000, fmt), "1,000");
        let fmt = NumberFormat::from_locale(Some("  ")).unwrap();
        assert_eq!(format_number(1000, fmt), "1,000");
    }

    #[test]
    fn from_locale_separators() {
        let de = NumberFormat::from_locale(Some("de-DE")).unwrap();
        assert_eq!(format_number(1000, de), "1.000");
        assert_eq!(format_compact(1500, de), "1,5K");
        let fr = NumberFormat::from_locale(Some("fr")).unwrap();
        assert_eq!(format_number(1000, fr), "1 000");
    }

    #[test]
    fn from_locale_unsupported_returns_error() {
        assert!(NumberFormat::from_locale(Some("ja")).is_err());
    }
}
