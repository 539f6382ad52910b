//! Terminal output for bibbias commands.
//!
//! Tables go to stdout, warnings to stderr. Every printer has a `_to`
//! variant taking a writer so output can be captured in tests.

use std::{
    collections::BTreeSet,
    io::{self, Write},
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::{GenderReport, LookupSummary, NameMap, ResolvedRecord, Stats, gender::label};
use crate::export::format_ratio;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Column gap in tables.
const GAP: &str = "  ";

/// Print the category table with counts and ratios.
pub fn print_report(report: &GenderReport, stats: &Stats) {
    print_report_to(report, stats, &mut io::stdout().lock());
}

pub fn print_report_to<W: Write>(report: &GenderReport, stats: &Stats, writer: &mut W) {
    let rows: Vec<(String, usize, String)> = report
        .rows()
        .zip(stats.rows())
        .map(|((category, count), (_, ratio))| (category.to_string(), count, format_ratio(ratio)))
        .collect();

    let width = rows
        .iter()
        .map(|(category, _, _)| category.width())
        .chain(["Category".width()])
        .max()
        .unwrap_or_default();

    let _ = writeln!(
        writer,
        "{}{GAP}{:>5}{GAP}{}",
        pad("Category", width).bold(),
        "Count".bold(),
        "Ratio".bold()
    );
    for (category, count, ratio) in rows {
        let _ = writeln!(writer, "{}{GAP}{:>5}{GAP}{}", pad(&category, width), count, ratio);
    }
}

/// Print one line per record: key, first author, last author, and their genders.
pub fn print_records_to<W: Write>(records: &[ResolvedRecord], writer: &mut W) {
    if records.is_empty() {
        return;
    }

    let key_width = column_width(records.iter().map(|r| r.citation_key.as_str()));
    let first_width = column_width(records.iter().map(|r| r.first.name.as_str()));

    for record in records {
        let _ = writeln!(
            writer,
            "{}{GAP}{}{GAP}{:<4}{GAP}{}{GAP}{}",
            pad(&record.citation_key, key_width).cyan(),
            pad(&record.first.name, first_width),
            label(record.first.gender),
            record.last.name,
            label(record.last.gender)
        );
    }
    let _ = writeln!(writer);
}

/// List names that are still unresolved.
pub fn print_missed_to<W: Write>(missed: &BTreeSet<String>, writer: &mut W) {
    if missed.is_empty() {
        return;
    }
    let _ = writeln!(writer, "{}", "Unresolved names:".bold());
    for name in missed {
        let _ = writeln!(writer, "  {}", name);
    }
    let _ = writeln!(writer);
}

/// Print the closing summary line.
pub fn print_success_to<W: Write>(record_count: usize, missed_count: usize, writer: &mut W) {
    let records = format!(
        "Analyzed {} {}",
        record_count,
        if record_count == 1 { "record" } else { "records" }
    );
    let msg = if missed_count == 0 {
        format!("{}, all authors resolved", records)
    } else {
        format!(
            "{}, {} unresolved {}",
            records,
            missed_count,
            if missed_count == 1 { "name" } else { "names" }
        )
    };
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

/// Report remote lookup counters when anything was queried.
pub fn print_lookup_summary(summary: &LookupSummary) {
    print_lookup_summary_to(summary, &mut io::stderr().lock());
}

pub fn print_lookup_summary_to<W: Write>(summary: &LookupSummary, writer: &mut W) {
    if summary.queried == 0 {
        return;
    }
    let _ = writeln!(
        writer,
        "{} {} name(s): {} accepted, {} below confidence threshold, {} failed",
        "Looked up".bold(),
        summary.queried,
        summary.accepted,
        summary.low_confidence,
        summary.failed
    );
}

/// Print a warning to stderr.
pub fn print_warning(message: &str) {
    print_warning_to(message, &mut io::stderr().lock());
}

pub fn print_warning_to<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), message);
}

/// Print an error to stderr.
pub fn print_error(message: &str) {
    let _ = writeln!(
        io::stderr().lock(),
        "{} {}",
        "error:".bold().red(),
        message
    );
}

/// Print cached names with their labels.
pub fn print_cache_to<W: Write>(names: &NameMap, writer: &mut W) {
    let width = column_width(names.keys().map(String::as_str));
    for (name, gender) in names {
        let _ = writeln!(writer, "{}{GAP}{}", pad(name, width), gender);
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(UnicodeWidthStr::width).max().unwrap_or_default()
}

/// Left-align `text` to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}
