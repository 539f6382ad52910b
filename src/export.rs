//! Tab-separated export of resolution results.
//!
//! Missing values are written as `NA`.

use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use crate::core::{Gender, GenderReport, ResolvedRecord, Stats};

const SEP: &str = "\t";
const NA: &str = "NA";

pub fn write_missed<W: Write>(missed: &BTreeSet<String>, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "name")?;
    for name in missed {
        writeln!(writer, "{}", name)?;
    }
    Ok(())
}

pub fn write_resolved<W: Write>(records: &[ResolvedRecord], writer: &mut W) -> io::Result<()> {
    writeln!(
        writer,
        "{}",
        ["BIB_KEY", "FA_NAME", "FA_GENDER", "LA_NAME", "LA_GENDER"].join(SEP)
    )?;
    for record in records {
        writeln!(
            writer,
            "{}",
            [
                record.citation_key.as_str(),
                record.first.name.as_str(),
                gender_cell(record.first.gender),
                record.last.name.as_str(),
                gender_cell(record.last.gender),
            ]
            .join(SEP)
        )?;
    }
    Ok(())
}

/// One header row of category names and one row of counts.
pub fn write_gender_report<W: Write>(report: &GenderReport, writer: &mut W) -> io::Result<()> {
    let (categories, counts): (Vec<String>, Vec<String>) = report
        .rows()
        .map(|(category, count)| (category.to_string(), count.to_string()))
        .unzip();
    writeln!(writer, "{}", categories.join(SEP))?;
    writeln!(writer, "{}", counts.join(SEP))?;
    Ok(())
}

pub fn write_stats<W: Write>(stats: &Stats, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "Category{}Ratio", SEP)?;
    for (category, ratio) in stats.rows() {
        writeln!(writer, "{}{}{}", category, SEP, format_ratio(ratio))?;
    }
    Ok(())
}

/// Write a table to `path`, replacing any existing file.
pub fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// `0.5`, `0.0`, or `NA`.
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{:?}", ratio),
        None => NA.to_string(),
    }
}

fn gender_cell(gender: Option<Gender>) -> &'static str {
    gender.map_or(NA, Gender::as_str)
}
