use crate::calc::dates::format_long_date;
use crate::calc::format::format_time;
use crate::data::{DayData, Persistable};
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use std::path::Path;

pub fn run(data_file: Option<&Path>, date: Option<NaiveDate>, today: NaiveDate) -> Result<()> {
    let mut data = match data_file {
        Some(path) => DayData::load_path(path)?,
        None => DayData::load()?,
    };
    data.shape();
    let out = &mut std::io::stdout();
    match date {
        Some(date) => write_day(&data, date, out),
        None => write_year(&data, today, out),
    }
}

/// Tooltip-style breakdown for one day.
pub(crate) fn write_day<W: std::io::Write>(data: &DayData, date: NaiveDate, out: &mut W) -> Result<()> {
    let Some(record) = data.find(date) else {
        bail!("No record for {}.", date.format("%Y-%m-%d"));
    };
    writeln!(out, "{}", format_long_date(record.date))?;
    writeln!(out, "---")?;
    for s in record.summary() {
        writeln!(out, "  {:<24} {}", s.name, format_time(s.value))?;
    }
    writeln!(out, "---")?;
    writeln!(out, "{:<26} {}", "Total:", format_time(record.total))?;
    Ok(())
}

/// Per-category totals across the calendar year containing `anchor`.
pub(crate) fn write_year<W: std::io::Write>(data: &DayData, anchor: NaiveDate, out: &mut W) -> Result<()> {
    let year = data.year_records(anchor);
    let details: Vec<_> = year
        .iter()
        .flat_map(|r| r.summary())
        .map(|s| crate::data::Detail {
            name: s.name.clone(),
            value: s.value,
        })
        .collect();
    let totals = crate::data::day_record::summarize(&details);
    let active_days = year.iter().filter(|r| r.total > 0.0).count();
    let total: f64 = year.iter().map(|r| r.total).sum();

    writeln!(out, "Activity for {}", anchor.year())?;
    writeln!(out, "---")?;
    for s in &totals {
        writeln!(out, "  {:<24} {}", s.name, format_time(s.value))?;
    }
    writeln!(out, "---")?;
    writeln!(out, "{:<26} {}", "Active days:", active_days)?;
    writeln!(out, "{:<26} {}", "Total:", format_time(total))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DayRecord, Detail};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn det(name: &str, value: f64) -> Detail {
        Detail {
            name: name.to_string(),
            value,
        }
    }

    fn make_data() -> DayData {
        let mut data = DayData {
            data: vec![
                DayRecord::new(d(2025, 1, 3), vec![det("API", 3600.0), det("Docs", 600.0)]),
                DayRecord::new(d(2025, 1, 4), vec![]),
                DayRecord::new(d(2025, 2, 1), vec![det("Docs", 3000.0)]),
                DayRecord::new(d(2024, 6, 1), vec![det("Old", 60.0)]),
            ],
        };
        data.shape();
        data
    }

    #[test]
    fn test_write_day_lists_summary() {
        let mut buf = Vec::new();
        write_day(&make_data(), d(2025, 1, 3), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Friday, Jan 3rd 2025"));
        assert!(out.contains("API"));
        assert!(out.contains("10 minutes"));
        assert!(out.contains("1 hour 10 minutes"));
    }

    #[test]
    fn test_write_day_missing_record_errors() {
        let mut buf = Vec::new();
        let err = write_day(&make_data(), d(2025, 5, 5), &mut buf).unwrap_err();
        assert!(err.to_string().contains("2025-05-05"));
    }

    #[test]
    fn test_write_year_totals_by_category() {
        let mut buf = Vec::new();
        write_year(&make_data(), d(2025, 6, 1), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Activity for 2025"));
        assert!(out.lines().any(|l| l.starts_with("Active days:") && l.ends_with(" 2")));
        assert!(!out.contains("Old"));
        // API and Docs tie at one hour; first occurrence wins
        let api = out.find("API").unwrap();
        let docs = out.find("Docs").unwrap();
        assert!(api < docs);
        assert!(out.contains("2 hours"));
    }
}
