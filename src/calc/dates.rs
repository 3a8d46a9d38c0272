use chrono::{Datelike, Months, NaiveDate, Weekday};

/// Sunday on or before `date`. Weeks start on Sunday throughout the heatmap.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(weekday_index(date)))
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Same calendar day one year earlier. Feb 29 maps to Feb 28.
pub fn one_year_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12)).unwrap_or(date)
}

/// Row index of a date in the grid: Sunday = 0 .. Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

pub fn is_in_year(date: NaiveDate, year_of: NaiveDate) -> bool {
    date >= start_of_year(year_of) && date <= end_of_year(year_of)
}

/// First day of every month in the year containing `date`.
pub fn months_of_year(date: NaiveDate) -> Vec<NaiveDate> {
    (1..=12)
        .filter_map(|m| NaiveDate::from_ymd_opt(date.year(), m, 1))
        .collect()
}

pub(crate) fn month_short_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

/// Weekday for a grid row (Sunday = 0).
pub fn weekday_for_index(index: u32) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// Single-letter day label, e.g. `S` for Sunday.
pub(crate) fn weekday_initial(index: u32) -> char {
    match weekday_for_index(index) {
        Weekday::Sun | Weekday::Sat => 'S',
        Weekday::Mon => 'M',
        Weekday::Tue | Weekday::Thu => 'T',
        Weekday::Wed => 'W',
        Weekday::Fri => 'F',
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Long tooltip date, e.g. `Friday, Jan 3rd 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{} {}",
        date.format("%A"),
        month_short_name(date.month()),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}
