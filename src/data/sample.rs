use crate::calc::dates::one_year_before;
use crate::data::day_record::{DayData, DayRecord, Detail};
use chrono::NaiveDate;
use rand::Rng;

const PROJECTS: [&str; 6] = [
    "Website",
    "Mobile app",
    "API",
    "Design system",
    "Documentation",
    "Support",
];

/// Chance that a given day has any tracked time at all.
const ACTIVE_DAY_PROBABILITY: f64 = 0.8;

/// Builds one year of fake activity ending at `end`, one record per day.
/// Idle days get a record with no details and a zero total.
pub fn generate_year<R: Rng>(end: NaiveDate, rng: &mut R) -> DayData {
    let mut data = Vec::new();
    let mut current = one_year_before(end);
    while current <= end {
        data.push(generate_day(current, rng));
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    DayData { data }
}

fn generate_day<R: Rng>(date: NaiveDate, rng: &mut R) -> DayRecord {
    if !rng.gen_bool(ACTIVE_DAY_PROBABILITY) {
        return DayRecord::new(date, Vec::new());
    }
    let entries = rng.gen_range(1..=5);
    let details = (0..entries)
        .map(|_| Detail {
            name: PROJECTS[rng.gen_range(0..PROJECTS.len())].to_string(),
            value: f64::from(rng.gen_range(10u32..=120) * 60),
        })
        .collect();
    DayRecord::new(date, details)
}
