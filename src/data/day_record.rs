use crate::calc::dates::is_in_year;
use crate::data::persistence::{Format, Persistable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One tracked entry for a day, e.g. time spent on a project.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Detail {
    pub name: String,
    pub value: f64,
}

/// Per-category total for a day.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Summary {
    pub name: String,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Seconds tracked on this day.
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub details: Vec<Detail>,
    /// Derived from `details` by [`DayRecord::shape`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<Summary>>,
}

impl DayRecord {
    pub fn new(date: NaiveDate, details: Vec<Detail>) -> Self {
        let total = details.iter().map(|d| d.value).sum();
        DayRecord {
            date,
            total,
            details,
            summary: None,
        }
    }

    /// Fills `summary` by grouping `details` by name. A record that already
    /// has a summary is left as is, so shaping twice never double-counts.
    pub fn shape(&mut self) {
        if self.summary.is_none() {
            self.summary = Some(summarize(&self.details));
        }
    }

    pub fn summary(&self) -> &[Summary] {
        self.summary.as_deref().unwrap_or_default()
    }
}

/// Groups details by name (first occurrence fixes the order), sums values,
/// then stable-sorts descending so ties keep that order.
pub fn summarize(details: &[Detail]) -> Vec<Summary> {
    let mut grouped: Vec<Summary> = Vec::new();
    for detail in details {
        match grouped.iter_mut().find(|s| s.name == detail.name) {
            Some(existing) => existing.value += detail.value,
            None => grouped.push(Summary {
                name: detail.name.clone(),
                value: detail.value,
            }),
        }
    }
    grouped.sort_by(|a, b| b.value.total_cmp(&a.value));
    grouped
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct DayData {
    pub data: Vec<DayRecord>,
}

impl Persistable for DayData {
    fn filename() -> &'static str {
        "data.json"
    }
    fn format() -> Format {
        Format::Json
    }
}

impl DayData {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True once the dataset carries summaries and can be rendered.
    pub fn is_shaped(&self) -> bool {
        self.data.first().is_some_and(|r| r.summary.is_some())
    }

    pub fn shape(&mut self) {
        for record in &mut self.data {
            record.shape();
        }
    }

    /// Records dated inside the calendar year containing `anchor`.
    pub fn year_records(&self, anchor: NaiveDate) -> Vec<&DayRecord> {
        self.data
            .iter()
            .filter(|r| is_in_year(r.date, anchor))
            .collect()
    }

    pub fn find(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.data.iter().find(|r| r.date == date)
    }
}

/// Largest total among `records`, 0 when empty.
pub fn year_max(records: &[&DayRecord]) -> f64 {
    records.iter().map(|r| r.total).fold(0.0, f64::max)
}
