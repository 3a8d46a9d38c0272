use crate::calc::dates::{
    days_between, one_year_before, start_of_week, start_of_year, weekday_index,
};
use crate::calc::scale::{SIZE_FLOOR, SIZE_RANGE};
use crate::data::AppSettings;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::debug;

/// The grid never lays out narrower than this, whatever the container reports.
pub const MIN_WIDTH: f64 = 1000.0;

/// Geometry and timing of one layout pass, in layout units.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub gutter: f64,
    pub width: f64,
    pub height: f64,
    pub item_size: f64,
    pub label_padding: f64,
    pub transition_duration: Duration,
    pub tooltip_width: f64,
    pub tooltip_padding: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            gutter: 5.0,
            width: MIN_WIDTH,
            height: 200.0,
            item_size: 10.0,
            label_padding: 40.0,
            transition_duration: Duration::from_millis(500),
            tooltip_width: 250.0,
            tooltip_padding: 15.0,
        }
    }
}

/// Number of week columns spanned by the year ending at `anchor`.
pub fn num_weeks(anchor: NaiveDate) -> u32 {
    let day_index = days_between(start_of_week(one_year_before(anchor)), anchor);
    (day_index / 7) as u32 + 1
}

impl Settings {
    pub fn from_app(app: &AppSettings) -> Self {
        Settings {
            gutter: app.gutter,
            label_padding: app.label_padding,
            transition_duration: Duration::from_millis(app.transition_duration_ms),
            tooltip_width: app.tooltip_width,
            tooltip_padding: app.tooltip_padding,
            ..Settings::default()
        }
    }

    /// Recomputes width, cell size and height for a container of
    /// `container_width` units, with the year window anchored on `anchor`.
    pub fn calc_dimensions(&mut self, container_width: f64, anchor: NaiveDate) {
        let weeks = f64::from(num_weeks(anchor));
        self.width = container_width.max(MIN_WIDTH);
        self.item_size = (self.width - self.label_padding) / weeks - self.gutter;
        self.height = self.label_padding + 7.0 * (self.item_size + self.gutter);
        debug!(
            width = self.width,
            item_size = self.item_size,
            height = self.height,
            "layout pass"
        );
    }

    /// Distance between neighbouring cell origins.
    pub fn pitch(&self) -> f64 {
        self.item_size + self.gutter
    }

    /// Week column of `date` within the year containing it.
    pub fn week_column(&self, date: NaiveDate) -> i64 {
        days_between(start_of_week(start_of_year(date)), date) / 7
    }

    /// Left edge of the cell slot for `date`.
    pub fn cell_x(&self, date: NaiveDate) -> f64 {
        self.week_column(date) as f64 * self.pitch() + self.label_padding
    }

    /// Top edge of the cell slot for `date`.
    pub fn cell_y(&self, date: NaiveDate) -> f64 {
        self.label_padding + f64::from(weekday_index(date)) * self.pitch()
    }

    /// Data-driven cell size: a fixed floor plus a share proportional to
    /// `value / year_max`. Full size when the year has no positive maximum.
    pub fn cell_size(&self, value: f64, year_max: f64) -> f64 {
        if year_max <= 0.0 {
            return self.item_size;
        }
        self.item_size * SIZE_FLOOR + (self.item_size * value / year_max) * SIZE_RANGE
    }

    /// Offset that keeps a cell of `size` centred in its slot.
    pub fn centre_offset(&self, size: f64) -> f64 {
        (self.item_size - size) / 2.0
    }

    /// Horizontal position of month label `index` (0 = January).
    pub fn month_label_x(&self, index: usize, count: usize) -> f64 {
        let step = self.width / count.max(1) as f64;
        step * index as f64 + step / 2.0
    }

    pub fn day_label_x(&self) -> f64 {
        self.label_padding / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_num_weeks_one_year_window() {
        // 2024-10-15 is a Tuesday; its week starts 2024-10-13, 367 days before 2025-10-15.
        assert_eq!(num_weeks(d(2025, 10, 15)), 53);
    }

    #[test]
    fn test_width_never_below_minimum() {
        let mut s = Settings::default();
        s.calc_dimensions(320.0, d(2025, 10, 15));
        assert_eq!(s.width, MIN_WIDTH);
        s.calc_dimensions(0.0, d(2025, 10, 15));
        assert_eq!(s.width, MIN_WIDTH);
    }

    #[test]
    fn test_wide_container_is_used() {
        let mut s = Settings::default();
        s.calc_dimensions(1600.0, d(2025, 10, 15));
        assert_eq!(s.width, 1600.0);
    }

    #[test]
    fn test_item_size_and_height() {
        let mut s = Settings::default();
        let anchor = d(2025, 10, 15);
        s.calc_dimensions(1000.0, anchor);
        let weeks = f64::from(num_weeks(anchor));
        let expected = (1000.0 - 40.0) / weeks - 5.0;
        assert!((s.item_size - expected).abs() < 1e-9);
        assert!((s.height - (40.0 + 7.0 * (expected + 5.0))).abs() < 1e-9);
    }

    #[test]
    fn test_resize_recomputes_item_size() {
        let mut s = Settings::default();
        let anchor = d(2025, 10, 15);
        s.calc_dimensions(1000.0, anchor);
        let narrow = s.item_size;
        s.calc_dimensions(2000.0, anchor);
        assert!(s.item_size > narrow);
    }

    #[test]
    fn test_cell_x_first_week_starts_at_padding() {
        let mut s = Settings::default();
        s.calc_dimensions(1000.0, d(2025, 10, 15));
        // 2025-01-01 falls in the week starting 2024-12-29
        assert_eq!(s.week_column(d(2025, 1, 1)), 0);
        assert_eq!(s.cell_x(d(2025, 1, 1)), s.label_padding);
        assert_eq!(s.week_column(d(2025, 1, 5)), 1);
        assert!((s.cell_x(d(2025, 1, 5)) - (s.label_padding + s.pitch())).abs() < 1e-9);
    }

    #[test]
    fn test_cell_y_by_weekday() {
        let s = Settings::default();
        assert_eq!(s.cell_y(d(2025, 1, 5)), s.label_padding);
        let saturday = s.cell_y(d(2025, 1, 11));
        assert!((saturday - (s.label_padding + 6.0 * s.pitch())).abs() < 1e-9);
    }

    #[test]
    fn test_cell_size_full_when_year_max_zero() {
        let s = Settings::default();
        assert_eq!(s.cell_size(0.0, 0.0), s.item_size);
        assert_eq!(s.cell_size(123.0, -1.0), s.item_size);
    }

    #[test]
    fn test_cell_size_scales_within_range() {
        let s = Settings::default();
        assert!((s.cell_size(0.0, 100.0) - s.item_size * 0.75).abs() < 1e-9);
        assert!((s.cell_size(100.0, 100.0) - s.item_size).abs() < 1e-9);
        assert!((s.cell_size(50.0, 100.0) - s.item_size * 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_month_label_positions_centred_in_twelfths() {
        let s = Settings::default();
        assert!((s.month_label_x(0, 12) - 1000.0 / 24.0).abs() < 1e-9);
        assert!((s.month_label_x(11, 12) - (1000.0 - 1000.0 / 24.0)).abs() < 1e-9);
    }

    #[test]
    fn test_from_app_carries_config() {
        let mut app = AppSettings::default();
        app.gutter = 3.0;
        app.transition_duration_ms = 200;
        let s = Settings::from_app(&app);
        assert_eq!(s.gutter, 3.0);
        assert_eq!(s.transition_duration, Duration::from_millis(200));
    }
}
