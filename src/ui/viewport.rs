use crate::calc::layout::Settings;
use ratatui::layout::Rect;

/// What sits under a terminal position inside the heatmap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Month label, 1 = January.
    Month(u32),
    /// Day label, Sunday = 0.
    Weekday(u32),
    /// Cell slot by week column and weekday row.
    Slot { week: i64, weekday: u32 },
}

/// Projects layout units onto a terminal area.
///
/// The horizontal axis is scaled by `area.width / settings.width`. The
/// vertical axis is one row of month labels followed by one row per weekday.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    scale_x: f64,
    label_padding: f64,
    pitch: f64,
    width: f64,
}

impl Viewport {
    pub fn new(area: Rect, settings: &Settings) -> Self {
        Viewport {
            area,
            scale_x: f64::from(area.width) / settings.width,
            label_padding: settings.label_padding,
            pitch: settings.pitch(),
            width: settings.width,
        }
    }

    /// Terminal column holding layout position `x`, clamped to the area.
    pub fn column(&self, x: f64) -> u16 {
        let offset = (x * self.scale_x).floor().max(0.0) as u16;
        self.area.x + offset.min(self.area.width.saturating_sub(1))
    }

    /// Number of columns covered by `units`, at least one.
    pub fn columns(&self, units: f64) -> u16 {
        ((units * self.scale_x).round() as u16).max(1)
    }

    /// Whether `row` falls inside the area; rows past a short terminal do not.
    pub fn contains_row(&self, row: u16) -> bool {
        row >= self.area.y && row < self.area.bottom()
    }

    pub fn month_row(&self) -> u16 {
        self.area.y
    }

    pub fn weekday_row(&self, weekday: u32) -> u16 {
        self.area.y + 1 + weekday as u16
    }

    /// Row holding layout position `y` in the cell grid.
    pub fn row(&self, y: f64) -> u16 {
        let index = ((y - self.label_padding) / self.pitch).floor().max(0.0) as u16;
        self.area.y + 1 + index
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<Target> {
        if column < self.area.x
            || column >= self.area.x + self.area.width
            || !self.contains_row(row)
            || row > self.area.y + 7
        {
            return None;
        }
        // centre of the terminal column, in layout units
        let x = (f64::from(column - self.area.x) + 0.5) / self.scale_x;
        let rel_row = u32::from(row - self.area.y);
        if rel_row == 0 {
            let month = (x / (self.width / 12.0)).floor().clamp(0.0, 11.0) as u32;
            return Some(Target::Month(month + 1));
        }
        let weekday = rel_row - 1;
        if x < self.label_padding {
            return Some(Target::Weekday(weekday));
        }
        let week = ((x - self.label_padding) / self.pitch).floor() as i64;
        Some(Target::Slot { week, weekday })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let settings = Settings {
            width: 1000.0,
            item_size: 15.0,
            gutter: 5.0,
            label_padding: 40.0,
            ..Settings::default()
        };
        Viewport::new(Rect::new(0, 2, 100, 8), &settings)
    }

    #[test]
    fn test_column_scales_and_clamps() {
        let v = viewport();
        assert_eq!(v.column(0.0), 0);
        assert_eq!(v.column(40.0), 4);
        assert_eq!(v.column(999.0), 99);
        assert_eq!(v.column(5000.0), 99);
        assert_eq!(v.column(-10.0), 0);
    }

    #[test]
    fn test_rows() {
        let v = viewport();
        assert_eq!(v.month_row(), 2);
        assert_eq!(v.weekday_row(0), 3);
        assert_eq!(v.weekday_row(6), 9);
        assert_eq!(v.row(40.0), 3);
        assert_eq!(v.row(40.0 + 20.0 * 6.0 + 15.0), 9);
    }

    #[test]
    fn test_hit_month_row() {
        let v = viewport();
        assert_eq!(v.hit(0, 2), Some(Target::Month(1)));
        assert_eq!(v.hit(99, 2), Some(Target::Month(12)));
    }

    #[test]
    fn test_hit_day_labels_left_of_padding() {
        let v = viewport();
        assert_eq!(v.hit(1, 3), Some(Target::Weekday(0)));
        assert_eq!(v.hit(2, 9), Some(Target::Weekday(6)));
    }

    #[test]
    fn test_hit_cell_slot() {
        let v = viewport();
        // column 6 centre = 65 units -> (65 - 40) / 20 = week 1
        assert_eq!(v.hit(6, 4), Some(Target::Slot { week: 1, weekday: 1 }));
    }

    #[test]
    fn test_contains_row_respects_area_height() {
        let v = viewport();
        assert!(!v.contains_row(1));
        assert!(v.contains_row(2));
        assert!(v.contains_row(9));
        assert!(!v.contains_row(10));
    }

    #[test]
    fn test_hit_ignores_rows_below_short_area() {
        let settings = Settings::default();
        let v = Viewport::new(Rect::new(0, 2, 100, 3), &settings);
        assert_eq!(v.hit(1, 4), Some(Target::Weekday(1)));
        assert_eq!(v.hit(1, 5), None);
    }

    #[test]
    fn test_hit_outside_area() {
        let v = viewport();
        assert_eq!(v.hit(10, 1), None);
        assert_eq!(v.hit(10, 10), None);
        assert_eq!(v.hit(100, 4), None);
    }
}
