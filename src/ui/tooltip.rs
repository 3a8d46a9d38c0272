use crate::calc::dates::format_long_date;
use crate::calc::format::format_time;
use crate::calc::layout::Settings;
use crate::data::DayRecord;
use crate::ui::transition::Tween;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum TooltipLine {
    Header(String),
    Text(String),
    Blank,
    Entry { name: String, duration: String },
}

/// Text of the hover panel for one day.
pub fn build_lines(record: &DayRecord) -> Vec<TooltipLine> {
    let tracked = if record.total != 0.0 {
        format_time(record.total)
    } else {
        "No time".to_string()
    };
    let mut lines = vec![
        TooltipLine::Header(format!("{tracked} tracked")),
        TooltipLine::Text(format!("on {}", format_long_date(record.date))),
        TooltipLine::Blank,
    ];
    lines.extend(record.summary().iter().map(|s| TooltipLine::Entry {
        name: s.name.clone(),
        duration: format_time(s.value),
    }));
    lines
}

/// Anchor of the panel for a cell slot at (`cell_x`, `cell_y`).
///
/// Sits at the cell's bottom-right corner, flipping to the left when fewer
/// than `tooltip_width + 3 * tooltip_padding` units remain on the right.
pub fn place(cell_x: f64, cell_y: f64, settings: &Settings) -> (f64, f64) {
    let mut x = cell_x + settings.item_size;
    if flips_left(cell_x, settings) {
        x -= settings.tooltip_width + settings.tooltip_padding * 2.0;
    }
    (x, cell_y + settings.item_size)
}

pub fn flips_left(cell_x: f64, settings: &Settings) -> bool {
    settings.width - (cell_x + settings.item_size)
        < settings.tooltip_width + settings.tooltip_padding * 3.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub lines: Vec<TooltipLine>,
    pub x: f64,
    pub y: f64,
    opacity: Tween,
}

impl Default for Tooltip {
    fn default() -> Self {
        Tooltip {
            lines: Vec::new(),
            x: 0.0,
            y: 0.0,
            opacity: Tween::still(0.0),
        }
    }
}

impl Tooltip {
    /// Fills the panel for `record` and fades it in over half the transition duration.
    pub fn show(&mut self, record: &DayRecord, cell_x: f64, cell_y: f64, settings: &Settings, now: Duration) {
        self.lines = build_lines(record);
        (self.x, self.y) = place(cell_x, cell_y, settings);
        self.opacity = self
            .opacity
            .retarget(1.0, now, settings.transition_duration / 2);
    }

    pub fn hide(&mut self, settings: &Settings, now: Duration) {
        self.opacity = self
            .opacity
            .retarget(0.0, now, settings.transition_duration / 2);
    }

    /// Drops the panel immediately, without fading.
    pub fn reset(&mut self) {
        *self = Tooltip::default();
    }

    pub fn opacity_at(&self, now: Duration) -> f64 {
        self.opacity.value_at(now)
    }

    pub fn is_visible(&self, now: Duration) -> bool {
        self.opacity_at(now) > 0.0
    }
}
