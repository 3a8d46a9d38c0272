use crate::calc::dates::{
    end_of_year, format_long_date, month_short_name, months_of_year, start_of_year,
    weekday_index, weekday_initial,
};
use crate::calc::format::format_time;
use crate::calc::layout::Settings;
use crate::calc::scale::{ColorScale, DIMMED_OPACITY, PULSE_SCALE, Rgb};
use crate::data::day_record::year_max;
use crate::data::{AppSettings, DayData};
use crate::ui::tooltip::{Tooltip, TooltipLine};
use crate::ui::transition::{Pulse, RenderState, SizeMotion, Tween, entry_delay};
use crate::ui::viewport::{Target, Viewport};
use anyhow::Result;
use chrono::{Datelike, Duration as DateDuration, Months, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers, MouseEventKind};
use rand::rngs::StdRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const LABEL_COLOR: Color = Color::Rgb(170, 170, 170);
const TOOLTIP_TEXT: Rgb = Rgb::new(235, 235, 235);

/// One drawn day in the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct CellItem {
    pub date: NaiveDate,
    pub total: f64,
    pub week: i64,
    pub weekday: u32,
    /// Top-left corner of the cell slot.
    pub slot_x: f64,
    pub slot_y: f64,
    /// Data-driven size the cell settles at.
    pub rest_size: f64,
    /// `None` is transparent.
    pub fill: Option<Rgb>,
    size: SizeMotion,
    opacity: Tween,
    entered: bool,
}

impl CellItem {
    pub fn size_at(&self, now: Duration) -> f64 {
        self.size.value_at(now)
    }

    pub fn opacity_at(&self, now: Duration) -> f64 {
        self.opacity.value_at(now)
    }

    /// Drawn top-left corner, keeping the cell centred in its slot.
    pub fn origin_at(&self, now: Duration, settings: &Settings) -> (f64, f64) {
        let offset = settings.centre_offset(self.size_at(now));
        (self.slot_x + offset, self.slot_y + offset)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthLabel {
    pub month: u32,
    pub text: &'static str,
    pub x: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DayLabel {
    pub weekday: u32,
    pub text: char,
    pub x: f64,
}

/// What the pointer is currently over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Hover {
    #[default]
    Nothing,
    Cell(usize),
    Month(u32),
    Weekday(u32),
}

pub struct App {
    data: DayData,
    pub app_settings: AppSettings,
    pub settings: Settings,
    selected_date: NaiveDate,
    today: NaiveDate,
    container_width: f64,
    cells: Vec<CellItem>,
    month_labels: Vec<MonthLabel>,
    day_labels: Vec<DayLabel>,
    state: RenderState,
    hover: Hover,
    tooltip: Tooltip,
    /// Keyboard pointer; arrow keys hover the cell under it.
    cursor: Option<NaiveDate>,
    viewport: Option<Viewport>,
    render_passes: usize,
    rng: StdRng,
    now: Duration,
}

impl App {
    pub fn new(
        mut data: DayData,
        app_settings: AppSettings,
        today: NaiveDate,
        container_width: f64,
        rng: StdRng,
    ) -> Self {
        data.shape();
        let settings = Settings::from_app(&app_settings);
        let mut app = App {
            data,
            app_settings,
            settings,
            selected_date: today,
            today,
            container_width,
            cells: Vec::new(),
            month_labels: Vec::new(),
            day_labels: Vec::new(),
            state: RenderState::Idle,
            hover: Hover::Nothing,
            tooltip: Tooltip::default(),
            cursor: None,
            viewport: None,
            render_passes: 0,
            rng,
            now: Duration::ZERO,
        };
        app.calc_dimensions(container_width, Duration::ZERO);
        app
    }

    /// Layout pass for a container `container_width` units wide. Redraws
    /// when the dataset is already shaped.
    pub fn calc_dimensions(&mut self, container_width: f64, now: Duration) {
        self.container_width = container_width;
        self.settings
            .calc_dimensions(container_width, self.selected_date);
        if self.data.is_shaped() {
            self.draw_chart(now);
        } else {
            self.build_labels();
        }
    }

    /// Terminal resize notification.
    pub fn resize(&mut self, columns: u16, now: Duration) {
        debug!(columns, "resize");
        let width = f64::from(columns) * self.app_settings.units_per_column;
        self.calc_dimensions(width, now);
    }

    /// Rebuilds every cell and label for the selected year, replacing what
    /// was there, and starts the entry fade.
    pub fn draw_chart(&mut self, now: Duration) {
        self.hover = Hover::Nothing;
        self.tooltip.reset();
        self.build_labels();

        if self.data.is_empty() {
            self.cells.clear();
            self.state = RenderState::Idle;
            return;
        }

        let year = self.data.year_records(self.selected_date);
        let max_value = year_max(&year);
        let color = ColorScale::for_max(max_value, self.app_settings.color);
        let duration = self.settings.transition_duration;
        let settings = &self.settings;
        let rng = &mut self.rng;

        self.cells = year
            .iter()
            .map(|d| {
                let rest_size = settings.cell_size(d.total, max_value);
                let delay = entry_delay(duration, &mut *rng);
                CellItem {
                    date: d.date,
                    total: d.total,
                    week: settings.week_column(d.date),
                    weekday: weekday_index(d.date),
                    slot_x: settings.cell_x(d.date),
                    slot_y: settings.cell_y(d.date),
                    rest_size,
                    fill: color.fill(d.total),
                    size: SizeMotion::Tween(Tween::still(rest_size)),
                    opacity: Tween::new(0.0, 1.0, now + delay, duration),
                    entered: false,
                }
            })
            .collect();

        self.state = RenderState::start(self.cells.len());
        self.render_passes += 1;
        debug!(
            year = self.selected_date.year(),
            cells = self.cells.len(),
            max_value,
            "render pass"
        );
    }

    fn build_labels(&mut self) {
        let months = months_of_year(self.selected_date);
        let count = months.len();
        self.month_labels = months
            .iter()
            .enumerate()
            .map(|(i, m)| MonthLabel {
                month: m.month(),
                text: month_short_name(m.month()),
                x: self.settings.month_label_x(i, count),
            })
            .collect();
        self.day_labels = (0..7)
            .map(|weekday| DayLabel {
                weekday,
                text: weekday_initial(weekday),
                x: self.settings.day_label_x(),
            })
            .collect();
    }

    /// Advances the clock, counting down finished entry transitions.
    pub fn tick(&mut self, now: Duration) {
        self.now = now;
        let was_busy = self.state.is_busy();
        for cell in &mut self.cells {
            if !cell.entered && cell.opacity.is_finished(now) {
                cell.entered = true;
                self.state.complete_one();
            }
        }
        if was_busy && !self.state.is_busy() {
            debug!("entry transition finished");
        }
    }

    /// Moves the pointer onto `target`. Ignored while a render pass is
    /// still animating in.
    pub fn hover_target(&mut self, target: Hover, now: Duration) {
        if self.state.is_busy() || target == self.hover {
            return;
        }
        self.leave(now);
        match target {
            Hover::Cell(index) => self.enter_cell(index, now),
            Hover::Month(month) => self.highlight(now, |c| c.date.month() == month),
            Hover::Weekday(weekday) => self.highlight(now, |c| c.weekday == weekday),
            Hover::Nothing => {}
        }
        self.hover = target;
    }

    fn leave(&mut self, now: Duration) {
        let duration = self.settings.transition_duration;
        match self.hover {
            Hover::Cell(index) => {
                if let Some(cell) = self.cells.get_mut(index) {
                    cell.size = SizeMotion::Tween(Tween::new(
                        cell.size_at(now),
                        cell.rest_size,
                        now,
                        duration / 2,
                    ));
                }
                self.tooltip.hide(&self.settings, now);
            }
            Hover::Month(_) | Hover::Weekday(_) => {
                for cell in &mut self.cells {
                    cell.opacity = cell.opacity.retarget(1.0, now, duration);
                }
            }
            Hover::Nothing => {}
        }
        self.hover = Hover::Nothing;
    }

    fn enter_cell(&mut self, index: usize, now: Duration) {
        let duration = self.settings.transition_duration;
        let expanded = self.settings.item_size * PULSE_SCALE;
        let Some(cell) = self.cells.get_mut(index) else {
            return;
        };
        cell.size = SizeMotion::Pulse(Pulse::new(
            now,
            cell.size_at(now),
            expanded,
            cell.rest_size,
            duration,
        ));
        let (date, slot_x, slot_y) = (cell.date, cell.slot_x, cell.slot_y);
        if let Some(record) = self.data.find(date) {
            self.tooltip
                .show(record, slot_x, slot_y, &self.settings, now);
        }
    }

    /// Dims every cell not matching `keep`.
    fn highlight(&mut self, now: Duration, keep: impl Fn(&CellItem) -> bool) {
        let duration = self.settings.transition_duration;
        for cell in &mut self.cells {
            let target = if keep(cell) { 1.0 } else { DIMMED_OPACITY };
            cell.opacity = cell.opacity.retarget(target, now, duration);
        }
    }

    pub fn cell_index(&self, date: NaiveDate) -> Option<usize> {
        self.cells.iter().position(|c| c.date == date)
    }

    /// Mouse motion to terminal position (`column`, `row`).
    pub fn handle_mouse(&mut self, column: u16, row: u16, now: Duration) {
        let target = match self.viewport.and_then(|v| v.hit(column, row)) {
            Some(Target::Month(m)) => Hover::Month(m),
            Some(Target::Weekday(w)) => Hover::Weekday(w),
            Some(Target::Slot { week, weekday }) => self
                .cells
                .iter()
                .position(|c| c.week == week && c.weekday == weekday)
                .map_or(Hover::Nothing, Hover::Cell),
            None => Hover::Nothing,
        };
        self.hover_target(target, now);
    }

    fn set_selected(&mut self, date: NaiveDate, now: Duration) {
        if date == self.selected_date {
            return;
        }
        info!(%date, "selected date changed");
        self.selected_date = date;
        self.cursor = None;
        self.calc_dimensions(self.container_width, now);
    }

    fn move_cursor(&mut self, days: i64, now: Duration) {
        let start = start_of_year(self.selected_date);
        let end = end_of_year(self.selected_date);
        let base = self.cursor.unwrap_or(if self.today >= start && self.today <= end {
            self.today
        } else {
            start
        });
        let moved = (base + DateDuration::days(days)).clamp(start, end);
        self.cursor = Some(moved);
        let target = self.cell_index(moved).map_or(Hover::Nothing, Hover::Cell);
        self.hover_target(target, now);
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Duration) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('n') => {
                if let Some(next) = self.selected_date.checked_add_months(Months::new(12)) {
                    self.set_selected(next, now);
                }
            }
            KeyCode::Char('p') => {
                if let Some(prev) = self.selected_date.checked_sub_months(Months::new(12)) {
                    self.set_selected(prev, now);
                }
            }
            KeyCode::Char('t') => self.set_selected(self.today, now),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-7, now),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(7, now),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, now),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, now),
            _ => {}
        }
        false
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1),
                Constraint::Length(8), // month labels + 7 weekday rows
                Constraint::Length(1),
                Constraint::Min(1), // help
            ])
            .split(f.area());

        self.render_title(f, chunks[0]);
        self.render_grid(f, chunks[2]);
        self.render_help(f, chunks[4]);
        self.render_tooltip(f);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let year = self.data.year_records(self.selected_date);
        let total: f64 = year.iter().map(|r| r.total).sum();
        let tracked = if total > 0.0 {
            format!("{} tracked", format_time(total))
        } else {
            "No time tracked".to_string()
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.selected_date.year()),
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            Span::raw("  "),
            Span::styled(tracked, Style::default().fg(self.app_settings.color.to_color())),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_grid(&mut self, f: &mut Frame, area: Rect) {
        let viewport = Viewport::new(area, &self.settings);
        self.viewport = Some(viewport);
        let now = self.now;
        let buf = f.buffer_mut();

        if !viewport.contains_row(viewport.month_row()) {
            return;
        }
        for label in &self.month_labels {
            let x = viewport.column(label.x);
            let dimmed = matches!(self.hover, Hover::Month(m) if m != label.month);
            let mut style = Style::default().fg(LABEL_COLOR);
            if dimmed {
                style = style.add_modifier(Modifier::DIM);
            }
            buf.set_string(x, viewport.month_row(), label.text, style);
        }
        for label in &self.day_labels {
            let row = viewport.weekday_row(label.weekday);
            if !viewport.contains_row(row) {
                continue;
            }
            let x = viewport.column(label.x);
            buf.set_string(
                x,
                row,
                label.text.to_string(),
                Style::default().fg(LABEL_COLOR),
            );
        }

        for cell in &self.cells {
            let Some(fill) = cell.fill else {
                continue;
            };
            let row = viewport.weekday_row(cell.weekday);
            if !viewport.contains_row(row) {
                continue;
            }
            let opacity = cell.opacity_at(now);
            if opacity <= 0.0 {
                continue;
            }
            let (x, _) = cell.origin_at(now, &self.settings);
            let ratio = cell.size_at(now) / self.settings.item_size;
            let width = viewport.columns(self.settings.item_size);
            let color = fill.over(self.app_settings.background, opacity);
            let symbol = cell_symbol(ratio).repeat(usize::from(width));
            let mut style = Style::default().fg(color.to_color());
            if Some(cell.date) == self.cursor {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            buf.set_string(
                viewport.column(x),
                row,
                symbol,
                style,
            );
        }
    }

    fn render_tooltip(&self, f: &mut Frame) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let opacity = self.tooltip.opacity_at(self.now);
        if !self.tooltip.is_visible(self.now) || self.tooltip.lines.is_empty() {
            return;
        }
        let frame = f.area();
        let text_color = TOOLTIP_TEXT.over(self.app_settings.background, opacity).to_color();
        let lines: Vec<Line> = self
            .tooltip
            .lines
            .iter()
            .map(|line| tooltip_line(line, text_color))
            .collect();

        let width = viewport
            .columns(self.settings.tooltip_width)
            .max(24)
            .min(frame.width);
        let height = (lines.len() as u16 + 2).min(frame.height);
        let x = viewport.column(self.tooltip.x).min(frame.width.saturating_sub(width));
        let y = (viewport.row(self.tooltip.y) + 1).min(frame.height.saturating_sub(height));
        let area = Rect::new(x, y, width, height);

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(text_color)),
            ),
            area,
        );
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            "q quit  n/p year  t today  arrows move  mouse hover",
            Style::default().add_modifier(Modifier::DIM),
        )];
        if let Some(date) = self.cursor {
            spans.push(Span::raw("   "));
            spans.push(Span::raw(format_long_date(date)));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Glyph for a cell drawn at `ratio` of the full cell size.
pub(crate) fn cell_symbol(ratio: f64) -> &'static str {
    if ratio > 1.0 {
        "█"
    } else if ratio >= 0.92 {
        "■"
    } else if ratio >= 0.83 {
        "▪"
    } else {
        "·"
    }
}

fn tooltip_line(line: &TooltipLine, color: Color) -> Line<'static> {
    let style = Style::default().fg(color);
    match line {
        TooltipLine::Header(text) => {
            Line::from(Span::styled(text.clone(), style.add_modifier(Modifier::BOLD)))
        }
        TooltipLine::Text(text) => Line::from(Span::styled(text.clone(), style)),
        TooltipLine::Blank => Line::from(""),
        TooltipLine::Entry { name, duration } => Line::from(vec![
            Span::styled(name.clone(), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {duration}"), style),
        ]),
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let mounted = Instant::now();
    loop {
        app.tick(mounted.elapsed());
        terminal.draw(|f| app.render(f))?;
        if event::poll(Duration::from_millis(16))? {
            let now = mounted.elapsed();
            match event::read()? {
                CEvent::Key(key) => {
                    if app.handle_key(key.code, key.modifiers, now) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                    app.handle_mouse(mouse.column, mouse.row, now);
                }
                CEvent::Resize(columns, _) => app.resize(columns, now),
                _ => {}
            }
        }
    }
    info!(passes = app.render_passes, "heatmap closed");
    Ok(())
}
