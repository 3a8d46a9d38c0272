use crate::data::{AppSettings, DayData, Persistable};
use crate::ui::heatmap_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use tracing::{info, warn};

pub fn run(data_file: Option<&Path>, settings: AppSettings, today: NaiveDate) -> Result<()> {
    let data = match data_file {
        Some(path) => DayData::load_path(path)?,
        None => DayData::load()?,
    };
    info!(records = data.data.len(), %today, "mounting heatmap");
    if data.is_empty() {
        warn!("no activity records loaded, the grid will be empty");
    }

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let columns = terminal.size()?.width;
    let container_width = f64::from(columns) * settings.units_per_column;

    let mut app = App::new(data, settings, today, container_width, StdRng::from_entropy());
    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    info!("heatmap unmounted");
    result
}
