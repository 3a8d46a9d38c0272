pub mod app_settings;
pub mod day_record;
pub mod persistence;
pub mod sample;

pub use app_settings::AppSettings;
pub use day_record::{DayData, DayRecord, Detail, Summary};
pub use persistence::Persistable;
