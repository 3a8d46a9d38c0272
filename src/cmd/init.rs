use crate::data::sample::generate_year;
use crate::data::{AppSettings, Persistable};
use anyhow::Result;
use chrono::NaiveDate;
use rand::Rng;
use std::path::Path;

pub fn run(today: NaiveDate) -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    run_in_dir(&dir, today, &mut rand::thread_rng())?;
    println!("Data files initialized in {}", dir.display());
    Ok(())
}

/// Writes default config.yaml and a generated data.json into `dir`.
pub(crate) fn run_in_dir<R: Rng>(dir: &Path, today: NaiveDate, rng: &mut R) -> Result<()> {
    AppSettings::default().save_to(dir)?;
    generate_year(today, rng).save_to(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DayData;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_writes_config_and_data() {
        let tmp = TempDir::new().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        run_in_dir(tmp.path(), today, &mut StdRng::seed_from_u64(5)).unwrap();

        assert!(tmp.path().join("config.yaml").exists());
        assert!(tmp.path().join("data.json").exists());

        let settings = AppSettings::load_from(tmp.path()).unwrap();
        assert_eq!(settings, AppSettings::default());
        let data = DayData::load_from(tmp.path()).unwrap();
        assert_eq!(data.data.last().unwrap().date, today);
    }
}
