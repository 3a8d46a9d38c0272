use crate::calc::scale::Rgb;
use crate::data::persistence::{get_data_dir, Format, Persistable};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// User configuration read from the `settings` key of config.yaml.
/// Every field falls back to its default when missing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Accent color at the top of the scale.
    pub color: Rgb,
    /// Terminal background that faded cells blend into.
    pub background: Rgb,
    pub transition_duration_ms: u64,
    pub gutter: f64,
    pub label_padding: f64,
    pub tooltip_width: f64,
    pub tooltip_padding: f64,
    /// Layout units per terminal column when measuring the container.
    pub units_per_column: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            color: Rgb::new(0xff, 0x45, 0x00),
            background: Rgb::new(0x1e, 0x1e, 0x1e),
            transition_duration_ms: 500,
            gutter: 5.0,
            label_padding: 40.0,
            tooltip_width: 250.0,
            tooltip_padding: 15.0,
            units_per_column: 8.0,
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn format() -> Format {
        Format::Yaml
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    pub fn load_from(dir: &std::path::Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &std::path::Path) -> Result<()> {
        SettingsWrapper {
            settings: self.clone(),
        }
        .save_to(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accent_is_orange_red() {
        let settings = AppSettings::default();
        assert_eq!(settings.color.to_string(), "#ff4500");
        assert_eq!(settings.transition_duration_ms, 500);
    }

    #[test]
    fn test_settings_wrapper_yaml_roundtrip() {
        let wrapper = SettingsWrapper {
            settings: AppSettings {
                color: Rgb::new(0, 128, 255),
                ..AppSettings::default()
            },
        };
        let yaml = serde_norway::to_string(&wrapper).unwrap();
        let parsed: SettingsWrapper = serde_norway::from_str(&yaml).unwrap();
        assert_eq!(parsed.settings, wrapper.settings);
    }

    #[test]
    fn test_missing_settings_key_uses_default() {
        let wrapper: SettingsWrapper = serde_norway::from_str("other: 1").unwrap();
        assert_eq!(wrapper.settings, AppSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let yaml = "settings:\n  color: '#00ff00'\n";
        let wrapper: SettingsWrapper = serde_norway::from_str(yaml).unwrap();
        assert_eq!(wrapper.settings.color, Rgb::new(0, 255, 0));
        assert_eq!(wrapper.settings.gutter, 5.0);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let yaml = "settings:\n  color: 'orange'\n";
        let err = serde_norway::from_str::<SettingsWrapper>(yaml).unwrap_err();
        assert!(err.to_string().contains("'#'"));
    }

    #[test]
    fn test_save_to_and_load_from() {
        use tempfile::TempDir;
        let tmp = TempDir::new().unwrap();
        let settings = AppSettings {
            transition_duration_ms: 120,
            ..AppSettings::default()
        };
        settings.save_to(tmp.path()).unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), settings);
    }
}
