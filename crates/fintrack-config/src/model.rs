use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stores user preferences shared by every front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_upcoming_days_ahead")]
    pub upcoming_days_ahead: u32,
    /// Remaining share of income, in percent, below which the budget is low.
    #[serde(default = "Config::default_budget_low_threshold_percent")]
    pub budget_low_threshold_percent: f64,
    /// Goal progress, in percent, from which savings nudges are sent.
    #[serde(default = "Config::default_savings_nudge_threshold_percent")]
    pub savings_nudge_threshold_percent: f64,
    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for stored records. Defaults to `<base>/data`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            upcoming_days_ahead: Self::default_upcoming_days_ahead(),
            budget_low_threshold_percent: Self::default_budget_low_threshold_percent(),
            savings_nudge_threshold_percent: Self::default_savings_nudge_threshold_percent(),
            notifications: NotificationConfig::default(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_upcoming_days_ahead() -> u32 {
        7
    }

    pub fn default_budget_low_threshold_percent() -> f64 {
        10.0
    }

    pub fn default_savings_nudge_threshold_percent() -> f64 {
        90.0
    }

    /// Directory holding the JSON record files.
    pub fn resolve_data_root(&self, base: &std::path::Path) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }
}

/// Which reminders the user opted into. Delivery is up to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub daily_budget: bool,
    pub budget_exceeded: bool,
    pub recurring_reminders: bool,
    pub savings_nudges: bool,
    /// Local time of day as `HH:MM`.
    pub notification_time: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            daily_budget: true,
            budget_exceeded: true,
            recurring_reminders: true,
            savings_nudges: true,
            notification_time: "09:00".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"locale": "ru-RU", "currency": "TJS"}"#).unwrap();
        assert_eq!(config.currency, "TJS");
        assert!(config.ui_color_enabled);
        assert_eq!(config.upcoming_days_ahead, 7);
        assert_eq!(config.notifications, NotificationConfig::default());
    }

    #[test]
    fn data_root_defaults_under_base() {
        let config = Config::default();
        assert_eq!(
            config.resolve_data_root(Path::new("/tmp/fintrack")),
            PathBuf::from("/tmp/fintrack/data")
        );
    }
}
