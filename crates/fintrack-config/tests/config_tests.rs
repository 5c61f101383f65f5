use fintrack_config::{Config, ConfigError, ConfigManager};
use std::fs;
use tempfile::tempdir;

#[test]
fn default_config_matches_documented_values() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, "USD");
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.upcoming_days_ahead, 7);
    assert_eq!(cfg.budget_low_threshold_percent, 10.0);
    assert_eq!(cfg.savings_nudge_threshold_percent, 90.0);
    assert!(!cfg.notifications.enabled);
    assert_eq!(cfg.notifications.notification_time, "09:00");
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");

    let mut cfg = Config::default();
    cfg.currency = "EUR".to_string();
    cfg.ui_color_enabled = false;
    cfg.notifications.enabled = true;
    cfg.upcoming_days_ahead = 3;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(manager.config_path().exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
    assert_eq!(manager.base_dir(), dir.path());
}

#[test]
fn corrupt_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    fs::write(manager.config_path(), "{ broken").unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}
