//! Settings persistence through the simulated NVS backend.

use relaymatrix::adapters::nvs::{CONFIG_KEY, CONFIG_NAMESPACE, NvsAdapter};
use relaymatrix::app::commands::RelayCommand;
use relaymatrix::app::ports::{ConfigError, ConfigPort, StoragePort};
use relaymatrix::app::service::RelayService;
use relaymatrix::config::RelayConfig;
use relaymatrix::engine::patterns::PatternId;

use super::mock_hw::{MockRelays, RecordingSink};

#[test]
fn saved_settings_survive_a_reboot() {
    let mut nvs = NvsAdapter::new();
    let mut hw = MockRelays::new();
    let mut sink = RecordingSink::new();

    let mut app = RelayService::new(nvs.load().unwrap(), 1);
    app.start(&mut hw, &mut sink);
    for cmd in [
        RelayCommand::SetCount(6),
        RelayCommand::SetSpeed(300),
        RelayCommand::SelectPattern(3),
        RelayCommand::SetAutoCycle(false),
        RelayCommand::SetBlitzTiming {
            on_ms: 150,
            off_ms: 900,
        },
        RelayCommand::SaveSettings,
    ] {
        app.handle_command(cmd, 0, &mut hw, &mut sink);
    }
    assert!(app.flush_pending_save(&mut nvs, &mut sink));

    // Reboot: a fresh service from what NVS holds.
    let rebooted = RelayService::new(nvs.load().unwrap(), 2);
    let s = rebooted.status();
    assert_eq!(s.relay_count, 6);
    assert_eq!(s.running_speed_ms, 300);
    assert_eq!(s.pattern, PatternId::Mirror);
    assert!(!s.auto_cycle);
    assert_eq!((s.blitz_on_ms, s.blitz_off_ms), (150, 900));
    assert_eq!(rebooted.current_config(), app.current_config());
}

#[test]
fn unsaved_changes_are_lost() {
    let mut nvs = NvsAdapter::new();
    let mut hw = MockRelays::new();
    let mut sink = RecordingSink::new();

    let mut app = RelayService::new(RelayConfig::default(), 1);
    app.handle_command(RelayCommand::SetSpeed(400), 0, &mut hw, &mut sink);
    assert!(!app.flush_pending_save(&mut nvs, &mut sink));
    assert_eq!(nvs.load().unwrap(), RelayConfig::default());
}

#[test]
fn corrupted_blob_is_reported() {
    let mut nvs = NvsAdapter::new();
    nvs.write(CONFIG_NAMESPACE, CONFIG_KEY, &[0xFF, 0x01, 0x02])
        .unwrap();
    assert!(matches!(nvs.load(), Err(ConfigError::Corrupted)));

    // Firmware falls back to defaults, and the next save heals the slot.
    let cfg = nvs.load().unwrap_or_default();
    nvs.save(&cfg).unwrap();
    assert_eq!(nvs.load().unwrap(), RelayConfig::default());
}

#[test]
fn invalid_settings_are_refused() {
    let mut nvs = NvsAdapter::new();
    let bad = RelayConfig {
        relay_count: 1,
        ..Default::default()
    };
    assert!(matches!(nvs.save(&bad), Err(ConfigError::ValidationFailed(_))));
    assert!(!nvs.exists(CONFIG_NAMESPACE, CONFIG_KEY));
}
