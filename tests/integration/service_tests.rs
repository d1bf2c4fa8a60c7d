//! RelayService integration tests.
//!
//! Drives the service through mode switches, the show playlist and the
//! settings commands against the mock adapters.

use relaymatrix::app::commands::RelayCommand;
use relaymatrix::app::events::{AppEvent, Mode};
use relaymatrix::app::service::RelayService;
use relaymatrix::config::RelayConfig;
use relaymatrix::engine::patterns::PatternId;

use super::mock_hw::{MockConfigStore, MockRelays, RecordingSink};

// ── Helpers ───────────────────────────────────────────────────

fn make_app() -> (RelayService, MockRelays, RecordingSink) {
    make_app_with(RelayConfig::default())
}

fn make_app_with(config: RelayConfig) -> (RelayService, MockRelays, RecordingSink) {
    let mut app = RelayService::new(config, 0xC0FFEE);
    let mut hw = MockRelays::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn send(
    app: &mut RelayService,
    cmd: RelayCommand,
    now_ms: u32,
    hw: &mut MockRelays,
    sink: &mut RecordingSink,
) -> &'static str {
    app.handle_command(cmd, now_ms, hw, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_releases_every_relay() {
    let (app, hw, sink) = make_app();
    assert_eq!(hw.writes, vec![0]);
    assert_eq!(app.mode(), Mode::Manual);
    assert!(matches!(sink.events[0], AppEvent::Started(Mode::Manual)));
}

#[test]
fn manual_mode_ignores_ticks() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::Toggle(1), 0, &mut hw, &mut sink);
    let writes = hw.writes.len();
    for t in (0..10_000).step_by(10) {
        app.tick(t, &mut hw, &mut sink);
    }
    assert_eq!(hw.writes.len(), writes);
    assert_eq!(hw.mask(), 0b10);
}

// ── Manual control ────────────────────────────────────────────

#[test]
fn toggle_outside_active_count_is_ignored() {
    let (mut app, mut hw, mut sink) = make_app();
    assert_eq!(send(&mut app, RelayCommand::Toggle(4), 0, &mut hw, &mut sink), "OK");
    assert_eq!(send(&mut app, RelayCommand::Toggle(-1), 0, &mut hw, &mut sink), "OK");
    assert_eq!(hw.writes, vec![0]);
    assert_eq!(app.bank().mask(), 0);
}

#[test]
fn all_on_covers_only_active_relays() {
    let (mut app, mut hw, mut sink) = make_app();
    assert_eq!(send(&mut app, RelayCommand::SetAll(true), 0, &mut hw, &mut sink), "ON");
    assert_eq!(hw.mask(), 0b1111);
    assert_eq!(send(&mut app, RelayCommand::SetAll(false), 0, &mut hw, &mut sink), "OFF");
    assert_eq!(hw.mask(), 0);
}

#[test]
fn toggle_while_running_freezes_frame_and_takes_over() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SelectPattern(1), 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b1, "ping-pong starts on relay 0");

    send(&mut app, RelayCommand::Toggle(1), 50, &mut hw, &mut sink);
    assert_eq!(app.mode(), Mode::Manual);
    assert_eq!(hw.mask(), 0b11);

    app.tick(5_000, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b11);
}

// ── Mode exclusivity ──────────────────────────────────────────

#[test]
fn running_and_blitz_are_exclusive() {
    let (mut app, mut hw, mut sink) = make_app();
    assert_eq!(send(&mut app, RelayCommand::ToggleRunning, 0, &mut hw, &mut sink), "RUN");
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(app.mode(), Mode::Running);

    assert_eq!(send(&mut app, RelayCommand::ToggleBlitz, 10, &mut hw, &mut sink), "BLITZ");
    assert_eq!(app.mode(), Mode::Blitz);
    assert_eq!(hw.mask(), 0, "mode switch starts dark");

    send(&mut app, RelayCommand::ToggleBlitz, 20, &mut hw, &mut sink);
    assert_eq!(app.mode(), Mode::Manual);
    assert_eq!(hw.mask(), 0);

    let switches = sink.count(|e| matches!(e, AppEvent::ModeChanged { .. }));
    assert_eq!(switches, 3);
}

// ── Blitz ─────────────────────────────────────────────────────

#[test]
fn blitz_flashes_with_configured_phases() {
    let (mut app, mut hw, mut sink) = make_app();
    send(
        &mut app,
        RelayCommand::SetBlitzTiming {
            on_ms: 100,
            off_ms: 300,
        },
        0,
        &mut hw,
        &mut sink,
    );
    send(&mut app, RelayCommand::ToggleBlitz, 0, &mut hw, &mut sink);

    app.tick(1_000, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b1111);
    app.tick(1_099, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b1111);
    app.tick(1_100, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0);
    app.tick(1_399, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0);
    app.tick(1_400, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b1111);
}

#[test]
fn blitz_timing_is_clamped() {
    let (mut app, mut hw, mut sink) = make_app();
    send(
        &mut app,
        RelayCommand::SetBlitzTiming {
            on_ms: 10,
            off_ms: 99_999,
        },
        0,
        &mut hw,
        &mut sink,
    );
    let s = app.status();
    assert_eq!((s.blitz_on_ms, s.blitz_off_ms), (50, 5000));
}

// ── Show playlist ─────────────────────────────────────────────

#[test]
fn show_advances_to_next_pattern() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::ToggleRunning, 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(hw.mask().count_ones(), 1);

    app.tick(7_000, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::PingPong);
    assert_eq!(hw.mask(), 0b1);
    assert!(sink.events.contains(&AppEvent::PatternChanged(PatternId::PingPong)));
}

#[test]
fn show_closes_with_blitz_then_wraps() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SelectPattern(8), 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);

    app.tick(7_000, &mut hw, &mut sink);
    assert!(app.status().show_blitz);
    assert_eq!(hw.mask(), 0b1111);
    assert!(sink.events.contains(&AppEvent::ShowBlitz));

    app.tick(9_000, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0);

    app.tick(14_000, &mut hw, &mut sink);
    let s = app.status();
    assert!(!s.show_blitz);
    assert_eq!(s.pattern, PatternId::RandomFast);
    assert_eq!(s.mode, Mode::Running);
}

#[test]
fn disabling_auto_cycle_leaves_show_blitz() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SelectPattern(8), 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);
    app.tick(7_000, &mut hw, &mut sink);
    assert!(app.status().show_blitz);

    assert_eq!(
        send(&mut app, RelayCommand::SetAutoCycle(false), 7_010, &mut hw, &mut sink),
        "AUTO"
    );
    let s = app.status();
    assert!(!s.show_blitz);
    assert!(!s.auto_cycle);
    assert_eq!(s.pattern, PatternId::Sequence);

    app.tick(60_000, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::Sequence);
}

#[test]
fn disabling_auto_cycle_returns_to_selected_pattern() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SelectPattern(1), 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);
    app.tick(7_000, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::Snake);

    send(&mut app, RelayCommand::SetAutoCycle(false), 7_010, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::PingPong);
    app.tick(7_010, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b1, "ping-pong restarts on relay 0");

    app.tick(30_000, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::PingPong);
}

#[test]
fn count_change_restarts_the_stage_timer() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::ToggleRunning, 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);
    app.tick(5_000, &mut hw, &mut sink);

    send(&mut app, RelayCommand::SetCount(6), 5_000, &mut hw, &mut sink);
    app.tick(5_000, &mut hw, &mut sink);
    app.tick(7_000, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::RandomFast);
    app.tick(12_000, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::PingPong);
}

// ── Blitz after a count change ────────────────────────────────

#[test]
fn count_change_in_blitz_flashes_again_at_once() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::ToggleBlitz, 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b1111);

    send(&mut app, RelayCommand::SetCount(6), 100, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0);
    app.tick(100, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b11_1111);
    app.tick(2_099, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b11_1111);
    app.tick(2_100, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0);
}

#[test]
fn count_change_in_show_blitz_flashes_again_at_once() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SelectPattern(8), 0, &mut hw, &mut sink);
    app.tick(0, &mut hw, &mut sink);
    app.tick(7_000, &mut hw, &mut sink);
    assert!(app.status().show_blitz);

    send(&mut app, RelayCommand::SetCount(6), 7_100, &mut hw, &mut sink);
    app.tick(7_100, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b11_1111);
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn pattern_index_wraps() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SelectPattern(10), 0, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::PingPong);
    send(&mut app, RelayCommand::SelectPattern(-1), 0, &mut hw, &mut sink);
    assert_eq!(app.status().pattern, PatternId::Sequence);
}

#[test]
fn speed_is_clamped() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SetSpeed(5), 0, &mut hw, &mut sink);
    assert_eq!(app.status().running_speed_ms, 40);
    send(&mut app, RelayCommand::SetSpeed(10_000), 0, &mut hw, &mut sink);
    assert_eq!(app.status().running_speed_ms, 500);
    assert_eq!(app.current_config().running_speed_ms, 500);
}

#[test]
fn shrinking_count_releases_dropped_relays() {
    let (mut app, mut hw, mut sink) = make_app_with(RelayConfig {
        relay_count: 8,
        ..Default::default()
    });
    send(&mut app, RelayCommand::SetAll(true), 0, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0xFF);

    assert_eq!(send(&mut app, RelayCommand::SetCount(3), 0, &mut hw, &mut sink), "CNT");
    assert_eq!(hw.mask() & !0b111, 0);
    assert_eq!(app.status().relay_count, 3);
    assert!(sink.events.contains(&AppEvent::RelayCountChanged(3)));
}

#[test]
fn running_frames_respect_count() {
    let (mut app, mut hw, mut sink) = make_app();
    send(&mut app, RelayCommand::SetCount(2), 0, &mut hw, &mut sink);
    send(&mut app, RelayCommand::SetSpeed(40), 0, &mut hw, &mut sink);
    for p in 0..9 {
        send(&mut app, RelayCommand::SelectPattern(p), 0, &mut hw, &mut sink);
        for t in (0..2_000).step_by(10) {
            app.tick(t, &mut hw, &mut sink);
            assert_eq!(hw.mask() >> 2, 0, "pattern {p} leaked past relay 2");
        }
    }
}

// ── Persistence ───────────────────────────────────────────────

#[test]
fn save_is_flushed_once() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut store = MockConfigStore::new();
    send(&mut app, RelayCommand::SetSpeed(250), 0, &mut hw, &mut sink);
    assert!(!app.flush_pending_save(&mut store, &mut sink));

    assert_eq!(send(&mut app, RelayCommand::SaveSettings, 0, &mut hw, &mut sink), "SAVED");
    assert!(app.flush_pending_save(&mut store, &mut sink));
    assert!(!app.flush_pending_save(&mut store, &mut sink));

    assert_eq!(store.saves, 1);
    assert_eq!(store.saved.as_ref().map(|c| c.running_speed_ms), Some(250));
    assert!(sink.events.contains(&AppEvent::SettingsSaved));
}

#[test]
fn failed_save_is_dropped() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut store = MockConfigStore::new();
    store.fail = true;
    send(&mut app, RelayCommand::SaveSettings, 0, &mut hw, &mut sink);
    assert!(!app.flush_pending_save(&mut store, &mut sink));
    assert!(!app.is_save_pending());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SettingsSaved)), 0);
}

// ── Fault tolerance ───────────────────────────────────────────

#[test]
fn relay_write_failure_keeps_state() {
    let mut app = RelayService::new(RelayConfig::default(), 1);
    let mut hw = MockRelays::failing();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    assert_eq!(app.handle_command(RelayCommand::Toggle(0), 0, &mut hw, &mut sink), "OK");
    assert!(app.bank().is_on(0));
    assert!(hw.writes.is_empty());
}
