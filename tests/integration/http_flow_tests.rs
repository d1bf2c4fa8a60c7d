//! End-to-end panel flow: request URI → reply → inbox → RelayService.
//!
//! The inbox is process-wide, so everything that pushes commands lives
//! in a single test to keep the queue contents deterministic.

use relaymatrix::app::events::Mode;
use relaymatrix::app::service::RelayService;
use relaymatrix::config::RelayConfig;
use relaymatrix::http::respond;
use relaymatrix::inbox::{self, INBOX_DEPTH};

use super::mock_hw::{MockRelays, RecordingSink};

/// One control-loop pass, the way the firmware's main loop runs it.
fn pump(app: &mut RelayService, now_ms: u32, hw: &mut MockRelays, sink: &mut RecordingSink) -> usize {
    let handled = inbox::drain_commands(|cmd| {
        app.handle_command(cmd, now_ms, hw, sink);
    });
    app.tick(now_ms, hw, sink);
    inbox::publish_status(app.status());
    handled
}

#[test]
fn unknown_paths_get_404() {
    for uri in ["/nope", "/relay/1", "/STATUS", "status", ""] {
        let reply = respond(uri);
        assert_eq!(reply.status, 404, "{uri}");
        assert_eq!(reply.body, "Not Found");
    }
}

#[test]
fn panel_session_drives_the_relays() {
    let mut app = RelayService::new(RelayConfig::default(), 7);
    let mut hw = MockRelays::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    inbox::drain_commands(|_| {});
    pump(&mut app, 0, &mut hw, &mut sink);

    // ── Page and status ───────────────────────────────────────
    let page = respond("/");
    assert_eq!(page.status, 200);
    assert_eq!(page.content_type, "text/html");
    assert!(page.body.contains("/toggle?id=3"));

    // ── Manual toggles ────────────────────────────────────────
    let reply = respond("/toggle?id=2");
    assert_eq!((reply.status, reply.body.as_str()), (200, "OK"));
    assert_eq!(respond("/relay?id=0").body, "OK");
    assert_eq!(pump(&mut app, 10, &mut hw, &mut sink), 2);
    assert_eq!(hw.mask(), 0b101);

    let status = respond("/status");
    assert_eq!(status.content_type, "application/json");
    let json: serde_json::Value = serde_json::from_str(&status.body).unwrap();
    assert_eq!(json["relays"], 0b101);
    assert_eq!(json["mode"], "Manual");
    assert!(respond("/").body.contains("class=\"on\""));

    // ── Settings ──────────────────────────────────────────────
    assert_eq!(respond("/speed?v=9999").body, "SPD");
    assert_eq!(respond("/count?v=6").body, "CNT");
    assert_eq!(respond("/blitzspeed?on=100&off=abc").body, "BLZ");
    pump(&mut app, 20, &mut hw, &mut sink);
    let s = inbox::latest_status();
    assert_eq!(s.running_speed_ms, 500);
    assert_eq!(s.relay_count, 6);
    assert_eq!(s.relays, 0, "count change releases everything");
    assert_eq!((s.blitz_on_ms, s.blitz_off_ms), (100, 50));

    // ── Animation modes ───────────────────────────────────────
    assert_eq!(respond("/blitz").body, "BLITZ");
    pump(&mut app, 30, &mut hw, &mut sink);
    assert_eq!(inbox::latest_status().mode, Mode::Blitz);
    assert_eq!(hw.mask(), 0b11_1111);

    assert_eq!(respond("/pattern?p=1").body, "PAT");
    pump(&mut app, 40, &mut hw, &mut sink);
    assert_eq!(inbox::latest_status().mode, Mode::Running);
    assert_eq!(hw.mask(), 0b1);

    assert_eq!(respond("/alloff").body, "OFF");
    pump(&mut app, 50, &mut hw, &mut sink);
    assert_eq!(inbox::latest_status().mode, Mode::Manual);
    assert_eq!(hw.mask(), 0);

    assert_eq!(respond("/all?x=1").body, "ON");
    pump(&mut app, 60, &mut hw, &mut sink);
    assert_eq!(hw.mask(), 0b11_1111);

    // ── Save is deferred ──────────────────────────────────────
    assert_eq!(respond("/save").body, "SAVED");
    pump(&mut app, 70, &mut hw, &mut sink);
    assert!(app.is_save_pending());

    // ── Back-pressure ─────────────────────────────────────────
    for _ in 0..INBOX_DEPTH {
        assert_eq!(respond("/run").status, 200);
    }
    let busy = respond("/run");
    assert_eq!((busy.status, busy.body.as_str()), (503, "Busy"));
    assert_eq!(pump(&mut app, 80, &mut hw, &mut sink), INBOX_DEPTH);
    assert_eq!(respond("/run").status, 200);
    inbox::drain_commands(|_| {});
}
