//! RelayMatrix Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   Esp32Time       │
//! │  (RelayPort)       (EventSink)    (Config+NVS)                 │
//! │  WifiAdapter       EspHttpServer ──▶ inbox (commands/status)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            RelayService (pure logic)                   │    │
//! │  │  RelayBank · PatternEngine · BlitzEngine · AutoCycle   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{debug, error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use relaymatrix::adapters::hardware::HardwareAdapter;
use relaymatrix::adapters::log_sink::LogEventSink;
use relaymatrix::adapters::nvs::NvsAdapter;
use relaymatrix::adapters::time::Esp32TimeAdapter;
use relaymatrix::adapters::wifi::WifiAdapter;
use relaymatrix::adapters::{entropy, http_server};
use relaymatrix::app::events::AppEvent;
use relaymatrix::app::ports::{ConfigPort, EventSink};
use relaymatrix::app::service::RelayService;
use relaymatrix::config::RelayConfig;
use relaymatrix::drivers::hw_init::init_relay_pins;
use relaymatrix::drivers::watchdog::{self, Watchdog};
use relaymatrix::error::Error;
use relaymatrix::inbox;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RelayMatrix v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 2. Relays first: every channel released before anything else ─
    let relays = init_relay_pins().map_err(|e| {
        error!("Relay init failed: {}", e);
        anyhow::anyhow!("relay init failed: {e}")
    })?;
    let mut hw = HardwareAdapter::new(relays);

    // ── 3. Load settings from NVS (or defaults) ───────────────
    let mut nvs = NvsAdapter::new(nvs_partition.clone());
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            RelayConfig::default()
        }
    }
    .sanitized();

    // ── 4. Network + HTTP panel ───────────────────────────────
    let mut wifi =
        WifiAdapter::new(peripherals.modem, sysloop, nvs_partition).map_err(Error::from)?;
    match wifi.bring_up(&config.network) {
        Ok(mode) => info!("Network up as {:?} on '{}'", mode, wifi.ssid()),
        Err(e) => error!("Network unavailable ({}), running offline", e),
    }
    // Dropping the server handle would unregister the handlers.
    let _server = http_server::start().map_err(Error::from)?;

    // Armed only now: the station join above blocks for up to
    // `sta_connect_timeout_ms`, longer than the watchdog timeout.
    let watchdog = Watchdog::new(watchdog::DEFAULT_TIMEOUT_MS);

    // ── 5. Construct app service ──────────────────────────────
    let time = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();
    let mut app = RelayService::new(config.clone(), entropy::seed());
    app.start(&mut hw, &mut log_sink);
    inbox::publish_status(app.status());

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    let status_every_ms = config.status_log_interval_secs.saturating_mul(1000);
    let mut last_status_ms = time.uptime_ms();

    loop {
        let now_ms = time.uptime_ms();

        inbox::drain_commands(|cmd| {
            let ack = app.handle_command(cmd, now_ms, &mut hw, &mut log_sink);
            debug!("{:?} -> {}", cmd, ack);
        });

        app.tick(now_ms, &mut hw, &mut log_sink);
        inbox::publish_status(app.status());

        if now_ms.wrapping_sub(last_status_ms) >= status_every_ms {
            log_sink.emit(&AppEvent::Status(app.status()));
            last_status_ms = now_ms;
        }

        app.flush_pending_save(&mut nvs, &mut log_sink);

        watchdog.feed();
        FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}
