//! Application service — the hexagonal core.
//!
//! [`RelayService`] owns the relay bank, the operating mode and the
//! animation engines.  It exposes a clean, hardware-agnostic API.  All
//! I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  RelayCommand ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                   │        RelayService          │
//!     RelayPort ◀── │  Bank · Patterns · Blitz     │
//!                   └─────────────────────────────┘
//! ```
//!
//! Nothing in here waits: `tick` compares elapsed time and returns.

use log::{info, warn};

use crate::config::{RelayConfig, clamp_blitz_ms, clamp_running_speed};
use crate::engine::blitz::BlitzEngine;
use crate::engine::patterns::{PatternEngine, PatternId};
use crate::engine::show::{AutoCycle, Stage};
use crate::relay::RelayBank;

use super::commands::RelayCommand;
use super::events::{AppEvent, Mode, StatusSnapshot};
use super::ports::{ConfigPort, EventSink, RelayPort};

// ───────────────────────────────────────────────────────────────
// RelayService
// ───────────────────────────────────────────────────────────────

pub struct RelayService {
    config: RelayConfig,
    bank: RelayBank,
    mode: Mode,
    patterns: PatternEngine,
    blitz: BlitzEngine,
    show: AutoCycle,
    /// Running mode is currently on the show's blitz stage.
    show_blitz: bool,
    save_requested: bool,
    last_now_ms: u32,
}

impl RelayService {
    /// Construct the service from configuration.
    ///
    /// `seed` feeds the pattern RNG.  Does **not** touch the relays;
    /// call [`start`](Self::start) next.
    pub fn new(config: RelayConfig, seed: u32) -> Self {
        let config = config.sanitized();
        Self {
            bank: RelayBank::new(config.relay_count),
            mode: Mode::Manual,
            patterns: PatternEngine::new(config.pattern, config.running_speed_ms, seed),
            blitz: BlitzEngine::new(config.blitz_on_ms, config.blitz_off_ms),
            show: AutoCycle::new(config.auto_cycle, config.auto_cycle_interval_ms),
            show_blitz: false,
            save_requested: false,
            last_now_ms: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Release every relay and announce the initial mode.
    pub fn start(&mut self, hw: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.bank.all_off();
        self.push(hw);
        sink.emit(&AppEvent::Started(self.mode));
        info!(
            "RelayService started: {} relays, pattern {}",
            self.bank.count(),
            self.patterns.pattern().name()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance whichever engine the current mode runs.
    pub fn tick(&mut self, now_ms: u32, hw: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.last_now_ms = now_ms;

        match self.mode {
            Mode::Manual => {}
            Mode::Blitz => self.step_blitz(now_ms, hw),
            Mode::Running => {
                if let Some(stage) = self.show.tick(now_ms) {
                    self.enter_stage(stage, hw, sink);
                }
                if self.show_blitz {
                    self.step_blitz(now_ms, hw);
                } else if let Some(frame) = self.patterns.tick(now_ms, self.bank.count()) {
                    self.bank.apply_mask(frame);
                    self.push(hw);
                }
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one command from the control page.  Returns the plain-text
    /// acknowledgement for the client.
    pub fn handle_command(
        &mut self,
        cmd: RelayCommand,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> &'static str {
        self.last_now_ms = now_ms;

        match cmd {
            RelayCommand::Toggle(id) => {
                let in_range = usize::try_from(id)
                    .ok()
                    .filter(|&i| i < usize::from(self.bank.count()));
                if let Some(id) = in_range {
                    self.stop_animation(sink);
                    self.bank.toggle(id);
                    self.push(hw);
                }
            }
            RelayCommand::SetAll(on) => {
                self.stop_animation(sink);
                if on {
                    self.bank.all_on();
                } else {
                    self.bank.all_off();
                }
                self.push(hw);
            }
            RelayCommand::ToggleRunning => {
                let target = if self.mode == Mode::Running {
                    Mode::Manual
                } else {
                    Mode::Running
                };
                self.switch_mode(target, hw, sink);
            }
            RelayCommand::ToggleBlitz => {
                let target = if self.mode == Mode::Blitz {
                    Mode::Manual
                } else {
                    Mode::Blitz
                };
                self.switch_mode(target, hw, sink);
            }
            RelayCommand::SetSpeed(v) => {
                let speed = clamp_running_speed(v);
                self.patterns.set_speed(speed);
                self.config.running_speed_ms = speed;
            }
            RelayCommand::SetCount(v) => {
                let count = self.bank.set_count(v);
                self.config.relay_count = count;
                self.patterns.reset();
                // The bank is dark now; flash again from the on phase.
                if self.mode == Mode::Blitz || self.show_blitz {
                    self.blitz.reset();
                }
                if self.mode == Mode::Running {
                    self.show.rearm();
                }
                self.push(hw);
                sink.emit(&AppEvent::RelayCountChanged(count));
            }
            RelayCommand::SelectPattern(p) => {
                let pattern = PatternId::from_index(p.rem_euclid(PatternId::COUNT as i32) as usize);
                self.config.pattern = pattern;
                self.patterns.select(pattern);
                if self.mode == Mode::Running {
                    self.bank.all_off();
                    self.push(hw);
                    self.show.restart(pattern);
                    self.show_blitz = false;
                } else {
                    self.switch_mode(Mode::Running, hw, sink);
                }
                sink.emit(&AppEvent::PatternChanged(pattern));
            }
            RelayCommand::SetAutoCycle(on) => {
                self.show.set_enabled(on);
                self.config.auto_cycle = on;
                let off_course = self.show_blitz || self.patterns.pattern() != self.config.pattern;
                if !on && off_course {
                    // Back to the picked pattern.
                    self.show_blitz = false;
                    self.show.restart(self.config.pattern);
                    self.patterns.select(self.config.pattern);
                    if self.mode == Mode::Running {
                        self.bank.all_off();
                        self.push(hw);
                    }
                }
            }
            RelayCommand::SetBlitzTiming { on_ms, off_ms } => {
                let (on_ms, off_ms) = (clamp_blitz_ms(on_ms), clamp_blitz_ms(off_ms));
                self.blitz.set_timing(on_ms, off_ms);
                self.config.blitz_on_ms = on_ms;
                self.config.blitz_off_ms = off_ms;
            }
            RelayCommand::SaveSettings => {
                self.save_requested = true;
                info!("Settings save requested");
            }
        }

        cmd.ack()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> StatusSnapshot {
        let (blitz_on_ms, blitz_off_ms) = self.blitz.timing();
        StatusSnapshot {
            mode: self.mode,
            relay_count: self.bank.count(),
            relays: self.bank.mask(),
            pattern: self.patterns.pattern(),
            show_blitz: self.show_blitz,
            running_speed_ms: self.patterns.speed_ms(),
            blitz_on_ms,
            blitz_off_ms,
            auto_cycle: self.show.is_enabled(),
            uptime_ms: self.last_now_ms,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bank(&self) -> &RelayBank {
        &self.bank
    }

    /// Clone of the live settings, as they would be persisted.
    pub fn current_config(&self) -> RelayConfig {
        self.config.clone()
    }

    pub fn is_save_pending(&self) -> bool {
        self.save_requested
    }

    // ── Persistence ───────────────────────────────────────────

    /// Write the settings if a save was requested.  Returns `true` if
    /// they were saved.  A failed save is logged and dropped; the user
    /// can ask again.
    pub fn flush_pending_save(
        &mut self,
        storage: &mut impl ConfigPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.save_requested {
            return false;
        }
        self.save_requested = false;
        match storage.save(&self.config) {
            Ok(()) => {
                sink.emit(&AppEvent::SettingsSaved);
                info!("Settings saved to NVS");
                true
            }
            Err(e) => {
                warn!("Settings save failed: {}", e);
                false
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn push(&self, hw: &mut impl RelayPort) {
        if let Err(e) = hw.write(self.bank.active()) {
            warn!("Relay write failed: {}", e);
        }
    }

    fn step_blitz(&mut self, now_ms: u32, hw: &mut impl RelayPort) {
        if let Some(on) = self.blitz.tick(now_ms) {
            if on {
                self.bank.all_on();
            } else {
                self.bank.all_off();
            }
            self.push(hw);
        }
    }

    /// Mode switches always start from a dark bank.
    fn switch_mode(&mut self, target: Mode, hw: &mut impl RelayPort, sink: &mut impl EventSink) {
        let from = self.mode;
        self.bank.all_off();
        self.push(hw);
        self.show_blitz = false;

        match target {
            Mode::Running => {
                self.patterns.select(self.config.pattern);
                self.show.restart(self.config.pattern);
            }
            Mode::Blitz => self.blitz.reset(),
            Mode::Manual => {}
        }

        self.mode = target;
        if from != target {
            sink.emit(&AppEvent::ModeChanged { from, to: target });
        }
        info!("Mode {} -> {}", from.name(), target.name());
    }

    /// Manual commands freeze the current outputs and take over.
    fn stop_animation(&mut self, sink: &mut impl EventSink) {
        if self.mode == Mode::Manual {
            return;
        }
        let from = self.mode;
        self.mode = Mode::Manual;
        self.show_blitz = false;
        sink.emit(&AppEvent::ModeChanged {
            from,
            to: Mode::Manual,
        });
    }

    fn enter_stage(&mut self, stage: Stage, hw: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.bank.all_off();
        self.push(hw);
        match stage {
            Stage::Pattern(p) => {
                self.show_blitz = false;
                self.patterns.select(p);
                sink.emit(&AppEvent::PatternChanged(p));
            }
            Stage::Blitz => {
                self.show_blitz = true;
                self.blitz.reset();
                sink.emit(&AppEvent::ShowBlitz);
            }
        }
    }
}
