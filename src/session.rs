//! Selection state machine for one interactive cleaning session.
//!
//! A [`Session`] holds the in-progress selection (cleaning mode, suction,
//! mop, route, repeat cycles, selected areas) and enforces mode
//! compatibility on every transition: after any call returns, the held
//! (suction, mop, route) triple is structurally legal for the active
//! cleaning mode. Presentation layers render from [`Session::snapshot`] and
//! listen on the paired event receiver; one event is emitted per accepted
//! user action.

use crate::areas::AreaSelection;
use crate::compat::{ModePolicy, ModeTriple};
use crate::config::CardConfig;
use crate::device::DeviceChannel;
use crate::error::{Error, Result};
use crate::modes::{CleaningMode, MopMode, RouteMode, SuctionMode};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Repeat-cycle domain
pub const MIN_CYCLES: u8 = 1;
pub const MAX_CYCLES: u8 = 3;

/// Notification of one accepted session transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CleaningModeChanged(CleaningMode),
    SuctionChanged(SuctionMode),
    MopChanged(MopMode),
    RouteChanged(RouteMode),
    CyclesChanged(u8),
    AreasChanged(Vec<String>),
    Closed,
}

/// Immutable snapshot of the session state, for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub cleaning: CleaningMode,
    pub suction: SuctionMode,
    pub mop: MopMode,
    pub route: RouteMode,
    pub cycles: u8,
    pub areas: Vec<String>,
}

/// One interactive session's selection state
pub struct Session {
    policy: ModePolicy,
    cleaning: CleaningMode,
    modes: ModeTriple,
    cycles: u8,
    areas: AreaSelection,
    events: Sender<SessionEvent>,
}

impl Session {
    /// Open a session seeded from the device's currently reported modes.
    ///
    /// The cleaning mode is derived, not read: reported suction `Off` means
    /// a mop-only session, else reported mop `Off` means a vac-only
    /// session, else both. The repair step runs once so the initial triple
    /// is legal even when the device reports an inconsistent combination.
    pub fn from_device(
        device: &dyn DeviceChannel,
        policy: ModePolicy,
    ) -> Result<(Self, Receiver<SessionEvent>)> {
        let suction = device.suction_mode()?;
        let mop = device.mop_mode()?;
        let route = device.route_mode()?;

        let cleaning = if suction == SuctionMode::Off {
            CleaningMode::Mop
        } else if mop == MopMode::Off {
            CleaningMode::Vac
        } else {
            CleaningMode::VacAndMop
        };

        log::debug!(
            "Session opened from device state: suction={} mop={} route={} -> {}",
            suction,
            mop,
            route,
            cleaning
        );

        Ok(Self::with_state(
            policy,
            cleaning,
            ModeTriple::new(suction, mop, route),
        ))
    }

    /// Open a session seeded from the configured default parameter table,
    /// for hosts that cannot read the device state at open time.
    pub fn from_defaults(
        config: &CardConfig,
        policy: ModePolicy,
    ) -> (Self, Receiver<SessionEvent>) {
        let cleaning = config.default_mode;
        let params = config.default_modes[&cleaning];
        let triple = ModeTriple::new(
            params.suction.unwrap_or(SuctionMode::Turbo),
            params.mop.unwrap_or(MopMode::Moderate),
            params.route.unwrap_or(RouteMode::Standard),
        );
        Self::with_state(policy, cleaning, triple)
    }

    fn with_state(
        policy: ModePolicy,
        cleaning: CleaningMode,
        triple: ModeTriple,
    ) -> (Self, Receiver<SessionEvent>) {
        let (events, receiver) = unbounded();
        let modes = policy.repair(triple, cleaning);

        let session = Self {
            policy,
            cleaning,
            modes,
            cycles: MIN_CYCLES,
            areas: AreaSelection::new(),
            events,
        };
        (session, receiver)
    }

    // === Accessors ===

    pub fn cleaning_mode(&self) -> CleaningMode {
        self.cleaning
    }

    pub fn suction_mode(&self) -> SuctionMode {
        self.modes.suction
    }

    pub fn mop_mode(&self) -> MopMode {
        self.modes.mop
    }

    pub fn route_mode(&self) -> RouteMode {
        self.modes.route
    }

    pub fn cycles(&self) -> u8 {
        self.cycles
    }

    pub fn policy(&self) -> &ModePolicy {
        &self.policy
    }

    /// The current (suction, mop, route) triple
    pub(crate) fn mode_triple(&self) -> ModeTriple {
        self.modes
    }

    /// Snapshot for rendering
    pub fn snapshot(&self) -> Selection {
        Selection {
            cleaning: self.cleaning,
            suction: self.modes.suction,
            mop: self.modes.mop,
            route: self.modes.route,
            cycles: self.cycles,
            areas: self.selected_area_ids(),
        }
    }

    /// Selected host area ids (no ordering guarantee)
    pub fn selected_area_ids(&self) -> Vec<String> {
        self.areas.ids().map(str::to_string).collect()
    }

    /// A session is runnable once at least one area is selected
    pub fn is_runnable(&self) -> bool {
        !self.areas.is_empty()
    }

    // === Transitions ===

    /// Switch the active cleaning mode.
    ///
    /// The repair step runs synchronously in the same call: by the time this
    /// returns, every axis value is legal for `new_mode`.
    pub fn select_cleaning_mode(&mut self, new_mode: CleaningMode) {
        self.cleaning = new_mode;
        self.modes = self.policy.repair(self.modes, new_mode);
        self.emit(SessionEvent::CleaningModeChanged(new_mode));
    }

    /// Pick a suction level. Fails closed on a value the active cleaning
    /// mode does not offer; the held value is unchanged on error.
    pub fn select_suction(&mut self, mode: SuctionMode) -> Result<()> {
        if !self.policy.is_supported_suction(mode, self.cleaning) {
            log::warn!("Rejected suction {} under {}", mode, self.cleaning);
            return Err(Error::InvalidSelection(format!(
                "suction {} is not available in {} mode",
                mode, self.cleaning
            )));
        }
        self.modes.suction = mode;
        self.emit(SessionEvent::SuctionChanged(mode));
        Ok(())
    }

    /// Pick a mop intensity. Fails closed like [`select_suction`](Self::select_suction).
    pub fn select_mop(&mut self, mode: MopMode) -> Result<()> {
        if !self.policy.is_supported_mop(mode, self.cleaning) {
            log::warn!("Rejected mop {} under {}", mode, self.cleaning);
            return Err(Error::InvalidSelection(format!(
                "mop {} is not available in {} mode",
                mode, self.cleaning
            )));
        }
        self.modes.mop = mode;
        self.emit(SessionEvent::MopChanged(mode));
        Ok(())
    }

    /// Pick a route pattern. Fails closed like [`select_suction`](Self::select_suction).
    pub fn select_route(&mut self, mode: RouteMode) -> Result<()> {
        if !self.policy.is_supported_route(mode, self.cleaning) {
            log::warn!("Rejected route {} under {}", mode, self.cleaning);
            return Err(Error::InvalidSelection(format!(
                "route {} is not available in {} mode",
                mode, self.cleaning
            )));
        }
        self.modes.route = mode;
        self.emit(SessionEvent::RouteChanged(mode));
        Ok(())
    }

    /// Set the repeat-cycle count; only 1..=3 is accepted
    pub fn select_cycles(&mut self, cycles: u8) -> Result<()> {
        if !(MIN_CYCLES..=MAX_CYCLES).contains(&cycles) {
            return Err(Error::InvalidParameter(format!(
                "cycles must be between {MIN_CYCLES} and {MAX_CYCLES}, got {cycles}"
            )));
        }
        self.cycles = cycles;
        self.emit(SessionEvent::CyclesChanged(cycles));
        Ok(())
    }

    /// Step the cycle count, wrapping past the maximum back to 1.
    ///
    /// The cycles button behavior: each press increments, 3 wraps to 1.
    pub fn advance_cycles(&mut self) -> u8 {
        self.cycles = if self.cycles >= MAX_CYCLES {
            MIN_CYCLES
        } else {
            self.cycles + 1
        };
        self.emit(SessionEvent::CyclesChanged(self.cycles));
        self.cycles
    }

    /// Re-run the repair step against the active cleaning mode.
    ///
    /// A no-op when the triple is already legal; the sequencer calls this
    /// immediately before dispatch as defensive re-validation.
    pub fn revalidate(&mut self) {
        self.modes = self.policy.repair(self.modes, self.cleaning);
    }

    /// Flip membership of a host area id in the selection set
    pub fn toggle_area(&mut self, id: &str) {
        self.areas.toggle(id);
        self.emit(SessionEvent::AreasChanged(self.selected_area_ids()));
    }

    /// Clear the selected areas; mode selections are kept
    pub fn reset(&mut self) {
        self.areas.clear();
    }

    /// Close the session: clear areas and notify presentation
    pub fn close(&mut self) {
        self.reset();
        self.emit(SessionEvent::Closed);
    }

    fn emit(&self, event: SessionEvent) {
        // Presentation may have dropped its receiver; the session keeps
        // working without listeners.
        let _ = self.events.send(event);
    }
}
