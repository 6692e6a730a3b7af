//! Command sequencer: turns a validated selection into an ordered series of
//! device commands.
//!
//! The sequence is strictly sequential, one device call at a time, with the
//! channel's settling delay between consecutive commands (never before the
//! first, never after the job start). A single-flight guard rejects a new
//! `run` while one is still executing; the guard is released on every exit
//! path, success or failure, through a scoped drop guard.

use crate::config::CardConfig;
use crate::device::DeviceChannel;
use crate::error::{Error, Result};
use crate::session::Session;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How a `run` request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Full sequence dispatched; the session was closed
    Dispatched,
    /// No areas selected; nothing was sent (not an error)
    NothingSelected,
    /// A previous run is still in flight; nothing was sent
    Busy,
}

/// Shared handle to the device channel
pub type SharedDevice = Arc<Mutex<Box<dyn DeviceChannel>>>;

/// Executes the run sequence for one session
pub struct CommandSequencer {
    device: SharedDevice,
    in_flight: Arc<AtomicBool>,
    area_map: HashMap<String, u32>,
}

/// Releases the single-flight guard when dropped, on every exit path
struct FlightGuard {
    flag: Arc<AtomicBool>,
}

impl FlightGuard {
    /// Try to acquire the guard; `None` when a run is already in flight
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl CommandSequencer {
    /// Create a sequencer over a shared device channel with an explicit
    /// host-id → device-id area map
    pub fn new(device: SharedDevice, area_map: HashMap<String, u32>) -> Self {
        Self {
            device,
            in_flight: Arc::new(AtomicBool::new(false)),
            area_map,
        }
    }

    /// Create a sequencer whose area map comes from the card configuration
    pub fn from_config(config: &CardConfig, device: SharedDevice) -> Self {
        let area_map = config
            .areas
            .iter()
            .map(|m| (m.area_id.clone(), m.device_area_id))
            .collect();
        Self::new(device, area_map)
    }

    /// Is a run sequence currently executing?
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Dispatch the session's selection to the device.
    ///
    /// An empty area selection and a busy sequencer are both no-ops,
    /// reported through [`RunOutcome`]; device failures abort the remaining
    /// sequence and propagate after the guard is released.
    pub fn run(&self, session: &mut Session) -> Result<RunOutcome> {
        if !session.is_runnable() {
            log::debug!("Run request ignored: no areas selected");
            return Ok(RunOutcome::NothingSelected);
        }

        let Some(guard) = FlightGuard::acquire(&self.in_flight) else {
            log::warn!("Run request ignored: previous run still in flight");
            return Ok(RunOutcome::Busy);
        };

        let result = self.run_sequence(session);
        drop(guard);

        match result {
            Ok(()) => Ok(RunOutcome::Dispatched),
            Err(e) => {
                log::error!("Run sequence aborted: {}", e);
                Err(e)
            }
        }
    }

    fn run_sequence(&self, session: &mut Session) -> Result<()> {
        // Resolve device area ids up front so a bad selection costs zero
        // device calls.
        let area_ids = self.device_area_ids(session)?;
        let cycles = session.cycles();

        // Defensive re-validation immediately before dispatch.
        session.revalidate();
        let modes = session.mode_triple();

        log::info!(
            "Dispatching cleaning run: {} suction={} mop={} route={} cycles={} areas={:?}",
            session.cleaning_mode(),
            modes.suction,
            modes.mop,
            modes.route,
            cycles,
            area_ids
        );

        let settle = self.device.lock().settle_delay();

        self.device.lock().set_suction_mode(modes.suction)?;
        Self::settle(settle);
        self.device.lock().set_mop_mode(modes.mop)?;
        Self::settle(settle);
        self.device.lock().set_route_mode(modes.route)?;
        Self::settle(settle);
        self.device
            .lock()
            .start_segments_cleaning(&area_ids, cycles)?;

        session.close();
        log::info!("Cleaning run dispatched");
        Ok(())
    }

    /// Map the selected host area ids to device-facing ids, sorted for a
    /// deterministic job request
    fn device_area_ids(&self, session: &Session) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        for area_id in session.selected_area_ids() {
            let Some(device_id) = self.area_map.get(&area_id) else {
                return Err(Error::UnknownArea(area_id));
            };
            ids.push(*device_id);
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn settle(delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
