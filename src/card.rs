//! Card controller: ties one card configuration to one device channel.
//!
//! Owns the shared device handle and the command sequencer; presentation
//! opens sessions through it, runs them, and dispatches the action-row
//! services. One controller backs one card instance for its lifetime.

use crate::areas::{resolve_areas, Area, AreaInfo};
use crate::compat::ModePolicy;
use crate::config::{CardConfig, SensorIds};
use crate::device::{DeviceChannel, ServiceAction};
use crate::error::Result;
use crate::modes::{MopMode, RouteMode, SuctionMode};
use crate::sequencer::{CommandSequencer, RunOutcome, SharedDevice};
use crate::session::{Session, SessionEvent};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Control surface for one vacuum card
pub struct CardController {
    config: CardConfig,
    policy: ModePolicy,
    device: SharedDevice,
    sequencer: CommandSequencer,
}

impl CardController {
    /// Create a controller with the default mode policy
    pub fn new(config: CardConfig, device: Box<dyn DeviceChannel>) -> Self {
        Self::with_policy(config, device, ModePolicy::default())
    }

    /// Create a controller with a deployment-specific mode policy
    pub fn with_policy(
        config: CardConfig,
        device: Box<dyn DeviceChannel>,
        policy: ModePolicy,
    ) -> Self {
        let device: SharedDevice = Arc::new(Mutex::new(device));
        let sequencer = CommandSequencer::from_config(&config, Arc::clone(&device));

        log::info!("Card controller ready for {}", config.entity);

        Self {
            config,
            policy,
            device,
            sequencer,
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Companion sensor entity ids for this card's device
    pub fn sensor_ids(&self) -> SensorIds {
        self.config.sensor_ids()
    }

    /// Configured areas intersected with the host area registry
    pub fn areas(&self, registry: &HashMap<String, AreaInfo>) -> Vec<Area> {
        resolve_areas(&self.config.areas, registry)
    }

    /// Device-reported modes, for the card header
    pub fn reported_modes(&self) -> Result<(SuctionMode, MopMode, RouteMode)> {
        let device = self.device.lock();
        Ok((device.suction_mode()?, device.mop_mode()?, device.route_mode()?))
    }

    /// Open a new session seeded from the device's current state
    pub fn open_session(&self) -> Result<(Session, Receiver<SessionEvent>)> {
        let device = self.device.lock();
        Session::from_device(&**device, self.policy.clone())
    }

    /// Open a session from the configured defaults, without a device read
    pub fn open_session_from_defaults(&self) -> (Session, Receiver<SessionEvent>) {
        Session::from_defaults(&self.config, self.policy.clone())
    }

    /// Dispatch the session's selection as a cleaning run
    pub fn run(&self, session: &mut Session) -> Result<RunOutcome> {
        self.sequencer.run(session)
    }

    /// Is a run sequence currently executing?
    pub fn is_run_in_flight(&self) -> bool {
        self.sequencer.is_in_flight()
    }

    /// Dispatch an action-row service (start/pause/stop/return/locate)
    pub fn call_service(&self, action: ServiceAction) -> Result<()> {
        log::info!("Service action: {}", action.as_str());
        self.device.lock().call_service(action)
    }
}
