//! Device channel abstraction.
//!
//! The single shared external resource: reads of the current modes, writes
//! of new modes, job start, and the generic service actions of the card's
//! action row. One implementation talks to the real device integration; the
//! [`mock`] implementation records calls for tests.

use crate::error::Result;
use crate::modes::{MopMode, RouteMode, SuctionMode};
use std::time::Duration;

pub mod mock;
pub use mock::MockDevice;

/// Generic device action dispatched outside a cleaning session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Pause,
    Stop,
    ReturnToBase,
    Locate,
}

impl ServiceAction {
    /// Service name on the device channel
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Pause => "pause",
            ServiceAction::Stop => "stop",
            ServiceAction::ReturnToBase => "return_to_base",
            ServiceAction::Locate => "locate",
        }
    }
}

/// Device channel trait for the vacuum integration.
///
/// Mode reads are synchronous snapshots of the device-reported state; the
/// write and job-start calls may fail with
/// [`Error::DeviceUnreachable`](crate::Error::DeviceUnreachable) or
/// [`Error::CommandRejected`](crate::Error::CommandRejected).
pub trait DeviceChannel: Send {
    /// Currently reported suction mode
    fn suction_mode(&self) -> Result<SuctionMode>;

    /// Currently reported mop mode
    fn mop_mode(&self) -> Result<MopMode>;

    /// Currently reported route mode
    fn route_mode(&self) -> Result<RouteMode>;

    /// Write a new suction mode
    fn set_suction_mode(&mut self, mode: SuctionMode) -> Result<()>;

    /// Write a new mop mode
    fn set_mop_mode(&mut self, mode: MopMode) -> Result<()>;

    /// Write a new route mode
    fn set_route_mode(&mut self, mode: RouteMode) -> Result<()>;

    /// Start a segmented cleaning job restricted to `area_ids`, repeated
    /// `cycles` times
    fn start_segments_cleaning(&mut self, area_ids: &[u32], cycles: u8) -> Result<()>;

    /// Dispatch a generic service action (start/pause/stop/...)
    fn call_service(&mut self, action: ServiceAction) -> Result<()>;

    /// Settling pause the firmware needs between configuration writes.
    ///
    /// A property of the channel, not of the sequencing algorithm, so an
    /// integration can tune it or return zero once it has an
    /// acknowledgment-based handshake.
    fn settle_delay(&self) -> Duration {
        Duration::from_millis(100)
    }
}
