//! Mock device channel for unit testing

use super::{DeviceChannel, ServiceAction};
use crate::error::{Error, Result};
use crate::modes::{MopMode, RouteMode, SuctionMode};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded device call, in dispatch order
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetSuction(SuctionMode),
    SetMop(MopMode),
    SetRoute(RouteMode),
    StartSegments { area_ids: Vec<u32>, cycles: u8 },
    Service(ServiceAction),
}

struct MockDeviceInner {
    reported_suction: SuctionMode,
    reported_mop: MopMode,
    reported_route: RouteMode,
    calls: Vec<DeviceCall>,
    /// Fail the nth write (0-based across all recorded calls), once
    fail_at: Option<(usize, FailureKind)>,
    settle_delay: Duration,
}

/// Which failure an injected fault produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreachable,
    Rejected,
}

/// Mock device channel for unit testing.
///
/// Clonable handle over shared state so a test can keep inspecting the
/// recorded calls after handing the device to a sequencer.
#[derive(Clone)]
pub struct MockDevice {
    inner: Arc<Mutex<MockDeviceInner>>,
}

impl MockDevice {
    /// Create a mock reporting the given current modes
    pub fn reporting(suction: SuctionMode, mop: MopMode, route: RouteMode) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockDeviceInner {
                reported_suction: suction,
                reported_mop: mop,
                reported_route: route,
                calls: Vec::new(),
                fail_at: None,
                settle_delay: Duration::ZERO,
            })),
        }
    }

    /// Mock reporting an idle vac&mop state
    pub fn new() -> Self {
        Self::reporting(SuctionMode::Balanced, MopMode::Moderate, RouteMode::Standard)
    }

    /// Fail the nth recorded call (0-based), once
    pub fn fail_call(&self, index: usize, kind: FailureKind) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_at = Some((index, kind));
    }

    /// Use a non-zero settling delay (tests default to zero)
    pub fn set_settle_delay(&self, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.settle_delay = delay;
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of recorded calls
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    fn record(&self, call: DeviceCall) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some((index, kind)) = inner.fail_at {
            if inner.calls.len() == index {
                inner.fail_at = None;
                return Err(match kind {
                    FailureKind::Unreachable => {
                        Error::DeviceUnreachable("mock: connection lost".to_string())
                    }
                    FailureKind::Rejected => {
                        Error::CommandRejected(format!("mock: refused {call:?}"))
                    }
                });
            }
        }
        inner.calls.push(call);
        Ok(())
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceChannel for MockDevice {
    fn suction_mode(&self) -> Result<SuctionMode> {
        Ok(self.inner.lock().unwrap().reported_suction)
    }

    fn mop_mode(&self) -> Result<MopMode> {
        Ok(self.inner.lock().unwrap().reported_mop)
    }

    fn route_mode(&self) -> Result<RouteMode> {
        Ok(self.inner.lock().unwrap().reported_route)
    }

    fn set_suction_mode(&mut self, mode: SuctionMode) -> Result<()> {
        self.record(DeviceCall::SetSuction(mode))?;
        self.inner.lock().unwrap().reported_suction = mode;
        Ok(())
    }

    fn set_mop_mode(&mut self, mode: MopMode) -> Result<()> {
        self.record(DeviceCall::SetMop(mode))?;
        self.inner.lock().unwrap().reported_mop = mode;
        Ok(())
    }

    fn set_route_mode(&mut self, mode: RouteMode) -> Result<()> {
        self.record(DeviceCall::SetRoute(mode))?;
        self.inner.lock().unwrap().reported_route = mode;
        Ok(())
    }

    fn start_segments_cleaning(&mut self, area_ids: &[u32], cycles: u8) -> Result<()> {
        self.record(DeviceCall::StartSegments {
            area_ids: area_ids.to_vec(),
            cycles,
        })
    }

    fn call_service(&mut self, action: ServiceAction) -> Result<()> {
        self.record(DeviceCall::Service(action))
    }

    fn settle_delay(&self) -> Duration {
        self.inner.lock().unwrap().settle_delay
    }
}
