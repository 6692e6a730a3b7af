//! Niyantra - Cleaning-mode orchestration core for a robot vacuum control
//! surface
//!
//! This library decides which (suction, mop, route) combinations are legal
//! under each cleaning mode, repairs illegal combinations when the operator
//! switches modes, and turns a validated selection into an ordered,
//! single-flight command sequence against the device channel.
//!
//! ## Pipeline
//!
//! A raw card configuration is normalized once ([`config::CardConfig`]);
//! its output backs a [`card::CardController`], which opens a
//! [`session::Session`] seeded from the device's reported modes. User
//! interaction mutates the session under the [`compat::ModePolicy`], and
//! `run` hands the final selection to the [`sequencer::CommandSequencer`].

pub mod areas;
pub mod card;
pub mod compat;
pub mod config;
pub mod device;
pub mod error;
pub mod modes;
pub mod sequencer;
pub mod session;
pub mod stats;

// Re-export commonly used types
pub use card::CardController;
pub use compat::{ModePolicy, ModeTriple};
pub use config::{CardConfig, RawCardConfig};
pub use device::{DeviceChannel, ServiceAction};
pub use error::{Error, Result};
pub use modes::{CleaningMode, MopMode, RouteMode, SuctionMode};
pub use sequencer::{CommandSequencer, RunOutcome};
pub use session::{Session, SessionEvent};
