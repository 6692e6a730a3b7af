//! Cleaning, suction, mop and route mode enumerations plus the per-mode
//! default parameter table.
//!
//! Wire names match the strings the device firmware reports and accepts
//! (`vac&mop`, `max_plus`, `deep_plus`, ...). Presentation layers iterate
//! the `ALL` slices to build their selector rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level operating mode: which physical actions a session performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleaningMode {
    #[serde(rename = "vac&mop")]
    VacAndMop,
    #[serde(rename = "mop")]
    Mop,
    #[serde(rename = "vac")]
    Vac,
}

impl CleaningMode {
    /// All cleaning modes, in presentation order
    pub const ALL: [CleaningMode; 3] = [
        CleaningMode::VacAndMop,
        CleaningMode::Mop,
        CleaningMode::Vac,
    ];

    /// Wire name as reported/accepted by the device
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningMode::VacAndMop => "vac&mop",
            CleaningMode::Mop => "mop",
            CleaningMode::Vac => "vac",
        }
    }

    /// Does this mode include vacuuming?
    pub fn vacuums(&self) -> bool {
        matches!(self, CleaningMode::VacAndMop | CleaningMode::Vac)
    }

    /// Does this mode include mopping?
    pub fn mops(&self) -> bool {
        matches!(self, CleaningMode::VacAndMop | CleaningMode::Mop)
    }
}

impl fmt::Display for CleaningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suction power level. Relevant only when the cleaning mode vacuums.
///
/// `Off` is never offered as a pickable option; the repair step assigns it
/// programmatically for mop-only sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuctionMode {
    Off,
    Quiet,
    Balanced,
    Turbo,
    Max,
    MaxPlus,
}

impl SuctionMode {
    /// All suction modes, in presentation order
    pub const ALL: [SuctionMode; 6] = [
        SuctionMode::Off,
        SuctionMode::Quiet,
        SuctionMode::Balanced,
        SuctionMode::Turbo,
        SuctionMode::Max,
        SuctionMode::MaxPlus,
    ];

    /// Wire name as reported/accepted by the device
    pub fn as_str(&self) -> &'static str {
        match self {
            SuctionMode::Off => "off",
            SuctionMode::Quiet => "quiet",
            SuctionMode::Balanced => "balanced",
            SuctionMode::Turbo => "turbo",
            SuctionMode::Max => "max",
            SuctionMode::MaxPlus => "max_plus",
        }
    }
}

impl fmt::Display for SuctionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mop water/scrub intensity. Relevant only when the cleaning mode mops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MopMode {
    Off,
    Mild,
    Moderate,
    Intense,
}

impl MopMode {
    /// All mop modes, in presentation order
    pub const ALL: [MopMode; 4] = [
        MopMode::Off,
        MopMode::Mild,
        MopMode::Moderate,
        MopMode::Intense,
    ];

    /// Wire name as reported/accepted by the device
    pub fn as_str(&self) -> &'static str {
        match self {
            MopMode::Off => "off",
            MopMode::Mild => "mild",
            MopMode::Moderate => "moderate",
            MopMode::Intense => "intense",
        }
    }
}

impl fmt::Display for MopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route pattern. Relevant for all cleaning modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    Fast,
    Standard,
    Deep,
    DeepPlus,
}

impl RouteMode {
    /// All route modes, in presentation order
    pub const ALL: [RouteMode; 4] = [
        RouteMode::Fast,
        RouteMode::Standard,
        RouteMode::Deep,
        RouteMode::DeepPlus,
    ];

    /// Wire name as reported/accepted by the device
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMode::Fast => "fast",
            RouteMode::Standard => "standard",
            RouteMode::Deep => "deep",
            RouteMode::DeepPlus => "deep_plus",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default or candidate parameter set for one cleaning mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleaningParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suction: Option<SuctionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mop: Option<MopMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteMode>,
}

/// Built-in default parameter table.
///
/// Exactly one entry per cleaning mode; these are fixed constants, never
/// produced by user input.
pub fn default_parameters(mode: CleaningMode) -> CleaningParameters {
    match mode {
        CleaningMode::VacAndMop => CleaningParameters {
            suction: Some(SuctionMode::Balanced),
            mop: Some(MopMode::Moderate),
            route: Some(RouteMode::Standard),
        },
        CleaningMode::Mop => CleaningParameters {
            suction: Some(SuctionMode::Balanced),
            mop: Some(MopMode::Moderate),
            route: Some(RouteMode::Deep),
        },
        CleaningMode::Vac => CleaningParameters {
            suction: Some(SuctionMode::Turbo),
            mop: Some(MopMode::Moderate),
            route: Some(RouteMode::Standard),
        },
    }
}
