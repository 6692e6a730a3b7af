//! Mode compatibility rules and the repair step.
//!
//! The legality table is held as data ([`ModePolicy`]) rather than hardcoded
//! predicates: the exact per-mode table is ultimately defined by the device
//! firmware, so deployments can supply their own. The default policy encodes
//! the structure common to the supported robots:
//!
//! - `Off` is never legal for an axis the active cleaning mode actually
//!   uses. A vacuuming session cannot hold suction `Off`; a mopping session
//!   cannot hold mop `Off`.
//! - An axis the cleaning mode does not use (suction under `Mop`, mop under
//!   `Vac`) is hidden from the operator. What values the hidden axis may
//!   *hold* is governed by [`HiddenAxisRule`]: the default tolerates any
//!   held value, `OffOnly` forces the axis to `Off` through the repair step.
//! - Route allow-lists are per cleaning mode and configurable; every
//!   cleaning mode must keep at least one legal route.
//!
//! Two predicate families exist on purpose. The `is_supported_*` family is
//! for presentation: it additionally excludes `Off`, which is never offered
//! as a pickable option. The `is_allowed_*` family is structural and is what
//! the repair step enforces.

use crate::modes::{CleaningMode, MopMode, RouteMode, SuctionMode};

/// Legality of values held on an axis the active cleaning mode does not use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HiddenAxisRule {
    /// Any held value is tolerated; the device ignores the axis
    #[default]
    Tolerate,
    /// Only `Off` may be held; the repair step forces the axis off
    OffOnly,
}

/// Per-cleaning-mode legality table
#[derive(Debug, Clone)]
pub struct ModePolicy {
    hidden_axis: HiddenAxisRule,
    routes_vac_and_mop: Vec<RouteMode>,
    routes_mop: Vec<RouteMode>,
    routes_vac: Vec<RouteMode>,
}

impl Default for ModePolicy {
    fn default() -> Self {
        Self {
            hidden_axis: HiddenAxisRule::default(),
            routes_vac_and_mop: RouteMode::ALL.to_vec(),
            routes_mop: RouteMode::ALL.to_vec(),
            routes_vac: RouteMode::ALL.to_vec(),
        }
    }
}

impl ModePolicy {
    /// Policy that forces hidden axes to `Off` through the repair step
    pub fn off_only_hidden_axes() -> Self {
        Self {
            hidden_axis: HiddenAxisRule::OffOnly,
            ..Self::default()
        }
    }

    /// Create a policy with explicit per-mode route allow-lists.
    ///
    /// Each allow-list must contain `RouteMode::Standard`, the repair
    /// fallback.
    pub fn with_routes(
        routes_vac_and_mop: Vec<RouteMode>,
        routes_mop: Vec<RouteMode>,
        routes_vac: Vec<RouteMode>,
    ) -> Self {
        debug_assert!(routes_vac_and_mop.contains(&RouteMode::Standard));
        debug_assert!(routes_mop.contains(&RouteMode::Standard));
        debug_assert!(routes_vac.contains(&RouteMode::Standard));
        Self {
            hidden_axis: HiddenAxisRule::default(),
            routes_vac_and_mop,
            routes_mop,
            routes_vac,
        }
    }

    fn routes_for(&self, cleaning: CleaningMode) -> &[RouteMode] {
        match cleaning {
            CleaningMode::VacAndMop => &self.routes_vac_and_mop,
            CleaningMode::Mop => &self.routes_mop,
            CleaningMode::Vac => &self.routes_vac,
        }
    }

    fn hidden_axis_allows_off_value(&self, is_off: bool) -> bool {
        match self.hidden_axis {
            HiddenAxisRule::Tolerate => true,
            HiddenAxisRule::OffOnly => is_off,
        }
    }

    // === Structural legality (repair step) ===

    /// Is `mode` a structurally legal suction value under `cleaning`?
    ///
    /// Unlike [`is_supported_suction`](Self::is_supported_suction) this
    /// accepts `Off` where the repair step may have placed it.
    pub fn is_allowed_suction(&self, mode: SuctionMode, cleaning: CleaningMode) -> bool {
        if cleaning.vacuums() {
            mode != SuctionMode::Off
        } else {
            self.hidden_axis_allows_off_value(mode == SuctionMode::Off)
        }
    }

    /// Is `mode` a structurally legal mop value under `cleaning`?
    pub fn is_allowed_mop(&self, mode: MopMode, cleaning: CleaningMode) -> bool {
        if cleaning.mops() {
            mode != MopMode::Off
        } else {
            self.hidden_axis_allows_off_value(mode == MopMode::Off)
        }
    }

    /// Is `mode` a structurally legal route value under `cleaning`?
    pub fn is_allowed_route(&self, mode: RouteMode, cleaning: CleaningMode) -> bool {
        self.routes_for(cleaning).contains(&mode)
    }

    // === Pickable legality (presentation) ===

    /// May the operator pick `mode` as the suction value under `cleaning`?
    pub fn is_supported_suction(&self, mode: SuctionMode, cleaning: CleaningMode) -> bool {
        mode != SuctionMode::Off && self.is_allowed_suction(mode, cleaning)
    }

    /// May the operator pick `mode` as the mop value under `cleaning`?
    pub fn is_supported_mop(&self, mode: MopMode, cleaning: CleaningMode) -> bool {
        mode != MopMode::Off && self.is_allowed_mop(mode, cleaning)
    }

    /// May the operator pick `mode` as the route value under `cleaning`?
    pub fn is_supported_route(&self, mode: RouteMode, cleaning: CleaningMode) -> bool {
        self.is_allowed_route(mode, cleaning)
    }

    /// Repair step: replace each axis value that fails structural legality
    /// under `cleaning` with its fixed fallback.
    ///
    /// Fallbacks: suction → `Off` under `Mop`, else `Turbo`; mop → `Off`
    /// under `Vac`, else `Moderate`; route → `Standard`. Idempotent.
    pub fn repair(&self, triple: ModeTriple, cleaning: CleaningMode) -> ModeTriple {
        let mut fixed = triple;

        if !self.is_allowed_suction(fixed.suction, cleaning) {
            fixed.suction = if cleaning == CleaningMode::Mop {
                SuctionMode::Off
            } else {
                SuctionMode::Turbo
            };
        }
        if !self.is_allowed_mop(fixed.mop, cleaning) {
            fixed.mop = if cleaning == CleaningMode::Vac {
                MopMode::Off
            } else {
                MopMode::Moderate
            };
        }
        if !self.is_allowed_route(fixed.route, cleaning) {
            fixed.route = RouteMode::Standard;
        }

        if fixed != triple {
            log::debug!(
                "Repaired modes for {}: suction={} mop={} route={}",
                cleaning,
                fixed.suction,
                fixed.mop,
                fixed.route
            );
        }

        fixed
    }

    /// Does `triple` satisfy all three structural predicates under `cleaning`?
    pub fn is_valid(&self, triple: ModeTriple, cleaning: CleaningMode) -> bool {
        self.is_allowed_suction(triple.suction, cleaning)
            && self.is_allowed_mop(triple.mop, cleaning)
            && self.is_allowed_route(triple.route, cleaning)
    }
}

/// The (suction, mop, route) parameter triple of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTriple {
    pub suction: SuctionMode,
    pub mop: MopMode,
    pub route: RouteMode,
}

impl ModeTriple {
    pub fn new(suction: SuctionMode, mop: MopMode, route: RouteMode) -> Self {
        Self {
            suction,
            mop,
            route,
        }
    }
}
