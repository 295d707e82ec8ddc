//! Naming-convention classification
//!
//! Collections whose name contains "realtime" hold streaming data and are
//! expected to be capped. The match is a case-sensitive, unanchored
//! substring test, inherited from the original convention.

/// Substring marking a collection as realtime
pub const REALTIME_PATTERN: &str = "realtime";

/// Whether a collection name falls under the realtime naming convention
pub fn is_realtime(name: &str) -> bool {
    name.contains(REALTIME_PATTERN)
}

/// One of the four states a collection can be in with respect to the
/// naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Capped and realtime-named: the expected state for realtime data
    CappedRealtime,
    /// Capped but not realtime-named: an anomaly worth reporting
    CappedOther,
    /// Uncapped but realtime-named: must be converted
    UncappedRealtime,
    /// Uncapped and not realtime-named: the expected state otherwise
    UncappedOther,
}

impl Classification {
    /// Whether this state triggers a convert command
    pub fn needs_conversion(self) -> bool {
        self == Self::UncappedRealtime
    }

    /// Whether this state violates the naming convention without
    /// requiring action
    pub fn is_anomaly(self) -> bool {
        self == Self::CappedOther
    }
}

/// Classifies a collection by name and capped status
pub fn classify(name: &str, capped: bool) -> Classification {
    match (capped, is_realtime(name)) {
        (true, true) => Classification::CappedRealtime,
        (true, false) => Classification::CappedOther,
        (false, true) => Classification::UncappedRealtime,
        (false, false) => Classification::UncappedOther,
    }
}
