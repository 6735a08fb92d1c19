//! Allocation rules: ordered eligibility pairs for the nearest-pipe search

use serde::{Deserialize, Serialize};

/// One eligibility rule for connecting a customer point to a pipe.
///
/// Rules form an ordered list; the list order defines priority, not filtering
/// breadth. The first rule for which the search yields a junction-resolvable
/// connection wins, and the zero-based index of that rule is recorded in the
/// result's `rule_matches`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationRule {
    /// Maximum snap distance from the point to the pipe geometry, in meters.
    pub max_distance: f64,
    /// Maximum eligible pipe diameter, in millimeters.
    pub max_diameter: f64,
}

impl AllocationRule {
    pub fn new(max_distance: f64, max_diameter: f64) -> Self {
        Self {
            max_distance,
            max_diameter,
        }
    }

    /// Whether a pipe of the given diameter is eligible under this rule.
    pub fn admits_diameter(&self, diameter: f64) -> bool {
        diameter <= self.max_diameter
    }
}
