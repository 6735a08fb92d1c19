//! Customer points and their resolved pipe connections

use serde::{Deserialize, Serialize};

use crate::LngLat;

/// The result of a successful allocation: which pipe the point was snapped
/// onto, the closest point on that pipe's geometry, the distance to it, and
/// which junction receives the demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Id of the pipe the point was snapped onto.
    pub pipe_id: String,
    /// Closest point on the pipe geometry, `[lng, lat]`.
    pub snap_point: LngLat,
    /// Snap distance in meters.
    pub distance: f64,
    /// Id of the junction that receives the demand.
    pub junction_id: String,
}

/// A geolocated demand point to be connected to the network.
///
/// Immutable after construction except for its connection, which is set
/// exactly once per allocation attempt. The orchestrator never mutates
/// caller-supplied points; [`CustomerPoint::with_connection`] returns a fresh
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPoint {
    id: String,
    coordinates: LngLat,
    base_demand: f64,
    label: String,
    connection: Option<Connection>,
}

impl CustomerPoint {
    pub fn new(
        id: impl Into<String>,
        coordinates: LngLat,
        base_demand: f64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            coordinates,
            base_demand,
            label: label.into(),
            connection: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coordinates(&self) -> LngLat {
        self.coordinates
    }

    /// Base demand carried through allocation; not used by the search itself.
    pub fn base_demand(&self) -> f64 {
        self.base_demand
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Copy-on-write connection assignment: returns a new point carrying the
    /// connection, leaving `self` untouched.
    pub fn with_connection(&self, connection: Connection) -> Self {
        Self {
            id: self.id.clone(),
            coordinates: self.coordinates,
            base_demand: self.base_demand,
            label: self.label.clone(),
            connection: Some(connection),
        }
    }
}
