//! Geodesy helpers: WGS84 lng/lat in, meters out
//!
//! Snap distances are short (tens to hundreds of meters), so a local
//! equirectangular projection centered on the query point is accurate to well
//! under the 30 m ring step. Point-to-point distances use haversine.

use demandalloc_core::LngLat;

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_m(a: LngLat, b: LngLat) -> f64 {
    let (lng1, lat1) = (a[0].to_radians(), a[1].to_radians());
    let (lng2, lat2) = (b[0].to_radians(), b[1].to_radians());
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Meters per degree of longitude and latitude at the given latitude.
///
/// The longitude scale shrinks with the cosine of the latitude; it is floored
/// so polar coordinates keep a finite, nonzero scale instead of producing
/// division by zero (and NaN snap points) downstream.
pub fn meters_per_degree(lat: f64) -> (f64, f64) {
    let m_per_deg_lat = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
    let m_per_deg_lng = m_per_deg_lat * lat.to_radians().cos().abs().max(1e-12);
    (m_per_deg_lng, m_per_deg_lat)
}

/// Closest point on segment `a`-`b` to `p`, and the distance to it in meters.
///
/// Projects into a plane centered at `p`, clamps the perpendicular foot onto
/// the segment, and unprojects the snap point back to lng/lat.
pub fn nearest_point_on_segment(p: LngLat, a: LngLat, b: LngLat) -> (LngLat, f64) {
    let (mx, my) = meters_per_degree(p[1]);
    let ax = (a[0] - p[0]) * mx;
    let ay = (a[1] - p[1]) * my;
    let bx = (b[0] - p[0]) * mx;
    let by = (b[1] - p[1]) * my;

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (-(ax * dx + ay * dy) / len_sq).clamp(0.0, 1.0)
    };

    let sx = ax + t * dx;
    let sy = ay + t * dy;
    let snap = [p[0] + sx / mx, p[1] + sy / my];
    (snap, (sx * sx + sy * sy).sqrt())
}
