//! Train dynamics primitives.
//!
//! Pure, stateless functions with no side effects — a first-order kinematic
//! approximation, not a certified train-performance model.  Everything here
//! is testable independently of the simulation engine.

/// Gravitational acceleration in m/s².
const GRAVITY: f64 = 9.81;

/// Service braking deceleration on level track, m/s² (conservative).
const BASE_DECELERATION: f64 = 0.8;

/// Maximum achievable acceleration in m/s² for a train of `mass_tons`
/// hauled with `power_kw`, using a simplified traction model with a hard
/// safety cap at 1.0 m/s².
pub fn max_acceleration(mass_tons: f64, power_kw: f64) -> f64 {
    let mass_kg = mass_tons * 1000.0;
    let tractive_force_n = power_kw * 1000.0 / 10.0;
    (tractive_force_n / mass_kg).min(1.0)
}

/// Distance in metres needed to brake from `v1_kmh` down to `v2_kmh` on a
/// grade of `gradient_pct` (positive = uphill, which helps braking).
///
/// Returns `f64::INFINITY` when the downgrade is steep enough that the
/// effective deceleration is non-positive — the train cannot stop.
pub fn braking_distance(v1_kmh: f64, v2_kmh: f64, gradient_pct: f64) -> f64 {
    let v1 = v1_kmh / 3.6;
    let v2 = v2_kmh / 3.6;

    let effective_decel = BASE_DECELERATION + GRAVITY * (gradient_pct / 100.0);
    if effective_decel <= 0.0 {
        return f64::INFINITY;
    }

    ((v1 * v1 - v2 * v2) / (2.0 * effective_decel)).max(0.0)
}
