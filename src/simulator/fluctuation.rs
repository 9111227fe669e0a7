use rand::Rng;

/// Value substituted for a base reading that is NaN or infinite.
const FALLBACK_BASE: f64 = 50.0;

/// Moves `base` by up to `variance` in either direction, keeping the result a
/// valid percentage. `u` must lie in [0, 1).
pub fn fluctuate_with(base: f64, variance: f64, u: f64) -> f64 {
    let base = if base.is_finite() { base } else { FALLBACK_BASE };
    (base + (u - 0.5) * variance * 2.0).clamp(0.0, 100.0)
}

pub fn fluctuate<R: Rng>(rng: &mut R, base: f64, variance: f64) -> f64 {
    fluctuate_with(base, variance, rng.random::<f64>())
}

/// Session-count drift for one host pool tick, in [-5, 4].
pub fn load_delta_with(u: f64) -> i32 {
    ((u - 0.5) * 10.0).floor() as i32
}

pub fn load_delta<R: Rng>(rng: &mut R) -> i32 {
    load_delta_with(rng.random::<f64>())
}

/// Applies `delta` and keeps the load within `[0, capacity]`.
pub fn apply_load_delta(load: i32, delta: i32, capacity: i32) -> i32 {
    load.saturating_add(delta).clamp(0, capacity.max(0))
}
