pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Frame-rate independent exponential approach of `from` toward `to`.
///
/// `lambda` is the decay rate per second; `dt` is the elapsed time in seconds.
pub(crate) fn damp(from: f64, to: f64, lambda: f64, dt: f64) -> f64 {
    lerp(from, to, 1.0 - (-lambda * dt).exp())
}

pub(crate) fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
