//! Shared numeric helpers
//!
//! Bounded rolling windows, the per-instrument registry that owns them, and
//! the moment calculations used by the volume and momentum analyzers.

mod registry;
mod rolling;

pub use registry::InstrumentRegistry;
pub use rolling::RollingWindow;

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divisor N, not N-1).
pub fn population_std(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Exponential moving average with smoothing factor `2 / (periods + 1)`.
///
/// Seeded with the mean of the first `periods` values, then folded over the
/// rest oldest to newest. With fewer than `periods` values the plain mean is
/// returned instead.
pub fn ema(values: &[f64], periods: usize) -> Option<f64> {
    if periods == 0 || values.len() < periods {
        return mean(values);
    }

    let alpha = 2.0 / (periods as f64 + 1.0);
    let seed = mean(&values[..periods])?;

    Some(
        values[periods..]
            .iter()
            .fold(seed, |ema, price| alpha * price + (1.0 - alpha) * ema),
    )
}
