//! Numeric guards for gesture input

/// Returns `value`, or `0.0` when it is NaN or infinite.
///
/// Hosts occasionally deliver garbage velocities (zero-length time deltas,
/// driver glitches). Those become no-ops instead of poisoning offsets.
#[inline]
pub fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        tracing::trace!("dropping non-finite gesture input {value}");
        0.0
    }
}

/// Whether `velocity` is small enough to count as at rest
#[inline]
pub fn is_at_rest(velocity: f32, threshold: f32) -> bool {
    velocity.abs() < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(12.5), 12.5);
        assert_eq!(finite_or_zero(-3.0), -3.0);
        assert_eq!(finite_or_zero(f32::NAN), 0.0);
        assert_eq!(finite_or_zero(f32::INFINITY), 0.0);
        assert_eq!(finite_or_zero(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_is_at_rest() {
        assert!(is_at_rest(0.5, 1.0));
        assert!(is_at_rest(-0.5, 1.0));
        assert!(!is_at_rest(-1.0, 1.0));
    }
}
