//! Denominator guards shared by every ratio the engine computes.

/// Substitute for a zero price-space denominator (MA, range, past close).
pub const PRICE_FLOOR: f64 = 1.0;

/// Substitute for a zero average loss in RSI.
pub const RSI_LOSS_FLOOR: f64 = 1e-10;

/// Replace a zero denominator with `floor`.
#[inline]
pub fn guard_denominator(value: f64, floor: f64) -> f64 {
    if value == 0.0 {
        floor
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_only_replaces_zero() {
        assert_eq!(guard_denominator(0.0, PRICE_FLOOR), 1.0);
        assert_eq!(guard_denominator(-0.0, PRICE_FLOOR), 1.0);
        assert_eq!(guard_denominator(0.25, PRICE_FLOOR), 0.25);
        assert_eq!(guard_denominator(0.0, RSI_LOSS_FLOOR), 1e-10);
    }
}
