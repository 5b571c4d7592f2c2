//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Linearly interpolate between `a` and `b` by the fraction `t`.
///
/// `t` is not clamped, values outside [0, 1] extrapolate.
pub fn lerp<T>(a: T, b: T, t: T) -> T
where
    T: Float,
{
    a + (b - a) * t
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float + std::ops::Mul + std::ops::Add + std::ops::AddAssign,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Get the signed shortest-arc difference `a - b` between two angles.
///
/// The result is wrapped into (-pi, pi], so a heading of `-pi + 0.1` minus a
/// heading of `pi - 0.1` gives `0.2`, not `-2pi + 0.2`.
pub fn ang_diff<T>(a: T, b: T) -> T
where
    T: Float,
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let mut d = (a - b) % tau_t;

    if d <= -pi_t {
        d = d + tau_t;
    }
    if d > pi_t {
        d = d - tau_t;
    }

    d
}

/// Wrap an angle into (-pi, pi].
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float,
{
    ang_diff(value, T::from(0).unwrap())
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_ang_diff() {
        assert!((ang_diff(2f64, 1f64) - 1f64).abs() < 1e-12);
        assert!((ang_diff(1f64, 2f64) + 1f64).abs() < 1e-12);
        assert!(ang_diff(TAU, 0f64).abs() < 1e-12);
        assert!(ang_diff(0f64, TAU).abs() < 1e-12);

        // Wrap across the +/- pi boundary takes the short way round
        assert!((ang_diff(-PI + 0.1, PI - 0.1) - 0.2).abs() < 1e-12);
        assert!((ang_diff(PI - 0.1, -PI + 0.1) + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_pi(-TAU - 0.5) + 0.5).abs() < 1e-12);
        assert!((wrap_pi(PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0f64, 10f64, 0.5), 5f64);
        assert_eq!(lerp(2f64, 2f64, 0.3), 2f64);
        assert_eq!(lerp(0f64, 10f64, 0f64), 0f64);
        assert_eq!(lerp(0f64, 10f64, 1f64), 10f64);
    }
}
