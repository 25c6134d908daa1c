//! Fade curve shapes for slice envelopes
//!
//! A shape of 0 is a straight line. Positive shapes bend the fade into an
//! S-curve (slow start, slow finish); negative shapes invert that (fast start,
//! fast finish). Both are cubic Bezier easings from (0, 0) to (1, 1).

const BISECTION_STEPS: usize = 48;

/// Gain in [0, 1] at `progress` (0 = fade start, 1 = fade end).
pub fn fade_gain(progress: f32, shape: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let shape = shape.clamp(-1.0, 1.0);
    if shape == 0.0 {
        return progress;
    }

    let (p1, p2) = control_points(shape as f64);
    let t = solve_t_for_x(progress as f64, p1.0, p2.0);
    bezier(t, p1.1, p2.1).clamp(0.0, 1.0) as f32
}

/// Gain applied to the sample at `index` of a slice that is `len` samples long.
pub fn envelope_gain(
    index: usize,
    len: usize,
    fade_in_samples: usize,
    fade_out_samples: usize,
    fade_in_shape: f32,
    fade_out_shape: f32,
) -> f32 {
    let mut gain = 1.0;
    if fade_in_samples > 0 && index < fade_in_samples {
        gain *= fade_gain(index as f32 / fade_in_samples as f32, fade_in_shape);
    }
    let from_end = len.saturating_sub(index + 1);
    if fade_out_samples > 0 && from_end < fade_out_samples {
        gain *= fade_gain(from_end as f32 / fade_out_samples as f32, fade_out_shape);
    }
    gain
}

fn control_points(shape: f64) -> ((f64, f64), (f64, f64)) {
    let amount = 0.5 * shape.abs();
    if shape > 0.0 {
        ((amount, 0.0), (1.0 - amount, 1.0))
    } else {
        ((0.0, amount), (1.0, 1.0 - amount))
    }
}

/// One coordinate of a cubic Bezier with end points 0 and 1.
fn bezier(t: f64, c1: f64, c2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * c1 + 3.0 * u * t * t * c2 + t * t * t
}

/// x(t) is monotonic for control x values inside [0, 1]. Solved in f64: the
/// inverse curve's x(t) is flat near t = 1 and saturates in f32.
fn solve_t_for_x(x: f64, c1: f64, c2: f64) -> f64 {
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if bezier(mid, c1, c2) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_shape() {
        for i in 0..=10 {
            let p = i as f32 / 10.0;
            assert!((fade_gain(p, 0.0) - p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_endpoints_fixed_for_every_shape() {
        for shape in [-1.0, -0.5, 0.0, 0.3, 1.0] {
            assert_eq!(fade_gain(0.0, shape), 0.0);
            assert_eq!(fade_gain(1.0, shape), 1.0);
        }
    }

    #[test]
    fn test_inverse_curve_approaches_unity() {
        // x(t) = 3t^2 - 2t^3 for shape -1; gain must keep rising up to the end
        for shape in [-1.0, -0.5] {
            let near_end = fade_gain(0.9999, shape);
            let nearer = fade_gain(0.99999, shape);
            assert!(near_end > 0.98, "shape {shape}: {near_end}");
            assert!(nearer > near_end && nearer < 1.0, "shape {shape}: {nearer}");
        }
    }

    #[test]
    fn test_shape_bias() {
        // S-curve starts slower than linear, inverse starts faster
        assert!(fade_gain(0.2, 1.0) < 0.2);
        assert!(fade_gain(0.8, 1.0) > 0.8);
        assert!(fade_gain(0.2, -1.0) > 0.2);
        assert!(fade_gain(0.8, -1.0) < 0.8);
    }

    #[test]
    fn test_monotonic() {
        for shape in [-1.0, -0.4, 0.6, 1.0] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let g = fade_gain(i as f32 / 100.0, shape);
                assert!(g + 1e-5 >= prev);
                prev = g;
            }
        }
    }

    #[test]
    fn test_envelope_gain() {
        // 10-sample slice, 4-sample linear fade in, 2-sample linear fade out
        let gains: Vec<f32> = (0..10).map(|i| envelope_gain(i, 10, 4, 2, 0.0, 0.0)).collect();
        assert_eq!(gains[0], 0.0);
        assert!((gains[2] - 0.5).abs() < 1e-6);
        assert_eq!(gains[5], 1.0);
        assert!((gains[8] - 0.5).abs() < 1e-6);
        assert_eq!(gains[9], 0.0);
    }
}
