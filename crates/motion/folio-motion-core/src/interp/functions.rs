//! Interpolation helpers:
//! - lerp_f32 / lerp_color (component-wise)
//! - interpolate (kind-aware, text switches at the end)
//! - sample (progress + ease -> value, exact at the endpoints)

use folio_api_core::Value;

use crate::ease::Ease;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

/// Blend two values with an already-eased factor. `t` may leave [0, 1] for
/// overshooting curves. Mismatched kinds and text step at `t >= 1`.
pub fn interpolate(from: &Value, to: &Value, t: f32) -> Value {
    match (from, to) {
        (Value::Float(a), Value::Float(b)) => Value::Float(lerp_f32(*a, *b, t)),
        (Value::ColorRgba(a), Value::ColorRgba(b)) => Value::ColorRgba(lerp_color(*a, *b, t)),
        _ => {
            if t >= 1.0 {
                to.clone()
            } else {
                from.clone()
            }
        }
    }
}

/// Value at linear `progress` through a segment. Progress 0 and 1 return
/// the endpoint values untouched so replays land on identical bits.
pub fn sample(from: &Value, to: &Value, progress: f32, ease: &Ease) -> Value {
    if progress <= 0.0 {
        return from.clone();
    }
    if progress >= 1.0 {
        return to.clone();
    }
    interpolate(from, to, ease.apply(progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_endpoints_exact() {
        let from = Value::f(0.1);
        let to = Value::f(0.7);
        let e = Ease::parse("power2.out").unwrap();
        assert_eq!(sample(&from, &to, 0.0, &e), from);
        assert_eq!(sample(&from, &to, 1.0, &e), to);
    }

    #[test]
    fn text_steps_at_end() {
        let from = Value::text("0%");
        let to = Value::text("40%");
        assert_eq!(interpolate(&from, &to, 0.99), from);
        assert_eq!(interpolate(&from, &to, 1.0), to);
    }

    #[test]
    fn colors_blend_componentwise() {
        let c = interpolate(
            &Value::rgba(0.0, 0.0, 0.0, 0.0),
            &Value::rgba(1.0, 0.5, 0.0, 1.0),
            0.5,
        );
        assert_eq!(c, Value::rgba(0.5, 0.25, 0.0, 0.5));
    }
}
