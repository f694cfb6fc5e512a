//! Per-object scripted motion.

use glam::{Mat4, Vec3};
use serde::Deserialize;

/// The incremental transform an object receives every tick.
///
/// Rates are per millisecond of frame time. The increment is applied in the
/// object's local frame, on the right of its current model matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionRule {
    /// The object never moves.
    #[default]
    None,
    /// Continuous rotation about `axis`, `rate` radians per millisecond.
    Rotate { axis: Vec3, rate: f32 },
    /// Continuous translation along `direction`, `rate` units per millisecond.
    Translate { direction: Vec3, rate: f32 },
}

impl MotionRule {
    /// Returns the local-space increment for a frame of `delta_ms` milliseconds.
    pub fn increment(&self, delta_ms: f32) -> Mat4 {
        match *self {
            MotionRule::None => Mat4::IDENTITY,
            MotionRule::Rotate { axis, rate } => {
                Mat4::from_axis_angle(axis.normalize(), rate * delta_ms)
            }
            MotionRule::Translate { direction, rate } => {
                Mat4::from_translation(direction.normalize() * rate * delta_ms)
            }
        }
    }

    /// Whether the axis or direction can be normalized.
    pub fn is_well_formed(&self) -> bool {
        match *self {
            MotionRule::None => true,
            MotionRule::Rotate { axis: v, rate } | MotionRule::Translate { direction: v, rate } => {
                v.is_finite() && v.length_squared() > f32::EPSILON && rate.is_finite()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        assert_eq!(MotionRule::None.increment(16.0), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_axis_is_normalized() {
        let rule = MotionRule::Rotate {
            axis: Vec3::new(0.0, 2.0, 0.0),
            rate: 0.01,
        };
        let expected = Mat4::from_rotation_y(0.5);
        assert!(rule.increment(50.0).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn translation_scales_with_time() {
        let rule = MotionRule::Translate {
            direction: Vec3::NEG_Z,
            rate: 0.01,
        };
        let moved = rule.increment(100.0).transform_point3(Vec3::ZERO);
        assert!(moved.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn degenerate_rules_are_rejected() {
        let rule = MotionRule::Rotate {
            axis: Vec3::ZERO,
            rate: 0.01,
        };
        assert!(!rule.is_well_formed());
        assert!(MotionRule::None.is_well_formed());
    }

    #[test]
    fn deserializes_tagged_rules() {
        let rule: MotionRule =
            serde_json::from_str(r#"{ "kind": "rotate", "axis": [1.0, 1.0, 0.0], "rate": 0.01 }"#)
                .unwrap();
        assert_eq!(
            rule,
            MotionRule::Rotate {
                axis: Vec3::new(1.0, 1.0, 0.0),
                rate: 0.01
            }
        );
        let rule: MotionRule = serde_json::from_str(r#"{ "kind": "none" }"#).unwrap();
        assert_eq!(rule, MotionRule::None);
    }
}
