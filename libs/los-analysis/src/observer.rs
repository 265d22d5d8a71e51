//! # Observer
//!
//! Viewpoint pose and field of view. The observer owns the angular test of
//! the classifier; range and occlusion live in [`crate::classifier`].
//!
//! ## Field of view
//!
//! [`FovMode::Cone`] compares the full 3D angle between the forward axis
//! and the sample direction against the horizontal half-angle only; the
//! vertical half-angle is carried but unused. [`FovMode::Rectangular`]
//! bounds the horizontal and vertical angles separately in the observer's
//! local frame.

use std::f64::consts::PI;

use config::constants::{fov_half_angle, DEFAULT_H_FOV_DEG, DEFAULT_V_FOV_DEG, EPSILON};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Shape of the field-of-view test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FovMode {
    /// Single cone around the forward axis, half-angle = horizontal half-FOV
    #[default]
    Cone,
    /// Separate horizontal and vertical bounds in the observer frame
    Rectangular,
}

/// Observer pose and field of view in world space.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use los_analysis::Observer;
///
/// let observer = Observer::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -2.0))
///     .unwrap()
///     .with_fov_degrees(110.0, 90.0)
///     .unwrap();
/// assert_eq!(observer.forward(), DVec3::NEG_Z);
/// assert!(observer.in_field_of_view(DVec3::NEG_Z));
/// assert!(!observer.in_field_of_view(DVec3::Z));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    position: DVec3,
    forward: DVec3,
    up: DVec3,
    h_half_fov: f64,
    v_half_fov: f64,
    fov_mode: FovMode,
}

impl Observer {
    /// Creates an observer at `position` looking along `forward`.
    ///
    /// `forward` is normalized. World up defaults to +Z and the field of
    /// view to the configured human defaults.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidObserver`] when the position is not finite or
    /// `forward` has zero length.
    pub fn new(position: DVec3, forward: DVec3) -> Result<Self> {
        if !position.is_finite() {
            return Err(AnalysisError::invalid_observer(format!(
                "position is not finite: {position}"
            )));
        }
        let forward = unit(forward, "forward")?;
        Ok(Self {
            position,
            forward,
            up: DVec3::Z,
            h_half_fov: fov_half_angle(DEFAULT_H_FOV_DEG),
            v_half_fov: fov_half_angle(DEFAULT_V_FOV_DEG),
            fov_mode: FovMode::Cone,
        })
    }

    /// Creates an observer at `position` looking towards `target`.
    pub fn look_at(position: DVec3, target: DVec3) -> Result<Self> {
        Self::new(position, target - position)
    }

    /// Sets the field of view from full angles in degrees.
    pub fn with_fov_degrees(self, horizontal: f64, vertical: f64) -> Result<Self> {
        self.with_half_fov(fov_half_angle(horizontal), fov_half_angle(vertical))
    }

    /// Sets the field of view from half-angles in radians.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidObserver`] unless both half-angles are finite
    /// and in `(0, π]`.
    pub fn with_half_fov(mut self, horizontal: f64, vertical: f64) -> Result<Self> {
        self.h_half_fov = half_angle(horizontal, "horizontal")?;
        self.v_half_fov = half_angle(vertical, "vertical")?;
        Ok(self)
    }

    /// Sets the world up direction used to build the observer frame.
    pub fn with_up(mut self, up: DVec3) -> Result<Self> {
        self.up = unit(up, "up")?;
        Ok(self)
    }

    /// Selects the field-of-view test.
    pub fn with_fov_mode(mut self, mode: FovMode) -> Self {
        self.fov_mode = mode;
        self
    }

    /// Observer origin.
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Unit forward direction.
    #[inline]
    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    /// Horizontal half-angle in radians.
    #[inline]
    pub fn h_half_fov(&self) -> f64 {
        self.h_half_fov
    }

    /// Vertical half-angle in radians.
    #[inline]
    pub fn v_half_fov(&self) -> f64 {
        self.v_half_fov
    }

    /// Active field-of-view test.
    #[inline]
    pub fn fov_mode(&self) -> FovMode {
        self.fov_mode
    }

    /// Right and camera-up axes of the observer frame.
    ///
    /// When world up is parallel to forward, another world axis stands in
    /// so the frame is always orthonormal.
    pub fn basis(&self) -> (DVec3, DVec3) {
        let right = [self.up, DVec3::Y, DVec3::X]
            .into_iter()
            .map(|up| self.forward.cross(up))
            .find(|r| r.length() > EPSILON)
            .unwrap_or(DVec3::X)
            .normalize();
        let camera_up = right.cross(self.forward);
        (right, camera_up)
    }

    /// Angle in radians between forward and a unit direction.
    pub fn angle_to(&self, direction: DVec3) -> f64 {
        self.forward.dot(direction).clamp(-1.0, 1.0).acos()
    }

    /// True when a unit direction lies inside the field of view.
    ///
    /// Angles equal to the half-angle are inside.
    pub fn in_field_of_view(&self, direction: DVec3) -> bool {
        match self.fov_mode {
            FovMode::Cone => self.angle_to(direction) <= self.h_half_fov,
            FovMode::Rectangular => {
                let (right, camera_up) = self.basis();
                let ahead = direction.dot(self.forward);
                let horizontal = direction.dot(right).atan2(ahead).abs();
                let vertical = direction.dot(camera_up).atan2(ahead).abs();
                horizontal <= self.h_half_fov && vertical <= self.v_half_fov
            }
        }
    }
}

fn unit(v: DVec3, name: &str) -> Result<DVec3> {
    if !v.is_finite() || v.length() < EPSILON {
        return Err(AnalysisError::invalid_observer(format!(
            "{name} direction must be finite and non-zero: {v}"
        )));
    }
    Ok(v.normalize())
}

fn half_angle(angle: f64, name: &str) -> Result<f64> {
    if !angle.is_finite() || angle <= 0.0 || angle > PI {
        return Err(AnalysisError::invalid_observer(format!(
            "{name} half-angle must be in (0, pi] radians: {angle}"
        )));
    }
    Ok(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn facing_neg_z() -> Observer {
        Observer::new(DVec3::ZERO, DVec3::NEG_Z)
            .unwrap()
            .with_fov_degrees(110.0, 90.0)
            .unwrap()
    }

    #[test]
    fn test_new_normalizes_forward() {
        let observer = Observer::new(DVec3::ONE, DVec3::new(3.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(observer.forward().length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(observer.forward().x, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_forward_rejected() {
        assert!(matches!(
            Observer::new(DVec3::ZERO, DVec3::ZERO),
            Err(AnalysisError::InvalidObserver { .. })
        ));
        assert!(Observer::look_at(DVec3::ONE, DVec3::ONE).is_err());
        assert!(Observer::new(DVec3::splat(f64::NAN), DVec3::X).is_err());
    }

    #[test]
    fn test_unusable_fov_rejected() {
        let observer = Observer::new(DVec3::ZERO, DVec3::NEG_Z).unwrap();
        for (h, v) in [
            (f64::NAN, 90.0),
            (110.0, f64::INFINITY),
            (0.0, 90.0),
            (-110.0, 90.0),
            (110.0, 361.0),
        ] {
            assert!(
                matches!(
                    observer.with_fov_degrees(h, v),
                    Err(AnalysisError::InvalidObserver { .. })
                ),
                "h={h} v={v}"
            );
        }
        assert!(observer.with_half_fov(PI, PI).is_ok());
        assert!(observer.with_half_fov(PI + 1e-9, 1.0).is_err());
    }

    #[test]
    fn test_defaults_are_human_fov() {
        let observer = Observer::new(DVec3::ZERO, DVec3::X).unwrap();
        assert_relative_eq!(observer.h_half_fov(), 55.0_f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(observer.v_half_fov(), 45.0_f64.to_radians(), epsilon = 1e-12);
        assert_eq!(observer.fov_mode(), FovMode::Cone);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let observer = facing_neg_z();
        let (right, up) = observer.basis();
        assert_relative_eq!(right.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(up.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(right.dot(up), 0.0, epsilon = 1e-12);
        assert_relative_eq!(right.dot(observer.forward()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_basis_with_parallel_up() {
        let observer = Observer::new(DVec3::ZERO, DVec3::Z).unwrap();
        let (right, up) = observer.basis();
        assert_relative_eq!(right.dot(DVec3::Z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(up.dot(DVec3::Z), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cone_boundary() {
        let observer = facing_neg_z();
        let half = observer.h_half_fov();

        let inside = DVec3::new((half - 1e-6).sin(), 0.0, -(half - 1e-6).cos());
        let outside = DVec3::new((half + 1e-6).sin(), 0.0, -(half + 1e-6).cos());
        assert!(observer.in_field_of_view(inside));
        assert!(!observer.in_field_of_view(outside));
    }

    #[test]
    fn test_cone_ignores_vertical_half_angle() {
        // 50 degrees upward: outside a 45 degree vertical bound, inside the 55 degree cone
        let a = 50.0_f64.to_radians();
        let dir = DVec3::new(0.0, a.sin(), -a.cos());
        let observer = facing_neg_z().with_up(DVec3::Y).unwrap();
        assert!(observer.in_field_of_view(dir));
        assert!(!observer
            .with_fov_mode(FovMode::Rectangular)
            .in_field_of_view(dir));
    }

    #[test]
    fn test_rectangular_corner_is_wider_than_cone() {
        // 52 degrees right and 42 degrees up: the full 3D angle is about 57 degrees
        let tx = 52.0_f64.to_radians().tan();
        let ty = 42.0_f64.to_radians().tan();
        let dir = DVec3::new(tx, ty, -1.0).normalize();
        let observer = facing_neg_z().with_up(DVec3::Y).unwrap();
        assert!(observer.angle_to(dir) > observer.h_half_fov());
        assert!(!observer.in_field_of_view(dir));
        assert!(observer
            .with_fov_mode(FovMode::Rectangular)
            .in_field_of_view(dir));
    }

    #[test]
    fn test_behind_is_outside_in_both_modes() {
        let observer = facing_neg_z();
        assert!(!observer.in_field_of_view(DVec3::Z));
        assert!(!observer
            .with_fov_mode(FovMode::Rectangular)
            .in_field_of_view(DVec3::Z));
    }
}
