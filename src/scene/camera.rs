use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};
use crate::math::{Mat4, Vec3};

pub const MIN_POLAR: f32 = FRAC_PI_4;
pub const MAX_POLAR: f32 = FRAC_PI_2;
pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 15.0;

const ORBIT_SENSITIVITY: f32 = 0.01;
const ZOOM_SENSITIVITY: f32 = 0.5;

/// Orbit camera around the tree, no panning
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    distance: f32,
    /// Angle around Y, 0 looks down -Z from +Z
    azimuth: f32,
    /// Angle from +Y
    polar: f32,
    pub fov: f32,
    aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    /// At `(0, 0, 9)` looking at the origin, 45° vertical FOV
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 9.0,
            azimuth: 0.0,
            polar: FRAC_PI_2,
            fov: 45.0f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl OrbitCamera {
    /// Auto-rotation, a full turn every `60 / speed` seconds
    ///
    /// Held still while the tree is burst or the speed is zero.
    pub fn update(&mut self, dt: f32, rotation_speed: f32, exploded: bool) {
        if rotation_speed > 0.0 && !exploded {
            let rate = TAU / 60.0 * rotation_speed;
            self.azimuth = (self.azimuth + rate * dt).rem_euclid(TAU);
        }
    }

    /// Drag-orbit by a pointer delta in pixels
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth = (self.azimuth - delta_x * ORBIT_SENSITIVITY).rem_euclid(TAU);
        self.polar = (self.polar - delta_y * ORBIT_SENSITIVITY).clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * ZOOM_SENSITIVITY).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn set_viewport(&mut self, width: i32, height: i32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn position(&self) -> Vec3 {
        let sin_p = self.polar.sin();
        self.target
            + Vec3::new(
                self.distance * sin_p * self.azimuth.sin(),
                self.distance * self.polar.cos(),
                self.distance * sin_p * self.azimuth.cos(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position(), self.target, Vec3::UP)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let camera = OrbitCamera::default();
        let p = camera.position();
        assert!(p.x.abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        assert!((p.z - 9.0).abs() < 1e-5);
        assert!((camera.fov - std::f32::consts::PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_auto_rotate_full_turn() {
        let mut camera = OrbitCamera::default();
        // One step of a quarter of the period at speed 1
        camera.update(15.0, 1.0, false);
        assert!((camera.azimuth() - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_auto_rotate_gated() {
        let mut camera = OrbitCamera::default();
        camera.update(1.0, 0.5, true);
        assert_eq!(camera.azimuth(), 0.0);
        camera.update(1.0, 0.0, false);
        assert_eq!(camera.azimuth(), 0.0);
        camera.update(1.0, 0.5, false);
        assert!(camera.azimuth() > 0.0);
    }

    #[test]
    fn test_orbit_clamps_polar() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 1000.0);
        assert_eq!(camera.polar(), MIN_POLAR);
        camera.orbit(0.0, -1000.0);
        assert_eq!(camera.polar(), MAX_POLAR);
        // Never below the horizon
        assert!(camera.position().y >= -1e-5);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = OrbitCamera::default();
        camera.zoom(-100.0);
        assert_eq!(camera.distance(), MIN_DISTANCE);
        camera.zoom(100.0);
        assert_eq!(camera.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_view_matrix_maps_target_in_front() {
        let camera = OrbitCamera::default();
        let p = camera.view_matrix().transform_point(Vec3::ZERO);
        assert!((p.z + 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_viewport_aspect() {
        let mut camera = OrbitCamera::default();
        camera.set_viewport(1600, 800);
        assert_eq!(camera.aspect(), 2.0);
        camera.set_viewport(0, 800);
        assert_eq!(camera.aspect(), 2.0);
    }
}
