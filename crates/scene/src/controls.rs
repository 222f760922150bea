use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use lego_input::Gesture;
use serde::{Deserialize, Serialize};

use crate::camera::PerspectiveCamera;

/// Polar angle is kept this far away from the poles so `look_at` stays defined.
const POLE_EPSILON: f32 = 1e-4;
/// Pending motion below this is dropped.
const SETTLE_EPSILON: f32 = 1e-6;

/// Orbit controls configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    pub enable_damping: bool,
    /// Share of the pending motion applied per update when damping is on.
    pub damping_factor: f32,
    /// Radians per pixel of rotate drag.
    pub rotate_speed: f32,
    /// Radius scale per scroll line; below 1 so scrolling forward dollies in.
    pub zoom_speed: f32,
    /// Target travel per pixel of pan drag, as a fraction of the orbit radius.
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians, measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.1,
            rotate_speed: 0.005,
            zoom_speed: 0.95,
            pan_speed: 0.002,
            min_distance: 1.0,
            max_distance: 200.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

/// Orbits a camera around a target point.
///
/// Gestures only accumulate pending motion; [`OrbitControls::update`] applies
/// it to the camera once per frame, easing it out when damping is enabled.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub settings: ControlsSettings,
    target: Vec3,
    delta_theta: f32,
    delta_phi: f32,
    pan: Vec2,
    scale: f32,
    reset_requested: bool,
    home: (Vec3, Vec3),
}

impl OrbitControls {
    /// Controls orbiting the camera's current target.
    pub fn new(camera: &PerspectiveCamera, settings: ControlsSettings) -> Self {
        Self {
            settings,
            target: camera.target,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan: Vec2::ZERO,
            scale: 1.0,
            reset_requested: false,
            home: (camera.position, camera.target),
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn handle(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Rotate(d) => {
                self.delta_theta -= d.x * self.settings.rotate_speed;
                self.delta_phi -= d.y * self.settings.rotate_speed;
            }
            Gesture::Pan(d) => self.pan += d,
            Gesture::Zoom(lines) => self.scale *= self.settings.zoom_speed.powf(lines),
            Gesture::Reset => self.reset_requested = true,
        }
    }

    /// True while there is motion left to apply.
    pub fn is_moving(&self) -> bool {
        self.reset_requested
            || self.delta_theta.abs() > SETTLE_EPSILON
            || self.delta_phi.abs() > SETTLE_EPSILON
            || self.pan.length_squared() > SETTLE_EPSILON
            || (self.scale - 1.0).abs() > SETTLE_EPSILON
    }

    /// Apply pending motion to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if self.reset_requested {
            self.reset_requested = false;
            self.clear_pending();
            let (position, target) = self.home;
            let moved = camera.position != position || camera.target != target;
            camera.position = position;
            self.target = target;
            camera.look_at(target);
            tracing::debug!("orbit controls reset");
            return moved;
        }

        let s = &self.settings;
        let share = if s.enable_damping {
            s.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        let before = (camera.position, self.target);
        let offset = camera.position - self.target;
        let radius = offset.length().max(SETTLE_EPSILON);

        if self.pan != Vec2::ZERO {
            let forward = (-offset).normalize_or_zero();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward);
            let step = self.pan * share;
            self.target += (-right * step.x + up * step.y) * radius * s.pan_speed;
        }

        let mut theta = offset.x.atan2(offset.z) + self.delta_theta * share;
        let min_phi = s.min_polar_angle.max(POLE_EPSILON);
        let max_phi = s.max_polar_angle.min(PI - POLE_EPSILON);
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.delta_phi * share)
            .clamp(min_phi, max_phi.max(min_phi));
        if !theta.is_finite() {
            theta = 0.0;
        }
        let radius = (radius * self.scale).clamp(s.min_distance, s.max_distance.max(s.min_distance));

        camera.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        camera.look_at(self.target);

        if s.enable_damping {
            let keep = 1.0 - share;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan *= keep;
            if !self.is_moving() {
                self.clear_pending();
            }
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan = Vec2::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(before.0) > SETTLE_EPSILON
            || self.target.distance_squared(before.1) > SETTLE_EPSILON
    }

    fn clear_pending(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan = Vec2::ZERO;
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraSettings;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(
            &CameraSettings {
                position: Vec3::new(0.0, 0.0, 10.0),
                target: Vec3::ZERO,
                ..CameraSettings::default()
            },
            1.0,
        )
    }

    fn undamped() -> ControlsSettings {
        ControlsSettings {
            enable_damping: false,
            ..ControlsSettings::default()
        }
    }

    #[test]
    fn idle_update_does_not_move() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, undamped());
        assert!(!controls.update(&mut cam));
        assert!((cam.position - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn rotate_keeps_radius() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, undamped());
        controls.handle(Gesture::Rotate(Vec2::new(100.0, 40.0)));
        assert!(controls.update(&mut cam));
        assert!((cam.position.length() - 10.0).abs() < 1e-3);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(
            &cam,
            ControlsSettings {
                min_distance: 5.0,
                max_distance: 12.0,
                ..undamped()
            },
        );
        controls.handle(Gesture::Zoom(100.0));
        controls.update(&mut cam);
        assert!((cam.position.length() - 5.0).abs() < 1e-3);

        controls.handle(Gesture::Zoom(-100.0));
        controls.update(&mut cam);
        assert!((cam.position.length() - 12.0).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(
            &cam,
            ControlsSettings {
                max_polar_angle: PI / 2.0,
                ..undamped()
            },
        );
        // Large upward drag pushes phi past the horizon.
        controls.handle(Gesture::Rotate(Vec2::new(0.0, -10_000.0)));
        controls.update(&mut cam);
        assert!(cam.position.y >= -1e-3);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, undamped());
        controls.handle(Gesture::Pan(Vec2::new(50.0, 0.0)));
        controls.update(&mut cam);

        assert_ne!(controls.target(), Vec3::ZERO);
        assert_eq!(cam.target, controls.target());
        assert!((cam.position.distance(cam.target) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn damping_eases_out_and_settles() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam, ControlsSettings::default());
        controls.handle(Gesture::Rotate(Vec2::new(200.0, 0.0)));

        let first = {
            let start = cam.position;
            controls.update(&mut cam);
            cam.position.distance(start)
        };
        let second = {
            let start = cam.position;
            controls.update(&mut cam);
            cam.position.distance(start)
        };
        assert!(second < first);

        for _ in 0..500 {
            controls.update(&mut cam);
        }
        assert!(!controls.is_moving());
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn reset_restores_home_view() {
        let mut cam = camera();
        let home = cam.position;
        let mut controls = OrbitControls::new(&cam, undamped());
        controls.handle(Gesture::Rotate(Vec2::new(300.0, 20.0)));
        controls.handle(Gesture::Pan(Vec2::new(10.0, 10.0)));
        controls.update(&mut cam);
        assert_ne!(cam.position, home);

        controls.handle(Gesture::Reset);
        assert!(controls.update(&mut cam));
        assert_eq!(cam.position, home);
        assert_eq!(controls.target(), Vec3::ZERO);
    }
}
