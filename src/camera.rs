//! Orbit camera around the surface (z up).

use glam::{Mat4, Vec3};

use crate::params::{OrbitParams, RenderConfig};

/// Camera orbiting a fixed target on a sphere
pub struct OrbitCamera {
    params: OrbitParams,
    azimuth_rad: f32,
    elevation_rad: f32,
    distance: f32,
}

impl OrbitCamera {
    pub fn new(params: OrbitParams) -> Self {
        Self {
            azimuth_rad: params.azimuth_degrees.to_radians(),
            elevation_rad: params.elevation_degrees.to_radians(),
            distance: params.distance,
            params,
        }
    }

    /// Rotate by whole key-press steps (positive = counter-clockwise / up)
    pub fn orbit(&mut self, azimuth_steps: f32, elevation_steps: f32) {
        let step = self.params.rotate_step_degrees.to_radians();
        let max_elevation = self.params.max_elevation_degrees.to_radians();

        self.azimuth_rad = (self.azimuth_rad + azimuth_steps * step) % std::f32::consts::TAU;
        self.elevation_rad =
            (self.elevation_rad + elevation_steps * step).clamp(-max_elevation, max_elevation);
    }

    /// Zoom in (positive steps) or out (negative steps)
    pub fn zoom(&mut self, steps: i32) {
        let factor = self.params.zoom_factor.powi(-steps);
        self.distance =
            (self.distance * factor).clamp(self.params.min_distance, self.params.max_distance);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth_rad.sin_cos();
        let (sin_el, cos_el) = self.elevation_rad.sin_cos();
        let offset = Vec3::new(cos_el * cos_az, cos_el * sin_az, sin_el) * self.distance;
        Vec3::from_array(self.params.target) + offset
    }

    /// Combined projection · view matrix
    pub fn view_proj(&self, config: &RenderConfig) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), Vec3::from_array(self.params.target), Vec3::Z);
        let proj = Mat4::perspective_rh(
            config.fov_degrees.to_radians(),
            config.aspect_ratio(),
            config.near_plane,
            config.far_plane,
        );
        proj * view
    }
}
