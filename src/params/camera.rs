//! Orbit camera configuration.

/// Orbit camera limits and initial placement (z is up)
#[derive(Debug, Clone)]
pub struct OrbitParams {
    /// Point the camera orbits around (world units)
    pub target: [f32; 3],

    /// Initial distance from target (world units)
    pub distance: f32,

    /// Initial angle around the z axis (degrees, 0 = looking along +x)
    pub azimuth_degrees: f32,

    /// Initial angle above the xy plane (degrees)
    pub elevation_degrees: f32,

    /// Elevation clamp (degrees), keeps the view off the poles
    pub max_elevation_degrees: f32,

    /// Zoom clamp (world units)
    pub min_distance: f32,
    pub max_distance: f32,

    /// Rotation per key press (degrees)
    pub rotate_step_degrees: f32,

    /// Multiplicative zoom per key press
    pub zoom_factor: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            target: [0.0, 0.0, 0.0],
            distance: 650.0,
            azimuth_degrees: -60.0,
            elevation_degrees: 35.0,
            max_elevation_degrees: 89.0,
            min_distance: 50.0,
            max_distance: 2500.0,
            rotate_step_degrees: 5.0,
            zoom_factor: 1.1,
        }
    }
}
