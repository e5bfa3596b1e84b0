//! Viewer window and projection configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    /// Comfortably past the far corner of the default domain at max zoom-out
    pub far_plane: f32,

    /// Surface wireframe colour (linear RGB)
    pub surface_color: [f32; 3],

    /// Domain outline colour (linear RGB)
    pub outline_color: [f32; 3],

    /// Source marker colour (linear RGB)
    pub source_color: [f32; 3],

    /// Half-size of the cross drawn at each source (world units)
    pub source_marker_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 5000.0,
            surface_color: [1.0, 0.85, 0.1], // yellow
            outline_color: [0.1, 0.3, 1.0],  // blue
            source_color: [1.0, 1.0, 1.0],
            source_marker_size: 5.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}
