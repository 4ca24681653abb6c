// src/engine_lib/camera.rs

use glam::{Mat4, Vec2};
use koch_snowflake::geometry::{Bounds, Point2};

/// Orthographic 2D camera that keeps a world-space region in view at the
/// window's aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Camera2D {
    center: Vec2,
    half_extent: Vec2,
}

impl Camera2D {
    /// Frames `bounds` with `margin` (fraction of the larger side) on all
    /// sides.
    pub fn framing(bounds: &Bounds, margin: f32) -> Self {
        let center = Vec2::new(bounds.center().x as f32, bounds.center().y as f32);
        let size = Vec2::new(bounds.width() as f32, bounds.height() as f32);
        let padding = size.max_element() * margin;
        let half_extent = (size / 2.0 + Vec2::splat(padding)).max(Vec2::splat(f32::EPSILON));
        Self { center, half_extent }
    }

    /// Half extents actually visible, widened along one axis to match the
    /// viewport aspect.
    fn visible_half_extent(&self, screen_width: f32, screen_height: f32) -> Vec2 {
        let screen_aspect = screen_width / screen_height.max(1.0);
        let world_aspect = self.half_extent.x / self.half_extent.y;
        if screen_aspect > world_aspect {
            Vec2::new(self.half_extent.y * screen_aspect, self.half_extent.y)
        } else {
            Vec2::new(self.half_extent.x, self.half_extent.x / screen_aspect)
        }
    }

    pub fn view_proj(&self, screen_width: f32, screen_height: f32) -> Mat4 {
        let half = self.visible_half_extent(screen_width, screen_height);
        let min = self.center - half;
        let max = self.center + half;
        Mat4::orthographic_rh(min.x, max.x, min.y, max.y, -1.0, 1.0)
    }

    /// Maps a window position (origin top-left, y down) to world space.
    pub fn screen_to_world(&self, screen_x: f32, screen_y: f32, screen_width: f32, screen_height: f32) -> Point2 {
        let half = self.visible_half_extent(screen_width, screen_height);
        let u = screen_x / screen_width.max(1.0);
        let v = screen_y / screen_height.max(1.0);
        let x = self.center.x - half.x + u * 2.0 * half.x;
        let y = self.center.y + half.y - v * 2.0 * half.y;
        Point2::new(x as f64, y as f64)
    }
}
