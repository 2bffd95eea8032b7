/*
 * Camera Module
 *
 * This module defines an orbit Camera that circles a target point and
 * projects world-space positions to nannou's screen space (origin at the
 * window center, Y up). It can also ease its target toward the flock so
 * the birds stay framed.
 */

use nannou::prelude::*;

pub struct Camera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub follow: bool,
    pub follow_rate: f32,
    pub is_dragging: bool,
    pub last_cursor_pos: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            target: vec3(0.0, 40.0, 0.0),
            yaw: 0.6,
            pitch: 0.45,
            distance: 750.0,
            fov_y: 60.0_f32.to_radians(),
            min_distance: 50.0,
            max_distance: 3000.0,
            follow: true,
            follow_rate: 1.5,
            is_dragging: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    // World-space camera position
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Screen position and perspective scale of `point`, or `None` when it
    /// is behind the camera.
    pub fn project(&self, point: Vec3, window_rect: Rect) -> Option<(Vec2, f32)> {
        let eye = self.eye();
        let forward = (self.target - eye).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);

        let relative = point - eye;
        let depth = relative.dot(forward);
        if depth <= 1.0 {
            return None;
        }

        let focal = (window_rect.h() / 2.0) / (self.fov_y / 2.0).tan();
        let scale = focal / depth;
        let screen = vec2(relative.dot(right), relative.dot(up)) * scale;
        Some((screen + window_rect.xy(), scale))
    }

    /// Ease the orbit target toward `focus` (usually the flock centroid).
    pub fn frame(&mut self, focus: Vec3, delta_seconds: f32) {
        if !self.follow {
            return;
        }
        let t = 1.0 - (-self.follow_rate * delta_seconds.max(0.0)).exp();
        self.target += (focus - self.target) * t;
    }

    // Handle mouse wheel events for zooming
    pub fn zoom(&mut self, scroll_delta: f32) {
        let zoom_factor = 1.0 - scroll_delta * 0.1;
        self.distance = (self.distance * zoom_factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    // Orbit while dragging
    pub fn drag(&mut self, position: Vec2) {
        if self.is_dragging {
            let delta = position - self.last_cursor_pos;
            self.yaw -= delta.x * 0.005;
            self.pitch = (self.pitch - delta.y * 0.005).clamp(-1.4, 1.4);
            self.last_cursor_pos = position;
        }
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
