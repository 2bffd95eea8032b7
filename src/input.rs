/*
 * Input Module
 *
 * Mouse handling for the host window:
 * - Left drag orbits the camera (unless the pointer is over the egui panel)
 * - Left click near an agent selects it for the debug overlay
 * - Mouse wheel zooms
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

use crate::app::Model;

// Screen-space pick radius in pixels
const SELECTION_RADIUS: f32 = 12.0;

pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    if model.camera.is_dragging {
        model.camera.drag(pos);
    }
    model.mouse_position = pos;
}

pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.egui.ctx().is_pointer_over_area() {
        return;
    }

    let window_rect = app.window_rect();
    let picked = model
        .simulation
        .poses()
        .iter()
        .enumerate()
        .filter_map(|(i, pose)| {
            model
                .camera
                .project(pose.position, window_rect)
                .map(|(screen, _)| (i, screen.distance(model.mouse_position)))
        })
        .filter(|&(_, d)| d <= SELECTION_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i);

    match picked {
        Some(i) => model.selected_agent = Some(i),
        None => model.camera.start_drag(model.mouse_position),
    }
}

pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.camera.end_drag();
    }
}

pub fn mouse_wheel(_app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }
    match delta {
        MouseScrollDelta::LineDelta(_, y) => model.camera.zoom(y),
        MouseScrollDelta::PixelDelta(pos) => model.camera.zoom(pos.y as f32 * 0.01),
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);
}
