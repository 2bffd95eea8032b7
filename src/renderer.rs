/*
 * Renderer Module
 *
 * Draws the terrain as a projected wire grid, each agent as a short stroke
 * along its heading, and, for the selected agent, its three rule radii as
 * screen-space circles.
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::camera::Camera;
use crate::terrain::HeightOracle;

// World-space length of an agent's heading stroke
const AGENT_LENGTH: f32 = 8.0;

/// Terrain heights sampled on a square grid, computed once at startup.
pub struct TerrainGrid {
    pub resolution: usize,
    pub points: Vec<Vec3>,
}

impl TerrainGrid {
    pub fn sample<O: HeightOracle + ?Sized>(oracle: &O, world_bound: f32, resolution: usize) -> Self {
        let resolution = resolution.max(2);
        let step = 2.0 * world_bound / (resolution - 1) as f32;
        let mut points = Vec::with_capacity(resolution * resolution);

        for row in 0..resolution {
            let z = -world_bound + row as f32 * step;
            for col in 0..resolution {
                let x = -world_bound + col as f32 * step;
                points.push(vec3(x, oracle.elevation_at(x, z), z));
            }
        }

        Self { resolution, points }
    }

    fn at(&self, row: usize, col: usize) -> Vec3 {
        self.points[row * self.resolution + col]
    }

    fn draw(&self, draw: &Draw, camera: &Camera, window_rect: Rect) {
        let color = rgba(0.25, 0.45, 0.3, 0.7);
        let n = self.resolution;

        for row in 0..n {
            for col in 0..n {
                let here = self.at(row, col);
                let neighbors = [
                    (col + 1 < n).then(|| self.at(row, col + 1)),
                    (row + 1 < n).then(|| self.at(row + 1, col)),
                ];
                for there in neighbors.into_iter().flatten() {
                    if let (Some((a, _)), Some((b, _))) = (
                        camera.project(here, window_rect),
                        camera.project(there, window_rect),
                    ) {
                        draw.line().start(a).end(b).weight(1.0).color(color);
                    }
                }
            }
        }
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(rgb(0.05, 0.07, 0.12));

    let window_rect = app.window_rect();
    let camera = &model.camera;

    model.terrain_grid.draw(&draw, camera, window_rect);

    for (i, pose) in model.simulation.poses().iter().enumerate() {
        let tail = camera.project(pose.position, window_rect);
        let head = camera.project(pose.position + pose.heading * AGENT_LENGTH, window_rect);
        let (Some((tail, scale)), Some((head, _))) = (tail, head) else {
            continue;
        };

        let selected = model.selected_agent == Some(i);
        let color = if selected {
            rgba(1.0, 0.85, 0.2, 1.0)
        } else {
            rgba(0.86, 0.86, 0.86, 1.0)
        };
        let weight = (scale * 3.0).clamp(1.0, 4.0);

        draw.line().start(tail).end(head).weight(weight).color(color);
        draw.ellipse().xy(head).radius(weight).color(color);
    }

    if let Some(i) = model.selected_agent {
        draw_selection(&draw, model, i, window_rect);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

// Perception radii and state readout for the selected agent
fn draw_selection(draw: &Draw, model: &Model, index: usize, window_rect: Rect) {
    let Some(agent) = model.simulation.agents().get(index) else {
        return;
    };
    let Some((center, scale)) = model.camera.project(agent.position, window_rect) else {
        return;
    };

    let params = &model.params;
    let radii = [
        (params.separation_radius, rgba(0.9, 0.3, 0.3, 0.8)),
        (params.alignment_radius, rgba(0.3, 0.9, 0.3, 0.8)),
        (params.cohesion_radius, rgba(0.3, 0.5, 0.95, 0.8)),
    ];
    for (radius, color) in radii {
        draw.ellipse()
            .xy(center)
            .radius(radius * scale)
            .no_fill()
            .stroke(color)
            .stroke_weight(1.0);
    }

    let lines = [
        format!("Agent {index}"),
        format!(
            "pos ({:.0}, {:.0}, {:.0})",
            agent.position.x, agent.position.y, agent.position.z
        ),
        format!("speed {:.2} / {:.2}", agent.speed(), agent.max_speed),
        format!(
            "ground {:.0}",
            model
                .simulation
                .oracle()
                .elevation_at(agent.position.x, agent.position.z)
        ),
    ];
    let left = window_rect.right() - 120.0;
    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .x_y(left, window_rect.top() - 20.0 - i as f32 * 18.0)
            .color(WHITE)
            .font_size(14);
    }
}
