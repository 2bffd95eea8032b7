/*
 * Application Module
 *
 * The nannou host: builds the window, owns the Simulation and the
 * FlockingParams the UI edits, and calls `Simulation::step` once per frame.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::input;
use crate::params::{FlockingParams, Settings};
use crate::renderer::{self, TerrainGrid};
use crate::simulation::Simulation;
use crate::terrain::RollingTerrain;
use crate::ui::{self, HostControls};

// Longest frame the simulation will integrate in one step (window drags,
// debugger pauses)
const MAX_FRAME_DELTA: f32 = 0.1;

// Main model for the application
pub struct Model {
    pub simulation: Simulation<RollingTerrain>,
    pub params: FlockingParams,
    pub controls: HostControls,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    pub selected_agent: Option<usize>,
    pub terrain_grid: TerrainGrid,
}

// Optional first argument: path to a JSON settings file
fn load_settings() -> Settings {
    match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).unwrap_or_else(|err| {
            warn!(%err, "falling back to default settings");
            Settings::default()
        }),
        None => Settings::default(),
    }
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let settings = load_settings();

    let window_id = app
        .new_window()
        .title("Terrain Boids")
        .size(1280, 800)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let terrain = RollingTerrain::new(settings.simulation.seed.unwrap_or(7));
    let terrain_grid = TerrainGrid::sample(&terrain, settings.simulation.world_bound, 40);

    // Settings::load already validated, so this only fails on a bad default
    let simulation = Simulation::new(settings.simulation.clone(), terrain)
        .expect("settings were validated on load");

    info!(
        agents = simulation.agents().len(),
        "terrain boids host started"
    );

    Model {
        controls: HostControls {
            population: simulation.agents().len(),
            paused: false,
            show_debug: false,
            follow_flock: true,
        },
        simulation,
        params: settings.flocking,
        egui,
        debug_info: DebugInfo::default(),
        camera: Camera::new(),
        mouse_position: Vec2::ZERO,
        selected_agent: None,
        terrain_grid,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        &mut model.controls,
        &model.debug_info,
    );

    if actions.population_changed {
        model.simulation.respawn(model.controls.population);
    }
    if actions.reset {
        model.simulation.reset();
    }
    if let Some(i) = model.selected_agent {
        if i >= model.simulation.agents().len() {
            model.selected_agent = None;
        }
    }

    let dt = update.since_last.as_secs_f32().min(MAX_FRAME_DELTA);
    if !model.controls.paused {
        model.simulation.step(dt, &model.params);
        model.debug_info.sim_delta = dt;
        model.debug_info.last_step = model.simulation.last_stats();
    }

    model.camera.follow = model.controls.follow_flock;
    if let Some(centroid) = model.simulation.flock().centroid() {
        model.camera.frame(centroid, dt);
    }
}
