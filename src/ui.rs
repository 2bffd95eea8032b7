/*
 * UI Module
 *
 * The egui control panel. Sliders write straight into FlockingParams; the
 * simulation reads them on the next step. Population changes and resets are
 * reported back so the app can act on them outside the egui frame.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::{FlockingParams, SimulationConfig};

/// Host-side switches that are not part of the simulation itself.
pub struct HostControls {
    pub population: usize,
    pub paused: bool,
    pub show_debug: bool,
    pub follow_flock: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiActions {
    pub reset: bool,
    pub population_changed: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut FlockingParams,
    controls: &mut HostControls,
    debug_info: &DebugInfo,
) -> UiActions {
    let mut actions = UiActions::default();
    let old_population = controls.population;

    let ctx = egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.add(
                    egui::Slider::new(&mut controls.population, SimulationConfig::population_range())
                        .text("Number of Boids"),
                );
                if ui.button("Reset Boids").clicked() {
                    actions.reset = true;
                }
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut params.separation_weight, FlockingParams::weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut params.alignment_weight, FlockingParams::weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut params.cohesion_weight, FlockingParams::weight_range()).text("Cohesion Weight"));
                ui.add(egui::Slider::new(&mut params.separation_radius, FlockingParams::radius_range()).text("Separation Radius"));
                ui.add(egui::Slider::new(&mut params.alignment_radius, FlockingParams::radius_range()).text("Alignment Radius"));
                ui.add(egui::Slider::new(&mut params.cohesion_radius, FlockingParams::radius_range()).text("Cohesion Radius"));
            });

            ui.collapsing("Camera", |ui| {
                ui.label("Orbit: drag with the left mouse button");
                ui.label("Zoom: mouse wheel");
                ui.checkbox(&mut controls.follow_flock, "Follow Flock");
            });

            ui.separator();
            ui.checkbox(&mut controls.show_debug, "Show Debug Info");
            ui.checkbox(&mut controls.paused, "Pause Simulation");

            if controls.show_debug {
                ui.separator();
                for line in debug_info.lines() {
                    ui.label(line);
                }
            }
        });

    actions.population_changed = controls.population != old_population;
    actions
}
