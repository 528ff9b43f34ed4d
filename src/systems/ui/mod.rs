use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy::pbr::wireframe::WireframeConfig;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::systems::city::layout::{EntityKind, TierProfile};
use crate::systems::city::{GeneratedCity, Params, RegenerateEvent, Seed, SelectedBorough};
use crate::systems::overlay::OverlayConfig;

pub mod indicator;

// re-export the main items that other modules need
pub use indicator::{GenerationIndicator, update_generation_indicator, render_generation_indicator};

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(GenerationIndicator::default())
            .add_systems(Update, (key_input, update_generation_indicator))
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, render_generation_indicator)); // UI rendering here
    }
}

fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut regen_events: EventWriter<RegenerateEvent>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        regen_events.write(RegenerateEvent { seed: rand::random() });
    }
}

// block divisor and height scale sliders for one tier
fn tier_sliders(ui: &mut egui::Ui, label: &str, profile: &mut TierProfile) -> bool {
    let mut changed = false;
    ui.label(label);
    changed |= ui.add(egui::Slider::new(&mut profile.block_divisor, 2.0..=16.0)
        .text("Block Divisor"))
        .on_hover_text("Block size = borough size / divisor. Higher values give more, smaller blocks.")
        .changed();
    changed |= ui.add(egui::Slider::new(&mut profile.height_scale, 0.5..=8.0)
        .text("Height Scale"))
        .on_hover_text("Tallest building = block size * scale.")
        .changed();
    changed
}

fn ui_main(
    mut contexts: EguiContexts,
    current_seed: Res<Seed>,
    mut params: ResMut<Params>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut overlay: ResMut<OverlayConfig>,
    mut wireframe: ResMut<WireframeConfig>,
    generated: Res<GeneratedCity>,
    selected: Res<SelectedBorough>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(200.0)
            .min_width(250.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                let mut regenerate = false;

                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB - Rotate");
                ui.label("LMB - Select borough");

                ui.separator();

                // visibility controls
                ui.label("Layer Visibility:");
                ui.checkbox(&mut overlay.enabled, "District overlay (G)")
                    .on_hover_text("Outline boroughs by tier: red corner, green center, blue default");
                ui.checkbox(&mut wireframe.global, "Wireframe");

                ui.separator();

                ui.label("Generation Parameters:");

                // seed
                egui::CollapsingHeader::new("Seed")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.label(format!("Current: {}", current_seed.0));

                    ui.horizontal(|ui| {
                        if ui.button("Regenerate (R)").clicked() {
                            regen_events.write(RegenerateEvent { seed: rand::random() });
                        }
                        if ui.button("Rebuild").on_hover_text("Rebuild with the current seed").clicked() {
                            regenerate = true;
                        }
                    });
                });

                // city layout
                egui::CollapsingHeader::new("City")
                    .default_open(true)
                    .show(ui, |ui| {
                    regenerate |= ui.add(egui::Slider::new(&mut params.city_size, 400.0..=4000.0)
                        .text("City Size")
                        .suffix(" m"))
                        .on_hover_text("Side length of the square city.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut params.borough_count, 1..=12)
                        .text("Boroughs per Side"))
                        .on_hover_text("The city is split into an N x N grid of boroughs.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut params.budget_divisor, 1.0..=3.0)
                        .text("Packing Budget Divisor"))
                        .on_hover_text("Remaining block space is divided by this before every fit test. 1 packs to the edge.")
                        .changed();
                });

                // building parameters
                egui::CollapsingHeader::new("Buildings")
                    .default_open(true)
                    .show(ui, |ui| {
                    regenerate |= ui.add(egui::Slider::new(&mut params.box_probability, 0.0..=1.0)
                        .text("Box Probability"))
                        .on_hover_text("Chance that a structure is a box, otherwise a cylinder.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut params.footprint_scale, 0.2..=1.0)
                        .text("Footprint Scale"))
                        .on_hover_text("Fraction of its footprint a building is drawn at. Packing is unaffected.")
                        .changed();
                    regenerate |= ui.checkbox(&mut params.particle_shells, "Particle Shells")
                        .on_hover_text("Decorative point cloud around every building.")
                        .changed();
                });

                // tier profiles
                egui::CollapsingHeader::new("District Tiers")
                    .default_open(false)
                    .show(ui, |ui| {
                    regenerate |= tier_sliders(ui, "Corner", &mut params.tiers.corner);
                    ui.add_space(4.0);
                    regenerate |= tier_sliders(ui, "Center", &mut params.tiers.center);
                    ui.add_space(4.0);
                    regenerate |= tier_sliders(ui, "Default", &mut params.tiers.default);
                });

                ui.separator();

                // statistics
                ui.label("Statistics:");
                if let Some(city) = generated.city.as_ref() {
                    egui::Grid::new("stats_grid").num_columns(2).show(ui, |ui| {
                        for (label, kind) in [
                            ("Boroughs", EntityKind::Borough),
                            ("Blocks", EntityKind::Block),
                            ("Buildings", EntityKind::Building),
                        ] {
                            ui.label(label);
                            ui.label(city.count(kind).to_string());
                            ui.end_row();
                        }

                        if let Some(summary) = generated.summary {
                            ui.label("Structures");
                            ui.label(summary.stats.structures.to_string());
                            ui.end_row();
                            ui.label("Time");
                            ui.label(format!("{:.1} ms", summary.elapsed_ms));
                            ui.end_row();
                        }
                    });
                }
                if let Some(err) = generated.last_error.as_ref() {
                    ui.label(egui::RichText::new(format!("Generation failed: {err}"))
                        .color(egui::Color32::from_rgb(178, 34, 34)));
                }

                // inspector
                let selected_borough = generated.city.as_ref().and_then(|city| {
                    city.boroughs().find(|borough| Some(borough.cell()) == selected.0)
                });
                if let Some(borough) = selected_borough {
                    ui.separator();
                    ui.label("Selected Borough:");
                    egui::Grid::new("inspector_grid").num_columns(2).show(ui, |ui| {
                        let (i, j) = borough.cell();
                        let rows = [
                            ("Cell", format!("({i}, {j})")),
                            ("Tier", borough.tier().label().to_string()),
                            ("Block Size", format!("{:.1} m", borough.block_size())),
                            ("Blocks", borough.blocks().len().to_string()),
                            ("Buildings", borough.building_count().to_string()),
                        ];
                        for (label, value) in rows {
                            ui.label(label);
                            ui.label(value);
                            ui.end_row();
                        }
                    });
                }

                ui.separator();
                ui.label("ESC - Exit");

                // trigger regeneration on any parameter change
                if regenerate {
                    regen_events.write(RegenerateEvent { seed: current_seed.0 });
                }
            });
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps_diagnostic) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                        if let Some(fps) = fps_diagnostic.smoothed() {
                            ui.label(egui::RichText::new(format!("{:.0}", fps))
                                .size(26.0)
                                .color(egui::Color32::WHITE));
                        }
                    }
                });
            });
    }
}
