use bevy::prelude::*;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};

use crate::config::OVERLAY_HEIGHT;
use crate::systems::city::layout::{Borough, DistrictTier};
use crate::systems::city::{GeneratedCity, HoveredBorough, SelectedBorough};

// outlines every borough on the ground, coloured by district tier
// so the corner / center / default split is visible from above
pub struct DistrictOverlayPlugin;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct DistrictGizmoGroup;

impl Plugin for DistrictOverlayPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(OverlayConfig::default())
            .init_gizmo_group::<DistrictGizmoGroup>()
            .add_systems(Startup, setup_gizmos)
            .add_systems(Update, (toggle_overlay, draw_overlay));
    }
}

// setting these parameters as a resource allows for runtime modifications
#[derive(Resource)]
pub struct OverlayConfig {
    pub corner_color: Color,
    pub center_color: Color,
    pub default_color: Color,
    pub hover_color: Color,
    pub selected_color: Color,
    pub block_color: Color,
    pub enabled: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            corner_color: Color::srgba(0.71, 0.24, 0.24, 0.8),  // red
            center_color: Color::srgba(0.24, 0.55, 0.31, 0.8),  // green
            default_color: Color::srgba(0.18, 0.28, 0.45, 0.6), // blue
            hover_color: Color::srgba(1.0, 0.5, 0.0, 0.9),      // orange
            selected_color: Color::srgba(1.0, 1.0, 0.0, 0.9),   // yellow
            block_color: Color::srgba(1.0, 1.0, 1.0, 0.25),
            enabled: true,
        }
    }
}

impl OverlayConfig {
    pub fn tier_color(&self, tier: DistrictTier) -> Color {
        match tier {
            DistrictTier::Corner => self.corner_color,
            DistrictTier::Center => self.center_color,
            DistrictTier::Default => self.default_color,
        }
    }
}

fn setup_gizmos(
    mut config_store: ResMut<GizmoConfigStore>
) {
    let (config, _) = config_store.config_mut::<DistrictGizmoGroup>();
    config.line.width = 2.0;
    config.depth_bias = -0.5; // draw over low buildings
}

fn toggle_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut overlay: ResMut<OverlayConfig>,
) {
    if keyboard.just_pressed(KeyCode::KeyG) {
        overlay.enabled = !overlay.enabled;
    }
}

fn outline(gizmos: &mut Gizmos<DistrictGizmoGroup>, rect: Rect, height: f32, color: Color) {
    let corners = [
        Vec3::new(rect.min.x, height, rect.min.y),
        Vec3::new(rect.max.x, height, rect.min.y),
        Vec3::new(rect.max.x, height, rect.max.y),
        Vec3::new(rect.min.x, height, rect.max.y),
    ];

    for i in 0..corners.len() {
        gizmos.line(corners[i], corners[(i + 1) % corners.len()], color);
    }
}

// block outlines of a single borough, in world space
fn outline_blocks(gizmos: &mut Gizmos<DistrictGizmoGroup>, borough: &Borough, color: Color) {
    let origin = borough.translation();
    for block in borough.blocks() {
        let min = Vec2::new(origin.x + block.offset().x, origin.z + block.offset().z);
        outline(gizmos, Rect::from_corners(min, min + Vec2::splat(block.size())), OVERLAY_HEIGHT, color);
    }
}

fn draw_overlay(
    mut gizmos: Gizmos<DistrictGizmoGroup>,
    overlay: Res<OverlayConfig>,
    generated: Res<GeneratedCity>,
    hovered: Res<HoveredBorough>,
    selected: Res<SelectedBorough>,
) {
    if !overlay.enabled {
        return;
    }

    let Some(city) = generated.city.as_ref() else {
        return;
    };

    for borough in city.boroughs() {
        let cell = Some(borough.cell());
        let (color, lift) = if cell == selected.0 {
            (overlay.selected_color, 2.0)
        } else if cell == hovered.0 {
            (overlay.hover_color, 1.0)
        } else {
            (overlay.tier_color(borough.tier()), 0.0)
        };

        outline(&mut gizmos, borough.world_rect(), OVERLAY_HEIGHT + lift, color);

        if cell == selected.0 {
            outline_blocks(&mut gizmos, borough, overlay.block_color);
        }
    }
}
