use bevy::prelude::*;
use bevy::window::{Window, PrimaryWindow};
use bevy_egui::EguiContexts;
use bevy_rts_camera::RtsCamera;

use crate::systems::city::layout::City;
use crate::systems::city::{GeneratedCity, HoveredBorough, SelectedBorough};

// screen to world conversion, on 0-plane
// util function
fn screen_to_world_on_plane(
    screen_pos: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec3> {
    // get ray from camera through the viewport point
    let ray = camera.viewport_to_world(camera_transform, screen_pos).ok()?;

    // intersection with the y=0 plane
    if ray.direction.y.abs() < f32::EPSILON {
        return None; // case that ray is parallel to plane
    }

    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return None; // case that intersection behind camera
    }

    Some(ray.origin + ray.direction * t)
}

// grid cell of the borough under a ground-plane point
pub fn pick_borough(city: &City, world_pos: Vec3) -> Option<(usize, usize)> {
    city.borough_at(Vec2::new(world_pos.x, world_pos.z))
        .map(|borough| borough.cell())
}

fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let Ok(ctx) = contexts.ctx_mut() else {
        return false;
    };
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}

// hover and left click selection of boroughs
pub fn handle_mouse_interaction(
    generated: Res<GeneratedCity>,
    mut hovered: ResMut<HoveredBorough>,
    mut selected: ResMut<SelectedBorough>,
    mut contexts: EguiContexts,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    if keyboard.just_pressed(KeyCode::Delete) {
        selected.0 = None;
    }

    // clicks on the side panel never reach the city
    if egui_wants_pointer(&mut contexts) {
        hovered.0 = None;
        return;
    }

    let Some(city) = generated.city.as_ref() else { return };
    let Ok(window) = windows.single() else { return };
    let Ok((camera, camera_transform)) = camera_query.single() else { return };

    let cell = window
        .cursor_position()
        .and_then(|cursor_pos| screen_to_world_on_plane(cursor_pos, camera, camera_transform))
        .and_then(|world_pos| pick_borough(city, world_pos));

    if hovered.0 != cell {
        hovered.0 = cell;
    }

    if mouse_button.just_pressed(MouseButton::Left) {
        // empty space clears the selection
        selected.0 = cell;
        if let Some((i, j)) = cell {
            debug!("selected borough ({i}, {j})");
        }
    }
}
