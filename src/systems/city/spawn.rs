use std::time::Instant;

use bevy::pbr::wireframe::NoWireframe;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::*;
use super::*;
use super::layout::{City, CityEntity, GenerationStats, LayoutError, Sky};
use super::mesh_gen::MeshAggregator;

/// Builds the full layout for `seed`. Pure, nothing is spawned.
pub fn build_city(seed: u64, params: &Params) -> Result<(City, GenerationStats), LayoutError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut city = City::new(params.city_config())?;

    let mut sky = Sky::new(params.sky_radius, params.sky_particles);
    sky.surround(city.size());
    city.add(CityEntity::Sky(sky));

    let stats = city.generate_grid(&params.factory(), &mut rng)?;
    Ok((city, stats))
}

/// Turns a finished layout into a `CityRoot` hierarchy: one merged mesh per
/// borough, the landscape plane and the sky dome
pub fn spawn_city(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    city: &City,
    seed: u64,
) -> Entity {
    let (r, g, b) = BUILDING_COLOR;
    let building_material = materials.add(StandardMaterial {
        base_color: Color::srgb(r, g, b),
        alpha_mode: AlphaMode::Opaque,
        ..default()
    });

    let (r, g, b) = PARTICLE_COLOR;
    let particle_material = materials.add(StandardMaterial {
        base_color: Color::srgb(r, g, b),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    let (r, g, b, a) = LANDSCAPE_COLOR;
    let landscape_material = materials.add(StandardMaterial {
        base_color: Color::srgba(r, g, b, a),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let root = commands.spawn((
        CityRoot { seed },
        Transform::default(),
        Visibility::default(),
    )).id();

    let mut children = Vec::new();

    // landscape
    let landscape = city.landscape();
    let mut plane = MeshAggregator::new();
    plane.merge_plane(landscape.size(), &Transform::IDENTITY);
    children.push(commands.spawn((
        LandscapeMesh,
        Mesh3d(meshes.add(plane.build())),
        MeshMaterial3d(landscape_material),
        Transform::from_translation(landscape.center()),
        NoWireframe,
    )).id());

    // boroughs, buildings are merged in borough-local coordinates
    for borough in city.boroughs() {
        let mut solids = MeshAggregator::new();
        let mut shells = MeshAggregator::new();

        for block in borough.blocks() {
            for building in block.buildings() {
                let style = building.style();
                let transform = Transform::from_translation(block.offset() + building.center())
                    .with_scale(Vec3::new(style.footprint_scale, 1.0, style.footprint_scale));
                solids.merge_structure(building.structure(), &transform);

                if let Some(shell) = style.particle_shell {
                    shells.merge_structure(building.structure(), &transform.with_scale(Vec3::new(shell, 1.0, shell)));
                }
            }
        }

        if solids.is_empty() {
            continue;
        }

        let borough_entity = commands.spawn((
            BoroughMesh {
                cell: borough.cell(),
                tier: borough.tier(),
            },
            Mesh3d(meshes.add(solids.build())),
            MeshMaterial3d(building_material.clone()),
            Transform::from_translation(borough.translation()),
        )).id();

        if !shells.is_empty() {
            let shell_entity = commands.spawn((
                Mesh3d(meshes.add(shells.build_points())),
                MeshMaterial3d(particle_material.clone()),
                Transform::default(),
                NoWireframe,
            )).id();
            commands.entity(borough_entity).add_children(&[shell_entity]);
        }

        children.push(borough_entity);
    }

    // sky particles draw from their own stream, offset from the layout seed
    if let Some(sky) = city.sky() {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let mut dome = MeshAggregator::new();
        dome.merge_points(&sky.particles(&mut rng), &Transform::IDENTITY);

        children.push(commands.spawn((
            SkyDome,
            Mesh3d(meshes.add(dome.build_points())),
            MeshMaterial3d(particle_material),
            Transform::from_translation(sky.center),
            NoWireframe,
        )).id());
    }

    commands.entity(root).add_children(&children);
    root
}

fn generate_city(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    seed: u64,
    params: &Params,
    generated: &mut GeneratedCity,
    complete_events: &mut EventWriter<GenerationCompleteEvent>,
) {
    let started = Instant::now();

    match build_city(seed, params) {
        Ok((city, stats)) => {
            spawn_city(commands, meshes, materials, &city, seed);

            let summary = GenerationSummary {
                seed,
                stats,
                elapsed_ms: started.elapsed().as_secs_f32() * 1000.0,
            };
            info!("city for seed {} ready in {:.1} ms", seed, summary.elapsed_ms);

            generated.city = Some(city);
            generated.summary = Some(summary);
            generated.last_error = None;
            complete_events.write(GenerationCompleteEvent(summary));
        }
        Err(err) => {
            error!("city generation failed for seed {}: {}", seed, err);
            generated.city = None;
            generated.summary = None;
            generated.last_error = Some(err);
        }
    }
}

pub fn initial_generation(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    seed: Res<Seed>,
    params: Res<Params>,
    mut generated: ResMut<GeneratedCity>,
    mut complete_events: EventWriter<GenerationCompleteEvent>,
) {
    generate_city(
        &mut commands,
        &mut meshes,
        &mut materials,
        seed.0,
        &params,
        &mut generated,
        &mut complete_events,
    );
}

pub fn handle_regeneration(
    mut commands: Commands,
    mut events: EventReader<RegenerateEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut seed: ResMut<Seed>,
    params: Res<Params>,
    mut generated: ResMut<GeneratedCity>,
    mut selected: ResMut<SelectedBorough>,
    mut complete_events: EventWriter<GenerationCompleteEvent>,
    query: Query<Entity, With<CityRoot>>,
) {
    // several requests in one frame collapse into the last one
    let Some(event) = events.read().last() else {
        return;
    };

    // cleanup existing city, children are despawned with it
    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }

    seed.0 = event.seed;
    selected.0 = None;

    generate_city(
        &mut commands,
        &mut meshes,
        &mut materials,
        event.seed,
        &params,
        &mut generated,
        &mut complete_events,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::layout::EntityKind;

    fn small_params() -> Params {
        Params {
            city_size: 480.0,
            borough_count: 3,
            sky_particles: 64,
            ..Default::default()
        }
    }

    #[test]
    fn same_seed_builds_same_city() {
        let (a, stats_a) = build_city(42, &small_params()).unwrap();
        let (b, stats_b) = build_city(42, &small_params()).unwrap();

        assert_eq!(stats_a, stats_b);
        let first = |city: &City| {
            city.boroughs()
                .flat_map(|borough| borough.blocks())
                .flat_map(|block| block.buildings())
                .map(|building| (building.corner(), *building.structure()))
                .take(50)
                .collect::<Vec<_>>()
        };
        assert_eq!(first(&a), first(&b));
    }

    #[test]
    fn built_city_registers_every_kind() {
        let (city, stats) = build_city(7, &small_params()).unwrap();

        assert_eq!(city.count(EntityKind::Landscape), 1);
        assert_eq!(city.count(EntityKind::Sky), 1);
        assert_eq!(city.count(EntityKind::Borough), 9);
        assert_eq!(city.count(EntityKind::Building), stats.buildings);
        assert!(stats.buildings > 0);
        assert!(stats.structures >= stats.buildings);
    }

    #[test]
    fn invalid_params_report_errors() {
        let params = Params {
            city_size: f32::INFINITY,
            ..small_params()
        };
        assert!(matches!(build_city(1, &params), Err(LayoutError::InvalidCitySize(_))));

        let params = Params {
            budget_divisor: 0.25,
            ..small_params()
        };
        assert!(matches!(build_city(1, &params), Err(LayoutError::InvalidBudgetDivisor(_))));
    }

    #[test]
    fn spawn_city_builds_hierarchy() {
        let (city, _) = build_city(7, &small_params()).unwrap();

        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();

        world.resource_scope(|world, mut meshes: Mut<Assets<Mesh>>| {
            world.resource_scope(|world, mut materials: Mut<Assets<StandardMaterial>>| {
                let mut commands = world.commands();
                spawn_city(&mut commands, &mut meshes, &mut materials, &city, 7);
            });
        });
        world.flush();

        assert_eq!(world.query::<&CityRoot>().iter(&world).count(), 1);
        assert_eq!(world.query::<&LandscapeMesh>().iter(&world).count(), 1);
        assert_eq!(world.query::<&SkyDome>().iter(&world).count(), 1);
        assert_eq!(world.query::<&BoroughMesh>().iter(&world).count(), 9);
    }
}
