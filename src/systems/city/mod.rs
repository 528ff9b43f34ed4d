// this is the entry point for the city generation plugin
use bevy::prelude::*;

use crate::config::*;

pub mod layout;
pub mod mesh_gen;
pub mod spawn;

use layout::{BuildingStyle, City, CityConfig, GenerationStats, LayoutError, StructureFactory, TierProfiles};

// resources
#[derive(Resource)]
pub struct Seed(pub u64);

// city generation parameters
#[derive(Resource, Clone, PartialEq)]
pub struct Params {
    pub city_size: f32,
    pub borough_count: usize,
    pub box_probability: f32,
    pub budget_divisor: f32,
    pub footprint_scale: f32,
    pub particle_shells: bool,
    pub tiers: TierProfiles,
    pub sky_radius: f32,
    pub sky_particles: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            city_size: CITY_SIZE,
            borough_count: BOROUGH_COUNT,
            box_probability: BOX_PROBABILITY,
            budget_divisor: PACKING_BUDGET_DIVISOR,
            footprint_scale: BUILDING_FOOTPRINT_SCALE,
            particle_shells: false,
            tiers: TierProfiles::default(),
            sky_radius: SKY_RADIUS,
            sky_particles: SKY_PARTICLE_COUNT,
        }
    }
}

impl Params {
    pub fn city_config(&self) -> CityConfig {
        let style = BuildingStyle {
            footprint_scale: self.footprint_scale,
            particle_shell: None,
        };

        CityConfig {
            size: self.city_size,
            number_of_boroughs: self.borough_count,
            tiers: self.tiers,
            budget_divisor: self.budget_divisor,
            style: if self.particle_shells { style.with_particle_shell() } else { style },
        }
    }

    pub fn factory(&self) -> StructureFactory {
        StructureFactory::new(self.box_probability)
    }
}

// the layout behind the entities currently on screen
#[derive(Resource, Default)]
pub struct GeneratedCity {
    pub city: Option<City>,
    pub summary: Option<GenerationSummary>,
    pub last_error: Option<LayoutError>,
}

#[derive(Resource, Default)]
pub struct HoveredBorough(pub Option<(usize, usize)>);

#[derive(Resource, Default)]
pub struct SelectedBorough(pub Option<(usize, usize)>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSummary {
    pub seed: u64,
    pub stats: GenerationStats,
    pub elapsed_ms: f32,
}

// Event for regeneration
#[derive(Event)]
pub struct RegenerateEvent {
    pub seed: u64,
}

// fired once a city has been generated and spawned
#[derive(Event)]
pub struct GenerationCompleteEvent(pub GenerationSummary);

// entity hierarchy components
#[derive(Component)]
pub struct CityRoot {
    pub seed: u64,
}

#[derive(Component)]
pub struct BoroughMesh {
    pub cell: (usize, usize),
    pub tier: layout::DistrictTier,
}

#[derive(Component)]
pub struct LandscapeMesh;

#[derive(Component)]
pub struct SkyDome;

// main plugin for generation
pub struct CityGenerationPlugin;

impl Plugin for CityGenerationPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Seed(INITIAL_SEED))
            .insert_resource(Params::default())
            .insert_resource(GeneratedCity::default())
            .insert_resource(HoveredBorough::default())
            .insert_resource(SelectedBorough::default())

            .add_event::<RegenerateEvent>()
            .add_event::<GenerationCompleteEvent>()

            // startup city generation pipeline
            .add_systems(Startup, spawn::initial_generation)
            .add_systems(Update, spawn::handle_regeneration);
    }
}
