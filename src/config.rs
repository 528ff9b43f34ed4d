// Configuration file, all measurements in world units (1 unit = 1 meter)
// This controls the initial generation parameter settings

pub const INITIAL_SEED: u64 = 1512086461918454205;

// City parameters
pub const CITY_SIZE: f32 = 1600.0;      // side length of the square city
pub const BOROUGH_COUNT: usize = 6;     // boroughs per side, city is BOROUGH_COUNT x BOROUGH_COUNT
pub const SKY_RADIUS: f32 = 1100.0;     // radius of the particle dome
pub const SKY_PARTICLE_COUNT: usize = 2400;

// Structure parameters
pub const BOX_PROBABILITY: f32 = 0.7;       // remaining draws become cylinders
pub const MIN_SIZE_FRACTION: f32 = 5.0;     // per-axis floor is max / MIN_SIZE_FRACTION
pub const MIN_DIMENSION: f32 = 1.0;         // no structure axis is ever smaller than this
pub const DEFAULT_HEIGHT_SPAN: f32 = 15.0;  // height draw when no max height is given
pub const DEFAULT_HEIGHT_MIN: f32 = 5.0;
pub const CYLINDER_SEGMENTS_MIN: f32 = 3.0;
pub const CYLINDER_SEGMENTS_MAX: f32 = 5.0;

// Building parameters, purely visual
pub const BUILDING_FOOTPRINT_SCALE: f32 = 0.5;  // structure drawn at this fraction of its footprint
pub const PARTICLE_SHELL_SCALE: f32 = 0.9;      // decorative shell, never packed

// Packing parameters
// remaining budget is divided by this before every fit test
// 1.0 packs to the block edge, 2.0 keeps roughly half of each block free
pub const PACKING_BUDGET_DIVISOR: f32 = 1.0;
pub const FOOTPRINT_DIVISOR: f32 = 3.0;         // max building width/depth = block size / this

// District tier profiles: (block divisor, height scale)
// block size = borough size / block divisor, max building height = block size * height scale
pub const CORNER_TIER: (f32, f32) = (8.0, 3.0);
pub const CENTER_TIER: (f32, f32) = (4.0, 5.0);
pub const DEFAULT_TIER: (f32, f32) = (8.0, 1.0);

// Presentation
pub const LANDSCAPE_COLOR: (f32, f32, f32, f32) = (0.87, 0.87, 0.87, 0.7);
pub const BUILDING_COLOR: (f32, f32, f32) = (0.8, 0.8, 0.9);
pub const PARTICLE_COLOR: (f32, f32, f32) = (1.0, 1.0, 1.0);
pub const OVERLAY_HEIGHT: f32 = 0.5;        // gizmo lines float slightly above the ground
pub const INDICATOR_DURATION: f32 = 2.0;    // seconds the generation banner stays visible
