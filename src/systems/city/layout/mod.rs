//! Engine-independent city layout: structures, buildings, shelf-packed
//! blocks, tiered boroughs and the city that owns them.
//!
//! Nothing here touches the ECS. The Bevy side feeds a seeded
//! [`RandomSource`] in and turns the finished [`City`] into meshes.

mod block;
mod borough;
mod building;
mod city;
mod error;
mod random;
mod scenery;
mod structure;

pub use block::{Axis, Block, PlacedBuilding};
pub use borough::{Borough, DistrictTier, GenerationStats, TierProfile, TierProfiles, tier_grid};
pub use building::{Building, BuildingStyle};
pub use city::{City, CityConfig, CityEntity, EntityHandle, EntityKind};
pub use error::LayoutError;
pub use random::{RandomSource, random_in_range};
pub use scenery::{Landscape, Sky};
pub use structure::{Structure, StructureBounds, StructureFactory, StructureKind};
