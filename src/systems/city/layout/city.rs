use std::collections::BTreeMap;

use bevy::log::{debug, info};
use bevy::math::Vec2;

use crate::config::*;
use super::LayoutError;
use super::borough::{Borough, DistrictTier, GenerationStats, TierProfiles};
use super::building::BuildingStyle;
use super::random::RandomSource;
use super::scenery::{Landscape, Sky};
use super::structure::StructureFactory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Landscape,
    Sky,
    Borough,
    Block,
    Building,
}

/// Entities registered directly on the city.
/// Blocks and buildings are reached through their borough.
#[derive(Debug, Clone)]
pub enum CityEntity {
    Landscape(Landscape),
    Sky(Sky),
    Borough(Borough),
}

impl CityEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            CityEntity::Landscape(_) => EntityKind::Landscape,
            CityEntity::Sky(_) => EntityKind::Sky,
            CityEntity::Borough(_) => EntityKind::Borough,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHandle {
    pub kind: EntityKind,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityConfig {
    pub size: f32,
    pub number_of_boroughs: usize,
    pub tiers: TierProfiles,
    pub budget_divisor: f32,
    pub style: BuildingStyle,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            size: CITY_SIZE,
            number_of_boroughs: BOROUGH_COUNT,
            tiers: TierProfiles::default(),
            budget_divisor: PACKING_BUDGET_DIVISOR,
            style: BuildingStyle::default(),
        }
    }
}

/// Root of the layout hierarchy, owns every generated entity
#[derive(Debug, Clone)]
pub struct City {
    config: CityConfig,
    landscape: Landscape,
    entities: BTreeMap<EntityKind, Vec<CityEntity>>,
}

impl City {
    pub fn new(config: CityConfig) -> Result<Self, LayoutError> {
        if !config.size.is_finite() || config.size < 0.0 {
            return Err(LayoutError::InvalidCitySize(config.size));
        }

        let landscape = Landscape::new(config.size, config.size);
        let mut city = Self {
            config,
            landscape,
            entities: BTreeMap::new(),
        };
        city.add(CityEntity::Landscape(landscape));
        Ok(city)
    }

    pub fn size(&self) -> f32 {
        self.config.size
    }

    pub fn number_of_boroughs(&self) -> usize {
        self.config.number_of_boroughs
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn borough_size(&self) -> f32 {
        match self.config.number_of_boroughs {
            0 => 0.0,
            n => self.config.size / n as f32,
        }
    }

    pub fn add(&mut self, entity: CityEntity) -> EntityHandle {
        let kind = entity.kind();
        let list = self.entities.entry(kind).or_default();
        list.push(entity);
        EntityHandle {
            kind,
            index: list.len() - 1,
        }
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&CityEntity> {
        self.entities.get(&handle.kind)?.get(handle.index)
    }

    /// Directly registered entities of `kind`, empty for blocks and buildings
    pub fn entities(&self, kind: EntityKind) -> &[CityEntity] {
        self.entities.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn boroughs(&self) -> impl Iterator<Item = &Borough> {
        self.entities(EntityKind::Borough).iter().filter_map(|entity| match entity {
            CityEntity::Borough(borough) => Some(borough),
            _ => None,
        })
    }

    pub fn sky(&self) -> Option<&Sky> {
        self.entities(EntityKind::Sky).iter().find_map(|entity| match entity {
            CityEntity::Sky(sky) => Some(sky),
            _ => None,
        })
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Block => self.boroughs().map(|borough| borough.blocks().len()).sum(),
            EntityKind::Building => self.boroughs().map(Borough::building_count).sum(),
            _ => self.entities(kind).len(),
        }
    }

    /// Borough whose block grid covers `point` on the ground plane
    pub fn borough_at(&self, point: Vec2) -> Option<&Borough> {
        self.boroughs().find(|borough| borough.world_rect().contains(point))
    }

    /// Classifies, builds and packs every borough of the N x N grid, replacing
    /// any boroughs from an earlier pass. A construction error aborts the pass
    /// and keeps the boroughs generated before it.
    pub fn generate_grid<R: RandomSource + ?Sized>(
        &mut self,
        factory: &StructureFactory,
        source: &mut R,
    ) -> Result<GenerationStats, LayoutError> {
        let n = self.config.number_of_boroughs;
        let borough_size = self.borough_size();
        let mut stats = GenerationStats::default();
        self.entities.remove(&EntityKind::Borough);

        for i in 0..n {
            for j in 0..n {
                let tier = DistrictTier::classify(i, j, n);
                let (block_size, bounds) = self.config.tiers.derive(tier, borough_size);

                let mut borough = Borough::new(borough_size, block_size, bounds, tier);
                borough.set_cell(i, j);
                stats += borough.generate_grid(factory, self.config.style, self.config.budget_divisor, source)?;
                borough.position(i as f32 * borough_size / 2.0, 0.0, j as f32 * borough_size / 2.0);

                debug!("borough ({i}, {j}) placed at {}", borough.translation());
                self.add(CityEntity::Borough(borough));
                stats.boroughs += 1;
            }
        }

        info!(
            "generated {} boroughs, {} blocks, {} buildings from {} structures",
            stats.boroughs, stats.blocks, stats.buildings, stats.structures
        );

        Ok(stats)
    }
}
