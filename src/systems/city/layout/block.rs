use bevy::log::debug;
use bevy::math::{Vec2, Vec3};

use super::LayoutError;
use super::building::{Building, BuildingStyle};
use super::random::RandomSource;
use super::structure::{StructureBounds, StructureFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

/// A building in block-local coordinates, with the packing state it was placed under
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBuilding {
    pub building: Building,
    pub shelf: usize,
    pub remaining_before: Vec2,
}

/// Square region filled by shelf packing
#[derive(Debug, Clone)]
pub struct Block {
    size: f32,
    bounds: StructureBounds,
    budget_divisor: f32,
    remaining_x: f32,
    remaining_z: f32,
    offset: Vec3,
    placed: Vec<PlacedBuilding>,
    structures_drawn: usize,
}

impl Block {
    pub fn new(size: f32, bounds: StructureBounds, budget_divisor: f32) -> Result<Self, LayoutError> {
        if size < bounds.max_width || size < bounds.max_depth {
            return Err(LayoutError::BlockTooSmall {
                size,
                max_width: bounds.max_width,
                max_depth: bounds.max_depth,
            });
        }
        if !budget_divisor.is_finite() || budget_divisor < 1.0 {
            return Err(LayoutError::InvalidBudgetDivisor(budget_divisor));
        }

        Ok(Self {
            size,
            bounds,
            budget_divisor,
            remaining_x: size,
            remaining_z: size,
            offset: Vec3::ZERO,
            placed: Vec::new(),
            structures_drawn: 0,
        })
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn bounds(&self) -> &StructureBounds {
        &self.bounds
    }

    pub fn remaining(&self) -> Vec2 {
        Vec2::new(self.remaining_x, self.remaining_z)
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn position(&mut self, x: f32, y: f32, z: f32) {
        self.offset = Vec3::new(x, y, z);
    }

    pub fn placed(&self) -> &[PlacedBuilding] {
        &self.placed
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.placed.iter().map(|placed| &placed.building)
    }

    pub fn building_count(&self) -> usize {
        self.placed.len()
    }

    /// Structures drawn while packing, including the candidate left over when packing stopped
    pub fn structures_drawn(&self) -> usize {
        self.structures_drawn
    }

    pub fn can_place(&self, building: &Building, axis: Axis) -> bool {
        match axis {
            Axis::X => building.width() <= self.remaining_x / self.budget_divisor,
            Axis::Z => building.depth() <= self.remaining_z / self.budget_divisor,
        }
    }

    pub fn fits(&self, building: &Building) -> bool {
        self.can_place(building, Axis::X) && self.can_place(building, Axis::Z)
    }

    fn generate_building<R: RandomSource + ?Sized>(
        &mut self,
        factory: &StructureFactory,
        style: BuildingStyle,
        source: &mut R,
    ) -> Building {
        self.structures_drawn += 1;
        Building::assemble(factory.generate(source, &self.bounds), style)
    }

    fn place(&mut self, mut building: Building, shelf: usize) {
        let remaining_before = self.remaining();
        building.position(self.size - self.remaining_x, 0.0, self.size - self.remaining_z);
        self.remaining_x -= building.width();
        self.placed.push(PlacedBuilding {
            building,
            shelf,
            remaining_before,
        });
    }

    /// Greedy shelf packing.
    ///
    /// Each shelf is filled along x until the next candidate no longer fits,
    /// then the z cursor advances by the deepest building seen so far.
    /// Nothing backtracks, so far edges may be left empty.
    ///
    /// # Returns
    /// The number of buildings placed
    pub fn fill_space<R: RandomSource + ?Sized>(
        &mut self,
        factory: &StructureFactory,
        style: BuildingStyle,
        source: &mut R,
    ) -> usize {
        let mut building = self.generate_building(factory, style, source);
        let mut deepest_depth = building.depth();
        let mut shelf = 0;

        while self.can_place_depth(deepest_depth) {
            // the candidate carried over from the last shelf must also fit the remaining depth
            while self.fits(&building) {
                deepest_depth = deepest_depth.max(building.depth());
                self.place(building, shelf);
                building = self.generate_building(factory, style, source);
            }

            self.remaining_x = self.size;
            self.remaining_z -= deepest_depth;
            shelf += 1;
        }

        debug!(
            "packed {} buildings into block of size {} over {} shelves",
            self.placed.len(),
            self.size,
            shelf
        );

        self.placed.len()
    }

    fn can_place_depth(&self, depth: f32) -> bool {
        depth <= self.remaining_z / self.budget_divisor
    }

    /// Effective (width, depth) covered by placed buildings
    pub fn extent(&self) -> Vec2 {
        self.placed.iter().fold(Vec2::ZERO, |extent, placed| {
            extent.max(placed.building.footprint().max)
        })
    }
}
