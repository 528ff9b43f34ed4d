use bevy::log::debug;
use bevy::math::{Rect, Vec2, Vec3};

use crate::config::*;
use super::LayoutError;
use super::block::Block;
use super::building::BuildingStyle;
use super::random::RandomSource;
use super::structure::{StructureBounds, StructureFactory};

/// Size tier of a grid cell, decided purely by its position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistrictTier {
    Corner,
    Center,
    Default,
}

impl DistrictTier {
    /// Classifies cell `(i, j)` of an `n x n` grid.
    /// Corners win over center for grids of one or two cells per side.
    pub fn classify(i: usize, j: usize, n: usize) -> Self {
        if n == 0 {
            return DistrictTier::Default;
        }

        let last = n - 1;
        let on_edge = |v: usize| v == 0 || v == last;
        if on_edge(i) && on_edge(j) {
            return DistrictTier::Corner;
        }

        // single middle cell for odd grids, middle 2x2 for even ones
        let is_middle = |v: usize| {
            if n % 2 == 1 {
                v == n / 2
            } else {
                v == n / 2 || v + 1 == n / 2
            }
        };
        if is_middle(i) && is_middle(j) {
            return DistrictTier::Center;
        }

        DistrictTier::Default
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistrictTier::Corner => "Corner",
            DistrictTier::Center => "Center",
            DistrictTier::Default => "Default",
        }
    }
}

/// Tier classification of a whole `n x n` grid, indexed `[i][j]`
pub fn tier_grid(n: usize) -> Vec<Vec<DistrictTier>> {
    (0..n)
        .map(|i| (0..n).map(|j| DistrictTier::classify(i, j, n)).collect())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    pub block_divisor: f32,
    pub height_scale: f32,
}

impl From<(f32, f32)> for TierProfile {
    fn from((block_divisor, height_scale): (f32, f32)) -> Self {
        Self {
            block_divisor,
            height_scale,
        }
    }
}

/// Tunable profile for each tier, only the corner/center/default split is fixed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfiles {
    pub corner: TierProfile,
    pub center: TierProfile,
    pub default: TierProfile,
    pub footprint_divisor: f32,
}

impl Default for TierProfiles {
    fn default() -> Self {
        Self {
            corner: CORNER_TIER.into(),
            center: CENTER_TIER.into(),
            default: DEFAULT_TIER.into(),
            footprint_divisor: FOOTPRINT_DIVISOR,
        }
    }
}

impl TierProfiles {
    pub fn profile(&self, tier: DistrictTier) -> TierProfile {
        match tier {
            DistrictTier::Corner => self.corner,
            DistrictTier::Center => self.center,
            DistrictTier::Default => self.default,
        }
    }

    /// Block size and building bounds for a borough of `borough_size` in `tier`
    pub fn derive(&self, tier: DistrictTier, borough_size: f32) -> (f32, StructureBounds) {
        let profile = self.profile(tier);
        let block_size = borough_size / profile.block_divisor;
        let footprint = block_size / self.footprint_divisor;
        (
            block_size,
            StructureBounds::new(footprint, block_size * profile.height_scale, footprint),
        )
    }
}

/// Running totals for one generation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub structures: usize,
    pub buildings: usize,
    pub blocks: usize,
    pub boroughs: usize,
}

impl std::ops::AddAssign for GenerationStats {
    fn add_assign(&mut self, other: Self) {
        self.structures += other.structures;
        self.buildings += other.buildings;
        self.blocks += other.blocks;
        self.boroughs += other.boroughs;
    }
}

/// A square borough split into a grid of packed blocks
#[derive(Debug, Clone)]
pub struct Borough {
    size: f32,
    block_size: f32,
    bounds: StructureBounds,
    tier: DistrictTier,
    cell: (usize, usize),
    position: Vec3,
    blocks: Vec<Block>,
}

impl Borough {
    pub fn new(size: f32, block_size: f32, bounds: StructureBounds, tier: DistrictTier) -> Self {
        Self {
            size,
            block_size,
            bounds,
            tier,
            cell: (0, 0),
            position: Vec3::ZERO,
            blocks: Vec::new(),
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    pub fn bounds(&self) -> &StructureBounds {
        &self.bounds
    }

    pub fn tier(&self) -> DistrictTier {
        self.tier
    }

    pub fn cell(&self) -> (usize, usize) {
        self.cell
    }

    pub fn set_cell(&mut self, i: usize, j: usize) {
        self.cell = (i, j);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn building_count(&self) -> usize {
        self.blocks.iter().map(Block::building_count).sum()
    }

    /// Blocks per side; blocks sit one block size apart, so the grid spans half the borough
    pub fn number_of_blocks(&self) -> usize {
        if self.block_size <= 0.0 || !self.block_size.is_finite() {
            return 0;
        }
        (self.size / self.block_size / 2.0).ceil().max(0.0) as usize
    }

    pub fn position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn translation(&self) -> Vec3 {
        self.position
    }

    /// Builds and packs every block of the grid
    pub fn generate_grid<R: RandomSource + ?Sized>(
        &mut self,
        factory: &StructureFactory,
        style: BuildingStyle,
        budget_divisor: f32,
        source: &mut R,
    ) -> Result<GenerationStats, LayoutError> {
        let count = self.number_of_blocks();
        let mut stats = GenerationStats::default();
        self.blocks.clear();
        self.blocks.reserve(count * count);

        for i in 0..count {
            for j in 0..count {
                let mut block = Block::new(self.block_size, self.bounds, budget_divisor)?;
                block.fill_space(factory, style, source);
                block.position(i as f32 * self.block_size, 0.0, j as f32 * self.block_size);

                stats.structures += block.structures_drawn();
                stats.buildings += block.building_count();
                stats.blocks += 1;
                self.blocks.push(block);
            }
        }

        debug!(
            "borough {:?} ({}) packed {} blocks with {} buildings",
            self.cell,
            self.tier.label(),
            stats.blocks,
            stats.buildings
        );

        Ok(stats)
    }

    /// Effective (width, depth) covered by the block grid
    pub fn extent(&self) -> Vec2 {
        self.blocks.iter().fold(Vec2::ZERO, |extent, block| {
            let offset = Vec2::new(block.offset().x, block.offset().z);
            extent.max(offset + block.extent())
        })
    }

    /// World-space rectangle on the ground plane covered by the block grid
    pub fn world_rect(&self) -> Rect {
        let min = Vec2::new(self.position.x, self.position.z);
        let span = self.number_of_blocks() as f32 * self.block_size;
        Rect::from_corners(min, min + Vec2::splat(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ScriptedSource;

    use DistrictTier::{Center, Corner};
    const DEFAULT: DistrictTier = DistrictTier::Default;

    #[test]
    fn three_by_three_tiers() {
        let grid = tier_grid(3);
        assert_eq!(
            grid,
            vec![
                vec![Corner, DEFAULT, Corner],
                vec![DEFAULT, Center, DEFAULT],
                vec![Corner, DEFAULT, Corner],
            ]
        );
    }

    #[test]
    fn even_grid_has_two_by_two_center() {
        let grid = tier_grid(4);
        for (i, row) in grid.iter().enumerate() {
            for (j, tier) in row.iter().enumerate() {
                let expected = match (i, j) {
                    (0, 0) | (0, 3) | (3, 0) | (3, 3) => Corner,
                    (1..=2, 1..=2) => Center,
                    _ => DEFAULT,
                };
                assert_eq!(*tier, expected, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn small_grids_are_all_corners() {
        assert_eq!(tier_grid(1), vec![vec![Corner]]);
        assert!(tier_grid(2).iter().flatten().all(|tier| *tier == Corner));
        assert!(tier_grid(0).is_empty());
    }

    #[test]
    fn tier_profiles_derive_bounds() {
        let profiles = TierProfiles::default();

        let (block_size, bounds) = profiles.derive(Center, 240.0);
        assert_eq!(block_size, 60.0);
        assert_eq!(bounds, StructureBounds::new(20.0, 300.0, 20.0));

        let (block_size, bounds) = profiles.derive(Corner, 240.0);
        assert_eq!(block_size, 30.0);
        assert_eq!(bounds.max_height, Some(90.0));
    }

    #[test]
    fn block_grid_covers_half_the_borough() {
        let borough = Borough::new(240.0, 30.0, StructureBounds::new(10.0, 30.0, 10.0), DEFAULT);
        assert_eq!(borough.number_of_blocks(), 4);

        let degenerate = Borough::new(0.0, 0.0, StructureBounds::new(0.0, 0.0, 0.0), DEFAULT);
        assert_eq!(degenerate.number_of_blocks(), 0);
    }

    #[test]
    fn generate_grid_offsets_blocks() {
        let mut borough = Borough::new(120.0, 30.0, StructureBounds::new(10.0, 30.0, 10.0), Corner);
        let mut source = ScriptedSource::new(vec![0.5]);
        let stats = borough
            .generate_grid(&StructureFactory::default(), BuildingStyle::default(), 1.0, &mut source)
            .unwrap();

        assert_eq!(stats.blocks, 4);
        assert_eq!(stats.buildings, 4 * 36);
        assert_eq!(borough.building_count(), 4 * 36);

        let offsets: Vec<_> = borough.blocks().iter().map(Block::offset).collect();
        assert_eq!(
            offsets,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 30.0),
                Vec3::new(30.0, 0.0, 0.0),
                Vec3::new(30.0, 0.0, 30.0),
            ]
        );
        assert_eq!(borough.extent(), Vec2::new(60.0, 60.0));
    }

    #[test]
    fn oversized_bounds_abort_the_grid() {
        let mut borough = Borough::new(120.0, 30.0, StructureBounds::new(40.0, 30.0, 10.0), DEFAULT);
        let mut source = ScriptedSource::new(vec![0.5]);
        let result = borough.generate_grid(&StructureFactory::default(), BuildingStyle::default(), 1.0, &mut source);
        assert!(matches!(result, Err(LayoutError::BlockTooSmall { .. })));
    }
}
