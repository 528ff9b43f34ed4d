use bevy::math::{Rect, Vec2, Vec3};

use crate::config::{BUILDING_FOOTPRINT_SCALE, PARTICLE_SHELL_SCALE};
use super::structure::Structure;

/// How a structure is drawn inside its footprint; never affects packing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingStyle {
    pub footprint_scale: f32,
    pub particle_shell: Option<f32>,
}

impl Default for BuildingStyle {
    fn default() -> Self {
        Self {
            footprint_scale: BUILDING_FOOTPRINT_SCALE,
            particle_shell: None,
        }
    }
}

impl BuildingStyle {
    pub fn with_particle_shell(mut self) -> Self {
        self.particle_shell = Some(PARTICLE_SHELL_SCALE);
        self
    }
}

/// Placeable unit wrapping one structure.
/// Positions are corner anchored: `(x, z)` is the front-left corner of the footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    structure: Structure,
    style: BuildingStyle,
    corner: Vec3,
}

impl Building {
    pub fn assemble(structure: Structure, style: BuildingStyle) -> Self {
        Self {
            structure,
            style,
            corner: Vec3::ZERO,
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn style(&self) -> BuildingStyle {
        self.style
    }

    pub fn width(&self) -> f32 {
        self.structure.width()
    }

    pub fn height(&self) -> f32 {
        self.structure.height()
    }

    pub fn depth(&self) -> f32 {
        self.structure.depth()
    }

    pub fn position(&mut self, x: f32, y: f32, z: f32) {
        self.corner = Vec3::new(x, y, z);
    }

    pub fn corner(&self) -> Vec3 {
        self.corner
    }

    /// Origin of the render transform, the structure mesh is center anchored
    pub fn center(&self) -> Vec3 {
        self.corner + Vec3::new(self.width() / 2.0, 0.0, self.depth() / 2.0)
    }

    /// Ground-plane footprint, x maps to x and z maps to y
    pub fn footprint(&self) -> Rect {
        let min = Vec2::new(self.corner.x, self.corner.z);
        Rect::from_corners(min, min + Vec2::new(self.width(), self.depth()))
    }

    /// Strict overlap, shared edges do not count
    pub fn overlaps(&self, other: &Building) -> bool {
        !self.footprint().intersect(other.footprint()).is_empty()
    }
}
