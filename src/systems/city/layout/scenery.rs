use bevy::math::{Vec2, Vec3};
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

/// Flat ground plane under the borough grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landscape {
    pub width: f32,
    pub depth: f32,
}

impl Landscape {
    /// The plane spans half of the requested size, matching the half-step borough layout
    pub fn new(width: f32, depth: f32) -> Self {
        Self {
            width: width / 2.0,
            depth: depth / 2.0,
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(self.width / 2.0, 0.0, self.depth / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.depth)
    }
}

/// Dome of particles around the city
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sky {
    pub radius: f32,
    pub center: Vec3,
    pub particle_count: usize,
}

impl Sky {
    pub fn new(radius: f32, particle_count: usize) -> Self {
        Self {
            radius,
            center: Vec3::ZERO,
            particle_count,
        }
    }

    /// Centers the dome over a city of `city_size`
    pub fn surround(&mut self, city_size: f32) {
        let offset = city_size / 4.0;
        self.center = Vec3::new(offset, 0.0, offset);
    }

    /// Samples particle positions on the upper hemisphere, relative to `center`
    pub fn particles<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec3> {
        (0..self.particle_count)
            .map(|_| {
                let [x, y, z]: [f32; 3] = UnitSphere.sample(rng);
                Vec3::new(x, y.abs(), z) * self.radius
            })
            .collect()
    }
}
