use crate::config::*;
use super::random::{RandomSource, random_in_range};

/// Per-axis upper bounds for a generated structure
/// `max_height: None` falls back to the default height draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureBounds {
    pub max_width: f32,
    pub max_height: Option<f32>,
    pub max_depth: f32,
}

impl StructureBounds {
    pub fn new(max_width: f32, max_height: f32, max_depth: f32) -> Self {
        Self {
            max_width,
            max_height: Some(max_height),
            max_depth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StructureKind {
    Box,
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        segments: u32,
    },
}

/// A single building solid. Width and depth are the footprint used by
/// the packer; for cylinders both equal the bottom radius so the round
/// shape never leaves its bounding square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Structure {
    width: f32,
    height: f32,
    depth: f32,
    kind: StructureKind,
}

impl Structure {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn is_cylinder(&self) -> bool {
        matches!(self.kind, StructureKind::Cylinder { .. })
    }
}

pub struct StructureFactory {
    pub box_probability: f32,
}

impl Default for StructureFactory {
    fn default() -> Self {
        Self {
            box_probability: BOX_PROBABILITY,
        }
    }
}

impl StructureFactory {
    /// Clamps the probability to [0, 1]; NaN falls back to `BOX_PROBABILITY`.
    pub fn new(box_probability: f32) -> Self {
        let box_probability = if box_probability.is_nan() {
            BOX_PROBABILITY
        } else {
            box_probability.clamp(0.0, 1.0)
        };
        Self { box_probability }
    }

    /// Draws one structure within `bounds`.
    ///
    /// Draw order is width, depth, height, kind, then the segment count
    /// for cylinders. Keep it stable, seeded cities depend on it.
    pub fn generate<R: RandomSource + ?Sized>(&self, source: &mut R, bounds: &StructureBounds) -> Structure {
        let width = random_in_range(source, bounds.max_width / MIN_SIZE_FRACTION, bounds.max_width);
        let depth = random_in_range(source, bounds.max_depth / MIN_SIZE_FRACTION, bounds.max_depth);
        let height = match bounds.max_height {
            Some(max_height) => random_in_range(source, max_height / MIN_SIZE_FRACTION, max_height),
            None => (source.unit() * DEFAULT_HEIGHT_SPAN).ceil().max(DEFAULT_HEIGHT_MIN),
        };

        // zero-sized footprints would never consume packing budget
        let width = width.max(MIN_DIMENSION);
        let depth = depth.max(MIN_DIMENSION);
        let height = height.max(MIN_DIMENSION);

        let draw = source.unit();
        match draw {
            d if (0.0..self.box_probability).contains(&d) => Structure {
                width,
                height,
                depth,
                kind: StructureKind::Box,
            },
            d if (self.box_probability..1.0).contains(&d) => {
                let radius_top = width.min(depth);
                let radius_bottom = width.max(depth);
                let segments = random_in_range(source, CYLINDER_SEGMENTS_MIN, CYLINDER_SEGMENTS_MAX) as u32;

                // square bounding box so the packer never underestimates the footprint
                Structure {
                    width: radius_bottom,
                    height,
                    depth: radius_bottom,
                    kind: StructureKind::Cylinder {
                        radius_top,
                        radius_bottom,
                        segments,
                    },
                }
            }
            d => unreachable!("invalid structure kind draw {d}"),
        }
    }
}
