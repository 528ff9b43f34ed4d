use rand::Rng;
use rand::rngs::StdRng;

/// Uniform draws in `[0, 1)`, injected into every generation step
/// so a seeded source reproduces the same city.
pub trait RandomSource {
    fn unit(&mut self) -> f32;
}

impl RandomSource for StdRng {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// `floor(max(unit * max, min))`
///
/// This is not uniform over `[min, max]`: every draw below `min / max`
/// collapses onto `min`, so results lean toward the upper bound.
pub fn random_in_range<R: RandomSource + ?Sized>(source: &mut R, min: f32, max: f32) -> f32 {
    (source.unit() * max).max(min).floor()
}
