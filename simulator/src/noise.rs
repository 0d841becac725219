use rand::Rng;

/// Draws a value uniformly from `[-1.0, 1.0)`. Every call consumes fresh randomness from `rng`.
#[inline]
pub fn uniform_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..1.0)
}
