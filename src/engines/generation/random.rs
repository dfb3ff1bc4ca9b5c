use rand::Rng;

/// The draws the engine consumes. Every selector and operator pulls from one
/// caller-supplied source in a fixed order, so a seeded source replays exactly.
pub trait RandomSource {
    /// Uniform integer in `low..=high`
    fn draw_index(&mut self, low: usize, high: usize) -> usize;

    /// Uniform float in `[0, 1)`
    fn draw_unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn draw_index(&mut self, low: usize, high: usize) -> usize {
        self.gen_range(low..=high)
    }

    fn draw_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}
