/// Closed range `[min, max]` of ray parameters or channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Everything from negative to positive infinity.
    pub const UNIVERSE: Interval = Interval::new(f64::NEG_INFINITY, f64::INFINITY);

    /// `[0, 1]`, the displayable range of a color channel.
    pub const UNIT: Interval = Interval::new(0.0, 1.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Open-interval test: `min < x < max`. Hits exactly on either bound
    /// are rejected.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Copy with a new upper bound. Used to narrow the search to hits
    /// closer than the best one so far.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval { max, ..*self }
    }
}
