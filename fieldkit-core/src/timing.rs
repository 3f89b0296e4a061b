//! Time envelopes: scalar multipliers driven by simulation time
//!
//! The caller owns the clock. An envelope only remembers the last time it
//! was given and the value at that time.

/// A scalar that depends on the last time set
pub trait Envelope {
    fn set_time(&mut self, t: f64);

    /// Value at the last time passed to [`Envelope::set_time`]
    fn value(&self) -> f64;
}

/// How the value evolves across one segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Constant(f64),
    /// `from + (to - from) * s^exponent` with `s` the fraction of the
    /// segment elapsed
    Ramp { from: f64, to: f64, exponent: f64 },
    /// Exponential approach from `from` to `to` with time constant `tau`,
    /// normalized to reach `to` at the end of the segment
    Exponential { from: f64, to: f64, tau: f64 },
}

impl Shape {
    fn start_value(&self) -> f64 {
        match *self {
            Shape::Constant(v) => v,
            Shape::Ramp { from, .. } | Shape::Exponential { from, .. } => from,
        }
    }

    fn end_value(&self) -> f64 {
        match *self {
            Shape::Constant(v) => v,
            Shape::Ramp { to, .. } | Shape::Exponential { to, .. } => to,
        }
    }

    fn at(&self, elapsed: f64, duration: f64) -> f64 {
        match *self {
            Shape::Constant(v) => v,
            Shape::Ramp { from, to, exponent } => {
                let s = if duration.is_infinite() {
                    0.0
                } else {
                    (elapsed / duration).clamp(0.0, 1.0)
                };
                from + (to - from) * s.powf(exponent)
            }
            Shape::Exponential { from, to, tau } => {
                if tau <= 0.0 {
                    return to;
                }
                let rise = 1.0 - (-elapsed / tau).exp();
                let full = if duration.is_infinite() {
                    1.0
                } else {
                    1.0 - (-duration / tau).exp()
                };
                from + (to - from) * rise / full
            }
        }
    }
}

/// One piece of a [`Timing`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub duration: f64,
    pub shape: Shape,
}

impl Segment {
    pub fn new(duration: f64, shape: Shape) -> Self {
        Self { duration, shape }
    }
}

/// Piecewise envelope: segments laid end to end from `start`.
///
/// Before `start` the value is `before`; after the last segment it holds
/// the last segment's end value. A segment with infinite duration covers
/// the rest of time.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub start: f64,
    pub before: f64,
    pub segments: Vec<Segment>,
    time: f64,
    value: f64,
}

impl Timing {
    pub fn new(start: f64, segments: Vec<Segment>) -> Self {
        let before = segments.first().map_or(1.0, |s| s.shape.start_value());
        let mut timing = Self {
            start,
            before,
            segments,
            time: 0.0,
            value: before,
        };
        timing.set_time(0.0);
        timing
    }

    /// Constant one from negative infinity onward
    pub fn unity() -> Self {
        Self::new(
            f64::NEG_INFINITY,
            vec![Segment::new(f64::INFINITY, Shape::Constant(1.0))],
        )
    }

    /// `before` until `t0`, `after` from `t0` on
    pub fn step(t0: f64, before: f64, after: f64) -> Self {
        let mut timing = Self::new(t0, vec![Segment::new(f64::INFINITY, Shape::Constant(after))]);
        timing.before = before;
        timing.set_time(timing.time);
        timing
    }

    /// Last time set
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Value at an arbitrary time, without changing the current time
    pub fn evaluate(&self, t: f64) -> f64 {
        if self.segments.is_empty() {
            return self.before;
        }
        if t < self.start {
            return self.before;
        }

        let mut seg_start = self.start;
        for seg in &self.segments {
            let elapsed = t - seg_start;
            if seg.duration.is_infinite() || elapsed < seg.duration {
                return seg.shape.at(elapsed, seg.duration);
            }
            seg_start += seg.duration;
        }

        self.segments
            .last()
            .map_or(self.before, |s| s.shape.end_value())
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::unity()
    }
}

impl Envelope for Timing {
    fn set_time(&mut self, t: f64) {
        self.time = t;
        self.value = self.evaluate(t);
    }

    fn value(&self) -> f64 {
        self.value
    }
}
