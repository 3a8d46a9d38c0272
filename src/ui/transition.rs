//! Time-driven animation primitives.
//!
//! Everything here is evaluated against a monotonic `Duration` since mount, so
//! the event loop owns the clock and tests can step it by hand. All easing is
//! linear.

use rand::Rng;
use std::f64::consts::PI;
use std::time::Duration;

/// A linear transition of one scalar between two instants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Duration,
    duration: Duration,
}

impl Tween {
    /// A value that is not moving.
    pub fn still(value: f64) -> Self {
        Tween::new(value, value, Duration::ZERO, Duration::ZERO)
    }

    pub fn new(from: f64, to: f64, start: Duration, duration: Duration) -> Self {
        Tween {
            from,
            to,
            start,
            duration,
        }
    }

    /// Starts a new transition from wherever this one is at `now`.
    pub fn retarget(&self, to: f64, now: Duration, duration: Duration) -> Self {
        Tween::new(self.value_at(now), to, now, duration)
    }

    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.end()
    }

    pub fn value_at(&self, now: Duration) -> f64 {
        if now < self.start {
            return self.from;
        }
        let elapsed = now - self.start;
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * t
    }
}

/// Endless grow/shrink cycle: `from -> expanded`, then alternating
/// `expanded -> rest` and `rest -> expanded`, one leg per `leg` duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    start: Duration,
    from: f64,
    expanded: f64,
    rest: f64,
    leg: Duration,
}

impl Pulse {
    pub fn new(start: Duration, from: f64, expanded: f64, rest: f64, leg: Duration) -> Self {
        Pulse {
            start,
            from,
            expanded,
            rest,
            leg,
        }
    }

    pub fn value_at(&self, now: Duration) -> f64 {
        if self.leg.is_zero() {
            return self.expanded;
        }
        let legs = now.saturating_sub(self.start).as_nanos() as f64 / self.leg.as_nanos() as f64;
        let index = legs.floor() as u64;
        let t = legs.fract();
        let (a, b) = match index {
            0 => (self.from, self.expanded),
            i if i % 2 == 1 => (self.expanded, self.rest),
            _ => (self.rest, self.expanded),
        };
        a + (b - a) * t
    }
}

/// Size of a cell: either a one-shot tween or an ongoing hover pulse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeMotion {
    Tween(Tween),
    Pulse(Pulse),
}

impl SizeMotion {
    pub fn value_at(&self, now: Duration) -> f64 {
        match self {
            SizeMotion::Tween(t) => t.value_at(now),
            SizeMotion::Pulse(p) => p.value_at(now),
        }
    }
}

/// Delay before a cell's entry fade, in `[0, 2 * duration]`.
///
/// Drawn as `(cos(pi * u) + 1) * duration` for uniform `u`, which bunches
/// delays toward both ends of the window.
pub fn entry_delay<R: Rng>(duration: Duration, rng: &mut R) -> Duration {
    let u: f64 = rng.r#gen();
    duration.mul_f64((PI * u).cos() + 1.0)
}

/// Whether a render pass is still animating in.
///
/// While `Transitioning`, hover input is ignored. `pending` counts the cell
/// transitions that have not ended yet; the last one to finish returns the
/// state to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Transitioning { pending: usize },
}

impl RenderState {
    /// State for a pass that starts `count` transitions. An empty pass
    /// completes immediately.
    pub fn start(count: usize) -> Self {
        if count == 0 {
            RenderState::Idle
        } else {
            RenderState::Transitioning { pending: count }
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, RenderState::Transitioning { .. })
    }

    /// Counts down one finished transition.
    pub fn complete_one(&mut self) {
        if let RenderState::Transitioning { pending } = *self {
            *self = RenderState::start(pending.saturating_sub(1));
        }
    }
}
