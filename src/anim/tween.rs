use std::time::Duration;

/// Duration used when a transition doesn't name one
pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);

/// Easing curve applied to normalized progress t in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out: 1 - (1 - t)^2
    #[default]
    Power1Out,
}

impl Ease {
    #[inline(always)]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// A scalar animated from a start value to a target over a fixed duration.
/// Advanced explicitly once per frame; holds no timers or callbacks.
#[derive(Clone, Debug)]
pub struct Tween {
    start: f64,
    current: f64,
    target: f64,
    duration: Duration,
    elapsed: Duration,
    ease: Ease,
}

impl Tween {
    /// A tween at rest on `value`
    pub fn new(value: f64) -> Self {
        Self {
            start: value,
            current: value,
            target: value,
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
            ease: Ease::default(),
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Retarget from wherever the value currently is.
    /// A zero duration jumps straight to the target.
    pub fn to(&mut self, target: f64, duration: Duration) {
        self.start = self.current;
        self.target = target;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        if duration.is_zero() {
            self.current = target;
        }
    }

    /// Step forward by `dt` and return the new value
    pub fn advance(&mut self, dt: Duration) -> f64 {
        if !self.is_active() {
            return self.current;
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.elapsed >= self.duration {
            self.current = self.target;
        } else {
            let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
            self.current = self.start + (self.target - self.start) * self.ease.apply(t);
        }
        self.current
    }

    #[inline(always)]
    pub fn value(&self) -> f64 {
        self.current
    }

    /// Still moving towards the target
    pub fn is_active(&self) -> bool {
        self.elapsed < self.duration
    }
}
