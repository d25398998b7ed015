use std::time::{Duration, Instant};

use crate::types::{Color, ColorF};

/// How long a bar takes to fade to a new background color.
pub const COLOR_ANIMATION_DURATION: Duration = Duration::from_millis(150);

/// A color that moves linearly toward its goal whenever the goal changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedColor {
    from: ColorF,
    to: ColorF,
    goal: Color,
    start: Instant,
}

impl AnimatedColor {
    /// Creates a color already settled at `color`.
    pub fn new(color: Color, now: Instant) -> Self {
        let c = color.to_f32();
        Self {
            from: c,
            to: c,
            goal: color,
            start: now,
        }
    }

    /// The color being animated toward.
    pub fn goal(&self) -> Color {
        self.goal
    }

    /// Starts animating toward `goal` from wherever the color is now.
    ///
    /// Does nothing if `goal` is already the goal.
    pub fn set_goal(&mut self, goal: Color, now: Instant) {
        if goal == self.goal {
            return
        }
        self.from = self.value(now);
        self.to = goal.to_f32();
        self.goal = goal;
        self.start = now;
    }

    /// Fraction of the animation completed at `now`.
    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / COLOR_ANIMATION_DURATION.as_secs_f32()).min(1.0)
    }

    /// The color at `now`.
    pub fn value(&self, now: Instant) -> ColorF {
        self.from.lerp(self.to, self.progress(now))
    }

    /// Whether the color is still moving at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.from != self.to && self.progress(now) < 1.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_settles_immediately() {
        let now = Instant::now();
        let c = AnimatedColor::new(Color::WHITE, now);

        assert!(!c.is_animating(now));
        assert_eq!(c.value(now), Color::WHITE.to_f32());
    }

    #[test]
    fn test_linear_fade() {
        let t0 = Instant::now();
        let mut c = AnimatedColor::new(Color::from_hex(0x000000ff), t0);

        c.set_goal(Color::WHITE, t0);
        assert!(c.is_animating(t0));
        assert_eq!(c.value(t0), ColorF::new(0.0, 0.0, 0.0, 1.0));

        let mid = c.value(t0 + Duration::from_millis(75));
        assert!((mid.r - 0.5).abs() < 1e-3);

        let end = t0 + COLOR_ANIMATION_DURATION;
        assert!(!c.is_animating(end));
        assert_eq!(c.value(end), Color::WHITE.to_f32());

        // same goal again does not restart
        c.set_goal(Color::WHITE, end);
        assert!(!c.is_animating(end));
    }
}
