//! Tween components for the character's motion.
//!
//! - [`StepTween`] – one cell-to-cell move over a fixed duration
//! - [`JumpArc`] – the vertical jump offset, independent of stepping
//!
//! Both only store accumulated time. The maths (interpolation and the arc
//! shape) lives in [`crate::systems::tween`], which also advances them.

use crate::resources::tilemap::Cell;

/// An in-flight move from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepTween {
    pub from: Cell,
    pub to: Cell,
    /// Seconds accumulated so far.
    pub elapsed: f32,
    /// Seconds the whole step takes.
    pub duration: f32,
}

impl StepTween {
    pub fn new(from: Cell, to: Cell, duration: f32) -> Self {
        StepTween {
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    /// Fraction of the step done, in 0.0..=1.0.
    pub fn progress(&self) -> f32 {
        fraction(self.elapsed, self.duration)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// An in-flight jump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpArc {
    pub elapsed: f32,
    pub duration: f32,
    /// Peak offset in pixels, reached at half the duration.
    pub height: f32,
}

impl JumpArc {
    pub fn new(duration: f32, height: f32) -> Self {
        JumpArc {
            elapsed: 0.0,
            duration,
            height,
        }
    }

    pub fn progress(&self) -> f32 {
        fraction(self.elapsed, self.duration)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

fn fraction(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_tween_new() {
        let tw = StepTween::new(Cell::new(5, 5), Cell::new(6, 5), 0.2);
        assert_eq!(tw.elapsed, 0.0);
        assert_eq!(tw.progress(), 0.0);
        assert!(!tw.is_finished());
    }

    #[test]
    fn test_step_tween_progress_is_clamped() {
        let mut tw = StepTween::new(Cell::new(0, 0), Cell::new(0, 1), 0.2);
        tw.elapsed = 0.1;
        assert!((tw.progress() - 0.5).abs() < 1e-6);
        tw.elapsed = 0.35;
        assert_eq!(tw.progress(), 1.0);
        assert!(tw.is_finished());
    }

    #[test]
    fn test_zero_duration_counts_as_done() {
        let arc = JumpArc::new(0.0, 24.0);
        assert_eq!(arc.progress(), 1.0);
        assert!(arc.is_finished());
    }
}
