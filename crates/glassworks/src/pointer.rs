//! Eased pointer state for the bubble scene.
//!
//! The raw cursor position is a target; the tracked position eases toward it
//! a little each tick, so the displacement amplitude and shell rotation
//! settle smoothly after the pointer stops moving. Amplitude peaks with the
//! pointer at the viewport center and falls off toward the corners.

use std::f32::consts::TAU;

use glam::Vec2;

/// Fraction of the remaining distance covered per tick.
const EASE: f32 = 0.08;

#[derive(Debug, Clone)]
pub struct PointerTracker {
    current: Vec2,
    target: Vec2,
    viewport: Vec2,
}

impl PointerTracker {
    /// Starts centered, where the displacement amplitude is strongest.
    pub fn new(viewport: Vec2) -> Self {
        let viewport = viewport.max(Vec2::ONE);
        let center = viewport * 0.5;
        Self {
            current: center,
            target: center,
            viewport,
        }
    }

    /// Rescales the tracked position so the relative placement survives a
    /// viewport change.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        let viewport = viewport.max(Vec2::ONE);
        let scale = viewport / self.viewport;
        self.current *= scale;
        self.target *= scale;
        self.viewport = viewport;
    }

    pub fn point_at(&mut self, position: Vec2) {
        self.target = position.clamp(Vec2::ZERO, self.viewport);
    }

    pub fn tick(&mut self) {
        self.current += (self.target - self.current) * EASE;
    }

    /// Displacement strength in `[0, 1]`: 1 at the center, 0 at the corners.
    pub fn amplitude(&self) -> f32 {
        let center = self.viewport * 0.5;
        let max_dist = center.length().max(1e-3);
        (1.0 - (self.current - center).length() / max_dist).clamp(0.0, 1.0)
    }

    /// Pointer position mapped to a spin of the displaced shell: a full
    /// horizontal sweep is one turn about Y, a vertical sweep one negative
    /// turn about Z.
    pub fn rotation(&self) -> Vec2 {
        let norm = self.current / self.viewport;
        Vec2::new(norm.x * TAU, -norm.y * TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_toward_the_target() {
        let mut tracker = PointerTracker::new(Vec2::new(800.0, 600.0));
        tracker.point_at(Vec2::new(100.0, 50.0));
        let before = (tracker.current - tracker.target).length();
        tracker.tick();
        let after = (tracker.current - tracker.target).length();
        assert!(after < before);
        for _ in 0..500 {
            tracker.tick();
        }
        assert!((tracker.current - tracker.target).length() < 1.0);
    }

    #[test]
    fn amplitude_peaks_at_the_center() {
        let mut tracker = PointerTracker::new(Vec2::new(800.0, 600.0));
        assert!((tracker.amplitude() - 1.0).abs() < 1e-5);
        tracker.point_at(Vec2::ZERO);
        for _ in 0..1000 {
            tracker.tick();
        }
        assert!(tracker.amplitude() < 0.05);
    }

    #[test]
    fn amplitude_stays_in_unit_range() {
        let mut tracker = PointerTracker::new(Vec2::new(640.0, 480.0));
        for target in [
            Vec2::ZERO,
            Vec2::new(640.0, 0.0),
            Vec2::new(320.0, 240.0),
            Vec2::new(640.0, 480.0),
        ] {
            tracker.point_at(target);
            for _ in 0..50 {
                tracker.tick();
                let a = tracker.amplitude();
                assert!((0.0..=1.0).contains(&a), "amplitude {a}");
            }
        }
    }

    #[test]
    fn rotation_sweeps_one_turn_across_the_viewport() {
        let mut tracker = PointerTracker::new(Vec2::new(1000.0, 500.0));
        tracker.point_at(Vec2::new(1000.0, 500.0));
        for _ in 0..2000 {
            tracker.tick();
        }
        let rotation = tracker.rotation();
        assert!((rotation.x - TAU).abs() < 0.05);
        assert!((rotation.y + TAU).abs() < 0.05);
    }

    #[test]
    fn viewport_change_preserves_relative_placement() {
        let mut tracker = PointerTracker::new(Vec2::new(800.0, 600.0));
        tracker.point_at(Vec2::new(200.0, 150.0));
        for _ in 0..1000 {
            tracker.tick();
        }
        let before = tracker.amplitude();
        tracker.set_viewport(Vec2::new(1600.0, 1200.0));
        assert!((tracker.amplitude() - before).abs() < 1e-3);
    }
}
