//! Firefly entity
//!
//! Positions are in document space: absolute page coordinates that do not
//! move when the page scrolls. Drawing converts to viewport space.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::clamp_inside;
use crate::consts::*;
use crate::settings::FireflyTuning;

/// A single flickering firefly
#[derive(Debug, Clone, PartialEq)]
pub struct Firefly {
    pub id: u32,
    /// Document-space centre
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Sprite width/height
    pub size: f32,
    pub flicker_phase: f32,
    pub flicker_rate: f32,
    /// Hidden until the engine resets it
    pub captured: bool,
}

/// Uniform coordinate in `[radius, extent - radius]`, or the middle when
/// the extent cannot hold the circle
fn sample_inside(rng: &mut impl Rng, radius: f32, extent: f32) -> f32 {
    if extent <= radius * 2.0 {
        return extent / 2.0;
    }
    rng.random_range(radius..=extent - radius)
}

impl Firefly {
    /// Spawn at a random position inside `bounds`
    pub fn spawn(id: u32, bounds: Vec2, tuning: &FireflyTuning, rng: &mut impl Rng) -> Self {
        let mut fly = Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: tuning.radius,
            size: tuning.size,
            flicker_phase: 0.0,
            flicker_rate: 0.0,
            captured: false,
        };
        fly.randomize(bounds, tuning, rng);
        fly
    }

    fn randomize(&mut self, bounds: Vec2, tuning: &FireflyTuning, rng: &mut impl Rng) {
        self.pos = Vec2::new(
            sample_inside(rng, self.radius, bounds.x),
            sample_inside(rng, self.radius, bounds.y),
        );
        self.vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * tuning.speed,
            (rng.random::<f32>() - 0.5) * tuning.speed,
        );
        self.flicker_rate = rng.random::<f32>() * FLICKER_RATE_SPAN + FLICKER_RATE_MIN;
        self.flicker_phase = rng.random::<f32>() * TAU;
    }

    /// Move one tick and bounce off the document edges
    pub fn update(&mut self, bounds: Vec2) {
        if self.captured {
            return;
        }
        self.pos += self.vel;

        if self.pos.x < self.radius || self.pos.x > bounds.x - self.radius {
            self.vel.x = -self.vel.x;
            self.pos.x = clamp_inside(self.pos.x, self.radius, bounds.x);
        }
        if self.pos.y < self.radius || self.pos.y > bounds.y - self.radius {
            self.vel.y = -self.vel.y;
            self.pos.y = clamp_inside(self.pos.y, self.radius, bounds.y);
        }

        self.flicker_phase = (self.flicker_phase + self.flicker_rate) % TAU;
    }

    /// Current glow/opacity in [0.3, 1.0]
    pub fn opacity(&self) -> f32 {
        FLICKER_BASE + FLICKER_AMPLITUDE * self.flicker_phase.sin()
    }

    /// Vertical draw position on the viewport
    #[inline]
    pub fn viewport_y(&self, scroll_y: f32) -> f32 {
        self.pos.y - scroll_y
    }

    /// False when the sprite lies entirely above or below the viewport
    pub fn is_visible(&self, scroll_y: f32, viewport_height: f32) -> bool {
        let y = self.viewport_y(scroll_y);
        y + self.radius >= 0.0 && y - self.radius <= viewport_height
    }

    /// Whether a document-space point is within `reach` of this firefly's edge
    pub fn within_reach(&self, point: Vec2, reach: f32) -> bool {
        self.pos.distance(point) < self.radius + reach
    }

    pub fn capture(&mut self) {
        self.captured = true;
    }

    /// Put the firefly back into play somewhere new
    pub fn reset(&mut self, bounds: Vec2, tuning: &FireflyTuning, rng: &mut impl Rng) {
        self.randomize(bounds, tuning, rng);
        self.captured = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fly_at(pos: Vec2, vel: Vec2, radius: f32) -> Firefly {
        Firefly {
            id: 0,
            pos,
            vel,
            radius,
            size: radius * 2.0,
            flicker_phase: 0.0,
            flicker_rate: 0.1,
            captured: false,
        }
    }

    #[test]
    fn test_spawn_inside_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = FireflyTuning::default();
        let bounds = Vec2::new(1280.0, 4000.0);
        for id in 0..100 {
            let fly = Firefly::spawn(id, bounds, &tuning, &mut rng);
            assert!(fly.pos.x >= fly.radius && fly.pos.x <= bounds.x - fly.radius);
            assert!(fly.pos.y >= fly.radius && fly.pos.y <= bounds.y - fly.radius);
            assert!(fly.vel.x.abs() <= tuning.speed / 2.0);
            assert!(fly.flicker_rate >= FLICKER_RATE_MIN);
            assert!(!fly.captured);
        }
    }

    #[test]
    fn test_spawn_does_not_pile_on_edges() {
        let mut rng = Pcg32::seed_from_u64(11);
        let tuning = FireflyTuning::default();
        let bounds = Vec2::new(1024.0, 768.0);
        let on_edge = (0..500)
            .map(|id| Firefly::spawn(id, bounds, &tuning, &mut rng))
            .filter(|f| {
                f.pos.x == f.radius
                    || f.pos.x == bounds.x - f.radius
                    || f.pos.y == f.radius
                    || f.pos.y == bounds.y - f.radius
            })
            .count();
        assert_eq!(on_edge, 0);
    }

    #[test]
    fn test_spawn_in_narrow_document_is_centred() {
        let mut rng = Pcg32::seed_from_u64(3);
        let fly = Firefly::spawn(0, Vec2::new(50.0, 900.0), &FireflyTuning::default(), &mut rng);
        assert_eq!(fly.pos.x, 25.0);
        assert!(fly.pos.y >= fly.radius && fly.pos.y <= 900.0 - fly.radius);
    }

    #[test]
    fn test_bounce_off_right_edge() {
        let mut fly = fly_at(Vec2::new(378.0, 100.0), Vec2::new(5.0, 0.0), 20.0);
        fly.update(Vec2::new(400.0, 400.0));
        assert_eq!(fly.pos.x, 380.0);
        assert_eq!(fly.vel.x, -5.0);
    }

    #[test]
    fn test_bounce_off_top_edge() {
        let mut fly = fly_at(Vec2::new(100.0, 21.0), Vec2::new(0.0, -3.0), 20.0);
        fly.update(Vec2::new(400.0, 400.0));
        assert_eq!(fly.pos.y, 20.0);
        assert_eq!(fly.vel.y, 3.0);
    }

    #[test]
    fn test_shrunk_document_pulls_firefly_back_in() {
        let mut fly = fly_at(Vec2::new(100.0, 2000.0), Vec2::new(0.5, 0.5), 20.0);
        fly.update(Vec2::new(400.0, 900.0));
        assert_eq!(fly.pos.y, 880.0);
    }

    #[test]
    fn test_captured_firefly_is_frozen() {
        let mut fly = fly_at(Vec2::new(100.0, 100.0), Vec2::new(1.0, 1.0), 20.0);
        fly.capture();
        let before = fly.clone();
        fly.update(Vec2::new(400.0, 400.0));
        assert_eq!(fly, before);
    }

    #[test]
    fn test_flicker_is_deterministic() {
        let mut a = fly_at(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        let mut b = a.clone();
        for _ in 0..50 {
            a.update(Vec2::new(400.0, 400.0));
            b.update(Vec2::new(400.0, 400.0));
            assert_eq!(a.opacity(), b.opacity());
            assert!((0.3..=1.0).contains(&a.opacity()));
        }
        assert!((a.flicker_phase - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_visibility_uses_scroll() {
        // Document y=250 with scroll 300 draws at -50, fully above a 20px sprite
        let fly = fly_at(Vec2::new(100.0, 250.0), Vec2::ZERO, 20.0);
        assert_eq!(fly.viewport_y(300.0), -50.0);
        assert!(!fly.is_visible(300.0, 600.0));
        assert!(fly.is_visible(0.0, 600.0));
        // Partially visible at the top edge
        assert!(fly.is_visible(260.0, 600.0));
        // Below the viewport
        assert!(!fly.is_visible(-400.0, 600.0));
    }

    #[test]
    fn test_reset_clears_capture() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = FireflyTuning::default();
        let mut fly = Firefly::spawn(4, Vec2::new(800.0, 800.0), &tuning, &mut rng);
        fly.capture();
        fly.reset(Vec2::new(800.0, 3000.0), &tuning, &mut rng);
        assert!(!fly.captured);
        assert_eq!(fly.id, 4);
        assert!(fly.pos.y <= 3000.0 - fly.radius);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stays_inside_document(
                seed in any::<u64>(),
                width in 80.0f32..3000.0,
                height in 80.0f32..10000.0,
                shrink in 0.3f32..1.0,
                ticks in 1usize..400,
            ) {
                let mut rng = Pcg32::seed_from_u64(seed);
                let tuning = FireflyTuning { speed: 40.0, ..FireflyTuning::default() };
                let mut fly = Firefly::spawn(0, Vec2::new(width, height), &tuning, &mut rng);
                // Document may shrink between ticks
                let bounds = Vec2::new(width, (height * shrink).max(80.0));
                for _ in 0..ticks {
                    fly.update(bounds);
                    prop_assert!(fly.pos.x >= fly.radius && fly.pos.x <= bounds.x - fly.radius,
                        "x={} out of [{}, {}]", fly.pos.x, fly.radius, bounds.x - fly.radius);
                    prop_assert!(fly.pos.y >= fly.radius && fly.pos.y <= bounds.y - fly.radius,
                        "y={} out of [{}, {}]", fly.pos.y, fly.radius, bounds.y - fly.radius);
                }
            }
        }
    }
}
