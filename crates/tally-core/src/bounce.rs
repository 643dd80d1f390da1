//! Bouncing, spinning card.
//!
//! Presentation-only state. The card moves by its velocity every frame
//! (scaled by the [`FrameClock`](crate::FrameClock) ratio), reflects off the
//! viewport edges, and rotates at a constant rate. Velocities and spin are
//! expressed per baseline (60fps) frame.

use crate::geometry::{Point, Size};
use crate::random::SeededRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Bounce animation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceConfig {
    /// Card width in pixels
    pub card_width: f32,
    /// Card height in pixels
    pub card_height: f32,
    /// Horizontal speed, pixels per baseline frame
    pub speed_x: f32,
    /// Vertical speed, pixels per baseline frame
    pub speed_y: f32,
    /// Rotation, degrees per baseline frame
    pub spin: f32,
    /// Cap on the elapsed-time ratio applied in one frame
    pub max_frame_ratio: f32,
    /// Fraction of the viewport (from the top-left) used when re-placing the card
    pub spawn_fraction: f32,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            card_width: 260.0,
            card_height: 180.0,
            speed_x: 2.2,
            speed_y: 1.7,
            spin: 0.6,
            max_frame_ratio: crate::clock::DEFAULT_MAX_FRAME_RATIO,
            spawn_fraction: 0.6,
        }
    }
}

impl BounceConfig {
    /// Card size.
    #[must_use]
    pub const fn card(&self) -> Size {
        Size::new(self.card_width, self.card_height)
    }
}

/// Card position, velocity and rotation inside a viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounce {
    position: Point,
    velocity: Point,
    angle: f32,
    viewport: Size,
    card: Size,
    spin: f32,
    spawn_fraction: f32,
}

impl Bounce {
    /// Place a card at a random spot in the spawn region, heading in a random
    /// diagonal direction.
    pub fn new(config: &BounceConfig, viewport: Size, rng: &mut SeededRng) -> Self {
        let velocity = Point::new(
            config.speed_x.abs() * rng.next_sign(),
            config.speed_y.abs() * rng.next_sign(),
        );
        let mut bounce = Self {
            position: Point::ORIGIN,
            velocity,
            angle: 0.0,
            viewport,
            card: config.card(),
            spin: config.spin,
            spawn_fraction: config.spawn_fraction.clamp(0.0, 1.0),
        };
        bounce.place_randomly(rng);
        bounce
    }

    /// Top-left corner of the card.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Velocity in pixels per baseline frame.
    #[must_use]
    pub const fn velocity(&self) -> Point {
        self.velocity
    }

    /// Rotation in degrees, [0, 360).
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Card size.
    #[must_use]
    pub const fn card(&self) -> Size {
        self.card
    }

    /// Largest position the card's top-left corner may take on each axis.
    #[must_use]
    pub fn bounds(&self) -> Size {
        self.viewport.room_for(&self.card)
    }

    /// Advance one frame by `ratio` baseline frames.
    pub fn step(&mut self, ratio: f32) {
        let ratio = if ratio.is_finite() { ratio.max(0.0) } else { 0.0 };
        let max = self.bounds();
        let mut next = self.position + self.velocity * ratio;

        if next.x <= 0.0 {
            next.x = 0.0;
            self.velocity.x = self.velocity.x.abs();
        } else if next.x >= max.width {
            next.x = max.width;
            self.velocity.x = -self.velocity.x.abs();
        }
        if next.y <= 0.0 {
            next.y = 0.0;
            self.velocity.y = self.velocity.y.abs();
        } else if next.y >= max.height {
            next.y = max.height;
            self.velocity.y = -self.velocity.y.abs();
        }

        self.position = next;
        self.angle = self.spin.mul_add(ratio, self.angle).rem_euclid(360.0);
        trace!(x = next.x, y = next.y, angle = self.angle, "bounce step");
    }

    /// Adopt a new viewport and re-place the card in its spawn region.
    pub fn resize(&mut self, viewport: Size, rng: &mut SeededRng) {
        self.viewport = viewport;
        self.place_randomly(rng);
    }

    /// Adopt the card's rendered size. The card keeps its place but is pulled
    /// back inside the new bounds.
    pub fn set_card(&mut self, card: Size) {
        self.card = card;
        self.position = self.position.clamp_to(self.bounds());
    }

    fn place_randomly(&mut self, rng: &mut SeededRng) {
        let region = self.viewport.scale(self.spawn_fraction);
        let candidate = Point::new(
            rng.next_unit() * region.width.max(0.0),
            rng.next_unit() * region.height.max(0.0),
        );
        self.position = candidate.clamp_to(self.bounds());
    }
}
