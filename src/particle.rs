// Simple particle struct to keep track of individual position, velocity, size,
// color and opacity. Only position and velocity change after creation.

use crate::color::Color;
use crate::config::FieldConfig;
use crate::surface::Bounds;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    radius: f64,
    color: Color,
    opacity: f64,
}

impl Particle {
    pub fn new(pos: [f64; 2], vel: [f64; 2], radius: f64, color: Color, opacity: f64) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            color,
            opacity,
        }
    }

    pub fn random<R: Rng>(rng: &mut R, bounds: Bounds, config: &FieldConfig) -> Particle {
        let pos_x = rng.gen::<f64>() * bounds.width as f64;
        let pos_y = rng.gen::<f64>() * bounds.height as f64;
        let radius = sample(rng, config.radius_range);
        let vel_x = sample(rng, (-config.max_speed, config.max_speed));
        let vel_y = sample(rng, (-config.max_speed, config.max_speed));
        let color = if rng.gen_bool(0.5) {
            config.hues[0]
        } else {
            config.hues[1]
        };
        let opacity = sample(rng, config.opacity_range);
        Particle::new([pos_x, pos_y], [vel_x, vel_y], radius, color, opacity)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    // Advances one frame, then flips each velocity component whose axis ended
    // up outside the bounds. The check runs on the moved position, so the
    // particle may sit up to one step past an edge until the next frame.
    pub fn step(&mut self, bounds: Bounds) {
        self.pos[0] += self.vel[0];
        self.pos[1] += self.vel[1];
        if self.pos[0] < 0.0 || self.pos[0] > bounds.width as f64 {
            self.vel[0] = -self.vel[0];
        }
        if self.pos[1] < 0.0 || self.pos[1] > bounds.height as f64 {
            self.vel[1] = -self.vel[1];
        }
    }
}

// Uniform in [low, high), tolerating an empty range
fn sample<R: Rng>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    low + rng.gen::<f64>() * (high - low)
}
