// Tunables for the particle field. Defaults reproduce the portfolio background.

use crate::color::Color;
use crate::error::FieldError;

/// What happens to particles left outside the bounds when the surface shrinks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Leave them be; they turn around at their next boundary check.
    Reflect,
    /// Pull every position back inside the new bounds immediately.
    Clamp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub particle_count: u32,
    /// Each velocity component is drawn from `[-max_speed, max_speed)` px/frame.
    pub max_speed: f64,
    pub radius_range: (f64, f64),
    pub opacity_range: (f64, f64),
    /// A particle takes one of these with a fair coin flip.
    pub hues: [Color; 2],
    pub link_distance: f64,
    pub link_alpha: f64,
    pub link_width: f64,
    pub link_color: Color,
    pub resize_policy: ResizePolicy,
    /// Wrap each frame in a console timer.
    pub profile: bool,
}

impl FieldConfig {
    pub const DEFAULT_PARTICLE_COUNT: u32 = 100;

    pub fn with_particle_count(mut self, particle_count: u32) -> Self {
        self.particle_count = particle_count;
        self
    }

    pub fn with_resize_policy(mut self, resize_policy: ResizePolicy) -> Self {
        self.resize_policy = resize_policy;
        self
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        check_range("radius_range", self.radius_range)?;
        check_range("opacity_range", self.opacity_range)?;
        if self.radius_range.0 <= 0.0 {
            return Err(FieldError::InvalidConfig(
                "radius_range must start above zero".to_owned(),
            ));
        }
        if self.opacity_range.0 <= 0.0 || self.opacity_range.1 > 1.0 {
            return Err(FieldError::InvalidConfig(
                "opacity_range must lie within (0, 1]".to_owned(),
            ));
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "max_speed must be finite and non-negative, got {}",
                self.max_speed
            )));
        }
        if !self.link_distance.is_finite() || self.link_distance <= 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "link_distance must be positive, got {}",
                self.link_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.link_alpha) {
            return Err(FieldError::InvalidConfig(format!(
                "link_alpha must lie within [0, 1], got {}",
                self.link_alpha
            )));
        }
        if !self.link_width.is_finite() || self.link_width <= 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "link_width must be positive, got {}",
                self.link_width
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, (low, high): (f64, f64)) -> Result<(), FieldError> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(FieldError::InvalidConfig(format!(
            "{} must be a finite ascending range, got [{}, {})",
            name, low, high
        )));
    }
    Ok(())
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: FieldConfig::DEFAULT_PARTICLE_COUNT,
            max_speed: 0.5,
            radius_range: (0.5, 2.5),
            opacity_range: (0.1, 0.6),
            hues: [Color::CYAN, Color::VIOLET],
            link_distance: 150.0,
            link_alpha: 0.2,
            link_width: 1.0,
            link_color: Color::CYAN,
            resize_policy: ResizePolicy::Reflect,
            profile: false,
        }
    }
}
