// The drawing target the field renders onto, kept abstract so the simulation
// can be exercised without a browser.

use crate::color::Color;
use crate::error::FieldError;

/// Pixel dimensions of the drawing surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Bounds {
        Bounds { width, height }
    }

    // Window reports innerWidth/innerHeight as JS numbers; anything that isn't
    // at least one whole pixel wide and high can't be drawn on.
    pub fn from_viewport(width: Option<f64>, height: Option<f64>) -> Result<Bounds, FieldError> {
        let usable = |side: f64| side.is_finite() && side >= 1.0;
        match (width, height) {
            (Some(width), Some(height)) if usable(width) && usable(height) => {
                Ok(Bounds::new(width as u32, height as u32))
            }
            _ => Err(FieldError::Js(format!(
                "unusable viewport size {:?} x {:?}",
                width, height
            ))),
        }
    }

    pub fn contains(&self, pos: [f64; 2]) -> bool {
        pos[0] >= 0.0
            && pos[0] <= self.width as f64
            && pos[1] >= 0.0
            && pos[1] <= self.height as f64
    }

    pub fn clamp(&self, pos: [f64; 2]) -> [f64; 2] {
        [
            pos[0].max(0.0).min(self.width as f64),
            pos[1].max(0.0).min(self.height as f64),
        ]
    }
}

pub trait DrawSurface {
    fn bounds(&self) -> Bounds;

    fn clear(&mut self);

    fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: Color, alpha: f64);

    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], color: Color, alpha: f64, width: f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_inside() {
        let bounds = Bounds::new(800, 600);
        assert!(bounds.contains([0.0, 0.0]));
        assert!(bounds.contains([800.0, 600.0]));
        assert!(!bounds.contains([800.1, 10.0]));
        assert!(!bounds.contains([10.0, -0.1]));
    }

    #[test]
    fn viewport_must_be_at_least_one_pixel() {
        assert_eq!(
            Bounds::from_viewport(Some(1280.0), Some(720.5)),
            Ok(Bounds::new(1280, 720))
        );
        assert!(matches!(
            Bounds::from_viewport(None, Some(720.0)),
            Err(FieldError::Js(_))
        ));
        assert!(Bounds::from_viewport(Some(0.0), Some(0.0)).is_err());
        assert!(Bounds::from_viewport(Some(800.0), Some(f64::NAN)).is_err());
        assert!(Bounds::from_viewport(Some(f64::INFINITY), Some(600.0)).is_err());
    }

    #[test]
    fn clamp_pulls_into_bounds() {
        let bounds = Bounds::new(100, 50);
        assert_eq!(bounds.clamp([150.0, -3.0]), [100.0, 0.0]);
        assert_eq!(bounds.clamp([20.0, 30.0]), [20.0, 30.0]);
    }
}
