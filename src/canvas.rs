// DrawSurface backed by a <canvas> element and its 2d context

use crate::color::Color;
use crate::error::FieldError;
use crate::surface::{Bounds, DrawSurface};
use std::f64::consts::PI;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn find(document: &Document, id: &str) -> Result<CanvasSurface, FieldError> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| FieldError::MissingSurface { id: id.to_owned() })?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FieldError::NotACanvas { id: id.to_owned() })?;
        CanvasSurface::new(canvas)
    }

    pub fn new(canvas: HtmlCanvasElement) -> Result<CanvasSurface, FieldError> {
        let context = canvas
            .get_context("2d")
            .map_err(FieldError::from_js)?
            .ok_or(FieldError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FieldError::ContextUnavailable)?;
        Ok(CanvasSurface { canvas, context })
    }

    // Assigning a canvas dimension wipes it, so only touch the ones that changed
    pub fn fit_to(&self, bounds: Bounds) {
        if self.canvas.width() != bounds.width {
            self.canvas.set_width(bounds.width);
        }
        if self.canvas.height() != bounds.height {
            self.canvas.set_height(bounds.height);
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        self.context.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: Color, alpha: f64) {
        self.context.set_fill_style(&JsValue::from_str(&color.to_css_hex()));
        self.context.set_global_alpha(alpha);
        self.context.begin_path();
        // Only fails on a negative radius, which the config rules out
        self.context.arc(center[0], center[1], radius, 0.0, 2.0 * PI).ok();
        self.context.fill();
    }

    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], color: Color, alpha: f64, width: f64) {
        self.context.set_stroke_style(&JsValue::from_str(&color.to_css_hex()));
        self.context.set_global_alpha(alpha);
        self.context.set_line_width(width);
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.stroke();
    }
}

/// Current `innerWidth` x `innerHeight` of the window.
pub fn viewport_bounds(window: &Window) -> Result<Bounds, FieldError> {
    let width = window.inner_width().map_err(FieldError::from_js)?;
    let height = window.inner_height().map_err(FieldError::from_js)?;
    Bounds::from_viewport(width.as_f64(), height.as_f64())
}
