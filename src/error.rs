use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("no element with id '{id}' to draw the particle field on")]
    MissingSurface { id: String },

    #[error("element '{id}' is not a <canvas>")]
    NotACanvas { id: String },

    #[error("canvas did not provide a 2d rendering context")]
    ContextUnavailable,

    #[error("no global window")]
    NoWindow,

    #[error("invalid field config: {0}")]
    InvalidConfig(String),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl FieldError {
    pub fn from_js(value: JsValue) -> FieldError {
        if let Some(err) = value.dyn_ref::<js_sys::Error>() {
            return FieldError::Js(String::from(err.message()));
        }
        FieldError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<FieldError> for JsValue {
    fn from(err: FieldError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_surface_names_the_id() {
        let err = FieldError::MissingSurface {
            id: "particleCanvas".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "no element with id 'particleCanvas' to draw the particle field on"
        );
    }
}
