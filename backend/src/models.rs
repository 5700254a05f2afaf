use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PredictError;

/// Feature order expected by the trained model. Changing it requires retraining.
pub const FEATURE_NAMES: [&str; 3] = ["TV", "Radio", "Newspaper"];

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct AdBudget {
    #[serde(rename = "TV")]
    pub tv: f64,
    #[serde(rename = "Radio")]
    pub radio: f64,
    #[serde(rename = "Newspaper")]
    pub newspaper: f64,
}

impl AdBudget {
    pub fn from_json(body: &Value) -> Result<Self, PredictError> {
        let object = body.as_object().ok_or(PredictError::NotAnObject)?;

        let budget = AdBudget {
            tv: extract_budget(object, "TV")?,
            radio: extract_budget(object, "Radio")?,
            newspaper: extract_budget(object, "Newspaper")?,
        };
        budget.validate()?;

        Ok(budget)
    }

    pub fn validate(&self) -> Result<(), PredictError> {
        if self.to_array().iter().any(|value| *value < 0.0) {
            return Err(PredictError::NegativeBudget);
        }
        Ok(())
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.tv, self.radio, self.newspaper]
    }
}

/// Accepts a JSON number or a numeric string; anything else is rejected.
fn extract_budget(object: &Map<String, Value>, field: &'static str) -> Result<f64, PredictError> {
    let value = object.get(field).ok_or(PredictError::MissingField(field))?;

    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(PredictError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

pub fn round_cents(value: f64) -> f64 {
    // Past 1e15 there are no cents left to round and scaling could overflow.
    if value.abs() >= 1e15 {
        return value;
    }
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Serialize, Clone)]
pub struct PredictionResponse {
    pub prediction: f64,
    pub success: bool,
    pub inputs: AdBudget,
}

impl PredictionResponse {
    pub fn new(raw_prediction: f64, inputs: AdBudget) -> Self {
        PredictionResponse {
            prediction: round_cents(raw_prediction),
            success: true,
            inputs,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            error: message.into(),
            success: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: &'static str,
}

impl StatusMessage {
    pub fn running() -> Self {
        StatusMessage {
            message: "Sales prediction API backend is running!",
        }
    }
}
