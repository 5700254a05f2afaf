use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::*;

use crate::models::FEATURE_NAMES;

/// A trained sales regressor, shared read-only between workers.
pub trait SalesModel: Send + Sync {
    fn predict(&self, features: &[f64; 3]) -> anyhow::Result<f64>;

    fn kind(&self) -> &'static str;
}

/// ONNX regression graph, e.g. a scikit-learn `LinearRegression` exported with skl2onnx.
pub struct OnnxModel {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>,
}

impl OnnxModel {
    pub fn load<P: AsRef<Path>>(model_path: P) -> TractResult<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3)))?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { model })
    }
}

impl SalesModel for OnnxModel {
    fn predict(&self, features: &[f64; 3]) -> anyhow::Result<f64> {
        if let Some(v) = features.iter().find(|v| v.abs() > f64::from(f32::MAX)) {
            bail!("budget value {v} is outside the model's f32 input range");
        }
        let input: [f32; 3] = features.map(|v| v as f32);
        let input_tensor = Tensor::from_shape(&[1, 3], &input)?;
        let outputs = self.model.run(tvec!(input_tensor.into()))?;

        let value: f32 = *outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?
            .to_array_view::<f32>()?
            .iter()
            .next()
            .ok_or_else(|| anyhow!("model output is empty"))?;

        Ok(f64::from(value))
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

/// Plain linear coefficients stored as JSON:
/// `{"coefficients": [tv, radio, newspaper], "intercept": b}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: [f64; 3],
    pub intercept: f64,
}

impl LinearModel {
    pub fn load<P: AsRef<Path>>(model_path: P) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(model_path.as_ref())?;
        let model: LinearModel = serde_json::from_str(&raw)?;

        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            bail!("linear model parameters must be finite");
        }
        Ok(model)
    }
}

impl SalesModel for LinearModel {
    fn predict(&self, features: &[f64; 3]) -> anyhow::Result<f64> {
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (coef, x)| acc + coef * x))
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

pub fn load_model(path: &Path) -> anyhow::Result<Arc<dyn SalesModel>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let model: Arc<dyn SalesModel> = match extension.as_deref() {
        Some("onnx") => Arc::new(
            OnnxModel::load(path)
                .with_context(|| format!("failed to load ONNX model {}", path.display()))?,
        ),
        Some("json") => Arc::new(
            LinearModel::load(path)
                .with_context(|| format!("failed to load linear model {}", path.display()))?,
        ),
        _ => bail!(
            "unsupported model format {} (expected .onnx or .json)",
            path.display()
        ),
    };

    Ok(model)
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub loaded: bool,
    pub kind: Option<&'static str>,
    pub path: PathBuf,
    pub input_shape: [usize; 2],
    pub features: [&'static str; 3],
}

impl ModelInfo {
    pub fn new(model: Option<&dyn SalesModel>, path: &Path) -> Self {
        ModelInfo {
            loaded: model.is_some(),
            kind: model.map(|m| m.kind()),
            path: path.to_path_buf(),
            input_shape: [1, FEATURE_NAMES.len()],
            features: FEATURE_NAMES,
        }
    }
}
