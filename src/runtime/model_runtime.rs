use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{Result, ServiceError};
use crate::network::{InputType, Network};
use crate::preprocess::NormalizedTensor;
use crate::runtime::predictor::Predictor;

/// Top class of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: String,
    pub confidence: f32,
}

/// Owns the model artifact for the lifetime of the process.
///
/// Starts unloaded. A successful [`load`](ModelRuntime::load) is permanent;
/// a failed one records its message and leaves the runtime unloaded so the
/// rest of the service keeps running.
pub struct ModelRuntime {
    class_names: Vec<String>,
    artifact: Option<Box<dyn Predictor>>,
    input_edge: Option<u32>,
    load_error: Option<String>,
}

impl ModelRuntime {
    pub fn new(class_names: Vec<String>) -> ModelRuntime {
        ModelRuntime { class_names, artifact: None, input_edge: None, load_error: None }
    }

    /// A runtime that is already loaded with `predictor`.
    pub fn with_predictor(class_names: Vec<String>, predictor: impl Predictor + 'static) -> ModelRuntime {
        let mut runtime = ModelRuntime::new(class_names);
        runtime.install(Box::new(predictor));
        runtime
    }

    /// Loads a network artifact from `path`. No-op once loaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }
        let path = path.as_ref();
        match load_network(path) {
            Ok(network) => {
                self.warn_on_trained_labels(&network);
                self.input_edge = declared_edge(&network);
                info!(path = %path.display(), layers = network.layers.len(), "model loaded");
                self.install(Box::new(network));
                Ok(())
            }
            Err(err) => {
                self.load_error = Some(err.message().to_owned());
                Err(err)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.artifact.is_some()
    }

    /// Message of the last failed load, if any.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Square input edge declared in the artifact's metadata, if any.
    pub fn input_edge(&self) -> Option<u32> {
        self.input_edge
    }

    /// True when the predictor reports an output width that differs from the
    /// number of configured class names.
    pub fn output_width_mismatch(&self) -> bool {
        let outputs = self.artifact.as_ref().and_then(|p| p.output_size());
        outputs.is_some_and(|n| n != self.class_names.len())
    }

    /// Runs the artifact once on `tensor` and picks the top class.
    ///
    /// An index past the configured class names yields `Class-<index>`.
    pub fn predict(&self, tensor: &NormalizedTensor) -> Result<PredictionResult> {
        let predictor = self.artifact.as_ref().ok_or_else(|| {
            ServiceError::Inference("Model is not loaded. Please check server startup logs.".into())
        })?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| predictor.predict(tensor)));
        let rows = match outcome {
            Ok(Ok(rows)) => rows,
            Ok(Err(err)) => {
                error!(error = %err, "prediction failed");
                return Err(inference_failed());
            }
            Err(_) => {
                error!("prediction panicked");
                return Err(inference_failed());
            }
        };

        let vector = rows.into_iter().next().unwrap_or_default();
        let (index, confidence) = argmax(&vector).ok_or_else(|| {
            error!("prediction returned an empty probability vector");
            inference_failed()
        })?;
        if !confidence.is_finite() {
            error!(index, "prediction returned a non-finite confidence");
            return Err(inference_failed());
        }

        let label = self
            .class_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Class-{index}"));
        Ok(PredictionResult { label, confidence })
    }

    // Out-of-range indices fall back to `Class-<index>`, which can hide a
    // model paired with the wrong class list.
    fn install(&mut self, predictor: Box<dyn Predictor>) {
        self.artifact = Some(predictor);
        self.load_error = None;
        if self.output_width_mismatch() {
            warn!(
                outputs = ?self.artifact.as_ref().and_then(|p| p.output_size()),
                class_names = self.class_names.len(),
                "model output width differs from configured class names"
            );
        }
    }

    fn warn_on_trained_labels(&self, network: &Network) {
        let trained = network.metadata.as_ref().and_then(|m| m.output_labels.as_ref());
        if let Some(labels) = trained {
            if labels != &self.class_names {
                warn!(?labels, configured = ?self.class_names, "model was trained with different labels");
            }
        }
    }
}

/// Index and value of the maximum; ties resolve to the lowest index.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let (&first, rest) = values.split_first()?;
    let mut best = (0, first);
    for (i, &v) in rest.iter().enumerate() {
        if v > best.1 {
            best = (i + 1, v);
        }
    }
    Some(best)
}

fn load_network(path: &Path) -> Result<Network> {
    if !path.exists() {
        let message = format!(
            "Model path does not exist: {}. Set MODEL_PATH correctly.",
            path.display()
        );
        error!(path = %path.display(), "model artifact missing");
        return Err(ServiceError::ModelLoad(message));
    }
    let network = Network::load_json(path)
        .and_then(|n| n.validate().map(|_| n))
        .map_err(|e| {
            error!(path = %path.display(), error = %e, "model artifact unusable");
            ServiceError::ModelLoad("Failed to load model artifact.".into())
        })?;
    Ok(network)
}

fn declared_edge(network: &Network) -> Option<u32> {
    match network.metadata.as_ref()?.input_type.as_ref()? {
        InputType::ImageRgb { width, height } if width == height => Some(*width),
        InputType::ImageRgb { width, height } => {
            warn!(width, height, "model declares a non-square input; images are resized square");
            None
        }
    }
}

fn inference_failed() -> ServiceError {
    ServiceError::Inference("Failed during AI inference.".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ModelMetadata;
    use crate::runtime::predictor::PredictorError;

    struct Fixed(Vec<f32>);

    impl Predictor for Fixed {
        fn predict(&self, _: &NormalizedTensor) -> std::result::Result<Vec<Vec<f32>>, PredictorError> {
            Ok(vec![self.0.clone()])
        }
    }

    struct Sized3(Vec<f32>);

    impl Predictor for Sized3 {
        fn predict(&self, _: &NormalizedTensor) -> std::result::Result<Vec<Vec<f32>>, PredictorError> {
            Ok(vec![self.0.clone()])
        }

        fn output_size(&self) -> Option<usize> {
            Some(3)
        }
    }

    struct Panicking;

    impl Predictor for Panicking {
        fn predict(&self, _: &NormalizedTensor) -> std::result::Result<Vec<Vec<f32>>, PredictorError> {
            panic!("kernel blew up")
        }
    }

    struct Failing;

    impl Predictor for Failing {
        fn predict(&self, _: &NormalizedTensor) -> std::result::Result<Vec<Vec<f32>>, PredictorError> {
            Err("shape mismatch".into())
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn tensor() -> NormalizedTensor {
        NormalizedTensor::from_raw(1, vec![0.1, 0.2, 0.3]).unwrap()
    }

    #[test]
    fn predict_before_load_is_inference_error() {
        let runtime = ModelRuntime::new(names(&["A"]));
        assert!(!runtime.is_loaded());
        assert!(matches!(runtime.predict(&tensor()), Err(ServiceError::Inference(_))));
    }

    #[test]
    fn picks_maximum() {
        let runtime = ModelRuntime::with_predictor(names(&["A", "B", "C"]), Fixed(vec![0.1, 0.9, 0.0]));
        let result = runtime.predict(&tensor()).unwrap();
        assert_eq!(result, PredictionResult { label: "B".into(), confidence: 0.9 });
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some((1, 0.4)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn index_past_class_names_gets_placeholder() {
        let runtime = ModelRuntime::with_predictor(names(&["A", "B"]), Fixed(vec![0.1, 0.2, 0.05, 0.65]));
        let result = runtime.predict(&tensor()).unwrap();
        assert_eq!(result.label, "Class-3");
        assert_eq!(result.confidence, 0.65);
    }

    #[test]
    fn predictor_error_becomes_inference_error() {
        let runtime = ModelRuntime::with_predictor(names(&["A"]), Failing);
        let err = runtime.predict(&tensor()).unwrap_err();
        assert_eq!(err, ServiceError::Inference("Failed during AI inference.".into()));
    }

    #[test]
    fn predictor_panic_becomes_inference_error() {
        let runtime = ModelRuntime::with_predictor(names(&["A"]), Panicking);
        assert!(matches!(runtime.predict(&tensor()), Err(ServiceError::Inference(_))));
    }

    #[test]
    fn empty_output_is_inference_error() {
        let runtime = ModelRuntime::with_predictor(names(&["A"]), Fixed(vec![]));
        assert!(matches!(runtime.predict(&tensor()), Err(ServiceError::Inference(_))));
    }

    #[test]
    fn missing_path_records_load_error() {
        let mut runtime = ModelRuntime::new(names(&["A"]));
        let err = runtime.load("/nonexistent/model.json").unwrap_err();
        assert_eq!(err.code(), "MODEL_LOADING_FAILED");
        assert!(!runtime.is_loaded());
        assert_eq!(
            runtime.load_error(),
            Some("Model path does not exist: /nonexistent/model.json. Set MODEL_PATH correctly.")
        );
    }

    #[test]
    fn malformed_artifact_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{\"layers\": 12}").unwrap();
        let mut runtime = ModelRuntime::new(names(&["A"]));
        let err = runtime.load(&path).unwrap_err();
        assert_eq!(err, ServiceError::ModelLoad("Failed to load model artifact.".into()));
        assert_eq!(runtime.load_error(), Some("Failed to load model artifact."));
    }

    #[test]
    fn load_is_a_no_op_once_loaded() {
        let mut runtime = ModelRuntime::with_predictor(names(&["A", "B", "C"]), Fixed(vec![0.1, 0.9, 0.0]));
        assert!(runtime.load("/nonexistent/model.json").is_ok());
        assert_eq!(runtime.predict(&tensor()).unwrap().label, "B");
        assert_eq!(runtime.load_error(), None);
    }

    #[test]
    fn injected_predictor_width_is_checked() {
        let matched = ModelRuntime::with_predictor(names(&["A", "B", "C"]), Sized3(vec![0.2, 0.3, 0.5]));
        assert!(!matched.output_width_mismatch());

        let short = ModelRuntime::with_predictor(names(&["A", "B"]), Sized3(vec![0.2, 0.3, 0.5]));
        assert!(short.output_width_mismatch());
        assert_eq!(short.predict(&tensor()).unwrap().label, "Class-2");
    }

    #[test]
    fn unknown_output_width_is_not_a_mismatch() {
        let runtime = ModelRuntime::with_predictor(names(&["A"]), Fixed(vec![0.2, 0.8]));
        assert!(!runtime.output_width_mismatch());
    }

    #[test]
    fn load_records_declared_input_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("declared.json");
        Network::new(vec![(2, 12, crate::activation::ActivationFunction::Softmax)])
            .with_metadata(ModelMetadata {
                description: None,
                input_type: Some(InputType::ImageRgb { width: 2, height: 2 }),
                output_labels: None,
            })
            .save_json(&path)
            .unwrap();

        let mut runtime = ModelRuntime::new(names(&["A", "B"]));
        assert_eq!(runtime.input_edge(), None);
        runtime.load(&path).unwrap();
        assert_eq!(runtime.input_edge(), Some(2));
        assert!(!runtime.output_width_mismatch());
    }
}
