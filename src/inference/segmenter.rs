//! ONNX segmentation model wrapper.

use crate::config::{InferenceConfig, InferenceDevice};
use crate::constants::{BINARIZE_THRESHOLD, TILE_CHANNELS, TILE_SIZE};
use crate::error::{Error, Result};
use ndarray::{Array2, Array4, Axis, Ix4};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Wrapper around an ort session for batched tile segmentation.
///
/// The session is loaded once per run and shared across worker threads.
/// ort's `run` needs exclusive access, so it sits behind a mutex; all other
/// fields are read-only after construction.
pub struct Segmenter {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl Segmenter {
    /// Load a serialized checkpoint into an inference session.
    pub fn load(
        checkpoint_path: &Path,
        device: InferenceDevice,
        inference: &InferenceConfig,
    ) -> Result<Self> {
        let mut builder = Session::builder()
            .and_then(|b| {
                b.with_optimization_level(GraphOptimizationLevel::Level3)
                    .map_err(Into::into)
            })
            .map_err(|e| Error::ModelLoad {
                path: checkpoint_path.to_path_buf(),
                source: e,
            })?;

        if let Some(intra) = inference.intra_threads {
            builder = builder
                .with_intra_threads(intra)
                .map_err(|e| Error::ModelLoad {
                    path: checkpoint_path.to_path_buf(),
                    source: e.into(),
                })?;
        }
        if let Some(inter) = inference.inter_threads {
            builder = builder
                .with_inter_threads(inter)
                .map_err(|e| Error::ModelLoad {
                    path: checkpoint_path.to_path_buf(),
                    source: e.into(),
                })?;
        }

        let mut builder = super::provider::apply_device(builder, device)?;

        let session = builder
            .commit_from_file(checkpoint_path)
            .map_err(|e| Error::ModelLoad {
                path: checkpoint_path.to_path_buf(),
                source: e,
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| Error::ModelShape {
                reason: "model has no inputs".to_string(),
            })?;
        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| Error::ModelShape {
                reason: "model has no outputs".to_string(),
            })?;

        debug!(
            "Session ready: input '{}', output '{}'",
            input_name, output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// Run batched forward inference.
    ///
    /// Input shape is `(batch, TILE_SIZE, TILE_SIZE, TILE_CHANNELS)`, output
    /// shape `(batch, TILE_SIZE, TILE_SIZE, classes)`.
    pub fn predict_batch(&self, tiles: &Array4<f32>) -> Result<Array4<f32>> {
        let input = TensorRef::from_array_view(tiles.view()).map_err(|e| Error::Inference {
            reason: format!("failed to build input tensor: {e}"),
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input];

        let mut session = self.session.lock().map_err(|_| Error::Inference {
            reason: "session lock poisoned".to_string(),
        })?;
        let outputs = session.run(inputs).map_err(|e| Error::Inference {
            reason: e.to_string(),
        })?;

        let scores = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| Error::Inference {
                reason: format!("failed to extract output tensor: {e}"),
            })?;

        let scores = scores
            .into_dimensionality::<Ix4>()
            .map_err(|e| Error::Inference {
                reason: format!("expected a 4-D score tensor: {e}"),
            })?
            .to_owned();

        let expected = (tiles.shape()[0], TILE_SIZE as usize, TILE_SIZE as usize);
        let got = (scores.shape()[0], scores.shape()[1], scores.shape()[2]);
        if got != expected {
            return Err(Error::Inference {
                reason: format!(
                    "score tensor shape {:?} does not match batch geometry {expected:?}",
                    scores.shape()
                ),
            });
        }

        Ok(scores)
    }

    /// Log the model geometry once after loading.
    pub fn log_summary(&self, device_name: &str) {
        info!(
            "Loaded model: input '{}', output '{}', tile {}x{}x{}, device: {}",
            self.input_name, self.output_name, TILE_SIZE, TILE_SIZE, TILE_CHANNELS, device_name
        );
    }
}

/// Reduce per-class scores to binary masks.
///
/// Arg-max over the class axis, then a float threshold on the resulting
/// class *index*: index 0 stays background, every other index becomes
/// foreground. Downstream consumers of the masks depend on exactly this
/// mapping, so it must not change.
pub fn binarize_scores(scores: &Array4<f32>) -> Vec<Array2<u8>> {
    let mut masks = Vec::with_capacity(scores.shape()[0]);

    for tile_scores in scores.axis_iter(Axis(0)) {
        let (height, width, _) = tile_scores.dim();
        let mut mask = Array2::<u8>::zeros((height, width));

        for row in 0..height {
            for col in 0..width {
                let mut best_class = 0usize;
                let mut best_score = f32::NEG_INFINITY;
                for (class, &score) in tile_scores
                    .index_axis(Axis(0), row)
                    .index_axis(Axis(0), col)
                    .iter()
                    .enumerate()
                {
                    if score > best_score {
                        best_class = class;
                        best_score = score;
                    }
                }
                #[allow(clippy::cast_precision_loss)]
                if best_class as f32 > BINARIZE_THRESHOLD {
                    mask[[row, col]] = 1;
                }
            }
        }

        masks.push(mask);
    }

    masks
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_binarize_two_class() {
        // 1x2x2x2: one pixel favors class 1, the rest class 0.
        let mut scores = Array4::<f32>::zeros((1, 2, 2, 2));
        scores[[0, 0, 0, 0]] = 0.2;
        scores[[0, 0, 0, 1]] = 0.8;
        scores[[0, 0, 1, 0]] = 0.9;
        scores[[0, 0, 1, 1]] = 0.1;
        scores[[0, 1, 0, 0]] = 0.6;
        scores[[0, 1, 0, 1]] = 0.4;
        scores[[0, 1, 1, 0]] = 0.55;
        scores[[0, 1, 1, 1]] = 0.45;

        let masks = binarize_scores(&scores);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0][[0, 0]], 1);
        assert_eq!(masks[0][[0, 1]], 0);
        assert_eq!(masks[0][[1, 0]], 0);
        assert_eq!(masks[0][[1, 1]], 0);
    }

    #[test]
    fn test_binarize_index_threshold_quirk() {
        // With more than two classes, ANY winning index >= 1 maps to
        // foreground: the threshold is applied to the class index, not a
        // probability.
        let mut scores = Array4::<f32>::zeros((1, 1, 3, 3));
        // pixel 0: class 0 wins -> background
        scores[[0, 0, 0, 0]] = 0.9;
        // pixel 1: class 1 wins -> foreground
        scores[[0, 0, 1, 1]] = 0.9;
        // pixel 2: class 2 wins -> foreground, even though "> 0.5" looks
        // like a probability test
        scores[[0, 0, 2, 2]] = 0.9;

        let masks = binarize_scores(&scores);
        assert_eq!(masks[0][[0, 0]], 0);
        assert_eq!(masks[0][[0, 1]], 1);
        assert_eq!(masks[0][[0, 2]], 1);
    }

    #[test]
    fn test_binarize_deterministic() {
        let mut scores = Array4::<f32>::zeros((2, 4, 4, 2));
        for i in 0..2 {
            for r in 0..4 {
                for c in 0..4 {
                    scores[[i, r, c, (r + c) % 2]] = 1.0;
                }
            }
        }
        let first = binarize_scores(&scores);
        let second = binarize_scores(&scores);
        assert_eq!(first, second);
    }
}
