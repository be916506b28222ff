//! Model loading and batched segmentation inference.

mod provider;
mod segmenter;

pub use provider::describe_device;
pub use segmenter::{Segmenter, binarize_scores};
