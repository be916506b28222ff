//! Execution provider selection.

use crate::config::InferenceDevice;
use crate::error::Result;
use ort::session::builder::SessionBuilder;
use tracing::info;

/// Apply the requested inference device to a session builder.
///
/// CUDA is only compiled in with the `cuda` cargo feature; without it,
/// `Auto` silently uses the CPU and `Gpu` warns before falling back.
pub fn apply_device(builder: SessionBuilder, device: InferenceDevice) -> Result<SessionBuilder> {
    match device {
        InferenceDevice::Cpu => {
            info!("Requested device: CPU");
            Ok(builder)
        }
        InferenceDevice::Auto => {
            #[cfg(feature = "cuda")]
            {
                info!("Auto mode: CUDA available, attempting GPU");
                register_cuda(builder)
            }
            #[cfg(not(feature = "cuda"))]
            {
                info!("Auto mode: no GPU providers compiled in, using CPU");
                Ok(builder)
            }
        }
        InferenceDevice::Gpu => {
            #[cfg(feature = "cuda")]
            {
                info!("Requested device: CUDA");
                register_cuda(builder)
            }
            #[cfg(not(feature = "cuda"))]
            {
                tracing::warn!("--gpu requested but this build has no GPU providers, using CPU");
                Ok(builder)
            }
        }
    }
}

#[cfg(feature = "cuda")]
fn register_cuda(builder: SessionBuilder) -> Result<SessionBuilder> {
    use ort::execution_providers::CUDAExecutionProvider;

    builder
        .with_execution_providers(vec![CUDAExecutionProvider::default().build()])
        .map_err(|e| crate::error::Error::RuntimeInitialization {
            reason: e.to_string(),
        })
}

/// Human-readable device name for the startup log line.
pub fn describe_device(device: InferenceDevice) -> &'static str {
    match device {
        InferenceDevice::Cpu => "CPU",
        InferenceDevice::Auto => {
            if cfg!(feature = "cuda") {
                "Auto (CUDA)"
            } else {
                "Auto (CPU)"
            }
        }
        InferenceDevice::Gpu => {
            if cfg!(feature = "cuda") {
                "CUDA"
            } else {
                "GPU (fallback to CPU)"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_device_cpu() {
        assert_eq!(describe_device(InferenceDevice::Cpu), "CPU");
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn test_describe_device_without_cuda() {
        assert_eq!(describe_device(InferenceDevice::Auto), "Auto (CPU)");
        assert_eq!(describe_device(InferenceDevice::Gpu), "GPU (fallback to CPU)");
    }
}
