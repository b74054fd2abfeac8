use candle_core::Device;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

use super::error::ModelError;

/// Selects the inference device from the enabled backend features, falling back to CPU.
pub fn select_device() -> Result<Device, ModelError> {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    {
        let mut failures: Vec<String> = Vec::new();

        #[cfg(feature = "metal")]
        {
            match Device::new_metal(0) {
                Ok(device) => {
                    info!("Running classifiers on Metal");
                    return Ok(device);
                }
                Err(e) => {
                    let msg = e.to_string();
                    warn!(error = %msg, "Metal device unavailable");
                    failures.push(format!("metal failed: {msg}"));
                }
            }
        }

        #[cfg(feature = "cuda")]
        {
            match Device::new_cuda(0) {
                Ok(device) => {
                    info!("Running classifiers on CUDA");
                    return Ok(device);
                }
                Err(e) => {
                    let msg = e.to_string();
                    warn!(error = %msg, "CUDA device unavailable");
                    failures.push(format!("cuda failed: {msg}"));
                }
            }
        }

        warn!(reason = %failures.join("; "), "Falling back to CPU device");
        return Ok(Device::Cpu);
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    {
        debug!("No GPU backend compiled, using CPU");
        Ok(Device::Cpu)
    }
}
