use candle_core::Device;
use tracing::{debug, info, warn};

use super::error::ModelError;

/// Requested placement for the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevicePreference {
    /// First compiled GPU backend that initializes, else CPU.
    #[default]
    Auto,
    Cpu,
    Cuda,
    Metal,
}

impl std::str::FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda),
            "metal" | "mps" => Ok(Self::Metal),
            other => Err(format!("unknown device: {other}")),
        }
    }
}

impl std::fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
            Self::Metal => "metal",
        };
        f.write_str(name)
    }
}

/// Resolves a [`DevicePreference`] to a candle device.
///
/// An explicit `Cuda`/`Metal` request fails when that backend is not compiled in or
/// cannot initialize. `Auto` tries the compiled GPU backends and falls back to CPU.
pub fn select_device(preference: DevicePreference) -> Result<Device, ModelError> {
    match preference {
        DevicePreference::Cpu => {
            debug!("CPU device requested");
            Ok(Device::Cpu)
        }
        DevicePreference::Cuda => try_cuda(),
        DevicePreference::Metal => try_metal(),
        DevicePreference::Auto => {
            let mut failures: Vec<String> = Vec::new();

            if cfg!(feature = "metal") {
                match try_metal() {
                    Ok(device) => return Ok(device),
                    Err(e) => failures.push(e.to_string()),
                }
            }

            if cfg!(feature = "cuda") {
                match try_cuda() {
                    Ok(device) => return Ok(device),
                    Err(e) => failures.push(e.to_string()),
                }
            }

            let reason = if !cfg!(any(feature = "metal", feature = "cuda")) {
                "no GPU backend compiled".to_string()
            } else {
                failures.join("; ")
            };

            warn!(reason = %reason, "Falling back to CPU device");
            Ok(Device::Cpu)
        }
    }
}

fn try_cuda() -> Result<Device, ModelError> {
    if !cfg!(feature = "cuda") {
        return Err(ModelError::DeviceUnavailable {
            device: "cuda".to_string(),
            reason: "built without the `cuda` feature".to_string(),
        });
    }

    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Using CUDA GPU acceleration");
            Ok(device)
        }
        Err(e) => {
            warn!(error = %e, "CUDA device unavailable");
            Err(ModelError::DeviceUnavailable {
                device: "cuda".to_string(),
                reason: e.to_string(),
            })
        }
    }
}

fn try_metal() -> Result<Device, ModelError> {
    if !cfg!(feature = "metal") {
        return Err(ModelError::DeviceUnavailable {
            device: "metal".to_string(),
            reason: "built without the `metal` feature".to_string(),
        });
    }

    match Device::new_metal(0) {
        Ok(device) => {
            info!("Using Metal GPU acceleration");
            Ok(device)
        }
        Err(e) => {
            warn!(error = %e, "Metal device unavailable");
            Err(ModelError::DeviceUnavailable {
                device: "metal".to_string(),
                reason: e.to_string(),
            })
        }
    }
}
