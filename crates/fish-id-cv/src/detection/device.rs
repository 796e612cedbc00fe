//! Compute device selection

use fish_id_core::DevicePreference;
use std::fmt;

/// Where the detection network runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
}

impl Device {
    /// Resolve a preference against the hardware found at startup.
    ///
    /// `Auto` picks CUDA when OpenCV reports a CUDA-enabled device; an
    /// explicit `Cuda` request fails when none is present.
    pub fn select(preference: DevicePreference) -> crate::Result<Self> {
        let cuda_available = cuda_device_count() > 0;

        match preference {
            DevicePreference::Cpu => Ok(Device::Cpu),
            DevicePreference::Auto if cuda_available => Ok(Device::Cuda),
            DevicePreference::Auto => Ok(Device::Cpu),
            DevicePreference::Cuda if cuda_available => Ok(Device::Cuda),
            DevicePreference::Cuda => anyhow::bail!("CUDA was requested but no CUDA device is available"),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda => write!(f, "cuda"),
        }
    }
}

#[cfg(feature = "opencv")]
fn cuda_device_count() -> i32 {
    // Builds without the CUDA module report an error rather than zero.
    opencv::core::get_cuda_enabled_device_count().unwrap_or(0)
}

#[cfg(not(feature = "opencv"))]
fn cuda_device_count() -> i32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_is_always_available() {
        assert_eq!(Device::select(DevicePreference::Cpu).unwrap(), Device::Cpu);
    }

    #[test]
    fn test_auto_resolves() {
        let device = Device::select(DevicePreference::Auto).unwrap();
        assert_eq!(device == Device::Cuda, cuda_device_count() > 0);
    }
}
