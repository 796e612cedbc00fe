//! fish-id Computer Vision Library
//!
//! Runs a detection model over video frames and crops the best detection of
//! every frame into PNG files.

pub mod batch;
pub mod bbox;
pub mod detection;
pub mod error;
pub mod extract;
pub mod utils;
#[cfg(feature = "opencv")]
pub mod video;

// Re-export commonly used types
pub use batch::{BatchStats, run_batch};
pub use bbox::Detection;
pub use detection::{Device, ModelInput, Proposal};
pub use error::SaveError;
pub use extract::{ExtractionStats, FrameExtractor, FrameOutcome};
#[cfg(feature = "opencv")]
pub use detection::YoloModel;
#[cfg(feature = "opencv")]
pub use video::VideoFrames;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;

    /// A detection network mapping a normalized input tensor to raw proposals.
    ///
    /// Implementations are expected to be in inference mode already and to
    /// live on the device they were created for.
    pub trait DetectionModel {
        fn infer(&mut self, input: &ModelInput) -> Result<Vec<Proposal>>;
    }

    impl<M: DetectionModel + ?Sized> DetectionModel for Box<M> {
        fn infer(&mut self, input: &ModelInput) -> Result<Vec<Proposal>> {
            (**self).infer(input)
        }
    }
}
