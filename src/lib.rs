use std::path::PathBuf;
use thiserror::Error;

/// Fixed catalog of recognized gestures and their filename tokens.
pub mod taxonomy;
pub use taxonomy::{GestureDefinition, GESTURES};

/// Decoding of training and test filenames into gesture definitions.
pub mod resolver;
pub use resolver::{resolve_test_filename, resolve_train_filename};

/// Frame sampling and feature extraction boundaries.
pub mod sampler;
pub use sampler::{FeatureExtractor, FrameSampler};

/// 1-nearest-neighbor classification over cosine similarity,
/// which provides the main functionality of this crate.
pub mod classifier;
pub use classifier::{Classifier, ReferenceEntry};

/// Two-phase (ingest, predict) batch orchestration.
pub mod batch;
pub use batch::{BatchConfig, BatchReport, BatchRunner};

/// Video decoding and a simple frame feature extractor using opencv.
pub mod opencv_utils;
#[cfg(feature = "opencv")]
pub use opencv_utils::*;

/// Integer output label of a gesture.
pub type Label = u32;

/// Label written when no meaningful classification could be produced.
///
/// Also the label returned by [`Classifier::classify`] on an empty reference set.
pub const SENTINEL_LABEL: Label = 0;

/// Flattened numeric feature vector of one frame.
pub type Feature = Vec<f32>;

/// Provides the similarity score between feature vectors.
pub trait Similarity {
    /// Cosine similarity in `[-1, 1]`.
    ///
    /// Degenerate inputs (zero norm, mismatched length, non-finite values) score `-1`,
    /// so they never beat the initial best-so-far state of the classifier.
    fn cosine(&self, other: &Self) -> f32;
}

impl Similarity for [f32] {
    fn cosine(&self, other: &Self) -> f32 {
        if self.len() != other.len() || self.is_empty() {
            return -1.;
        }
        let (dot, na, nb) = self
            .iter()
            .zip(other)
            .fold((0f64, 0f64, 0f64), |(d, a, b), (&x, &y)| {
                let (x, y) = (x as f64, y as f64);
                (d + x * y, a + x * x, b + y * y)
            });
        if na == 0. || nb == 0. {
            return -1.;
        }
        let sim = dot / (na * nb).sqrt();
        if !sim.is_finite() {
            return -1.;
        }
        sim.clamp(-1., 1.) as f32
    }
}

impl Similarity for Feature {
    fn cosine(&self, other: &Self) -> f32 {
        self.as_slice().cosine(other.as_slice())
    }
}

pub type SignResult<T> = std::result::Result<T, SignErr>;
#[derive(Error, Debug)]
pub enum SignErr {
    #[error("Io Error")]
    Io(#[from] std::io::Error),
    #[error("Csv Error")]
    Csv(#[from] csv::Error),
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[cfg(feature = "bincode")]
    #[error("Reference Index Serialization Error")]
    Bincode(#[from] bincode::Error),
    #[cfg(feature = "opencv")]
    #[error("Opencv Error")]
    OpenCvInternal(#[from] opencv::Error),
    #[cfg(feature = "opencv")]
    #[error("Opencv frame decode error")]
    OpenCvDecode,
}
