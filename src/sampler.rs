use std::path::Path;

use crate::Feature;

/// Index of the representative frame in a video of `total` frames.
pub fn middle_index(total: i64) -> i64 {
    (total / 2).max(0)
}

/// Deterministically selects and decodes one representative frame of a video.
pub trait FrameSampler {
    type Frame;

    /// Decode the middle frame of the video at `path`.
    ///
    /// `None` when the video cannot be opened, has no readable frames, or decoding
    /// at the target index fails. Any decoding handle is released before returning.
    fn sample(&self, path: &Path) -> Option<Self::Frame>;
}

/// Black-box mapping from a decoded frame to a fixed-length feature vector.
pub trait FeatureExtractor {
    type Frame;

    fn extract_feature(&mut self, frame: &Self::Frame) -> Option<Feature>;
}

/// Sample a video and extract the feature of its representative frame.
pub fn video_feature<S, E>(sampler: &S, extractor: &mut E, path: &Path) -> Option<Feature>
where
    S: FrameSampler,
    E: FeatureExtractor<Frame = S::Frame>,
{
    let frame = match sampler.sample(path) {
        Some(f) => f,
        None => {
            log::debug!("No frame decoded from {:?}", path);
            return None;
        }
    };
    let feature = extractor.extract_feature(&frame);
    if feature.is_none() {
        log::debug!("Feature extraction failed for {:?}", path);
    }
    feature
}
