#![cfg(feature = "opencv")]
use crate::sampler::middle_index;
use crate::{Feature, FeatureExtractor, FrameSampler, SignErr, SignResult};
use opencv::{self, core::Size, prelude::*, videoio};
use std::path::Path;

type CvImage = opencv::prelude::Mat;
type CvMat = opencv::core::Mat;

/// Opens a video with opencv and decodes its middle frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct CvFrameSampler;

impl CvFrameSampler {
    fn read_middle_frame(path: &Path) -> SignResult<Option<CvImage>> {
        let path = match path.to_str() {
            Some(p) => p,
            None => return Ok(None),
        };
        // The capture is released when dropped, on every return path.
        let mut cap = videoio::VideoCapture::from_file(path, videoio::CAP_ANY)?;
        if !cap.is_opened()? {
            return Ok(None);
        }

        let total = cap.get(videoio::CAP_PROP_FRAME_COUNT)? as i64;
        let middle = middle_index(total);
        cap.set(videoio::CAP_PROP_POS_FRAMES, middle as f64)?;

        let mut frame = CvMat::default()?;
        if !cap.read(&mut frame)? || frame.empty()? {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}

impl FrameSampler for CvFrameSampler {
    type Frame = CvImage;

    fn sample(&self, path: &Path) -> Option<CvImage> {
        match Self::read_middle_frame(path) {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Decoding {:?} failed: {}", path, e);
                None
            }
        }
    }
}

/// Grayscale thumbnail of a frame, flattened row-major to values in `[0, 1]`.
///
/// A deterministic stand-in for a learned hand-shape model: frames are compared by
/// their downscaled appearance.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailExtractor {
    size: i32,
}

impl ThumbnailExtractor {
    pub fn new(size: u16) -> Self {
        Self {
            size: size.max(1) as i32,
        }
    }

    /// Feature length produced by this extractor.
    pub fn feature_len(&self) -> usize {
        (self.size * self.size) as usize
    }

    fn thumbnail(&self, frame: &CvImage) -> SignResult<Feature> {
        let mut gray = CvMat::default()?;
        if frame.channels()? == 1 {
            frame.copy_to(&mut gray)?;
        } else {
            opencv::imgproc::cvt_color(frame, &mut gray, opencv::imgproc::COLOR_BGR2GRAY, 0)?;
        }

        let mut small = CvMat::default()?;
        opencv::imgproc::resize(
            &gray,
            &mut small,
            Size::new(self.size, self.size),
            0.,
            0.,
            opencv::imgproc::INTER_AREA,
        )?;

        // Copy data from CvMat into feature buffer
        let mut feature: Feature = Vec::with_capacity(self.feature_len());
        for i in 0..self.size {
            for j in 0..self.size {
                let px = small.at_2d::<u8>(i, j).map_err(|_| SignErr::OpenCvDecode)?;
                feature.push(*px as f32 / 255.);
            }
        }
        Ok(feature)
    }
}

impl Default for ThumbnailExtractor {
    fn default() -> Self {
        Self::new(32)
    }
}

impl FeatureExtractor for ThumbnailExtractor {
    type Frame = CvImage;

    fn extract_feature(&mut self, frame: &CvImage) -> Option<Feature> {
        match self.thumbnail(frame) {
            Ok(f) => Some(f),
            Err(e) => {
                log::debug!("Thumbnail extraction failed: {}", e);
                None
            }
        }
    }
}
