use std::path::{Path, PathBuf};

use crate::sampler::video_feature;
use crate::*;

/// Input and output locations of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub train_dir: PathBuf,
    pub test_dir: PathBuf,
    pub output: PathBuf,
    /// Recognized video extensions, without the dot. Matched case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            train_dir: PathBuf::from("traindata"),
            test_dir: PathBuf::from("test"),
            output: PathBuf::from("Results.csv"),
            extensions: vec!["mp4".to_string()],
        }
    }
}

/// Video files directly inside `dir`, sorted by file name.
pub fn list_videos<P: AsRef<Path>>(dir: P, extensions: &[String]) -> SignResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SignErr::NotADirectory(dir.to_path_buf()));
    }
    let mut videos: Vec<PathBuf> = Vec::new();
    for entry in dir.read_dir()? {
        let path = entry?.path();
        if path.is_file() && has_video_extension(&path, extensions) {
            videos.push(path);
        }
    }
    videos.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(videos)
}

fn has_video_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Prediction for one test video.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub file_name: String,
    pub label: Label,
    /// Ground truth decoded from the test filename, if it follows the naming convention.
    pub expected: Option<Label>,
}

/// Predictions of a run, in sorted test-file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    records: Vec<PredictionRecord>,
}

impl BatchReport {
    pub fn predictions(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.label).collect()
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    /// Fraction of test files with a decodable filename whose prediction matches it.
    pub fn accuracy(&self) -> Option<f64> {
        let scored: Vec<&PredictionRecord> =
            self.records.iter().filter(|r| r.expected.is_some()).collect();
        if scored.is_empty() {
            return None;
        }
        let hits = scored
            .iter()
            .filter(|r| r.expected == Some(r.label))
            .count();
        Some(hits as f64 / scored.len() as f64)
    }

    /// Write one prediction per line. No header, no filename column.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> SignResult<()> {
        write_predictions(path, &self.predictions())
    }
}

pub fn write_predictions<P: AsRef<Path>>(path: P, labels: &[Label]) -> SignResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    for label in labels {
        writer.write_record(&[label.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Runs the ingest phase over a training directory, then the predict phase over a
/// test directory, sharing one sampler and one extractor for the whole run.
pub struct BatchRunner<S, E> {
    sampler: S,
    extractor: E,
    classifier: Classifier,
}

impl<S, E> BatchRunner<S, E>
where
    S: FrameSampler,
    E: FeatureExtractor<Frame = S::Frame>,
{
    pub fn new(sampler: S, extractor: E) -> Self {
        Self::with_classifier(sampler, extractor, Classifier::new())
    }

    /// Start from an existing reference set, e.g. one loaded from disk.
    pub fn with_classifier(sampler: S, extractor: E, classifier: Classifier) -> Self {
        Self {
            sampler,
            extractor,
            classifier,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Add one reference per training video whose filename resolves and whose feature
    /// can be extracted. Other files are skipped. Returns the number of references added.
    pub fn ingest<P: AsRef<Path>>(&mut self, dir: P, extensions: &[String]) -> SignResult<usize> {
        let mut added = 0;
        for path in list_videos(dir, extensions)? {
            let name = file_name(&path);
            let gesture = match resolve_train_filename(&name) {
                Some(g) => g,
                None => {
                    log::debug!("Skipping {:?}: unrecognized training filename", name);
                    continue;
                }
            };
            match video_feature(&self.sampler, &mut self.extractor, &path) {
                Some(feature) => {
                    self.classifier.add_reference(gesture.output_label, feature);
                    added += 1;
                }
                None => log::debug!("Skipping {:?}: no feature extracted", name),
            }
        }
        log::info!(
            "Ingested {} references ({} total)",
            added,
            self.classifier.len()
        );
        Ok(added)
    }

    /// Predict one label per test video. A video without a feature gets [`SENTINEL_LABEL`]
    /// without consulting the classifier.
    pub fn predict<P: AsRef<Path>>(
        &mut self,
        dir: P,
        extensions: &[String],
    ) -> SignResult<BatchReport> {
        let mut records = Vec::new();
        for path in list_videos(dir, extensions)? {
            let name = file_name(&path);
            let label = match video_feature(&self.sampler, &mut self.extractor, &path) {
                Some(feature) => self.classifier.classify(&feature),
                None => {
                    log::warn!("No feature for {:?}, predicting {}", name, SENTINEL_LABEL);
                    SENTINEL_LABEL
                }
            };
            let expected = resolve_test_filename(&name).map(|g| g.output_label);
            log::debug!("{:?} -> {} (expected {:?})", name, label, expected);
            records.push(PredictionRecord {
                file_name: name,
                label,
                expected,
            });
        }
        log::info!("Predicted {} test videos", records.len());
        Ok(BatchReport { records })
    }

    /// Ingest, predict and write the predictions to `config.output`.
    pub fn run(&mut self, config: &BatchConfig) -> SignResult<BatchReport> {
        self.ingest(&config.train_dir, &config.extensions)?;
        let report = self.predict(&config.test_dir, &config.extensions)?;
        report.write_csv(&config.output)?;
        log::info!("Wrote predictions to {:?}", config.output);
        Ok(report)
    }
}
