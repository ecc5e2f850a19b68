use std::fs;
use std::path::Path;

use handsign::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tempfile::TempDir;

/// Treats a file's text as its decoded middle frame. Empty files have no frames.
struct TextSampler;

impl FrameSampler for TextSampler {
    type Frame = String;

    fn sample(&self, path: &Path) -> Option<String> {
        let text = fs::read_to_string(path).ok()?;
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Parses whitespace-separated numbers. Anything unparsable fails extraction.
#[derive(Default)]
struct ParseExtractor {
    calls: usize,
}

impl FeatureExtractor for ParseExtractor {
    type Frame = String;

    fn extract_feature(&mut self, frame: &String) -> Option<Feature> {
        self.calls += 1;
        frame.split_whitespace().map(|t| t.parse().ok()).collect()
    }
}

fn vec_text(v: &[f32]) -> String {
    v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(" ")
}

struct Dataset {
    root: TempDir,
}

impl Dataset {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("traindata")).unwrap();
        fs::create_dir(root.path().join("test")).unwrap();
        Self { root }
    }

    fn train(&self, name: &str, content: &str) -> &Self {
        fs::write(self.root.path().join("traindata").join(name), content).unwrap();
        self
    }

    fn test(&self, name: &str, content: &str) -> &Self {
        fs::write(self.root.path().join("test").join(name), content).unwrap();
        self
    }

    fn config(&self) -> BatchConfig {
        BatchConfig {
            train_dir: self.root.path().join("traindata"),
            test_dir: self.root.path().join("test"),
            output: self.root.path().join("Results.csv"),
            ..BatchConfig::default()
        }
    }

    fn run(&self) -> (BatchReport, String) {
        let config = self.config();
        let mut runner = BatchRunner::new(TextSampler, ParseExtractor::default());
        let report = runner.run(&config).unwrap();
        (report, fs::read_to_string(&config.output).unwrap())
    }
}

#[test]
fn nearest_training_video_labels_the_test_video() {
    let ds = Dataset::new();
    ds.train("Num0_1.mp4", "1 0 0 0")
        .train("FanOn_1.mp4", "0 1 1 0")
        .test("A-B-0.mp4", "0.98 0.01 0.02 0");
    let (report, out) = ds.run();
    assert_eq!(out, "0\n");
    assert_eq!(report.accuracy(), Some(1.));
}

#[test]
fn undecodable_test_video_gets_sentinel() {
    let ds = Dataset::new();
    ds.train("FanOn_1.mp4", "0 1 1 0")
        .train("LightOn_1.mp4", "1 1 1 1")
        .test("A-B-FanOn.mp4", "");
    let (report, out) = ds.run();
    assert_eq!(out, "0\n");
    assert_eq!(report.records()[0].expected, Some(12));
    assert_eq!(report.accuracy(), Some(0.));
}

#[test]
fn sentinel_prediction_bypasses_extractor_and_classifier() {
    let ds = Dataset::new();
    ds.train("FanOn_1.mp4", "0 1").test("a-b-c.mp4", "");
    let config = ds.config();
    let mut runner = BatchRunner::new(TextSampler, ParseExtractor::default());
    runner.ingest(&config.train_dir, &config.extensions).unwrap();
    let report = runner.predict(&config.test_dir, &config.extensions).unwrap();
    assert_eq!(report.predictions(), vec![SENTINEL_LABEL]);
    // only the training video reached the extractor
    assert_eq!(runner.extractor().calls, 1);
    assert_eq!(runner.classifier().len(), 1);
}

#[test]
fn failed_training_files_are_skipped() {
    let ds = Dataset::new();
    ds.train("Num1_ok.mp4", "1 0")
        .train("Num2_empty.mp4", "")
        .train("Num3_garbage.mp4", "not numbers")
        .train("Wave_1.mp4", "0 1")
        .train("Num4.mp4", "0 1")
        .train("Num5_notes.txt", "0 1");
    let config = ds.config();
    let mut runner = BatchRunner::new(TextSampler, ParseExtractor::default());
    let added = runner.ingest(&config.train_dir, &config.extensions).unwrap();
    assert_eq!(added, 1);
    let refs = runner.classifier().references();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].label, 1);
    assert_eq!(refs[0].feature, vec![1., 0.]);
}

#[test]
fn empty_training_set_predicts_sentinel() {
    let ds = Dataset::new();
    ds.test("A-B-FanOn.mp4", "0 1").test("A-B-1.mp4", "1 0");
    let (_, out) = ds.run();
    assert_eq!(out, "0\n0\n");
}

#[test]
fn output_follows_sorted_test_order() {
    let ds = Dataset::new();
    ds.train("LightOff_1.mp4", "1 0 0")
        .train("LightOn_1.mp4", "0 1 0")
        .train("SetThermo_1.MP4", "0 0 1");
    ds.test("c-x-SetThermo.mp4", "0 0.1 3")
        .test("a-x-LightOff.mp4", "5 0 0")
        .test("B-x-LightOn.Mp4", "0 2 0.1")
        .test("b-x-broken.mp4", "")
        .test("skip.avi", "1 0 0");
    let (report, out) = ds.run();
    assert_eq!(out, "15\n14\n0\n16\n");
    let names: Vec<&str> = report
        .records()
        .iter()
        .map(|r| r.file_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "B-x-LightOn.Mp4",
            "a-x-LightOff.mp4",
            "b-x-broken.mp4",
            "c-x-SetThermo.mp4"
        ]
    );
}

#[test]
fn earlier_training_file_wins_ties() {
    let ds = Dataset::new();
    // sorted order: FanOff_* before FanOn_*
    ds.train("FanOn_1.mp4", "2 2").train("FanOff_1.mp4", "1 1");
    ds.test("a-b-FanOn.mp4", "3 3");
    let (_, out) = ds.run();
    assert_eq!(out, "11\n");
}

#[test]
fn degenerate_test_feature_predicts_sentinel_label() {
    let ds = Dataset::new();
    ds.train("Num7_1.mp4", "1 2").test("a-b-7.mp4", "0 0");
    let (_, out) = ds.run();
    assert_eq!(out, "0\n");
}

#[test]
fn missing_test_directory_is_an_error() {
    let ds = Dataset::new();
    let mut config = ds.config();
    config.test_dir = ds.root.path().join("nope");
    let mut runner = BatchRunner::new(TextSampler, ParseExtractor::default());
    assert!(matches!(
        runner.run(&config),
        Err(SignErr::NotADirectory(_))
    ));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let ds = Dataset::new();
    let mut rng = StdRng::seed_from_u64(42);
    for (i, g) in GESTURES.iter().enumerate() {
        for k in 0..3 {
            let f: Vec<f32> = (0..12).map(|_| rng.gen_range(-1.0..1.0)).collect();
            ds.train(&format!("{}_{}_{}.mp4", g.train_tokens[0], k, i), &vec_text(&f));
        }
    }
    for i in 0..25 {
        let f: Vec<f32> = (0..12).map(|_| rng.gen_range(-1.0..1.0)).collect();
        ds.test(&format!("P{:02}-x-{}.mp4", i, i % 17), &vec_text(&f));
    }
    let (first_report, first) = ds.run();
    let (second_report, second) = ds.run();
    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
    assert_eq!(first.lines().count(), 25);
}

#[cfg(feature = "bincode")]
#[test]
fn loaded_index_reproduces_ingested_predictions() {
    let ds = Dataset::new();
    ds.train("Num0_1.mp4", "1 0 0")
        .train("Num9_1.mp4", "0 0 1")
        .train("FanUp_1.mp4", "0 1 0");
    ds.test("a-b-9.mp4", "0.1 0.2 0.9")
        .test("a-c-IncreaseFanSpeed.mp4", "0 1 0.2");
    let config = ds.config();
    let (report, _) = ds.run();

    let index = ds.root.path().join("refs.idx");
    let mut runner = BatchRunner::new(TextSampler, ParseExtractor::default());
    runner.ingest(&config.train_dir, &config.extensions).unwrap();
    runner.classifier().save(&index).unwrap();

    let loaded = Classifier::load(&index).unwrap();
    let mut runner = BatchRunner::with_classifier(TextSampler, ParseExtractor::default(), loaded);
    let replay = runner.predict(&config.test_dir, &config.extensions).unwrap();
    assert_eq!(replay, report);
    assert_eq!(replay.predictions(), vec![9, 13]);
}
