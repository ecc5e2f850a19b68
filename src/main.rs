use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use handsign::*;

#[derive(Parser)]
#[command(name = "handsign")]
#[command(about = "Classify hand gesture videos by their most similar training video")]
#[command(version)]
struct Cli {
    /// Directory of labeled training videos (<token>_<anything>.<ext>)
    #[arg(long = "train-dir", default_value = "traindata")]
    train_dir: PathBuf,

    /// Directory of test videos to classify
    #[arg(long = "test-dir", default_value = "test")]
    test_dir: PathBuf,

    /// Output file, one predicted label per line
    #[arg(short = 'o', long = "output", default_value = "Results.csv")]
    output: PathBuf,

    /// Recognized video extension (repeatable)
    #[arg(long = "ext", default_value = "mp4")]
    extensions: Vec<String>,

    /// Edge length of the grayscale thumbnail used as frame feature
    #[arg(long = "thumbnail", default_value_t = 32)]
    thumbnail: u16,

    /// Save the ingested reference index to this file
    #[arg(long = "save-index")]
    save_index: Option<PathBuf>,

    /// Load the reference index from this file instead of ingesting the training directory
    #[arg(long = "load-index", conflicts_with = "save_index")]
    load_index: Option<PathBuf>,

    /// Log accuracy against labels decoded from test filenames
    #[arg(long = "report")]
    report: bool,

    /// Increase output verbosity (show debug messages)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> BatchConfig {
        BatchConfig {
            train_dir: self.train_dir.clone(),
            test_dir: self.test_dir.clone(),
            output: self.output.clone(),
            extensions: self.extensions.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let config = cli.config();
    let extractor = ThumbnailExtractor::new(cli.thumbnail);

    let mut runner = match &cli.load_index {
        Some(index) => {
            let classifier = Classifier::load(index)
                .with_context(|| format!("Could not load reference index {:?}", index))?;
            log::info!("Loaded {:?}", classifier);
            BatchRunner::with_classifier(CvFrameSampler, extractor, classifier)
        }
        None => {
            let mut runner = BatchRunner::new(CvFrameSampler, extractor);
            runner
                .ingest(&config.train_dir, &config.extensions)
                .with_context(|| format!("Could not ingest {:?}", config.train_dir))?;
            log::debug!("{:?}", runner.classifier());
            if let Some(index) = &cli.save_index {
                runner
                    .classifier()
                    .save(index)
                    .with_context(|| format!("Could not save reference index {:?}", index))?;
                log::info!("Saved reference index to {:?}", index);
            }
            runner
        }
    };

    let report = runner
        .predict(&config.test_dir, &config.extensions)
        .with_context(|| format!("Could not classify {:?}", config.test_dir))?;
    report
        .write_csv(&config.output)
        .with_context(|| format!("Could not write {:?}", config.output))?;
    log::info!(
        "Wrote {} predictions to {:?}",
        report.records().len(),
        config.output
    );

    if cli.report {
        match report.accuracy() {
            Some(acc) => log::info!("Accuracy: {:.2}%", acc * 100.),
            None => log::info!("Accuracy: no test filename carries a recognized label"),
        }
    }

    Ok(())
}
