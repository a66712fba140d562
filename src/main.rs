use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use speech_metrics::{
    AnalysisConfig, AnalysisMetadata, Analyzer, EnrichedTranscript, Lexicon, MetricsReport,
    PauseConfig, load_lexicon_file, parse_asr_file,
};

#[derive(Parser)]
#[command(name = "speech-metrics")]
#[command(author, version, about = "Speech coaching metrics from time-aligned transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct EngineArgs {
    /// Lexicon file (JSON mapping "filler"/"hedge" to phrase lists)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Minimum silence in seconds counted as a pause
    #[arg(long, default_value = "0.5")]
    short_pause: f64,

    /// Minimum pause in seconds counted as a long pause
    #[arg(long, default_value = "2.0")]
    long_pause: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute all metrics for a transcript
    Analyze {
        /// Input ASR result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the enriched transcript (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable metrics report (text)
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the clarity score and the deductions behind it
    Score {
        /// Input ASR result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze many transcripts concurrently
    Batch {
        /// Input ASR result files (JSON)
        #[arg(short, long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,

        /// Directory receiving one <name>.metrics.json per input
        #[arg(long)]
        output_dir: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            report,
            engine,
            verbose,
        } => {
            setup_logging(verbose);
            let analyzer = build_analyzer(&engine)?;
            analyze_file(&analyzer, &input, output.as_deref(), report.as_deref())
        }
        Commands::Score {
            input,
            engine,
            verbose,
        } => {
            setup_logging(verbose);
            let analyzer = build_analyzer(&engine)?;
            score_file(&analyzer, &input)
        }
        Commands::Batch {
            inputs,
            output_dir,
            engine,
            verbose,
        } => {
            setup_logging(verbose);
            let analyzer = build_analyzer(&engine)?;
            run_batch(Arc::new(analyzer), inputs, output_dir).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_analyzer(engine: &EngineArgs) -> Result<Analyzer> {
    let lexicon = match &engine.lexicon {
        Some(path) => {
            info!("Loading lexicon from {:?}", path);
            load_lexicon_file(path)?
        }
        None => Lexicon::default(),
    };
    let config = AnalysisConfig {
        lexicon,
        pauses: PauseConfig {
            short_pause_sec: engine.short_pause,
            long_pause_sec: engine.long_pause,
        },
    };
    Analyzer::new(&config).context("Failed to build analyzer")
}

/// Analyze one file and build its enriched transcript
fn enrich_file(analyzer: &Analyzer, input: &Path) -> Result<EnrichedTranscript> {
    info!("Loading transcript from {:?}", input);
    let transcript = parse_asr_file(input).context("Failed to parse input transcript")?;
    info!(
        "Loaded {} words, {:.1}s, confidence {:.2}",
        transcript.word_count(),
        transcript.duration_sec(),
        transcript.confidence
    );

    let started = Instant::now();
    let analysis = analyzer.analyze(&transcript);
    let metadata = AnalysisMetadata::new(started.elapsed().as_millis() as u64);

    Ok(EnrichedTranscript::from_analysis(&transcript, analysis, metadata))
}

fn analyze_file(
    analyzer: &Analyzer,
    input: &Path,
    output: Option<&Path>,
    report: Option<&Path>,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let transcript = parse_asr_file(input).context("Failed to parse input transcript")?;

    let started = Instant::now();
    let analysis = analyzer.analyze(&transcript);
    let metadata = AnalysisMetadata::new(started.elapsed().as_millis() as u64);

    let human = MetricsReport::new(&transcript, &analysis);
    println!("{}", human.format());

    if let Some(path) = report {
        info!("Writing metrics report to {:?}", path);
        human.write_file(path)?;
    }

    if let Some(path) = output {
        info!("Writing enriched transcript to {:?}", path);
        EnrichedTranscript::from_analysis(&transcript, analysis, metadata).write_json(path)?;
    }

    Ok(())
}

fn score_file(analyzer: &Analyzer, input: &Path) -> Result<()> {
    let transcript = parse_asr_file(input).context("Failed to parse input transcript")?;
    let clarity = analyzer.analyze(&transcript).clarity;

    println!("Clarity score: {}/100", clarity.score);
    println!("Baseline: {}", clarity.baseline);
    for deduction in &clarity.deductions {
        println!("  -{:<3} {}", deduction.points, deduction.rule);
    }

    Ok(())
}

/// Output path for each input, `<stem>.metrics.json` under `output_dir`
///
/// Fails before anything is analyzed when two inputs would write the same file.
fn batch_output_paths(inputs: &[PathBuf], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::with_capacity(inputs.len());
    for input in inputs {
        let stem = input
            .file_stem()
            .with_context(|| format!("Input has no file name: {:?}", input))?;
        let path = output_dir.join(format!("{}.metrics.json", stem.to_string_lossy()));
        if !seen.insert(path.clone()) {
            anyhow::bail!("Inputs collide on output file {:?} (from {:?})", path, input);
        }
        paths.push(path);
    }
    Ok(paths)
}

async fn run_batch(analyzer: Arc<Analyzer>, inputs: Vec<PathBuf>, output_dir: PathBuf) -> Result<()> {
    let outputs = batch_output_paths(&inputs, &output_dir)?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let total = inputs.len();
    let mut handles = Vec::with_capacity(total);
    for (input, path) in inputs.into_iter().zip(outputs) {
        let analyzer = Arc::clone(&analyzer);
        handles.push(tokio::task::spawn_blocking(move || {
            let enriched = enrich_file(&analyzer, &input)?;
            enriched.write_json(&path)?;
            info!(
                "{:?}: clarity {} written to {:?}",
                input, enriched.clarity_score, path
            );
            Ok::<_, anyhow::Error>(())
        }));
    }

    let mut failures = 0;
    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("Transcript failed: {:#}", e);
                failures += 1;
            }
            Err(e) => {
                warn!("Analysis task panicked: {}", e);
                failures += 1;
            }
        }
    }

    info!("Complete: {} of {} transcripts analyzed", total - failures, total);

    if failures > 0 {
        anyhow::bail!("{} of {} transcripts failed", failures, total);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_output_paths() {
        let inputs = vec![PathBuf::from("calls/monday.json"), PathBuf::from("tuesday.json")];

        let paths = batch_output_paths(&inputs, Path::new("out")).unwrap();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/monday.metrics.json"),
                PathBuf::from("out/tuesday.metrics.json"),
            ]
        );
    }

    #[test]
    fn test_batch_output_paths_reject_stem_collision() {
        let inputs = vec![PathBuf::from("a/call.json"), PathBuf::from("b/call.json")];

        let err = batch_output_paths(&inputs, Path::new("out")).unwrap_err();

        assert!(err.to_string().contains("collide"));
    }

    #[test]
    fn test_batch_output_paths_reject_missing_name() {
        let inputs = vec![PathBuf::from("..")];

        assert!(batch_output_paths(&inputs, Path::new("out")).is_err());
    }
}
