//! roomiq - room-detection validation CLI
//!
//! # Usage
//!
//! ```bash
//! # Validate a raw model response (file or stdin) into room JSON
//! roomiq detect --input response.txt
//! cat response.txt | roomiq detect
//!
//! # Evaluate prediction fixtures against ground truth
//! roomiq eval --ground-truth tests/ground-truth --predictions results \
//!     --threshold 0.5 --worst 5 --output report.json
//! ```

use clap::{Parser, Subcommand};
use roomiq::eval::{MatcherConfig, ReportConfig};
use roomiq::pipeline::{evaluate_corpus, CaseInput, EvalCase, EvalConfig};
use roomiq::{detect_rooms, ValidatorConfig};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

/// Room-detection response validation and accuracy evaluation.
#[derive(Parser)]
#[command(name = "roomiq")]
#[command(
    author,
    version,
    about = "Room-detection response validation and accuracy evaluation",
    long_about = r#"
roomiq - turn a vision model's free-text answer about room layouts into
validated room boundaries, and score predictions against ground truth.

EXAMPLES:
  roomiq detect --input response.txt
  cat response.txt | roomiq detect --pretty
  roomiq eval --ground-truth suite/ground-truth --predictions results
"#
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a raw model response and print the detected rooms as JSON
    #[command(visible_alias = "d")]
    Detect(DetectArgs),

    /// Evaluate prediction fixtures against ground truth
    #[command(visible_alias = "e")]
    Eval(EvalArgs),
}

#[derive(clap::Args)]
struct DetectArgs {
    /// Read the response from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(clap::Args)]
struct EvalArgs {
    /// Directory containing `<id>_ground_truth.json` fixtures
    #[arg(long, value_name = "DIR")]
    ground_truth: PathBuf,

    /// Directory containing `<id>_predicted.json` fixtures
    #[arg(long, value_name = "DIR")]
    predictions: PathBuf,

    /// Write the report JSON to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// IoU threshold for accepting a match
    #[arg(long, default_value_t = roomiq::eval::DEFAULT_IOU_THRESHOLD)]
    threshold: f64,

    /// Number of worst cases to list
    #[arg(long, default_value_t = 5)]
    worst: usize,

    /// Pretty-print the report JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect(args) => cmd_detect(args),
        Commands::Eval(args) => cmd_eval(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

fn cmd_detect(args: DetectArgs) -> Result<(), String> {
    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            buf
        }
    };

    let outcome = detect_rooms(&text, &ValidatorConfig::default());

    if let Some(reason) = &outcome.diagnostic {
        eprintln!("warning: {}", reason);
    }
    let dropped = outcome.dropped.total();
    if dropped > 0 {
        eprintln!("warning: dropped {} invalid record(s)", dropped);
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&outcome.rooms)
    } else {
        serde_json::to_string(&outcome.rooms)
    }
    .map_err(|e| format!("cannot serialize rooms: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> Result<(), String> {
    let pairs = roomiq::eval::discover_cases(&args.ground_truth, &args.predictions)
        .map_err(|e| format!("cannot scan fixture directories: {}", e))?;
    if pairs.is_empty() {
        return Err("no fixture pairs found".to_string());
    }

    let mut cases = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        let truth = roomiq::eval::load_ground_truth(&pair.ground_truth_path)
            .map_err(|e| format!("{}: {}", pair.ground_truth_path.display(), e))?;
        let prediction = roomiq::eval::load_prediction(&pair.prediction_path)
            .map_err(|e| format!("{}: {}", pair.prediction_path.display(), e))?;
        let response_text = prediction
            .into_response_text()
            .map_err(|e| format!("{}: {}", pair.prediction_path.display(), e))?;

        cases.push(EvalCase {
            case_id: pair.case_id.clone(),
            category: truth.category,
            input: CaseInput::ResponseText(response_text),
            ground_truth: truth.ground_truth,
        });
    }

    let cfg = EvalConfig {
        validator: ValidatorConfig::default(),
        matcher: MatcherConfig {
            iou_threshold: args.threshold,
        },
        report: ReportConfig {
            worst_n: args.worst,
        },
    };
    let report = evaluate_corpus(&cases, &cfg);

    eprint!("{}", report.summary());

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|e| format!("cannot serialize report: {}", e))?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
            eprintln!("report saved to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
