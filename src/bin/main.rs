//! RSMO Command Line Interface
//!
//! A command-line interface for training SVM models on delimited text data,
//! classifying new data and inspecting saved models.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use rsmo::api::SVM;
use rsmo::core::{KernelKind, KernelSpec, Result};
use rsmo::data::{self, Delimiter, LabeledDataset};
use rsmo::persistence::ModelFile;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rsmo")]
#[command(about = "Support Vector Machine training with a simplified SMO solver")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "RSMO Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new SVM model
    Train(TrainArgs),
    /// Classify data using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on labeled data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliDelimiter {
    /// Tab separated values
    Tab,
    /// Comma separated values
    Comma,
}

impl From<CliDelimiter> for Delimiter {
    fn from(cli_delimiter: CliDelimiter) -> Self {
        match cli_delimiter {
            CliDelimiter::Tab => Delimiter::Tab,
            CliDelimiter::Comma => Delimiter::Comma,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliKernel {
    /// m·<x, y> + b, params [m, b]
    Linear,
    /// (<x, y> + b)^a, params [b, a]
    Polynomial,
    /// exp(-|x - y|² / 2σ²), params [σ]
    Gaussian,
    /// exp(-|x - y| / 2σ²), params [σ]
    Radial,
    /// tanh(m·<x, y> / n + b), params [m, b]
    Sigmoid,
    /// Dirichlet kernel, params [m]
    Fourier,
}

impl From<CliKernel> for KernelKind {
    fn from(cli_kernel: CliKernel) -> Self {
        match cli_kernel {
            CliKernel::Linear => KernelKind::Linear,
            CliKernel::Polynomial => KernelKind::Polynomial,
            CliKernel::Gaussian => KernelKind::Gaussian,
            CliKernel::Radial => KernelKind::Radial,
            CliKernel::Sigmoid => KernelKind::Sigmoid,
            CliKernel::Fourier => KernelKind::Fourier,
        }
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file, label in the last column
    #[arg(short, long)]
    input: PathBuf,

    /// Column delimiter
    #[arg(long, value_enum, default_value = "tab")]
    delimiter: CliDelimiter,

    /// Kernel family
    #[arg(short, long, value_enum, default_value = "linear")]
    kernel: CliKernel,

    /// Kernel parameters, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    params: Vec<f64>,

    /// Train only this category (default: one-vs-rest over all categories)
    #[arg(long)]
    category: Option<usize>,

    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Unchanged sweeps required for convergence
    #[arg(short, long, default_value = "5")]
    passes: usize,

    /// KKT tolerance
    #[arg(short, long, default_value = "0.0001")]
    tolerance: f64,

    /// Seed for partner selection (default: clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Scale features to [0, 1] before training
    #[arg(short, long)]
    normalize: bool,

    /// Train categories in parallel
    #[arg(long)]
    parallel: bool,

    /// Output model file
    #[arg(short, long, default_value = "model.json")]
    output: PathBuf,
}

#[derive(Args)]
struct PredictArgs {
    /// Input data file, features only
    #[arg(short, long)]
    input: PathBuf,

    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Number of features per row
    #[arg(short, long)]
    features: usize,

    /// Column delimiter
    #[arg(long, value_enum, default_value = "tab")]
    delimiter: CliDelimiter,

    /// Output classification file (prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum score for a category to be assigned
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    threshold: f64,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Labeled test data file
    #[arg(short, long)]
    input: PathBuf,

    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Column delimiter
    #[arg(long, value_enum, default_value = "tab")]
    delimiter: CliDelimiter,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training SVM model...");
    info!("Data file: {:?}", args.input);

    let dataset = LabeledDataset::from_file(&args.input, args.delimiter.into())?;
    info!(
        "Loaded {} examples with {} features, {} categories",
        dataset.len(),
        dataset.dim(),
        dataset.categories()
    );

    let kernel = KernelSpec::new(args.kernel.into(), args.params.clone());
    info!(
        "Parameters: kernel={} {:?}, C={}, tolerance={}, passes={}",
        kernel.kind, kernel.params, args.c, args.tolerance, args.passes
    );

    let mut svm = SVM::new(kernel)
        .with_c(args.c)
        .with_tolerance(args.tolerance)
        .with_max_passes(args.passes)
        .with_normalization(args.normalize)
        .with_parallel(args.parallel);
    if let Some(seed) = args.seed {
        svm = svm.with_seed(seed);
    }

    let start = Instant::now();
    let model = svm.train_categories(
        dataset.features.view(),
        dataset.labels.view(),
        args.category,
    )?;
    info!("Training completed in {} ms", start.elapsed().as_millis());

    for entry in model.evaluate(dataset.features.view(), dataset.labels.view())? {
        info!(
            "Category {}: training errors {} / {}",
            entry.category,
            entry.errors,
            dataset.len()
        );
    }
    for model_info in model.info() {
        info!(
            "Category {}: {} support vectors, bias {:.6}",
            model_info.category, model_info.n_support_vectors, model_info.bias
        );
    }

    ModelFile::from_models(&model).save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model = ModelFile::load_from_file(&args.model)?.to_models()?;

    info!("Loading prediction data from: {:?}", args.input);
    let x = data::load_unlabeled(&args.input, args.delimiter.into(), args.features)?;

    let start = Instant::now();
    let labels = model.classify_with_threshold(x.view(), args.threshold)?;
    info!(
        "Classified {} rows with {} models in {} ms",
        labels.len(),
        model.len(),
        start.elapsed().as_millis()
    );

    match args.output {
        Some(output_path) => {
            data::write_classification(&output_path, labels.view())?;
            info!("Classification saved to: {output_path:?}");
        }
        None => {
            let stdout = std::io::stdout();
            data::write_labels(&mut stdout.lock(), labels.view())?;
        }
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model_file = ModelFile::load_from_file(&args.model)?;
    let model = model_file.to_models()?;

    info!("Loading test data from: {:?}", args.input);
    let dataset = LabeledDataset::from_file(&args.input, args.delimiter.into())?;

    let report = model.evaluate(dataset.features.view(), dataset.labels.view())?;
    let predicted = model.classify(dataset.features.view())?;
    let correct = predicted
        .iter()
        .zip(dataset.labels.iter())
        .filter(|(p, t)| p == t)
        .count();

    println!(
        "Overall accuracy: {:.2}% ({correct}/{} examples)",
        100.0 * correct as f64 / dataset.len() as f64,
        dataset.len()
    );
    println!(
        "\n{:<12} {:>6} {:>5} {:>5} {:>5} {:>5} {:>9} {:>9} {:>9} {:>9} {:>11}",
        "", "Errors", "TP", "TN", "FP", "FN", "Accuracy", "Precision", "Recall", "F1 Score",
        "Specificity"
    );
    for entry in &report {
        let m = &entry.metrics;
        println!(
            "{:<12} {:>6} {:>5} {:>5} {:>5} {:>5} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>11.4}",
            format!("Category {}", entry.category),
            entry.errors,
            m.true_positives,
            m.true_negatives,
            m.false_positives,
            m.false_negatives,
            m.accuracy(),
            m.precision(),
            m.recall(),
            m.f1_score(),
            m.specificity()
        );
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model_file = ModelFile::load_from_file(&args.model)?;

    model_file.print_summary();

    for model in &model_file.models {
        let n_show = model.alpha.len().min(10);
        if n_show == 0 {
            continue;
        }
        println!("\nCategory {} alpha values:", model.category);
        for (i, (alpha, label)) in model
            .alpha
            .iter()
            .zip(model.support_labels.iter())
            .enumerate()
            .take(n_show)
        {
            println!("  α{i}: {alpha:.6} (y = {label:+})");
        }
        if model.alpha.len() > n_show {
            println!("  ... ({} more)", model.alpha.len() - n_show);
        }
    }

    Ok(())
}
