use anyhow::{Context, Result};
use clap::Parser;
use hr_forecast::{
    evaluate_holdout, DataLoader, ForecastModel, HeartRateSeries, HoltWinters, ModelArtifact,
    TrainedForecastModel, DAILY_SEASONAL_PERIODS, DEFAULT_ARTIFACT_FILE, STEP_INTERVAL_SECS,
    VERSION,
};
use smoothing_math::ParamSearch;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Fit the heart-rate Holt-Winters model and write its artifact")]
struct Cli {
    /// CSV file with `datetime` and `heart_rate` columns
    #[arg(long)]
    input: PathBuf,
    /// Artifact output path
    #[arg(long, default_value = DEFAULT_ARTIFACT_FILE)]
    output: PathBuf,
    /// Observations per season
    #[arg(long, default_value_t = DAILY_SEASONAL_PERIODS)]
    seasonal_periods: usize,
    /// Coordinate-descent rounds after the parameter grid
    #[arg(long, default_value_t = ParamSearch::default().refine_rounds)]
    refine_rounds: usize,
    /// Share of the series held out to report forecast RMSE before the final fit
    #[arg(long, default_value_t = 0.0)]
    holdout: f64,
    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: &Cli) -> Result<()> {
    info!(version = VERSION, input = %cli.input.display(), "Loading and preparing data...");
    let samples = DataLoader::from_csv(&cli.input)
        .with_context(|| format!("reading samples from {}", cli.input.display()))?;
    let series = HeartRateSeries::resample(&samples, STEP_INTERVAL_SECS)
        .context("resampling heart-rate samples")?;
    info!(
        samples = samples.len(),
        observations = series.len(),
        interval_secs = STEP_INTERVAL_SECS,
        "Resampled series"
    );

    let search = ParamSearch {
        refine_rounds: cli.refine_rounds,
        ..ParamSearch::default()
    };
    let model = HoltWinters::new(cli.seasonal_periods)?.with_search(search);

    if cli.holdout > 0.0 {
        let score = evaluate_holdout(&model, &series, cli.holdout)
            .context("evaluating holdout forecast")?;
        info!(
            train = score.train_len,
            test = score.test_len,
            rmse = score.rmse,
            "Holdout evaluation"
        );
    }

    info!(seasonal_periods = cli.seasonal_periods, "Fitting Holt-Winters model...");
    let trained = model.train(&series).context("fitting model")?;

    let params = trained.params();
    info!(
        model = trained.name(),
        observations = trained.observations(),
        start = %trained.training_start(),
        end = %trained.training_end_time(),
        seasonal_periods = trained.seasonal_periods(),
        alpha = params.alpha,
        beta = params.beta,
        gamma = params.gamma,
        phi = params.phi,
        sse = trained.sse(),
        aic = trained.aic(),
        "Model fitted successfully"
    );

    ModelArtifact::new(trained)
        .save(&cli.output)
        .with_context(|| format!("writing artifact to {}", cli.output.display()))?;
    info!(output = %cli.output.display(), "Training completed");

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    if let Err(e) = run(&cli) {
        error!(error = ?e, "Training failed");
        std::process::exit(1);
    }
}
