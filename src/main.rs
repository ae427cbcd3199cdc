use anyhow::{Context, Result};
use clap::Parser;
use repro_sigma::{
    cli::{Cli, OutputFormat},
    config::ReproConfig,
    json_output::JsonRunReport,
    manifest::DatasetManifest,
    pipeline::Pipeline,
    report::{self, REPORT_UNIT},
    store::FsGridStore,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; RUST_LOG wins unless --debug is set
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Cli) -> Result<ReproConfig> {
    let mut config = match &args.config {
        Some(path) => ReproConfig::from_toml(path)?,
        None => ReproConfig::default(),
    };
    args.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn load_manifest(args: &Cli, config: &ReproConfig) -> Result<DatasetManifest> {
    let mut manifest = match &args.manifest {
        Some(path) => DatasetManifest::from_toml(path)?,
        None => DatasetManifest::discover(&args.root, config)?,
    };

    if let Some(batch) = &args.batch {
        manifest.retain_subject(batch);
        if manifest.subjects.is_empty() {
            anyhow::bail!("No subject matching '{}' under {}", batch, manifest.root.display());
        }
    }

    if manifest.subjects.is_empty() {
        anyhow::bail!("No batch folder found under {}", manifest.root.display());
    }
    Ok(manifest)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let manifest = load_manifest(&args, &config)?;
    let store = FsGridStore::from_config(&config);
    let pipeline = Pipeline::new(&store, &config);

    if let Some(point) = args.point {
        let subject = manifest
            .subjects
            .first()
            .context("No subject selected for point inspection")?;
        let inspection = pipeline.inspect_point(subject, point.row, point.col)?;
        print!(
            "{}",
            report::render_point(&inspection, config.unit_scale, REPORT_UNIT)
        );
        return Ok(());
    }

    let run = pipeline.run(&manifest);

    match args.format {
        OutputFormat::Text => print!(
            "{}",
            report::render_run(&run, config.unit_scale, REPORT_UNIT)
        ),
        OutputFormat::Json => println!(
            "{}",
            JsonRunReport::from_run(&run, config.unit_scale, REPORT_UNIT).to_json()?
        ),
    }

    // A single-subject run is a diagnostic, not a validation
    if run.verdict.is_none() && args.batch.is_none() {
        anyhow::bail!(
            "Validation impossible: {} subject(s) with a defined Sigma_k, at least 2 required",
            run.sample.len()
        );
    }

    Ok(())
}
