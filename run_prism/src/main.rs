use anyhow::{anyhow, Context, Result};
use clap::Parser;
use refract_json::{params_from_document, serde_json, serialize_trace};
use refract_prism::{refract::Float, *};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

/// Trace a ray through a hollow prism, and explore it interactively.
///
/// Parameters start at their default values, are then read from `--params`,
/// and finally overridden by the individual flags.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding a parameter object, or a trace document
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Refractive index around the prism
    #[arg(long)]
    n1: Option<Float>,

    /// Refractive index of the prism's walls
    #[arg(long)]
    n2: Option<Float>,

    /// Refractive index of the prism's core
    #[arg(long)]
    n3: Option<Float>,

    /// Wall thickness
    #[arg(short = 'l', long)]
    thickness: Option<Float>,

    /// Incidence angle, in degrees
    #[arg(long, allow_negative_numbers = true)]
    theta1: Option<Float>,

    /// Print the trace as JSON instead of opening the viewer
    #[arg(long)]
    json: bool,

    /// Write the JSON to this file instead of stdout
    #[arg(long, value_name = "FILE", requires = "json")]
    out: Option<PathBuf>,
}

impl Cli {
    fn load_params(&self) -> Result<PrismParams> {
        let mut params = match &self.params {
            Some(path) => read_params(path)?,
            None => PrismParams::default(),
        };

        let overrides = [
            (&mut params.n1, self.n1),
            (&mut params.n2, self.n2),
            (&mut params.n3, self.n3),
            (&mut params.l, self.thickness),
            (&mut params.theta1, self.theta1),
        ];

        for (param, value) in overrides {
            if let Some(value) = value {
                *param = value;
            }
        }

        params.validate()?;
        Ok(params)
    }
}

fn read_params(path: &Path) -> Result<PrismParams> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let json: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    params_from_document(&json)
        .map_err(|err| anyhow!("invalid parameters in {}: {err}", path.display()))
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // logs go to stderr, leaving stdout to the JSON output
    let collector = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter);

    tracing::subscriber::set_global_default(collector)?;
    Ok(())
}

fn write_json(params: &PrismParams, out: Option<&Path>) -> Result<()> {
    let prism = HollowPrism::new(params.l)?;
    let path = trace_through(&prism, params, &ViewBounds::default());

    tracing::info!(
        termination = ?path.termination,
        exit_angle = ?path.exit_angle(),
        "traced"
    );

    let doc = serialize_trace(&prism, &path);

    match out {
        Some(out) => {
            let file = File::create(out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &doc)?;
            tracing::info!(path = %out.display(), "trace written");
        }
        None => println!("{}", serde_json::to_string_pretty(&doc)?),
    }

    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let params = cli.load_params()?;

    tracing::debug!(?params, "parameters loaded");

    if cli.json {
        write_json(&params, cli.out.as_deref())
    } else {
        refract_glium::PrismWindow::open()
            .and_then(|window| window.display(&params, refract_glium::ViewerParams::default()))
            .map_err(|err| anyhow!("viewer: {err}"))
    }
}
