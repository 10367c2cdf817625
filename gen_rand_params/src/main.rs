use anyhow::{Context, Result};
use clap::Parser;
use refract_json::{serde_json, serialize_trace};
use refract_random::{
    rand::{rngs::StdRng, SeedableRng},
    random_traces,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use std::{fs::File, io::BufWriter, path::PathBuf};

/// Write random parameter sets, and the traces they produce, to a JSON file.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output file
    out: PathBuf,

    /// Number of parameter sets
    #[arg(default_value_t = 8)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let collector = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
    tracing::subscriber::set_global_default(collector)?;

    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let traces = random_traces(&mut rng, cli.count);
    let exited = traces.iter().filter(|(_, path)| path.exited()).count();

    let json = serde_json::Value::Array(Vec::from_iter(
        traces
            .iter()
            .map(|(prism, path)| serialize_trace(prism, path)),
    ));

    let file = File::create(&cli.out)
        .with_context(|| format!("failed to create {}", cli.out.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &json)?;

    tracing::info!(
        count = traces.len(),
        exited,
        path = %cli.out.display(),
        "random traces written"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn count_defaults_to_eight() {
        let cli = Cli::try_parse_from(["gen_rand_params", "out.json"]).unwrap();
        assert_eq!(cli.count, 8);
        assert_eq!(cli.seed, None);

        let cli = Cli::try_parse_from(["gen_rand_params", "out.json", "3", "--seed", "9"]).unwrap();
        assert_eq!(cli.count, 3);
        assert_eq!(cli.seed, Some(9));
    }
}
