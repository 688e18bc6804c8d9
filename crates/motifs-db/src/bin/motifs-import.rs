//! motifs-import: build a motif catalog from MEME files.
//!
//! ```text
//! motifs-import --database data/motifs.db \
//!     --dataset JASPAR2024=jaspar.meme \
//!     --dataset SwissRegulon=swissregulon.meme:swissregulon
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use motifs_core::{parse_meme, GeneRule};
use motifs_db::{create_pool_with_config, create_schema, import_dataset, PoolConfig};

#[derive(Parser)]
#[command(name = "motifs-import")]
#[command(author, version, about = "Load MEME motif files into a motif catalog")]
struct Cli {
    /// SQLite database file, created if missing
    #[arg(short = 'd', long)]
    database: PathBuf,

    /// Dataset to load as NAME=FILE[:RULE]; RULE is jaspar, swissregulon,
    /// jolma or suffix:TAG and defaults to one picked from NAME
    #[arg(short = 's', long = "dataset", required = true, num_args = 1..)]
    datasets: Vec<DatasetArg>,
}

#[derive(Debug, Clone)]
struct DatasetArg {
    name: String,
    file: PathBuf,
    rule: GeneRule,
}

impl FromStr for DatasetArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, rest)) = s.split_once('=') else {
            bail!("expected NAME=FILE[:RULE], got '{}'", s);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("dataset name is empty in '{}'", s);
        }

        let (file, rule) = match rest.split_once(':') {
            Some((file, rule)) => (file, rule.parse::<GeneRule>()?),
            None => (rest, GeneRule::for_dataset(name)),
        };

        Ok(Self {
            name: name.to_string(),
            file: PathBuf::from(file),
            rule,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "motifs_db=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let url = cli.database.to_string_lossy().into_owned();

    let pool = create_pool_with_config(&url, PoolConfig::writable().max_connections(1))
        .await
        .context("opening catalog database")?;
    create_schema(&pool).await?;

    for dataset in &cli.datasets {
        let file = File::open(&dataset.file)
            .with_context(|| format!("opening {}", dataset.file.display()))?;
        let motifs = parse_meme(BufReader::new(file))
            .with_context(|| format!("parsing {}", dataset.file.display()))?;

        let summary = import_dataset(&pool, &dataset.name, &dataset.rule, motifs)
            .await
            .with_context(|| format!("importing dataset {}", dataset.name))?;

        info!(
            dataset = %dataset.name,
            public_id = %summary.dataset_public_id,
            motifs = summary.motifs,
            "Loaded dataset"
        );
    }

    pool.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_arg_default_rule() {
        let arg: DatasetArg = "SwissRegulon=sr.meme".parse().unwrap();
        assert_eq!(arg.name, "SwissRegulon");
        assert_eq!(arg.file, PathBuf::from("sr.meme"));
        assert_eq!(arg.rule, GeneRule::SwissRegulon);
    }

    #[test]
    fn test_dataset_arg_explicit_suffix_rule() {
        let arg: DatasetArg = "H12=h12.meme:suffix:H12CORE".parse().unwrap();
        assert_eq!(arg.rule, GeneRule::Suffixed("H12CORE".to_string()));
    }

    #[test]
    fn test_dataset_arg_rejects_missing_file() {
        assert!("JASPAR".parse::<DatasetArg>().is_err());
        assert!("=x.meme".parse::<DatasetArg>().is_err());
    }
}
