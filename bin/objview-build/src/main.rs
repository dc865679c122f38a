//! objview Build - manifest builder
//!
//! Walks OBJ dataset directories and writes `data_files.json` for the
//! viewer server.
//!
//! Usage:
//!   objview-build --ori-key gt --ori-dir /data/gt --pred-key pred --pred-dir /data/pred
//!   objview-build --data-path datasets.json --relative --num-samples 50

use anyhow::Result;
use clap::Parser;
use objview_common::MANIFEST_FILE_NAME;
use objview_manifest::{BuildOptions, DatasetSources, ManifestBuilder, resolve_sources};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "objview-build")]
#[command(about = "Create data_files.json from OBJ dataset directories")]
#[command(version)]
struct Args {
    /// Directory of origin OBJ files
    #[arg(long, requires = "ori_key")]
    ori_dir: Option<PathBuf>,

    /// Directory of prediction OBJ files
    #[arg(long, requires = "pred_key")]
    pred_dir: Option<PathBuf>,

    /// Manifest key for the origin dataset
    #[arg(long, requires = "pred_key")]
    ori_key: Option<String>,

    /// Manifest key for the prediction dataset
    #[arg(long, requires = "ori_key")]
    pred_key: Option<String>,

    /// JSON file mapping dataset keys to directories (default: data.json)
    #[arg(long)]
    data_path: Option<PathBuf>,

    /// Write paths relative to the server root
    #[arg(long, default_value_t = false)]
    relative: bool,

    /// Server root used for relative paths (default: current directory)
    #[arg(long)]
    server_root: Option<PathBuf>,

    /// Number of samples to keep from each dataset (default: all)
    #[arg(long)]
    num_samples: Option<usize>,

    /// Manifest file to write
    #[arg(short, long, default_value = MANIFEST_FILE_NAME)]
    output: PathBuf,

    /// Keep walk order instead of sorting each dataset by file name
    #[arg(long, default_value_t = false)]
    no_sort: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Dataset mapping given on the command line, if any
    fn explicit_sources(&self) -> Option<DatasetSources> {
        let (ori_key, pred_key) = (self.ori_key.as_ref()?, self.pred_key.as_ref()?);
        let mut sources = DatasetSources::new();
        sources.insert(ori_key.clone(), self.ori_dir.clone());
        sources.insert(pred_key.clone(), self.pred_dir.clone());
        Some(sources)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let sources = resolve_sources(args.explicit_sources(), args.data_path.as_deref())?;
    debug!("Dataset sources: {:?}", sources);

    println!("Generating {}...", args.output.display());
    let relative_root = if args.relative {
        let root = match args.server_root.clone() {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        println!("Using relative paths relative to: {}", root.display());
        Some(root)
    } else {
        println!("Using absolute paths (may not work in browser)");
        None
    };

    let builder = ManifestBuilder::new(BuildOptions {
        relative_root,
        sample_cap: args.num_samples,
        sort_by_file_name: !args.no_sort,
        output: args.output,
    });
    let report = builder.build(&sources)?;
    println!("{report}");

    Ok(())
}
