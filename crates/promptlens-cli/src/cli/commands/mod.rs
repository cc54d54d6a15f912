use super::args::*;
use std::sync::Arc;

use promptlens_core::config::{discover_config, DatasetConfig};
use promptlens_core::image::ImageStatus;
use promptlens_core::model::{ImageId, ResolvedRecord};
use promptlens_core::report::{console, json, RecordView};
use promptlens_core::{resolve, Dataset, LazyDataset, LensError};

pub mod browse;
pub mod doctor;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const SELECTION_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let cfg = match dataset_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    match cli.cmd {
        Command::Ids(args) => cmd_ids(args, cfg).await,
        Command::Show(args) => cmd_show(args, cfg).await,
        Command::Browse(args) => browse::run(args, cfg).await,
        Command::Doctor(args) => doctor::run(args, cfg).await,
        Command::Init(args) => cmd_init(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

fn dataset_config(cli: &Cli) -> Result<DatasetConfig, LensError> {
    let mut cfg = discover_config(cli.config.as_deref(), false)?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }
    Ok(cfg)
}

/// Loads the dataset off the async runtime. `None` means the error was
/// already reported and the caller should exit with CONFIG_ERROR.
pub(crate) async fn load(cfg: DatasetConfig) -> anyhow::Result<Option<Arc<Dataset>>> {
    let lazy = LazyDataset::new(cfg);
    match tokio::task::spawn_blocking(move || lazy.get()).await? {
        Ok(ds) => Ok(Some(ds)),
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   The dashboard cannot start without its data files.");
            Ok(None)
        }
    }
}

/// Builds the view for one record, decoding its image on a blocking thread.
pub(crate) async fn view_for(record: ResolvedRecord, with_image: bool) -> anyhow::Result<RecordView> {
    if !with_image {
        let status = ImageStatus::skipped(&record.image_path);
        return Ok(RecordView::new(record, status));
    }
    Ok(tokio::task::spawn_blocking(move || RecordView::with_image(record)).await?)
}

async fn cmd_ids(args: IdsArgs, cfg: DatasetConfig) -> anyhow::Result<i32> {
    let Some(ds) = load(cfg).await? else {
        return Ok(exit_codes::CONFIG_ERROR);
    };
    let ids = ds.ids();
    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&json::ids_value(&ids))?);
    } else {
        print!("{}", console::render_ids(&ids));
    }
    Ok(exit_codes::OK)
}

async fn cmd_show(args: ShowArgs, cfg: DatasetConfig) -> anyhow::Result<i32> {
    let Some(ds) = load(cfg).await? else {
        return Ok(exit_codes::CONFIG_ERROR);
    };

    let id = ImageId::new(&args.id);
    let record = match resolve(&id, &ds) {
        Ok(r) => r,
        Err(e) => {
            if args.format == "json" {
                println!("{}", serde_json::to_string_pretty(&json::error_value(&e))?);
            } else {
                console::print_selection_error(&e);
            }
            return Ok(exit_codes::SELECTION_FAILED);
        }
    };

    let view = view_for(record, !args.no_image).await?;
    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&json::record_value(&view))?);
    } else {
        console::print_record(&view);
    }
    Ok(exit_codes::OK)
}

fn cmd_init(args: InitArgs) -> anyhow::Result<i32> {
    if args.out.exists() {
        eprintln!("note: {} already exists", args.out.display());
        return Ok(exit_codes::OK);
    }
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    promptlens_core::config::write_sample_config(&args.out)?;
    eprintln!("created {}", args.out.display());
    Ok(exit_codes::OK)
}
