use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "promptlens",
    version,
    about = "Browse image records and compare LLM responses across prompting strategies"
)]
pub struct Cli {
    /// Dataset config (defaults to ./promptlens.yaml when present)
    #[arg(long, global = true, env = "PROMPTLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List selectable image ids
    Ids(IdsArgs),
    /// Show one record: image, original content and every model response
    Show(ShowArgs),
    /// Interactive session: type an id per line, `:ids` to list, `:q` to quit
    Browse(BrowseArgs),
    /// Check the dataset for ids that will not render fully
    Doctor(DoctorArgs),
    /// Write a sample promptlens.yaml
    Init(InitArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct IdsArgs {
    #[arg(long, default_value = "text")]
    pub format: String, // text|json
}

#[derive(clap::Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(long)]
    pub id: String,

    #[arg(long, default_value = "text")]
    pub format: String, // text|json

    /// skip decoding the image
    #[arg(long)]
    pub no_image: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BrowseArgs {
    /// skip decoding images
    #[arg(long)]
    pub no_image: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DoctorArgs {
    #[arg(long, default_value = "text")]
    pub format: String, // text|json
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "promptlens.yaml")]
    pub out: PathBuf,
}
