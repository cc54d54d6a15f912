use promptlens_core::config::DatasetConfig;
use promptlens_core::doctor::doctor;
use promptlens_core::report::console;

use super::exit_codes;
use crate::cli::args::DoctorArgs;

pub async fn run(args: DoctorArgs, cfg: DatasetConfig) -> anyhow::Result<i32> {
    let Some(ds) = super::load(cfg.clone()).await? else {
        return Ok(exit_codes::CONFIG_ERROR);
    };

    let report = doctor(&ds, &cfg);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        console::print_doctor(&report);
    }

    if report.has_errors() {
        Ok(exit_codes::SELECTION_FAILED)
    } else {
        Ok(exit_codes::OK)
    }
}
