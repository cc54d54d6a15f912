use std::fmt::Write;

use crate::doctor::model::DoctorReport;
use crate::errors::LensError;
use crate::image::ImageStatus;
use crate::model::{ImageId, Model, ModelPanel, Strategy};

use super::{RecordView, DASHBOARD_TITLE};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn render_record(view: &RecordView) -> String {
    let mut out = String::new();
    let rec = &view.record;

    let _ = writeln!(out, "{}", DASHBOARD_TITLE);
    let _ = writeln!(out, "{}", RULE);

    match &view.image {
        ImageStatus::Loaded {
            width,
            height,
            format,
        } => {
            let fmt = format.as_deref().unwrap_or("image");
            let _ = writeln!(
                out,
                "🖼  {} ({}x{} {})",
                rec.image_path.display(),
                width,
                height,
                fmt
            );
        }
        ImageStatus::Failed { message } => {
            let _ = writeln!(out, "❌ {}", message);
        }
        ImageStatus::Skipped { path } => {
            let _ = writeln!(out, "🖼  {} (not decoded)", path);
        }
    }
    let _ = writeln!(out, "   {}", view.caption);

    let _ = writeln!(out, "\nOriginal Content");
    let _ = writeln!(out, "  Title: {}", rec.original.title);
    let _ = writeln!(out, "  Body: {}", rec.original.body);

    for strategy in Strategy::ALL {
        let _ = writeln!(out, "\n[{}]", strategy.label());
        let _ = writeln!(out, "{} Responses", strategy.label());
        for model in Model::ALL {
            let _ = writeln!(out, "  ▸ {} Responses", model.label());
            match rec.panel(model) {
                ModelPanel::Available { outputs } => {
                    if let Some(o) = outputs.get(&strategy) {
                        let _ = writeln!(out, "      Title: {}", o.title);
                        let _ = writeln!(out, "      Body: {}", o.body);
                        let _ = writeln!(out, "      Combined: {}", o.combined);
                    }
                }
                ModelPanel::Unavailable => {
                    let _ = writeln!(out, "      (no {} response for this image)", model.label());
                }
            }
        }
    }
    out
}

pub fn print_record(view: &RecordView) {
    print!("{}", render_record(view));
}

pub fn render_ids(ids: &[ImageId]) -> String {
    let mut out = String::new();
    for id in ids {
        let _ = writeln!(out, "{}", id);
    }
    out
}

/// Selection-scoped failure, shown in place of the record.
pub fn print_selection_error(err: &LensError) {
    match err {
        LensError::RecordNotFound(id) => eprintln!("❌ No record for Image ID {}", id),
        LensError::OriginalContentMissing(id) => {
            eprintln!("❌ Original content unavailable for Image ID {}: {}", id, err)
        }
        other => eprintln!("💥 {}", other),
    }
}

pub fn print_doctor(report: &DoctorReport) {
    eprintln!("promptlens doctor ({})", report.promptlens_version);
    eprintln!("{}", RULE);
    eprintln!(
        "metadata: {} rows, {} distinct ids  ({})",
        report.tables.metadata_rows, report.tables.distinct_ids, report.inputs.metadata
    );
    for t in &report.tables.models {
        eprintln!(
            "{:<8} {} rows, covers {}/{} ids  ({})",
            t.model.label(),
            t.rows,
            t.covered_ids,
            report.tables.distinct_ids,
            t.path
        );
    }
    eprintln!(
        "images:  {} of {} present  ({})",
        report.images.present, report.images.referenced, report.inputs.images_dir
    );
    eprintln!();

    let errors = report.diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = report.diagnostics.len() - errors;
    if errors > 0 {
        eprintln!(
            "✖ Dataset has problems ({} error{}, {} warning{})",
            errors,
            if errors != 1 { "s" } else { "" },
            warnings,
            if warnings != 1 { "s" } else { "" }
        );
    } else if warnings > 0 {
        eprintln!(
            "⚠️  Dataset OK with warnings ({} warning{})",
            warnings,
            if warnings != 1 { "s" } else { "" }
        );
    } else {
        eprintln!("✔ Dataset OK");
    }

    for d in &report.diagnostics {
        eprintln!("{}", d.format_terminal());
    }
    if !report.suggested_actions.is_empty() {
        eprintln!("\nSuggested actions:");
        for a in &report.suggested_actions {
            eprintln!("  - {}", a.title);
        }
    }
}
