use tokio::io::{AsyncBufReadExt, BufReader};

use promptlens_core::config::DatasetConfig;
use promptlens_core::model::ImageId;
use promptlens_core::report::console;
use promptlens_core::resolve;

use super::exit_codes;
use crate::cli::args::BrowseArgs;

/// One selection per input line. A failed selection is reported and the
/// session keeps going; only a load failure ends it.
pub async fn run(args: BrowseArgs, cfg: DatasetConfig) -> anyhow::Result<i32> {
    let Some(ds) = super::load(cfg).await? else {
        return Ok(exit_codes::CONFIG_ERROR);
    };

    let ids = ds.ids();
    eprintln!(
        "{} ids available. Enter an id, `:ids` to list them, `:q` to quit.",
        ids.len()
    );

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if stdin.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(l) => l,
            Err(_) => {
                eprintln!("❌ Input is not valid UTF-8; enter an image id");
                continue;
            }
        };
        let input = line.trim();
        match input {
            "" => continue,
            ":q" | ":quit" => break,
            ":ids" => {
                print!("{}", console::render_ids(&ids));
                continue;
            }
            _ => {}
        }

        let id = ImageId::new(input);
        match resolve(&id, &ds) {
            Ok(record) => {
                let view = super::view_for(record, !args.no_image).await?;
                console::print_record(&view);
            }
            Err(e) => console::print_selection_error(&e),
        }
    }

    Ok(exit_codes::OK)
}
