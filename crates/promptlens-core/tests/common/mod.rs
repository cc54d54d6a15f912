#![allow(dead_code)]

use std::path::{Path, PathBuf};

use promptlens_core::config::DatasetConfig;

pub const RESPONSE_HEADER: &str = "Id,Title,Body,llm_zero_shot_title,llm_zero_shot_body,llm_zero_shot_combined,llm_few_shot_title,llm_few_shot_body,llm_few_shot_combined,llm_cot_title,llm_cot_body,llm_cot_combined";

/// Writes a dataset in the default layout under `root` and returns its config.
pub struct Fixture {
    pub root: PathBuf,
}

impl Fixture {
    pub fn new(root: &Path) -> Self {
        for sub in ["Gemini", "GPT-4o", "llama-3.2", "images"] {
            std::fs::create_dir_all(root.join(sub)).unwrap();
        }
        let fx = Self {
            root: root.to_path_buf(),
        };
        fx.metadata(&[]);
        fx.responses("Gemini", &[]);
        fx.responses("GPT-4o", &[]);
        fx.responses("llama-3.2", &[]);
        fx
    }

    pub fn config(&self) -> DatasetConfig {
        DatasetConfig::with_data_dir(&self.root)
    }

    pub fn metadata(&self, rows: &[(&str, &str)]) -> &Self {
        let mut body = String::from("id,image_name\n");
        for (id, name) in rows {
            body.push_str(&format!("{},{}\n", id, name));
        }
        std::fs::write(self.root.join("metadata.csv"), body).unwrap();
        self
    }

    /// Each row is `Id` followed by the eleven text columns.
    pub fn responses(&self, dir: &str, rows: &[[&str; 12]]) -> &Self {
        let mut body = format!("{}\n", RESPONSE_HEADER);
        for r in rows {
            let cells: Vec<String> = r.iter().map(|c| csv_quote(c)).collect();
            body.push_str(&cells.join(","));
            body.push('\n');
        }
        std::fs::write(
            self.root.join(dir).join("llm_responses_combined.csv"),
            body,
        )
        .unwrap();
        self
    }

    pub fn png(&self, name: &str) -> &Self {
        let bytes = png_1x1();
        std::fs::write(self.root.join("images").join(name), bytes).unwrap();
        self
    }
}

/// A row where every text column is `<prefix>-<column>`.
pub fn row(id: &'static str, prefix: &str) -> [String; 12] {
    let cols = [
        "Title", "Body", "zt", "zb", "zc", "ft", "fb", "fc", "ct", "cb", "cc",
    ];
    let mut out: [String; 12] = Default::default();
    out[0] = id.to_string();
    for (i, c) in cols.iter().enumerate() {
        out[i + 1] = format!("{}-{}", prefix, c);
    }
    out
}

pub fn as_strs(r: &[String; 12]) -> [&str; 12] {
    std::array::from_fn(|i| r[i].as_str())
}

fn csv_quote(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn png_1x1() -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image::RgbImage::new(1, 1)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}
