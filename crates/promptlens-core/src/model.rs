use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Join key shared by the metadata and response tables.
///
/// Stored in canonical form so that `7`, ` 7`, `07` and `7.0` all address the
/// same record, matching how a numeric CSV column is read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(raw: &str) -> Self {
        Self(canonicalize_id(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        ImageId::new(s)
    }
}

impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ImageId::new(&raw))
    }
}

fn canonicalize_id(raw: &str) -> String {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return n.to_string();
    }
    // 2^53: largest range where f64 holds every integer exactly
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
            return (f as i64).to_string();
        }
    }
    s.to_string()
}

/// Rows that can be looked up by [`ImageId`].
pub trait Keyed {
    fn key(&self) -> &ImageId;
}

/// First row whose key equals `id`, in file order.
///
/// Duplicate ids are legal in every table; this is the single tie-break rule
/// used everywhere a row is looked up.
pub fn first_match<'a, T: Keyed>(rows: &'a [T], id: &ImageId) -> Option<&'a T> {
    rows.iter().find(|r| r.key() == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub id: ImageId,
    pub image_name: String,
}

impl Keyed for MetadataRecord {
    fn key(&self) -> &ImageId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponseRecord {
    #[serde(rename = "Id")]
    pub id: ImageId,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Body")]
    pub body: String,

    pub llm_zero_shot_title: String,
    pub llm_zero_shot_body: String,
    pub llm_zero_shot_combined: String,

    pub llm_few_shot_title: String,
    pub llm_few_shot_body: String,
    pub llm_few_shot_combined: String,

    pub llm_cot_title: String,
    pub llm_cot_body: String,
    pub llm_cot_combined: String,
}

impl Keyed for ModelResponseRecord {
    fn key(&self) -> &ImageId {
        &self.id
    }
}

impl ModelResponseRecord {
    pub fn output(&self, strategy: Strategy) -> StrategyOutput {
        let (title, body, combined) = match strategy {
            Strategy::ZeroShot => (
                &self.llm_zero_shot_title,
                &self.llm_zero_shot_body,
                &self.llm_zero_shot_combined,
            ),
            Strategy::FewShot => (
                &self.llm_few_shot_title,
                &self.llm_few_shot_body,
                &self.llm_few_shot_combined,
            ),
            Strategy::ChainOfThought => {
                (&self.llm_cot_title, &self.llm_cot_body, &self.llm_cot_combined)
            }
        };
        StrategyOutput {
            title: title.clone(),
            body: body.clone(),
            combined: combined.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "Gemini")]
    Gemini,
    #[serde(rename = "GPT-4")]
    Gpt4,
    #[serde(rename = "LLaMA")]
    Llama,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Gemini, Model::Gpt4, Model::Llama];

    pub fn label(&self) -> &'static str {
        match self {
            Model::Gemini => "Gemini",
            Model::Gpt4 => "GPT-4",
            Model::Llama => "LLaMA",
        }
    }

    /// Location of the response table relative to the data directory.
    pub fn default_table_path(&self) -> &'static str {
        match self {
            Model::Gemini => "Gemini/llm_responses_combined.csv",
            Model::Gpt4 => "GPT-4o/llm_responses_combined.csv",
            Model::Llama => "llama-3.2/llm_responses_combined.csv",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The table whose `Title`/`Body` columns are shown as the original content.
// TODO: source original content from metadata or a ground-truth table once the
// export carries it; today only the Gemini export has reliable Title/Body.
pub const ORIGINAL_CONTENT_MODEL: Model = Model::Gemini;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ZeroShot,
    FewShot,
    ChainOfThought,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::ZeroShot,
        Strategy::FewShot,
        Strategy::ChainOfThought,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::ZeroShot => "Zero-shot",
            Strategy::FewShot => "Few-shot",
            Strategy::ChainOfThought => "Chain-of-Thought",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOutput {
    pub title: String,
    pub body: String,
    pub combined: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalContent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ModelPanel {
    Available {
        outputs: BTreeMap<Strategy, StrategyOutput>,
    },
    Unavailable,
}

impl ModelPanel {
    pub fn is_available(&self) -> bool {
        matches!(self, ModelPanel::Available { .. })
    }

    pub fn output(&self, strategy: Strategy) -> Option<&StrategyOutput> {
        match self {
            ModelPanel::Available { outputs } => outputs.get(&strategy),
            ModelPanel::Unavailable => None,
        }
    }
}

/// Everything a presenter needs for one selected id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub id: ImageId,
    pub image_path: PathBuf,
    pub original: OriginalContent,
    pub models: BTreeMap<Model, ModelPanel>,
}

impl ResolvedRecord {
    pub fn panel(&self, model: Model) -> &ModelPanel {
        self.models.get(&model).unwrap_or(&ModelPanel::Unavailable)
    }

    pub fn output(&self, model: Model, strategy: Strategy) -> Option<&StrategyOutput> {
        self.panel(model).output(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_canonical_forms() {
        assert_eq!(ImageId::new("7"), ImageId::new(" 7 "));
        assert_eq!(ImageId::new("7"), ImageId::new("07"));
        assert_eq!(ImageId::new("7"), ImageId::new("7.0"));
        assert_ne!(ImageId::new("7"), ImageId::new("7.5"));
        assert_eq!(ImageId::new("abc-1").as_str(), "abc-1");
    }

    #[test]
    fn test_first_match_prefers_file_order() {
        let rows = vec![
            MetadataRecord {
                id: "1".into(),
                image_name: "a.png".into(),
            },
            MetadataRecord {
                id: "1".into(),
                image_name: "b.png".into(),
            },
        ];
        let hit = first_match(&rows, &ImageId::new("1")).unwrap();
        assert_eq!(hit.image_name, "a.png");
        assert!(first_match(&rows, &ImageId::new("2")).is_none());
    }

    #[test]
    fn test_model_serializes_as_label() {
        let v = serde_json::to_value(Model::Gpt4).unwrap();
        assert_eq!(v, serde_json::json!("GPT-4"));
        let s = serde_json::to_value(Strategy::ChainOfThought).unwrap();
        assert_eq!(s, serde_json::json!("chain_of_thought"));
    }
}
