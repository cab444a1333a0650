use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub type ProblemId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    /// Maps the source's difficulty label; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("easy") {
            Difficulty::Easy
        } else if label.eq_ignore_ascii_case("medium") {
            Difficulty::Medium
        } else if label.eq_ignore_ascii_case("hard") {
            Difficulty::Hard
        } else {
            Difficulty::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Unknown => "Unknown",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Difficulty::Easy => "🟢",
            Difficulty::Medium => "🟡",
            Difficulty::Hard => "🔴",
            Difficulty::Unknown => "⚪",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw problem page as delivered by the fetcher. Lives for one parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSource {
    pub id: ProblemId,
    pub title: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    pub hints: Vec<String>,
    pub url: String,
    pub html_body: String,
}

/// One worked example of a problem.
///
/// `raw` is set exactly when none of `input`, `output` and `explanation`
/// could be isolated. The constructors keep that invariant and
/// deserialization rejects examples that break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExampleRepr")]
pub struct Example {
    pub label: u32,
    pub input: Option<String>,
    pub output: Option<String>,
    pub explanation: Option<String>,
    pub image: Option<String>,
    pub raw: Option<String>,
}

#[derive(Deserialize)]
struct ExampleRepr {
    #[serde(alias = "title", deserialize_with = "deserialize_label")]
    label: u32,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    raw: Option<String>,
}

impl TryFrom<ExampleRepr> for Example {
    type Error = String;

    fn try_from(repr: ExampleRepr) -> Result<Self, Self::Error> {
        let fields = LabeledFields {
            input: repr.input,
            output: repr.output,
            explanation: repr.explanation,
        };
        match (repr.raw, fields.is_empty()) {
            (Some(raw), true) => Ok(Example::raw(repr.label, raw, repr.image)),
            (None, false) => Example::structured(repr.label, fields, repr.image)
                .ok_or_else(|| format!("example {} has no fields", repr.label)),
            (Some(_), false) => Err(format!(
                "example {} has both raw text and labeled fields",
                repr.label
            )),
            (None, true) => Err(format!(
                "example {} has neither raw text nor labeled fields",
                repr.label
            )),
        }
    }
}

impl Example {
    /// Builds an example from labeled fields. Returns `None` when every field is absent.
    pub fn structured(label: u32, fields: LabeledFields, image: Option<String>) -> Option<Self> {
        if fields.is_empty() {
            return None;
        }
        Some(Self {
            label,
            input: fields.input,
            output: fields.output,
            explanation: fields.explanation,
            image,
            raw: None,
        })
    }

    pub fn raw(label: u32, raw: String, image: Option<String>) -> Self {
        Self {
            label,
            input: None,
            output: None,
            explanation: None,
            image,
            raw: Some(raw),
        }
    }

    pub fn title(&self) -> String {
        format!("Example {}", self.label)
    }

    pub fn is_structured(&self) -> bool {
        self.raw.is_none()
    }
}

/// The three labeled sub-fields an example may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledFields {
    pub input: Option<String>,
    pub output: Option<String>,
    pub explanation: Option<String>,
}

impl LabeledFields {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.explanation.is_none()
    }
}

/// Parsed problem, the unit callers persist. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ProblemId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub markdown: String,
}

/// Reads an identifier written either as a JSON number or a numeric string.
pub fn parse_problem_id(value: &str) -> Option<ProblemId> {
    value.trim().parse().ok()
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<ProblemId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(ProblemId),
        Text(String),
    }

    match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(id) => Ok(id),
        IdRepr::Text(text) => parse_problem_id(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("problem id is not numeric: {text:?}"))
        }),
    }
}

/// Accepts `3` as well as the older `"Example 3"` title form.
fn deserialize_label<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LabelRepr {
        Number(u32),
        Title(String),
    }

    match LabelRepr::deserialize(deserializer)? {
        LabelRepr::Number(label) => Ok(label),
        LabelRepr::Title(title) => title
            .trim()
            .trim_start_matches("Example")
            .trim()
            .trim_end_matches(':')
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("bad example title: {title:?}"))),
    }
}
