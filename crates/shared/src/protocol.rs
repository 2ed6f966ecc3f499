use serde::{Deserialize, Serialize};

/// Body of `POST /api/analyze`. Both keys are always present on the wire;
/// either value may be blank, but the server rejects the pair being blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub text: String,
    pub url: String,
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Signals extracted from the analyzed text. Clients render a one-line
/// summary from `word_count`, `all_caps_count`, `numbers_count` and
/// `links`; the remaining fields ride along and are preserved verbatim in
/// the downloadable report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFeatures {
    pub word_count: usize,
    pub all_caps_count: usize,
    pub exclamations: usize,
    pub questions: usize,
    pub clickbait_matches: Vec<String>,
    pub numbers_count: usize,
    pub links: Vec<String>,
}

/// Success body of `POST /api/analyze`.
///
/// Held by clients only for one display cycle and replaced wholesale on the
/// next successful exchange, never merged or patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub verdict: String,
    pub score: u8,
    pub features: TextFeatures,
    #[serde(default)]
    pub flagged_sentences: Vec<String>,
    #[serde(default)]
    pub advice: Vec<String>,
}
