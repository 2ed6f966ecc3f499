//! The analyzer controller: a single object owning the view state and the
//! latest downloadable report, driven by named user intents.

use shared::protocol::{AnalysisReport, AnalyzeRequest, TextFeatures};
use tracing::warn;

use crate::AnalyzeBackend;

/// Shown when the user submits with both fields blank.
pub const VALIDATION_NOTICE: &str = "Please paste text or provide a URL";

/// Identifies one dispatched analyze request. Tokens increase monotonically
/// per controller; only the completion carrying the latest issued token may
/// touch view state, so overlapping requests cannot interleave renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Pretty-printed JSON echo of the last successfully rendered report. The
/// controller replaces it wholesale on each new success, releasing the
/// previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    json: String,
}

impl ReportArtifact {
    pub const SUGGESTED_FILENAME: &'static str = "analysis-report.json";

    pub fn as_str(&self) -> &str {
        &self.json
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.json.as_bytes()
    }
}

/// Plain-text contents of the results panel, in render order. List entries
/// are replaced, never appended, so re-rendering cannot accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsView {
    pub verdict: String,
    pub score: String,
    pub explanation: String,
    pub flagged_sentences: Vec<String>,
    pub advice: Vec<String>,
}

#[derive(Debug, Default)]
pub struct AnalyzerController {
    pub text_input: String,
    pub url_input: String,
    busy: bool,
    notice: Option<String>,
    results: Option<ResultsView>,
    artifact: Option<ReportArtifact>,
    last_issued: u64,
    latest_token: Option<RequestToken>,
}

impl AnalyzerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Blocking user-facing notice (validation or error), if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The visible results panel. None means hidden.
    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn report_artifact(&self) -> Option<&ReportArtifact> {
        self.artifact.as_ref()
    }

    /// The analyze intent. Trims both inputs; with nothing to send it
    /// raises the validation notice and issues no request. Otherwise the
    /// controller goes busy, hides previous results and hands back the
    /// request to dispatch together with its token.
    pub fn on_analyze(&mut self) -> Option<(RequestToken, AnalyzeRequest)> {
        let text = self.text_input.trim();
        let url = self.url_input.trim();
        if text.is_empty() && url.is_empty() {
            self.notice = Some(VALIDATION_NOTICE.to_string());
            return None;
        }

        let request = AnalyzeRequest::new(text, url);
        self.busy = true;
        self.notice = None;
        self.results = None;
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        self.latest_token = Some(token);
        Some((token, request))
    }

    /// Apply a successful exchange: render the report and prepare the
    /// downloadable artifact. Stale completions are dropped whole. Returns
    /// whether the completion was applied.
    pub fn apply_success(&mut self, token: RequestToken, report: &AnalysisReport) -> bool {
        if self.latest_token != Some(token) {
            return false;
        }
        self.busy = false;
        self.results = Some(render(report));
        match serde_json::to_string_pretty(report) {
            Ok(json) => self.artifact = Some(ReportArtifact { json }),
            Err(error) => warn!(%error, "failed to serialize report artifact"),
        }
        true
    }

    /// Apply a failed exchange: surface the message as a blocking notice
    /// and leave the results panel hidden. Stale completions are dropped.
    pub fn apply_failure(&mut self, token: RequestToken, message: &str) -> bool {
        if self.latest_token != Some(token) {
            return false;
        }
        self.busy = false;
        self.notice = Some(format!("Error: {message}"));
        true
    }

    /// One full analyze cycle: validate, dispatch, await, apply. The busy
    /// indicator clears on every completion path.
    pub async fn analyze_with(&mut self, backend: &dyn AnalyzeBackend) -> bool {
        let Some((token, request)) = self.on_analyze() else {
            return false;
        };
        match backend.analyze(&request).await {
            Ok(report) => self.apply_success(token, &report),
            Err(error) => self.apply_failure(token, &error.to_string()),
        }
    }

    /// The clear intent: empty both inputs and hide the results panel. A
    /// previously prepared artifact stays available for download.
    pub fn on_clear(&mut self) {
        self.text_input.clear();
        self.url_input.clear();
        self.results = None;
    }

    /// The copy-summary intent: `"{score} - {verdict}"`, read from the
    /// rendered panel rather than the report object. None while no results
    /// are shown.
    pub fn on_copy_summary(&self) -> Option<String> {
        self.results
            .as_ref()
            .map(|view| format!("{} - {}", view.score, view.verdict))
    }
}

fn render(report: &AnalysisReport) -> ResultsView {
    ResultsView {
        verdict: report.verdict.clone(),
        score: report.score.to_string(),
        explanation: explanation_line(&report.features),
        flagged_sentences: report.flagged_sentences.clone(),
        advice: report.advice.clone(),
    }
}

/// Derived one-liner under the score; field order and separators are part
/// of the output contract.
pub fn explanation_line(features: &TextFeatures) -> String {
    format!(
        "Word count: {}, CAPS: {}, Numbers: {}, Links: {}",
        features.word_count,
        features.all_caps_count,
        features.numbers_count,
        features.links.len()
    )
}
