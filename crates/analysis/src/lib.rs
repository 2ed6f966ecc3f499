//! Misinformation scoring engine: feature extraction, risk scoring and
//! sentence flagging over user-submitted text. Pure and synchronous; all
//! I/O lives in the server and client crates.

use shared::protocol::{AnalysisReport, TextFeatures};
use url::Url;

/// Phrases treated as clickbait markers, matched case-insensitively as
/// substrings of the whole text. Order is preserved in `clickbait_matches`.
pub const CLICKBAIT_WORDS: &[&str] = &[
    "shocking",
    "you won't believe",
    "unbelievable",
    "miracle",
    "secret",
    "exposed",
    "viral",
    "trending",
    "shocker",
    "can't believe",
    "mind blown",
    "what happened next",
];

/// Hosts considered credible sources. Matched against the link host with a
/// leading `www.` stripped.
pub const CREDIBLE_DOMAINS: &[&str] = &[
    "nytimes.com",
    "bbc.com",
    "theguardian.com",
    "reuters.com",
    "apnews.com",
    "washingtonpost.com",
    "who.int",
    "nature.com",
];

pub const ADVICE: [&str; 4] = [
    "Check the claim against reputable fact-checkers (e.g., Snopes, FactCheck.org, PolitiFact).",
    "Verify the original source and publication date; look for multiple independent reports.",
    "Be cautious with emotionally charged or sensational language.",
    "If the story seems important, consult primary sources or subject-matter experts.",
];

pub const VERDICT_HIGH_RISK: &str = "High risk of misinformation";
pub const VERDICT_MISLEADING: &str = "Possibly misleading / needs fact-check";
pub const VERDICT_CREDIBLE: &str = "Likely credible (still verify important claims)";

/// Analyze `text` for misinformation markers. `source_url` is the
/// user-supplied URL field, if any; it participates in the credibility
/// check alongside links found in the text itself.
pub fn analyze_text(text: &str, source_url: Option<&str>) -> AnalysisReport {
    let text_lower = text.to_lowercase();

    let clickbait_matches: Vec<String> = CLICKBAIT_WORDS
        .iter()
        .filter(|word| text_lower.contains(*word))
        .map(|word| word.to_string())
        .collect();

    let links = extract_links(text);

    let features = TextFeatures {
        word_count: word_tokens(text).count(),
        all_caps_count: word_tokens(text)
            .filter(|token| is_shouted(token, 2))
            .count(),
        exclamations: text.chars().filter(|c| *c == '!').count(),
        questions: text.chars().filter(|c| *c == '?').count(),
        clickbait_matches,
        numbers_count: digit_run_count(text),
        links,
    };

    let credible_link = features.links.iter().any(|link| is_credible_source(link))
        || source_url.is_some_and(is_credible_source);

    let mut score: i32 = 50;
    score += (features.all_caps_count as i32 * 3).min(30);
    score += ((features.exclamations + features.questions) as i32 * 2).min(20);
    score += (features.clickbait_matches.len() as i32 * 12).min(36);
    score += (features.numbers_count as i32).min(10);
    if credible_link {
        score -= 25;
    }
    let score = score.clamp(0, 100) as u8;

    AnalysisReport {
        verdict: verdict_for_score(score).to_string(),
        score,
        flagged_sentences: flag_sentences(text),
        advice: ADVICE.iter().map(|line| line.to_string()).collect(),
        features,
    }
}

pub fn verdict_for_score(score: u8) -> &'static str {
    if score >= 70 {
        VERDICT_HIGH_RISK
    } else if score >= 40 {
        VERDICT_MISLEADING
    } else {
        VERDICT_CREDIBLE
    }
}

/// Word tokens: maximal runs of alphanumeric characters or underscores.
fn word_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

/// A token is "shouted" when it consists solely of ASCII uppercase letters
/// and reaches `min_len`. Mixed-case or digit-bearing tokens never count.
fn is_shouted(token: &str, min_len: usize) -> bool {
    token.len() >= min_len && token.chars().all(|c| c.is_ascii_uppercase())
}

/// Count maximal runs of ASCII digits, wherever they appear.
fn digit_run_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_run = false;
    for c in text.chars() {
        if c.is_ascii_digit() {
            if !in_run {
                count += 1;
            }
            in_run = true;
        } else {
            in_run = false;
        }
    }
    count
}

/// Extract `http://` / `https://` links, each terminated by whitespace or a
/// closing parenthesis. A bare scheme with nothing after it is not a link.
fn extract_links(text: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut search = text;
    while let Some(pos) = search.find("http") {
        let candidate = &search[pos..];
        let scheme_len = if candidate.starts_with("https://") {
            "https://".len()
        } else if candidate.starts_with("http://") {
            "http://".len()
        } else {
            search = &search[pos + "http".len()..];
            continue;
        };
        let after = &candidate[scheme_len..];
        let end = after
            .find(|c: char| c.is_whitespace() || c == ')')
            .unwrap_or(after.len());
        if end > 0 {
            links.push(candidate[..scheme_len + end].to_string());
        }
        search = &candidate[scheme_len + end..];
    }
    links
}

/// Whether `candidate` points at one of the credible hosts. Unparseable
/// candidates (including scheme-less values) are simply not credible.
fn is_credible_source(candidate: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.strip_prefix("www.").unwrap_or(host);
    CREDIBLE_DOMAINS.iter().any(|domain| host.contains(domain))
}

/// Split the trimmed text into sentences: a sentence ends at `.`, `!` or
/// `?` followed by one or more spaces. Terminators stay with the sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            let mut next = i + 1;
            while next < bytes.len() && bytes[next] == b' ' {
                next += 1;
            }
            if next > i + 1 {
                sentences.push(&text[start..=i]);
                start = next;
                i = next;
                continue;
            }
        }
        i += 1;
    }
    sentences.push(&text[start..]);
    sentences
}

/// A sentence is flagged when it contains a clickbait phrase or a shouted
/// word of three or more letters.
fn flag_sentences(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            CLICKBAIT_WORDS.iter().any(|word| lower.contains(word))
                || word_tokens(sentence).any(|token| is_shouted(token, 3))
        })
        .map(|sentence| sentence.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_numbers_and_links() {
        let report = analyze_text("Check https://example.com/page now 42 times", None);
        // The link contributes its own word tokens: https, example, com, page.
        assert_eq!(report.features.word_count, 8);
        assert_eq!(report.features.numbers_count, 1);
        assert_eq!(
            report.features.links,
            vec!["https://example.com/page".to_string()]
        );
        assert_eq!(report.features.all_caps_count, 0);
    }

    #[test]
    fn counts_only_standalone_all_caps_words() {
        let report = analyze_text("ABCdef AB A NATO", None);
        assert_eq!(report.features.all_caps_count, 2);
    }

    #[test]
    fn link_stops_at_closing_parenthesis() {
        let report = analyze_text("(see http://example.org/a) end", None);
        assert_eq!(
            report.features.links,
            vec!["http://example.org/a".to_string()]
        );
    }

    #[test]
    fn bare_scheme_is_not_a_link() {
        let report = analyze_text("broken https:// nothing", None);
        assert!(report.features.links.is_empty());
    }

    #[test]
    fn clickbait_matches_follow_lexicon_order() {
        let report = analyze_text(
            "What happened next was SHOCKING, you won't believe it",
            None,
        );
        assert_eq!(
            report.features.clickbait_matches,
            vec![
                "shocking".to_string(),
                "you won't believe".to_string(),
                "what happened next".to_string(),
            ]
        );
    }

    #[test]
    fn neutral_text_scores_baseline_and_needs_fact_check() {
        let report = analyze_text("The committee published its annual report.", None);
        assert_eq!(report.score, 50);
        assert_eq!(report.verdict, VERDICT_MISLEADING);
        assert!(report.flagged_sentences.is_empty());
    }

    #[test]
    fn credible_source_url_lowers_score_to_credible() {
        let report = analyze_text(
            "The committee published its annual report.",
            Some("https://www.bbc.com/news/article"),
        );
        assert_eq!(report.score, 25);
        assert_eq!(report.verdict, VERDICT_CREDIBLE);
    }

    #[test]
    fn credible_link_inside_text_also_counts() {
        let calm = analyze_text("Reported at https://reuters.com/world today.", None);
        assert_eq!(calm.score, 25);
    }

    #[test]
    fn scheme_less_url_field_is_not_credible() {
        let report = analyze_text(
            "The committee published its annual report.",
            Some("bbc.com"),
        );
        assert_eq!(report.score, 50);
    }

    #[test]
    fn sensational_text_clamps_at_one_hundred() {
        let report = analyze_text(
            "SHOCKING!!! You won't believe what happened next. DOCTORS HATE this 1 trick!",
            None,
        );
        // caps 9 + punctuation 8 + clickbait 36 + numbers 1 on top of 50.
        assert_eq!(report.score, 100);
        assert_eq!(report.verdict, VERDICT_HIGH_RISK);
    }

    #[test]
    fn flags_clickbait_and_shouted_sentences() {
        let report = analyze_text(
            "SHOCKING!!! You won't believe what happened next. DOCTORS HATE this 1 trick!",
            None,
        );
        assert_eq!(
            report.flagged_sentences,
            vec![
                "SHOCKING!!!".to_string(),
                "You won't believe what happened next.".to_string(),
                "DOCTORS HATE this 1 trick!".to_string(),
            ]
        );
    }

    #[test]
    fn two_letter_shout_does_not_flag_a_sentence() {
        let report = analyze_text("The US delegation arrived. All quiet.", None);
        assert!(report.flagged_sentences.is_empty());
        assert_eq!(report.features.all_caps_count, 1);
    }

    #[test]
    fn sentences_split_on_terminator_plus_spaces() {
        assert_eq!(
            split_sentences("One.  Two! Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_sentences("No terminator"), vec!["No terminator"]);
        assert_eq!(split_sentences("v1.2 stays whole"), vec!["v1.2 stays whole"]);
    }

    #[test]
    fn advice_is_the_fixed_four_item_list() {
        let report = analyze_text("anything", None);
        assert_eq!(report.advice.len(), 4);
        assert_eq!(report.advice[0], ADVICE[0]);
        assert_eq!(report.advice[3], ADVICE[3]);
    }
}
