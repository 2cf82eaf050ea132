//! Turns loosely shaped insight-service payloads into `CategoryInsights`.
//!
//! The service does not commit to a single response shape, so the answer text
//! is looked up through an ordered list of extraction rules and then segmented
//! into short statements.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{domain::insight::CategoryInsights, errors::FetchError};

pub const NO_INSIGHT_MESSAGE: &str = "暂无该品类的详细洞察数据";

const MAX_INSIGHTS: usize = 5;
const MIN_FRAGMENT_CHARS: usize = 5;
const MAX_FRAGMENT_CHARS: usize = 200;
const UNSEGMENTED_PREFIX_CHARS: usize = 500;
const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？', '\n'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractionRule {
    pub path: &'static [&'static str],
}

impl ExtractionRule {
    const fn new(path: &'static [&'static str]) -> Self {
        Self { path }
    }

    /// Resolves the rule against `payload`. Missing and null values do not match.
    pub fn extract<'a>(&self, payload: &'a Value) -> Option<&'a Value> {
        self.path
            .iter()
            .try_fold(payload, |node, key| node.get(*key))
            .filter(|value| !value.is_null())
    }

    pub fn describe(&self) -> String {
        self.path.join(".")
    }
}

pub const ANSWER_RULES: [ExtractionRule; 5] = [
    ExtractionRule::new(&["c", "answers"]),
    ExtractionRule::new(&["answers"]),
    ExtractionRule::new(&["data", "answers"]),
    ExtractionRule::new(&["answer"]),
    ExtractionRule::new(&["data", "answer"]),
];

/// Answer text from the first rule with a present, non-null value.
///
/// A winning value that is not a string makes the whole payload malformed;
/// lower-priority rules are not consulted.
pub fn extract_answer(payload: &Value) -> Result<Option<&str>, FetchError> {
    let Some((rule, value)) =
        ANSWER_RULES.iter().find_map(|rule| rule.extract(payload).map(|value| (rule, value)))
    else {
        return Ok(None);
    };

    debug!(event_name = "insight.normalize.rule_matched", rule = %rule.describe());
    value.as_str().map(Some).ok_or_else(|| {
        FetchError::Parse(format!("`{}` holds {} instead of text", rule.describe(), json_kind(value)))
    })
}

pub fn normalize(payload: &Value) -> Result<CategoryInsights, FetchError> {
    let Some(answer) = extract_answer(payload)? else {
        match payload.get("message") {
            Some(message) => warn!(
                event_name = "insight.normalize.service_message",
                message = %message,
                "insight service reported a condition instead of an answer"
            ),
            None => warn!(
                event_name = "insight.normalize.unrecognized_shape",
                "insight payload did not contain a recognized answer field"
            ),
        }
        return Ok(CategoryInsights::single(NO_INSIGHT_MESSAGE));
    };

    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(CategoryInsights::single(NO_INSIGHT_MESSAGE));
    }

    let fragments: Vec<String> = answer
        .split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|fragment| {
            let chars = fragment.chars().count();
            chars > MIN_FRAGMENT_CHARS && chars < MAX_FRAGMENT_CHARS
        })
        .take(MAX_INSIGHTS)
        .map(str::to_owned)
        .collect();

    if fragments.is_empty() {
        return Ok(CategoryInsights::single(
            answer.chars().take(UNSEGMENTED_PREFIX_CHARS).collect::<String>(),
        ));
    }

    Ok(CategoryInsights::new(fragments))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
