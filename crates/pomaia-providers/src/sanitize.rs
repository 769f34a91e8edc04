//! Repairs for the JSON formatting defects local models commonly emit
//!
//! Models asked to "return only JSON" still wrap the document in a markdown code
//! fence or leave a trailing comma behind the last element. [`sanitize_reply`]
//! undoes exactly those two defects and nothing else; anything more exotic
//! (single quotes, unescaped newlines) is left for the parser to reject.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:json|JSON)?").expect("valid leading fence pattern"));

static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```$").expect("valid trailing fence pattern"));

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:,\s*)+([\]}])").expect("valid trailing comma pattern"));

/// Clean a raw oracle reply so it can be handed to the JSON parser.
///
/// Strips one leading code fence (```` ```json ```` or ```` ``` ````), one trailing
/// fence and the surrounding whitespace, then removes commas that directly precede
/// a closing `]` or `}`. Text that already parses as JSON is returned as-is after
/// fence stripping, so commas inside string values survive. Never fails.
///
/// Idempotent for replies wrapped in at most one fence; a reply with stacked
/// fences loses one layer per call.
pub fn sanitize_reply(raw: &str) -> String {
    let unfenced = strip_fences(raw);

    if unfenced.is_empty() || serde_json::from_str::<serde_json::Value>(unfenced).is_ok() {
        return unfenced.to_string();
    }

    TRAILING_COMMA.replace_all(unfenced, "$1").into_owned()
}

fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(found) = LEADING_FENCE.find(text) {
        text = &text[found.end()..];
    }
    if let Some(found) = TRAILING_FENCE.find(text) {
        text = &text[..found.start()];
    }

    text.trim()
}
