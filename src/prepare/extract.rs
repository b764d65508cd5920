//! Extraction of the fenced JSON block from free-form comment text.
//!
//! Maintainers paste the prepare object into a GitHub comment between
//! ```` ```json ```` and ```` ``` ````. Everything around the block is prose
//! and is ignored. Only the first block counts.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::TriggerError;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| compile_static(r"(?s)```json\b(.*?)```"));

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| compile_static(r"\[[^\]]+\]\(([^)\s]+)\)"));

#[expect(
    clippy::expect_used,
    reason = "patterns are string literals covered by the unit tests below"
)]
fn compile_static(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern should compile")
}

/// Parses the first ```` ```json ```` block found in `comment`.
///
/// Tab characters inside the block are replaced by spaces before parsing,
/// since comments pasted from editors regularly carry literal tabs inside
/// string values, which strict JSON rejects.
///
/// # Errors
///
/// Returns [`TriggerError::NoFencedBlock`] when the comment has no block,
/// [`TriggerError::EmptyFencedBlock`] when the block is blank, and
/// [`TriggerError::MalformedJson`] when its contents are not valid JSON.
///
/// # Example
///
/// ```
/// use testio_trigger::prepare::extract_json;
///
/// let comment = "Please run this:\n```json\n{\"answer\": 42}\n```\nthanks";
/// let value = extract_json(comment).expect("block should parse");
/// assert_eq!(value["answer"], 42);
/// ```
pub fn extract_json(comment: &str) -> Result<Value, TriggerError> {
    let body = FENCED_JSON
        .captures(comment)
        .and_then(|captures| captures.get(1))
        .ok_or(TriggerError::NoFencedBlock)?
        .as_str();

    if body.trim().is_empty() {
        return Err(TriggerError::EmptyFencedBlock);
    }

    let cleaned = body.replace('\t', " ");
    serde_json::from_str(&cleaned).map_err(|error| TriggerError::MalformedJson {
        message: error.to_string(),
    })
}

/// Returns the target of the first Markdown link after the JSON block.
///
/// The prepare comment links back to the comment that requested it; the
/// link travels along when the maintainer copies the block into the submit
/// comment, so failure reports can point at the original request.
#[must_use]
pub fn extract_create_comment_url(comment: &str) -> Option<String> {
    let block_end = FENCED_JSON.find(comment)?.end();
    let remainder = comment.get(block_end..)?;
    MARKDOWN_LINK
        .captures(remainder)
        .and_then(|captures| captures.get(1))
        .map(|target| target.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{extract_create_comment_url, extract_json};
    use crate::error::TriggerError;

    #[rstest]
    #[case::bare("```json\n{\"a\": 1}\n```")]
    #[case::surrounding_prose("Hello team!\n\n```json\n{\"a\": 1}\n```\n\nCheers")]
    #[case::same_line("see ```json {\"a\": 1} ``` above")]
    #[case::crlf("intro\r\n```json\r\n{\"a\": 1}\r\n```\r\n")]
    fn extracts_block_regardless_of_prose(#[case] comment: &str) {
        let value = extract_json(comment).expect("block should parse");

        assert_eq!(value, json!({"a": 1}));
    }

    #[rstest]
    fn only_first_block_is_used() {
        let comment = "```json\n{\"first\": true}\n```\ntext\n```json\n{\"second\": true}\n```";

        let value = extract_json(comment).expect("first block should parse");

        assert_eq!(value, json!({"first": true}));
    }

    #[rstest]
    #[case::no_fence("just some text {\"a\": 1}")]
    #[case::other_language("```yaml\na: 1\n```")]
    #[case::unterminated("```json\n{\"a\": 1}\n")]
    #[case::empty_comment("")]
    fn reports_missing_block(#[case] comment: &str) {
        let result = extract_json(comment);

        assert_eq!(result, Err(TriggerError::NoFencedBlock));
    }

    #[rstest]
    #[case::adjacent("```json```")]
    #[case::whitespace("```json\n   \n\t\n```")]
    fn reports_empty_block(#[case] comment: &str) {
        let result = extract_json(comment);

        assert_eq!(result, Err(TriggerError::EmptyFencedBlock));
    }

    #[rstest]
    fn normalises_tabs_between_tokens() {
        let comment = "```json\n{\n\t\"feature\":\t{\"title\": \"a\tb\"}\n}\n```";

        let value = extract_json(comment).expect("tabbed block should parse");

        assert_eq!(value, json!({"feature": {"title": "a b"}}));
    }

    #[rstest]
    fn reports_malformed_json_with_parser_detail() {
        let result = extract_json("```json\n{\"a\": }\n```");

        let Err(TriggerError::MalformedJson { message }) = &result else {
            panic!("expected MalformedJson, got {result:?}");
        };
        assert!(
            message.contains("expected value"),
            "parser detail missing: {message}"
        );
    }

    #[rstest]
    fn finds_link_after_block() {
        let comment = "@bot-testio exploratory-test submit\n```json\n{}\n```\n\
                       Requested in [this comment](https://github.com/o/r/pull/1#issuecomment-9).";

        assert_eq!(
            extract_create_comment_url(comment).as_deref(),
            Some("https://github.com/o/r/pull/1#issuecomment-9")
        );
    }

    #[rstest]
    #[case::no_link("```json\n{}\n```\nno link here")]
    #[case::link_only_before("[x](https://example.com)\n```json\n{}\n```")]
    #[case::no_block("[x](https://example.com)")]
    fn link_absent(#[case] comment: &str) {
        assert_eq!(extract_create_comment_url(comment), None);
    }
}
