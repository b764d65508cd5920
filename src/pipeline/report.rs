//! Failure comment posted when an earlier action failed.

use minijinja::context;
use serde_json::Value;

use crate::error::TriggerError;
use crate::prepare::render;

const FAILURE_TEMPLATE: &str = include_str!("../../resources/failure_comment.md.j2");

/// Renders the failure comment.
///
/// `error_message` is the persisted failure, `payload` the raw handoff file
/// if one was written. JSON payloads are pretty-printed; anything else is
/// shown verbatim.
///
/// # Errors
///
/// Returns [`TriggerError::Configuration`] if the template fails to render.
pub fn render_failure_comment(
    error_message: Option<&str>,
    payload: Option<&str>,
    create_comment_url: Option<&str>,
) -> Result<String, TriggerError> {
    let pretty_payload = payload.map(|raw| {
        serde_json::from_str::<Value>(raw)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or_else(|| raw.to_owned())
    });

    render(
        "failure",
        FAILURE_TEMPLATE,
        context! {
            error_message => error_message.map(str::trim).filter(|m| !m.is_empty()),
            payload => pretty_payload,
            create_comment_url => create_comment_url,
        },
    )
}
