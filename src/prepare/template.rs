//! Rendering of the prepare comment posted in reply to a create command.
//!
//! A maintainer asks for a test with
//! `@bot-testio exploratory-test create [os] [category]`. The bot answers
//! with a comment holding a pre-filled prepare object that the maintainer
//! edits and posts back as the submit comment.

use minijinja::{Environment, context};
use serde_json::Value;

use crate::error::TriggerError;

use super::model::DeviceSpec;

/// Command prefix that requests a prepare comment.
pub const CREATE_COMMAND: &str = "@bot-testio exploratory-test create";

const PREPARE_TEMPLATE: &str = include_str!("../../resources/prepare_comment.md.j2");
const PREPARE_DEFAULT: &str = include_str!("../../resources/prepare_default.json");

/// Values filled into a device spec the maintainer only partially named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDefaults {
    /// Category used when the command names only an OS.
    pub category: &'static str,
    /// Lowest OS version offered in the pre-filled spec.
    pub min_version: &'static str,
    /// Highest OS version offered in the pre-filled spec.
    pub max_version: &'static str,
}

/// Defaults applied to `create` commands.
pub const DEVICE_DEFAULTS: DeviceDefaults = DeviceDefaults {
    category: "smartphones",
    min_version: "8.0",
    max_version: "10",
};

impl DeviceDefaults {
    /// Derives a device spec from the text after [`CREATE_COMMAND`].
    ///
    /// The first word is the OS and the optional second word the category.
    /// Returns `None` when the command carries no arguments, or when the
    /// comment does not contain the command at all.
    ///
    /// ```
    /// use testio_trigger::prepare::DEVICE_DEFAULTS;
    ///
    /// let spec = DEVICE_DEFAULTS
    ///     .device_from_command("@bot-testio exploratory-test create android tablets")
    ///     .expect("arguments should yield a device");
    /// assert_eq!(spec.os, "android");
    /// assert_eq!(spec.category, "tablets");
    /// ```
    #[must_use]
    pub fn device_from_command(&self, comment: &str) -> Option<DeviceSpec> {
        let start = comment.find(CREATE_COMMAND)?;
        let arguments = comment.get(start + CREATE_COMMAND.len()..)?;
        let mut words = arguments.lines().next().unwrap_or_default().split_whitespace();

        let os = words.next()?;
        let category = words.next().unwrap_or(self.category);

        Some(DeviceSpec {
            os: os.to_owned(),
            category: category.to_owned(),
            min: self.min_version.to_owned(),
            max: Some(self.max_version.to_owned()),
        })
    }
}

/// Renders the prepare comment body.
///
/// `device` is merged into the default prepare object when present.
/// `create_comment_url` points at the comment that requested the test.
///
/// # Errors
///
/// Returns [`TriggerError::Configuration`] if the embedded resources are
/// broken or rendering fails.
pub fn render_prepare_comment(
    device: Option<&DeviceSpec>,
    create_comment_url: &str,
) -> Result<String, TriggerError> {
    let mut prepare: Value =
        serde_json::from_str(PREPARE_DEFAULT).map_err(|error| TriggerError::Configuration {
            message: format!("default prepare object is not valid JSON: {error}"),
        })?;

    if let Some(spec) = device {
        let device_value =
            serde_json::to_value(spec).map_err(|error| TriggerError::Configuration {
                message: format!("failed to serialise device spec: {error}"),
            })?;
        if let Some(object) = prepare.as_object_mut() {
            object.insert("device".to_owned(), device_value);
        }
    }

    let prepare_json =
        serde_json::to_string_pretty(&prepare).map_err(|error| TriggerError::Configuration {
            message: format!("failed to serialise prepare object: {error}"),
        })?;

    render(
        "prepare",
        PREPARE_TEMPLATE,
        context! {
            prepare_json => prepare_json,
            create_comment_url => create_comment_url,
        },
    )
}

/// Renders an embedded Markdown template without auto-escaping.
pub(crate) fn render(
    name: &str,
    source: &str,
    ctx: minijinja::Value,
) -> Result<String, TriggerError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    env.add_template(name, source)
        .map_err(|e| TriggerError::Configuration {
            message: format!("invalid {name} template: {e}"),
        })?;

    env.get_template(name)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(|e| TriggerError::Configuration {
            message: format!("{name} template rendering failed: {e}"),
        })
}
