//! Assembly of the submission payload from a validated prepare request.

use crate::prepare::PrepareRequest;

use super::model::{
    DeviceRequirement, ExploratoryTest, PayloadEnvironment, PayloadFeature, TEST_DURATION,
    TESTING_TYPE, TestPayload,
};

/// Maximum length of the environment title, in characters.
pub const ENVIRONMENT_TITLE_LIMIT: usize = 80;

/// Suffix marking a shortened environment title.
pub const ENVIRONMENT_TITLE_SUFFIX: &str = "[test environment]";

/// Pull request facts that end up in the test title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadContext<'a> {
    /// Repository owner.
    pub owner: &'a str,
    /// Repository name.
    pub repo: &'a str,
    /// Pull request number.
    pub pr_number: u64,
    /// Pull request title.
    pub pr_title: &'a str,
}

impl PayloadContext<'_> {
    /// Test title, `[owner/repo/number]title`.
    #[must_use]
    pub fn test_title(&self) -> String {
        format!(
            "[{}/{}/{}]{}",
            self.owner, self.repo, self.pr_number, self.pr_title
        )
    }
}

/// Builds the submission payload.
///
/// `requirement` is the resolved device constraint, if the request carried
/// a device spec.
///
/// # Example
///
/// ```
/// use testio_trigger::payload::{PayloadContext, build_payload};
/// use testio_trigger::prepare::{Feature, PrepareRequest, TestEnvironment};
///
/// let prepare = PrepareRequest {
///     test_environment: TestEnvironment {
///         url: "https://staging.example.com".to_owned(),
///         access: "none".to_owned(),
///     },
///     feature: Feature {
///         title: "Login".to_owned(),
///         description: "Login flow".to_owned(),
///         howtofind: "Start page".to_owned(),
///         user_stories: vec!["Log in".to_owned()],
///     },
///     device: None,
///     additional_instructions: None,
/// };
/// let context = PayloadContext {
///     owner: "octo",
///     repo: "app",
///     pr_number: 7,
///     pr_title: "Login",
/// };
///
/// let payload = build_payload(&prepare, &context, None);
/// assert_eq!(payload.exploratory_test.test_title, "[octo/app/7]Login");
/// ```
#[must_use]
pub fn build_payload(
    prepare: &PrepareRequest,
    context: &PayloadContext<'_>,
    requirement: Option<DeviceRequirement>,
) -> TestPayload {
    let test_title = context.test_title();
    let environment_title = truncate_with_suffix(
        &test_title,
        ENVIRONMENT_TITLE_LIMIT,
        ENVIRONMENT_TITLE_SUFFIX,
        false,
    );
    let feature = &prepare.feature;

    TestPayload {
        exploratory_test: ExploratoryTest {
            test_title,
            test_environment: PayloadEnvironment {
                title: environment_title,
                url: prepare.test_environment.url.clone(),
                access: prepare.test_environment.access.clone(),
            },
            features: vec![PayloadFeature {
                id: 0,
                title: feature.title.clone(),
                description: feature.description.clone(),
                howtofind: feature.howtofind.clone(),
                user_stories: feature.user_stories.clone(),
            }],
            requirements: requirement.map(|resolved| vec![resolved]),
            instructions: prepare.additional_instructions.clone(),
            duration: TEST_DURATION.to_owned(),
            testing_type: TESTING_TYPE.to_owned(),
        },
    }
}

/// Caps `text` at `limit` characters, marking shortened text with `suffix`.
///
/// Text within the limit is returned unchanged unless `force` is set.
/// Otherwise the first `limit - len(suffix)` characters are kept and the
/// suffix appended. Lengths count Unicode scalar values.
///
/// ```
/// use testio_trigger::payload::truncate_with_suffix;
///
/// assert_eq!(truncate_with_suffix("short", 10, "..", false), "short");
/// assert_eq!(truncate_with_suffix("a long title", 8, "..", false), "a long..");
/// ```
#[must_use]
pub fn truncate_with_suffix(text: &str, limit: usize, suffix: &str, force: bool) -> String {
    if !force && text.chars().count() <= limit {
        return text.to_owned();
    }
    let keep = limit.saturating_sub(suffix.chars().count());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(suffix);
    truncated
}
