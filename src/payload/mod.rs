//! Exploratory test payload construction.

mod builder;
mod model;

pub use builder::{
    ENVIRONMENT_TITLE_LIMIT, ENVIRONMENT_TITLE_SUFFIX, PayloadContext, build_payload,
    truncate_with_suffix,
};
pub use model::{
    DeviceRequirement, ExploratoryTest, PayloadEnvironment, PayloadFeature, TEST_DURATION,
    TESTING_TYPE, TestPayload,
};
