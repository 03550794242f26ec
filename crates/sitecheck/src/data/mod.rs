//! Test data: records, readers and the multi-source provider.
//!
//! ```text
//! links.json ──┐
//! data.csv ────┼──► TestDataProvider ──► Vec<WebsiteTestData> ──► runner
//! data.xlsx ───┘         │
//!                        └── filters: environment, priority, smoke
//! ```

pub mod json;
mod model;
mod provider;
pub mod tabular;

pub use model::{
    website_url_for, LinkData, LinkDataBuilder, Priority, WebsiteTestData, WebsiteTestDataBuilder,
    DEFAULT_ENVIRONMENT,
};
pub use provider::{load_source, SourceFormat, SourceValidation, TestDataProvider};
