pub mod fallback;
pub mod forms;
pub mod gateway;
pub mod preview;
pub mod query;
pub mod robots;
pub mod sitemap;

pub use crate::domain::model::{ContentDocument, QueryOptions, SitemapEntry, StoryPage};
pub use crate::domain::ports::{ConfigProvider, ContentSource};
pub use crate::utils::error::Result;
