pub mod error;
pub mod id;
pub mod query;
pub mod types;

pub use error::Error;
pub use id::ArticleId;
pub use query::{
    source_options, ArticleQuery, QueryResult, SortOrder, SourceFilter, SourceOption,
    DEFAULT_PAGE_SIZE,
};
pub use types::{Article, ArticleDraft, SUMMARY_PLACEHOLDER};

pub type Result<T> = std::result::Result<T, Error>;
