pub mod pagination;
pub mod query;
pub mod service;

pub use pagination::Page;
pub use query::{ListParams, ListQuery, SortOrder};
pub use service::ResourceService;
