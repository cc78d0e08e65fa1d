pub mod ddl;
pub mod manager;
pub mod memory;
pub mod pg_store;
pub mod sql;
pub mod store;

pub use memory::MemoryStore;
pub use pg_store::PgResourceStore;
pub use store::{RecordFields, ResourceStore, SharedStore, StoreError};
