//! Record navigation over CSV packs
//!
//! Loading, parsing, position persistence, and cursor movement. The
//! [`Navigator`] ties the pieces together; the other modules are usable on
//! their own.

pub mod error;
pub mod record;
pub mod session;
pub mod source;
pub mod storage;

pub use error::{LoadError, RenderError, StoreError};
pub use record::{ParseMode, Record, RecordSet, REFERENCE_FIELD};
pub use session::{Direction, Navigator, NavigatorOptions, RestorePolicy, View};
pub use source::{FileSource, HttpSource, MemorySource, ResourceSource, Source};
pub use storage::{storage_key, MemoryStore, PositionStore, SqliteStore};
