//! Session records and their storage.
//!
//! - [`SessionStore`]: per-user CRUD, paging and history queries
//! - [`StatsCache`]: cached lifetime aggregate, rebuilt when stale

mod cache;
mod record;
mod storage;

pub use cache::StatsCache;
pub use record::{
    CompleteSession, HistoryFilter, NewSession, SessionHistory, SessionPage, SessionQuery,
    SessionRecord,
};
pub use storage::SessionStore;
