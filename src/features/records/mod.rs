//! Attempt and completion records.
//!
//! Two persisted record types: [`MapRecord`] (cumulative, per map) and
//! [`SessionRecord`] (scoped to one program execution). Both carry a pair of
//! optional best runs; see [`BestRun`] for the comparison rules.

mod best;
mod map;
mod session;
mod store;

pub use best::BestRun;
pub use map::MapRecord;
pub use session::SessionRecord;
pub use store::RecordStore;
