//! Network inventory model.
//!
//! Resource records, the immutable [`Snapshot`] aggregate and the pure
//! topology derivation that fills in the derived fields before a snapshot
//! is frozen.
//!
//! ```ignore
//! let raw = provider_listing();
//! let snapshot = Snapshot::build(raw, Scope::new("us-east-1"), Utc::now())?;
//!
//! for subnet in snapshot.subnets() {
//!     println!("{} is {}", subnet.id, subnet.subnet_type);
//! }
//! ```

mod resources;
mod snapshot;
pub mod topology;

pub use resources::*;
pub use snapshot::{RawInventory, Scope, Snapshot};
