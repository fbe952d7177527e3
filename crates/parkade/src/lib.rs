//! parkade: slot allocation and billing engine for a two-pool parking facility.

mod category;
mod facility;
mod fee;
mod pool;
mod registry;

pub use category::{Category, UnrecognizedCategory};
pub use facility::{Admission, Capacities, Departure, EntryError, ExitError, Facility, Occupancy};
pub use fee::{FeeSchedule, billable_hours};
pub use pool::{LotPool, ReleaseError, Slot};
pub use registry::{RegistryError, Session, SessionRegistry, Timestamp};
