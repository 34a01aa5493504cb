pub mod confirm;
pub mod list;
pub mod session;
pub mod sync;

pub use confirm::{Confirm, Preconfirmed};
pub use list::{FetchOutcome, FetchTicket, ListController, ModalKind};
pub use session::{AuthGate, Session, SessionStore};
pub use sync::{AssociationSync, SyncPlan};
