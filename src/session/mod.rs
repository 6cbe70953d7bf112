//! Session state container and its lifecycle.
//!
//! # Lifecycle
//! ```text
//! startup:        persistence.rs (load_persisted_session) → container.rs (new)
//! connect modal:  initialize(client, address) → initialised
//! network change: switch.rs (rebuild_client, wallet carried over)
//! send / sign:    dispatch.rs (gas price, sequential submit, receipts)
//! disconnect:     persisted address + key removed, bare client rebuilt
//! ```

pub mod container;
pub mod dispatch;
pub mod persistence;
pub mod state;
pub mod switch;

pub use container::ConnectionContainer;
pub use dispatch::{effective_gas_price, PendingTransactions, SendOptions};
pub use persistence::{load_persisted_session, PersistedFields};
pub use state::{Outcome, Session};
