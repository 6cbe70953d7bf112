//! Connect modal: wallet provider selection.
//!
//! # Data Flow
//! ```text
//! container.open_modal()
//!     → state.rs (ConnectModal shows the provider list)
//!     → provider.rs (selected WalletProvider attaches a signer)
//!     → container.initialize(client, address)
//!     → modal closes
//! ```

pub mod provider;
pub mod state;

pub use provider::{
    AttachContext, AttachedWallet, EnvKeyProvider, PrivateKeyProvider, ProviderInfo,
    WalletProvider,
};
pub use state::{ConnectModal, ModalState};
