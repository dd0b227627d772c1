//! Admin session lifecycle.
//!
//! - [`storage`]: where the session survives between runs
//! - [`store`]: the shared, observable session record
//! - [`verifier`]: checks the stored token against the backend

pub mod storage;
pub mod store;
pub mod verifier;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::SessionStore;
pub use verifier::{ProfileSource, ProfileVerifier, RetryPolicy, VerifyError, VerifyOutcome};
