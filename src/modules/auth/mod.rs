pub mod hashing;
pub mod service;
pub mod store;
pub mod user_interface;

// Re-export the main types and functions
pub use hashing::{constant_time_eq, hash_password, hash_text};
pub use service::{AuthError, AuthService, PublicUser, RecoveryChallenge};
pub use store::{AuthStore, Document, RecoveryRecord, StoreError, UserRecord};
pub use user_interface::start_session;
