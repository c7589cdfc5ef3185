//! Storage contract and built-in stores for the session's single credential bundle.

pub mod cookie;
pub mod file;
pub mod memory;

pub use cookie::CookieStore;
pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::CredentialBundle};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the session's credential bundle.
///
/// A store holds at most one bundle. [`set`](CredentialStore::set) replaces the whole bundle
/// and [`clear`](CredentialStore::clear) removes it; an empty store is the canonical
/// "logged out" signal.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the stored bundle, if any.
	fn get(&self) -> StoreFuture<'_, Option<CredentialBundle>>;

	/// Persists `bundle`, replacing any previous one.
	fn set(&self, bundle: CredentialBundle) -> StoreFuture<'_, ()>;

	/// Deletes the stored bundle. Clearing an empty store succeeds.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
