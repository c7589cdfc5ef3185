//! Thread-safe in-memory [`CredentialStore`] for tests and short-lived processes.

// self
use crate::{
	_prelude::*,
	auth::CredentialBundle,
	store::{CredentialStore, StoreFuture},
};

type Slot = Arc<RwLock<Option<CredentialBundle>>>;

/// Keeps the bundle in-process; clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	/// Creates a store that already holds `bundle`.
	pub fn with_bundle(bundle: CredentialBundle) -> Self {
		Self(Arc::new(RwLock::new(Some(bundle))))
	}

	/// Returns the stored bundle without going through the async contract.
	pub fn snapshot(&self) -> Option<CredentialBundle> {
		self.0.read().clone()
	}
}
impl CredentialStore for MemoryStore {
	fn get(&self) -> StoreFuture<'_, Option<CredentialBundle>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn set(&self, bundle: CredentialBundle) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(bundle);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			slot.write().take();

			Ok(())
		})
	}
}
