//! Backend descriptor: service base URLs and renewal policy consumed by the gateway.
//!
//! The product is served by three backends behind one origin (auth + detection history,
//! AI upload, cooking agent). Each service gets its own base URL so deployments that split
//! them across hosts only need a different descriptor.

pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Base URLs of the backend services, each ending with `/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
	/// Auth service (`login`, `refresh`, `me`, ...).
	pub auth: Url,
	/// Detection history service (`detect-detail`, `user/{id}`).
	pub detect: Url,
	/// AI service that runs ingredient detection on uploads.
	pub ai: Url,
	/// Cooking agent service.
	pub agent: Url,
}

/// Immutable backend descriptor consumed by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescriptor {
	/// Origin that relative request targets are resolved against.
	pub base_url: Url,
	/// Per-service base URLs.
	pub endpoints: ServiceEndpoints,
	/// Path of the renewal endpoint, relative to the auth service.
	pub renewal_path: String,
	/// Window before expiry in which the gateway renews proactively.
	#[serde(with = "skew_millis")]
	pub renewal_skew: Duration,
}
impl ApiDescriptor {
	/// Default renewal skew (60 seconds).
	pub const DEFAULT_RENEWAL_SKEW: Duration = Duration::seconds(60);
	/// Default renewal path under the auth service.
	pub const DEFAULT_RENEWAL_PATH: &'static str = "refresh";

	/// Creates a new builder rooted at `base_url`.
	pub fn builder(base_url: Url) -> ApiDescriptorBuilder {
		ApiDescriptorBuilder::new(base_url)
	}

	/// Resolves a caller-supplied target against the base URL; absolute URLs pass through.
	pub fn resolve(&self, target: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(target)
			.map_err(|source| ConfigError::InvalidTarget { target: target.to_owned(), source })
	}

	/// Absolute URL of the renewal endpoint.
	pub fn renewal_url(&self) -> Result<Url, ConfigError> {
		join(&self.endpoints.auth, &self.renewal_path)
	}
}

/// Joins `path` onto a service base URL.
pub(crate) fn join(base: &Url, path: &str) -> Result<Url, ConfigError> {
	base.join(path).map_err(|source| ConfigError::InvalidTarget { target: path.to_owned(), source })
}

/// Appends `segments` to a service base URL, escaping each as a single path segment.
///
/// `/`, `?` and `#` inside a segment are percent-encoded; `.` and `..` segments are dropped.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ConfigError> {
	let mut joined = base.clone();

	joined
		.path_segments_mut()
		.map_err(|()| ConfigError::InvalidTarget {
			target: segments.join("/"),
			source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
		})?
		.pop_if_empty()
		.extend(segments);

	Ok(joined)
}

mod skew_millis {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use super::*;

	pub(super) fn serialize<S>(skew: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(i64::try_from(skew.whole_milliseconds()).unwrap_or(i64::MAX))
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::milliseconds)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn descriptor() -> ApiDescriptor {
		ApiDescriptor::builder(Url::parse("https://food.example.com/app").expect("Valid URL."))
			.build()
			.expect("Default descriptor should build.")
	}

	#[test]
	fn relative_targets_resolve_against_the_base() {
		let descriptor = descriptor();

		assert_eq!(
			descriptor.resolve("detect/user/7?offset=0").expect("Relative target.").as_str(),
			"https://food.example.com/app/detect/user/7?offset=0"
		);
		assert_eq!(
			descriptor.resolve("https://cdn.example.com/x").expect("Absolute target.").as_str(),
			"https://cdn.example.com/x"
		);
	}

	#[test]
	fn renewal_url_lives_under_the_auth_service() {
		assert_eq!(
			descriptor().renewal_url().expect("Renewal URL.").as_str(),
			"https://food.example.com/app/auth/refresh"
		);
	}

	#[test]
	fn joined_segments_cannot_escape_their_route() {
		let descriptor = descriptor();
		let url = join_segments(&descriptor.endpoints.ai, &["images", "../a1.png?size=big#top"])
			.expect("Segments should join.");

		assert_eq!(
			url.as_str(),
			"https://food.example.com/app/ai/images/..%2Fa1.png%3Fsize=big%23top"
		);
		assert_eq!(url.query(), None);
		assert_eq!(url.fragment(), None);

		let url = join_segments(&descriptor.endpoints.agent, &["status", ".."])
			.expect("Segments should join.");

		assert_eq!(url.as_str(), "https://food.example.com/app/agent/status");
	}

	#[test]
	fn descriptor_round_trips_through_json() {
		let descriptor = descriptor();
		let payload = serde_json::to_value(&descriptor).expect("Descriptor should serialize.");

		assert_eq!(payload["renewal_skew"], 60_000);

		let restored: ApiDescriptor =
			serde_json::from_value(payload).expect("Descriptor should deserialize.");

		assert_eq!(restored, descriptor);
	}
}
