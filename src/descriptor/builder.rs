//! Builder and validation for [`ApiDescriptor`].

// self
use crate::{
	_prelude::*,
	descriptor::{ApiDescriptor, ServiceEndpoints},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ApiDescriptorError {
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoints must be able to act as a base for relative paths.
	#[error("The {endpoint} URL cannot act as a base URL: {url}.")]
	CannotBeABase {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Query strings and fragments would be dropped by path joins, so they are rejected.
	#[error("The {endpoint} URL must not carry a query or fragment: {url}.")]
	QueryOrFragment {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A default service URL could not be derived from the base URL.
	#[error("The {endpoint} URL cannot be derived from the base URL.")]
	Derive {
		/// Which endpoint failed.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The renewal path must not be empty.
	#[error("Renewal path must not be empty.")]
	EmptyRenewalPath,
}

/// Builder for [`ApiDescriptor`] values.
#[derive(Debug)]
pub struct ApiDescriptorBuilder {
	/// Origin every default service URL is derived from.
	pub base_url: Url,
	/// Optional override for the auth service.
	pub auth: Option<Url>,
	/// Optional override for the detection history service.
	pub detect: Option<Url>,
	/// Optional override for the AI service.
	pub ai: Option<Url>,
	/// Optional override for the cooking agent service.
	pub agent: Option<Url>,
	/// Renewal path under the auth service.
	pub renewal_path: String,
	/// Proactive renewal window.
	pub renewal_skew: Duration,
}
impl ApiDescriptorBuilder {
	/// Creates a new builder rooted at `base_url`.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			auth: None,
			detect: None,
			ai: None,
			agent: None,
			renewal_path: ApiDescriptor::DEFAULT_RENEWAL_PATH.into(),
			renewal_skew: ApiDescriptor::DEFAULT_RENEWAL_SKEW,
		}
	}

	/// Overrides the auth service URL (defaults to `<base>/auth/`).
	pub fn auth_service(mut self, url: Url) -> Self {
		self.auth = Some(url);

		self
	}

	/// Overrides the detection history service URL (defaults to `<base>/detect/`).
	pub fn detect_service(mut self, url: Url) -> Self {
		self.detect = Some(url);

		self
	}

	/// Overrides the AI service URL (defaults to `<base>/ai/`).
	pub fn ai_service(mut self, url: Url) -> Self {
		self.ai = Some(url);

		self
	}

	/// Overrides the cooking agent service URL (defaults to `<base>/agent/`).
	pub fn agent_service(mut self, url: Url) -> Self {
		self.agent = Some(url);

		self
	}

	/// Overrides the renewal path under the auth service.
	pub fn renewal_path(mut self, path: impl Into<String>) -> Self {
		self.renewal_path = path.into();

		self
	}

	/// Overrides the renewal skew; negative windows clamp to zero.
	pub fn renewal_skew(mut self, skew: Duration) -> Self {
		self.renewal_skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ApiDescriptor, ApiDescriptorError> {
		let base_url = normalize("base", self.base_url)?;
		let endpoints = ServiceEndpoints {
			auth: service("auth", &base_url, self.auth)?,
			detect: service("detect", &base_url, self.detect)?,
			ai: service("ai", &base_url, self.ai)?,
			agent: service("agent", &base_url, self.agent)?,
		};

		if self.renewal_path.trim().is_empty() {
			return Err(ApiDescriptorError::EmptyRenewalPath);
		}

		Ok(ApiDescriptor {
			base_url,
			endpoints,
			renewal_path: self.renewal_path,
			renewal_skew: self.renewal_skew,
		})
	}
}

fn service(
	endpoint: &'static str,
	base_url: &Url,
	explicit: Option<Url>,
) -> Result<Url, ApiDescriptorError> {
	let url = match explicit {
		Some(url) => url,
		None => base_url
			.join(&format!("{endpoint}/"))
			.map_err(|source| ApiDescriptorError::Derive { endpoint, source })?,
	};

	normalize(endpoint, url)
}

fn normalize(endpoint: &'static str, mut url: Url) -> Result<Url, ApiDescriptorError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ApiDescriptorError::UnsupportedScheme { endpoint, url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(ApiDescriptorError::CannotBeABase { endpoint, url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ApiDescriptorError::QueryOrFragment { endpoint, url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse descriptor test URL.")
	}

	#[test]
	fn services_default_under_the_base_url() {
		let descriptor = ApiDescriptor::builder(url("http://localhost:3000"))
			.build()
			.expect("Local descriptors should build.");

		assert_eq!(descriptor.endpoints.auth.as_str(), "http://localhost:3000/auth/");
		assert_eq!(descriptor.endpoints.detect.as_str(), "http://localhost:3000/detect/");
		assert_eq!(descriptor.endpoints.ai.as_str(), "http://localhost:3000/ai/");
		assert_eq!(descriptor.endpoints.agent.as_str(), "http://localhost:3000/agent/");
		assert_eq!(descriptor.renewal_skew, Duration::seconds(60));
	}

	#[test]
	fn overrides_gain_a_trailing_slash() {
		let descriptor = ApiDescriptor::builder(url("https://food.example.com"))
			.agent_service(url("https://agent.food.example.com/v2"))
			.build()
			.expect("Split-host descriptors should build.");

		assert_eq!(descriptor.endpoints.agent.as_str(), "https://agent.food.example.com/v2/");
	}

	#[test]
	fn invalid_urls_are_rejected() {
		let err = ApiDescriptor::builder(url("ftp://food.example.com"))
			.build()
			.expect_err("Non-HTTP schemes must be rejected.");

		assert!(matches!(err, ApiDescriptorError::UnsupportedScheme { endpoint: "base", .. }));

		let err = ApiDescriptor::builder(url("https://food.example.com"))
			.ai_service(url("https://ai.food.example.com/?v=1"))
			.build()
			.expect_err("Query strings must be rejected.");

		assert!(matches!(err, ApiDescriptorError::QueryOrFragment { endpoint: "ai", .. }));

		let err = ApiDescriptor::builder(url("https://food.example.com"))
			.renewal_path(" ")
			.build()
			.expect_err("Blank renewal paths must be rejected.");

		assert_eq!(err, ApiDescriptorError::EmptyRenewalPath);
	}

	#[test]
	fn negative_skew_clamps_to_zero() {
		let descriptor = ApiDescriptor::builder(url("https://food.example.com"))
			.renewal_skew(Duration::seconds(-5))
			.build()
			.expect("Descriptor should build.");

		assert_eq!(descriptor.renewal_skew, Duration::ZERO);
	}
}
