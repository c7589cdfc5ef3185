//! Token secret wrapper that keeps credentials out of logs and renders bearer headers.

// crates.io
use reqwest::header::{HeaderValue, InvalidHeaderValue};
// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Renders `Bearer <secret>` as a header value flagged as sensitive, so HTTP stacks that
	/// honor the flag (reqwest, hyper) skip it when logging headers.
	pub fn bearer_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("eyJhbGciOiJIUzI1NiJ9.access");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn bearer_header_is_sensitive() {
		let header = TokenSecret::new("access-1")
			.bearer_header()
			.expect("Plain ASCII tokens should render as header values.");

		assert_eq!(header.to_str().expect("Header should stay ASCII."), "Bearer access-1");
		assert!(header.is_sensitive());
	}

	#[test]
	fn bearer_header_rejects_control_characters() {
		assert!(TokenSecret::new("broken\ntoken").bearer_header().is_err());
	}

	#[test]
	fn serializes_as_a_bare_string() {
		let payload = serde_json::to_string(&TokenSecret::new("refresh-1"))
			.expect("Token secrets should serialize.");

		assert_eq!(payload, "\"refresh-1\"");
	}
}
