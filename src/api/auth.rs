//! Auth service callers: sign-in, registration, profile, logout, and account recovery.
//!
//! Sign-in calls are sent anonymously so a stale stored session never triggers a renewal
//! before the user has a chance to authenticate again. A successful sign-in replaces the
//! stored bundle.

// self
use crate::{
	_prelude::*,
	api::{self, MessageResponse},
	auth::{CredentialBundle, TokenResponse},
	descriptor,
	gateway::{Gateway, GatewayRequest},
	http::GatewayHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Identity provider named in a password login.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginProvider {
	/// Email and password.
	#[default]
	Email,
	/// Google account with a linked password.
	Google,
}

/// Password login payload.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
	/// Provider the account was created with.
	pub provider: LoginProvider,
}
impl LoginRequest {
	/// Email-and-password login.
	pub fn email(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into(), provider: LoginProvider::Email }
	}
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("provider", &self.provider)
			.finish()
	}
}

/// Account registration payload.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
	/// Display name.
	pub username: String,
	/// Account email.
	pub email: String,
	/// Initial password.
	pub password: String,
}
impl Debug for RegisterRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterRequest")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Display name.
	pub username: String,
	/// Account email.
	pub email: String,
	/// Whether the email address has been verified.
	pub email_verified: bool,
	/// Primary identity provider, when one is linked.
	#[serde(default)]
	pub provider: Option<String>,
	/// Whether the account has a password set.
	pub has_password: bool,
}

#[derive(Serialize)]
struct GoogleLoginRequest<'a> {
	id_token: &'a str,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
	token: &'a str,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
	email: &'a str,
}

#[derive(Serialize)]
struct SetPasswordRequest<'a> {
	password: &'a str,
	token: &'a str,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Signs in with email and password and stores the issued bundle.
	pub async fn login(&self, credentials: &LoginRequest) -> Result<CredentialBundle> {
		self.start_session("Login", "login", credentials).await
	}

	/// Creates an account and stores the bundle issued for it.
	pub async fn register(&self, account: &RegisterRequest) -> Result<CredentialBundle> {
		self.start_session("Register", "register", account).await
	}

	/// Exchanges a Google ID token for a bundle and stores it.
	pub async fn google_login(&self, id_token: &str) -> Result<CredentialBundle> {
		self.start_session("Google login", "google/login", &GoogleLoginRequest { id_token })
			.await
	}

	/// Fetches the signed-in user's profile.
	pub async fn me(&self) -> Result<UserProfile> {
		let url = descriptor::join(&self.descriptor.endpoints.auth, "me")?;
		let response = self.send(url.as_str(), GatewayRequest::get()).await?;

		api::read_json("Fetch profile", response).await
	}

	/// Ends the session.
	///
	/// The backend is notified only when a bundle is stored. The local bundle is cleared
	/// whatever the notification's outcome; a failed notification is still reported. An
	/// unreadable stored session is cleared without notifying the backend.
	pub async fn logout(&self) -> Result<()> {
		const KIND: CallKind = CallKind::Logout;

		let span = CallSpan::new(KIND, "logout");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let notified = match self.is_authenticated().await {
					Ok(true) => self.notify_logout().await,
					Ok(false) => {
						obs::decision(KIND, "no stored session; skipping backend notification");

						Ok(())
					},
					Err(e) => {
						obs::session_failure(KIND, &e);

						Ok(())
					},
				};

				self.end_session().await?;

				notified
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Confirms an email address with the token from the verification link.
	pub async fn verify_email(&self, token: &str) -> Result<MessageResponse> {
		self.anonymous_call(
			"Verify email",
			"verify-email",
			GatewayRequest::patch().json(&TokenRequest { token })?,
		)
		.await
	}

	/// Asks the backend to resend the verification email.
	pub async fn send_verification(&self, email: &str) -> Result<MessageResponse> {
		self.anonymous_call(
			"Send verification email",
			"send-verification",
			GatewayRequest::post().json(&EmailRequest { email })?,
		)
		.await
	}

	/// Requests a password reset link.
	pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
		self.anonymous_call(
			"Forgot password",
			"forgot-password",
			GatewayRequest::post().json(&EmailRequest { email })?,
		)
		.await
	}

	/// Sets a first password on a passwordless account using the token from the emailed link.
	pub async fn set_password(&self, password: &str, token: &str) -> Result<MessageResponse> {
		self.anonymous_call(
			"Set password",
			"set-password",
			GatewayRequest::patch().json(&SetPasswordRequest { password, token })?,
		)
		.await
	}

	/// Replaces an existing password using the token from a reset link.
	pub async fn change_password(&self, password: &str, token: &str) -> Result<MessageResponse> {
		self.anonymous_call(
			"Change password",
			"change-password",
			GatewayRequest::patch().json(&SetPasswordRequest { password, token })?,
		)
		.await
	}

	/// Asks the backend to email the signed-in user a link for setting a first password.
	///
	/// Only accounts created through an identity provider and without a password qualify.
	pub async fn request_set_password_email(&self) -> Result<MessageResponse> {
		let url = descriptor::join(&self.descriptor.endpoints.auth, "request-set-password-email")?;
		let response = self.send(url.as_str(), GatewayRequest::post()).await?;

		api::read_json("Request set password email", response).await
	}

	async fn start_session<B>(
		&self,
		operation: &'static str,
		path: &str,
		body: &B,
	) -> Result<CredentialBundle>
	where
		B: ?Sized + Serialize,
	{
		const KIND: CallKind = CallKind::SessionStart;

		let span = CallSpan::new(KIND, "start_session");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = descriptor::join(&self.descriptor.endpoints.auth, path)?;
				let request = GatewayRequest::post().json(body)?.anonymous();
				let response = self.send(url.as_str(), request).await?;
				let tokens: TokenResponse = api::read_json(operation, response).await?;
				let bundle = tokens
					.into_bundle()
					.map_err(|source| Error::IncompleteCredentials { operation, source })?;

				self.begin_session(bundle.clone()).await?;

				Ok::<_, Error>(bundle)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn notify_logout(&self) -> Result<()> {
		let url = descriptor::join(&self.descriptor.endpoints.auth, "logout")?;
		let response = self.send(url.as_str(), GatewayRequest::post()).await?;

		api::read_success("Logout", response).await.map(drop)
	}

	async fn anonymous_call(
		&self,
		operation: &'static str,
		path: &str,
		request: GatewayRequest,
	) -> Result<MessageResponse> {
		let url = descriptor::join(&self.descriptor.endpoints.auth, path)?;
		let response = self.send(url.as_str(), request.anonymous()).await?;

		api::read_json(operation, response).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn login_payload_uses_lowercase_provider_names() {
		let body = serde_json::to_value(LoginRequest::email("cook@example.com", "pa55word"))
			.expect("Login payload should serialize.");

		assert_eq!(
			body,
			serde_json::json!({
				"email": "cook@example.com",
				"password": "pa55word",
				"provider": "email",
			})
		);
	}

	#[test]
	fn debug_output_hides_passwords() {
		let login = format!("{:?}", LoginRequest::email("cook@example.com", "pa55word"));
		let register = format!(
			"{:?}",
			RegisterRequest {
				username: "cook".into(),
				email: "cook@example.com".into(),
				password: "pa55word".into(),
			}
		);

		assert!(!login.contains("pa55word"));
		assert!(!register.contains("pa55word"));
	}

	#[test]
	fn profile_tolerates_accounts_without_a_provider() {
		let profile: UserProfile = serde_json::from_str(
			"{\"username\":\"cook\",\"email\":\"cook@example.com\",\"email_verified\":false,\"provider\":null,\"has_password\":true}",
		)
		.expect("Profiles without a provider should parse.");

		assert_eq!(profile.provider, None);
		assert!(profile.has_password);
	}
}
