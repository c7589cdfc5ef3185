//! Authenticated request gateway for the ingredient-detection and recipe-recommendation
//! backend: one place that attaches bearer credentials, renews them before they expire, and
//! routes every typed API call through the same session.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod descriptor;
pub mod error;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod store;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, Method, Request as ReqwestRequest,
		Response as ReqwestResponse,
	};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {::http as _, color_eyre as _, httpmock as _};
