//! Detection history callers.

// crates.io
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{
	_prelude::*,
	api,
	descriptor,
	error::ConfigError,
	gateway::{Gateway, GatewayRequest},
	http::GatewayHttpClient,
};

const QUERY_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Offset and limit of a history listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
	/// Number of records to skip.
	pub offset: u32,
	/// Maximum number of records to return.
	pub limit: u32,
}
impl Page {
	/// Default page size used by the backend.
	pub const DEFAULT_LIMIT: u32 = 10;

	/// Creates a page.
	pub fn new(offset: u32, limit: u32) -> Self {
		Self { offset, limit }
	}
}
impl Default for Page {
	fn default() -> Self {
		Self::new(0, Self::DEFAULT_LIMIT)
	}
}

/// One stored detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectRecord {
	/// Record identifier.
	pub id: i64,
	/// Owner of the record.
	pub user_id: i64,
	/// MIME type of the analysed image.
	#[serde(default)]
	pub image_mime_type: Option<String>,
	/// Ingredient labels found in the image.
	#[serde(default)]
	pub detected_ingredients: Option<Vec<String>>,
	/// Recipe recommendation produced for the ingredients.
	#[serde(default)]
	pub recommendation: Option<String>,
	/// Creation timestamp as rendered by the backend.
	pub created_at: String,
}

/// Payload for [`Gateway::create_detect`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CreateDetectRequest {
	/// Owner of the record.
	pub user_id: i64,
	/// MIME type of the analysed image.
	pub image_mime_type: Option<String>,
	/// Base64-encoded image, when the record should keep a copy.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image_base64: Option<String>,
	/// Ingredient labels found in the image.
	pub detected_ingredients: Option<Vec<String>>,
	/// Recipe recommendation produced for the ingredients.
	pub recommendation: Option<String>,
}

/// Date-filtered listing returned by [`Gateway::detects_by_date`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectsByDate {
	/// Number of records matching the filter, across all pages.
	pub total: u64,
	/// Offset echoed by the backend.
	pub offset: u32,
	/// Limit echoed by the backend.
	pub limit: u32,
	/// Inclusive start date echoed by the backend.
	#[serde(default)]
	pub start_date: Option<String>,
	/// Inclusive end date echoed by the backend.
	#[serde(default)]
	pub end_date: Option<String>,
	/// Records on this page, newest first.
	pub detects: Vec<DetectRecord>,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Fetches one detection record.
	pub async fn detect_detail(&self, detect_id: i64) -> Result<DetectRecord> {
		let url =
			descriptor::join(&self.descriptor.endpoints.detect, &format!("detect-detail/{detect_id}"))?;
		let response = self.send(url.as_str(), GatewayRequest::get()).await?;

		api::read_json("Fetch detect detail", response).await
	}

	/// Stores a detection record.
	pub async fn create_detect(&self, record: &CreateDetectRequest) -> Result<DetectRecord> {
		let url = descriptor::join(&self.descriptor.endpoints.detect, "detect-detail")?;
		let response = self.send(url.as_str(), GatewayRequest::post().json(record)?).await?;

		api::read_json("Create detect", response).await
	}

	/// Lists a user's detections, newest first.
	pub async fn user_detects(&self, user_id: i64, page: Page) -> Result<Vec<DetectRecord>> {
		let mut url = descriptor::join(&self.descriptor.endpoints.detect, &format!("user/{user_id}"))?;

		append_page(&mut url, page);

		let response = self.send(url.as_str(), GatewayRequest::get()).await?;

		api::read_json("Fetch user detects", response).await
	}

	/// Lists a user's detections created between `start` and `end`, both inclusive and both
	/// optional.
	pub async fn detects_by_date(
		&self,
		user_id: i64,
		start: Option<Date>,
		end: Option<Date>,
		page: Page,
	) -> Result<DetectsByDate> {
		let mut url =
			descriptor::join(&self.descriptor.endpoints.detect, &format!("user/{user_id}/by-date"))?;

		append_page(&mut url, page);

		if let Some(start) = start {
			url.query_pairs_mut().append_pair("start_date", &format_date(start)?);
		}
		if let Some(end) = end {
			url.query_pairs_mut().append_pair("end_date", &format_date(end)?);
		}

		let response = self.send(url.as_str(), GatewayRequest::get()).await?;

		api::read_json("Fetch detects by date", response).await
	}
}

fn append_page(url: &mut Url, page: Page) {
	url.query_pairs_mut()
		.append_pair("offset", &page.offset.to_string())
		.append_pair("limit", &page.limit.to_string());
}

fn format_date(date: Date) -> Result<String, ConfigError> {
	Ok(date.format(QUERY_DATE)?)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::date;
	// self
	use super::*;

	#[test]
	fn query_dates_use_iso_calendar_format() {
		assert_eq!(format_date(date!(2024 - 01 - 05)).expect("Dates should format."), "2024-01-05");
	}

	#[test]
	fn default_page_matches_backend_defaults() {
		let mut url = Url::parse("https://food.example.com/detect/user/7").expect("Valid URL.");

		append_page(&mut url, Page::default());

		assert_eq!(url.query(), Some("offset=0&limit=10"));
	}

	#[test]
	fn create_payload_omits_missing_image() {
		let body = serde_json::to_value(CreateDetectRequest {
			user_id: 7,
			image_mime_type: Some("image/png".into()),
			detected_ingredients: Some(vec!["tomato".into()]),
			..Default::default()
		})
		.expect("Create payload should serialize.");

		assert_eq!(
			body,
			serde_json::json!({
				"user_id": 7,
				"image_mime_type": "image/png",
				"detected_ingredients": ["tomato"],
				"recommendation": null,
			})
		);
	}
}
