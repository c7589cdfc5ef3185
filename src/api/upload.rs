//! AI service callers: image upload with ingredient detection, and stored image retrieval.

// crates.io
use reqwest::multipart::{Form, Part};
// self
use crate::{
	_prelude::*,
	api,
	descriptor,
	error::ConfigError,
	gateway::{Gateway, GatewayRequest},
	http::GatewayHttpClient,
};

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "file";

/// One ingredient found in an uploaded image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
	/// Ingredient label.
	pub label: String,
	/// Detector confidence in `0.0..=1.0`.
	pub confidence: f64,
	/// Bounding box as `[x1, y1, x2, y2]` in image pixels.
	pub bbox: [f64; 4],
}

/// Result of [`Gateway::upload_image`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
	/// Name the backend stored the image under.
	pub filename: String,
	/// MIME type echoed by the backend.
	pub content_type: String,
	/// Server-side path of the stored image.
	pub file_path: String,
	/// Size of the stored image in bytes.
	pub file_size: u64,
	/// Upload timestamp as rendered by the backend.
	pub uploaded_at: String,
	/// Identifier of the uploading user, as reported by the auth service.
	#[serde(default)]
	pub user_id: Option<serde_json::Value>,
	/// Relative URL of the original image.
	pub image_url: String,
	/// Relative URL of the image with bounding boxes drawn.
	pub annotated_image_url: String,
	/// Ingredients found in the image.
	pub detections: Vec<Detection>,
	/// Number of entries in `detections`.
	pub total_detections: u32,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Uploads an image for ingredient detection.
	///
	/// The body is sent as multipart with a single `file` field; the transport sets the
	/// multipart content type, never the gateway's JSON default.
	pub async fn upload_image(
		&self,
		file_name: impl Into<String>,
		mime: &str,
		bytes: impl Into<Vec<u8>>,
	) -> Result<UploadResponse> {
		let url = descriptor::join(&self.descriptor.endpoints.ai, "upload")?;
		let part = Part::bytes(bytes.into())
			.file_name(file_name.into())
			.mime_str(mime)
			.map_err(|source| ConfigError::InvalidMime { mime: mime.to_owned(), source })?;
		let request = GatewayRequest::post().multipart(Form::new().part(UPLOAD_FIELD, part));
		let response = self.send(url.as_str(), request).await?;

		api::read_json("Upload", response).await
	}

	/// Downloads a stored image (original or annotated) by file name.
	pub async fn fetch_image(&self, filename: &str) -> Result<Vec<u8>> {
		let url =
			descriptor::join_segments(&self.descriptor.endpoints.ai, &["images", filename])?;
		let response = self.send(url.as_str(), GatewayRequest::get()).await?;

		api::read_success("Get image", response).await
	}
}
