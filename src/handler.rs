//! Resize request handling around the core pipeline.
//!
//! A [`ResizeRequest`] names a source object and a box. The handler fetches the
//! object, fits it, stores the canvas as `<stem>_<width>x<height>.png` with
//! public-read visibility, and answers with a [`ResizeResponse`] carrying the
//! download locator or the failure message.

use std::collections::BTreeMap;

use enough::Stop;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::FitError;
use crate::format;
use crate::limits::Limits;
use crate::pipeline::FitRequest;
use crate::scale::{BoundingBox, Filter};
use crate::store::{Acl, ObjectStore, StoreError};

/// Incoming resize request. Missing or zero dimensions use the default box.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResizeRequest {
    pub filename: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub download: String,
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResponse {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
}

fn is_zero(v: &u16) -> bool {
    *v == 0
}

impl ResizeResponse {
    fn success(download: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_owned(), "application/json".to_owned());
        Self {
            status_code: 200,
            headers,
            body: ResponseBody {
                download,
                error: String::new(),
            },
        }
    }

    fn failure(err: &HandlerError) -> Self {
        Self {
            status_code: err.status_code(),
            headers: BTreeMap::new(),
            body: ResponseBody {
                download: String::new(),
                error: err.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HandlerError {
    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Fit(e) => e.status_code(),
            HandlerError::Store(e) => e.status_code(),
        }
    }
}

/// Handler settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Substituted per axis when a request dimension is zero.
    pub default_box: BoundingBox,
    pub filter: Filter,
    pub limits: Limits,
    /// Visibility of stored canvases.
    pub acl: Acl,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            default_box: BoundingBox::DEFAULT,
            filter: Filter::Nearest,
            limits: Limits::default(),
            acl: Acl::PublicRead,
        }
    }
}

impl HandlerConfig {
    /// Box for `request`, with zero dimensions replaced by the default.
    pub fn bounding_box(&self, request: &ResizeRequest) -> BoundingBox {
        BoundingBox {
            width: if request.width == 0 {
                self.default_box.width
            } else {
                request.width
            },
            height: if request.height == 0 {
                self.default_box.height
            } else {
                request.height
            },
        }
    }
}

/// Key under which the fitted canvas for `filename` is stored.
///
/// ```
/// use zenfit::{BoundingBox, handler::output_key};
///
/// assert_eq!(output_key("logo.png", BoundingBox::new(600, 300)), "logo_600x300.png");
/// assert_eq!(output_key("my.logo.jpg", BoundingBox::new(64, 64)), "my.logo_64x64.png");
/// ```
pub fn output_key(filename: &str, bbox: BoundingBox) -> String {
    format!(
        "{}_{}x{}.png",
        format::stem(filename),
        bbox.width,
        bbox.height
    )
}

/// Successful handler outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resized {
    pub key: String,
    pub download: String,
    pub bbox: BoundingBox,
}

/// Fetch, fit and store; errors are returned unmapped.
pub fn try_handle<S: ObjectStore + ?Sized>(
    store: &S,
    request: &ResizeRequest,
    config: &HandlerConfig,
    stop: impl Stop,
) -> Result<Resized, HandlerError> {
    let bbox = config.bounding_box(request);
    let source = store.get(&request.filename)?;
    let png = FitRequest::new(&source, &request.filename)
        .bounding_box(bbox)
        .filter(config.filter)
        .with_limits(&config.limits)
        .fit(stop)?;
    let key = output_key(&request.filename, bbox);
    let download = store.put(&key, &png, config.acl)?;
    Ok(Resized {
        key,
        download,
        bbox,
    })
}

/// Handle `request`, mapping any failure to an error response.
pub fn handle<S: ObjectStore + ?Sized>(
    store: &S,
    request: &ResizeRequest,
    config: &HandlerConfig,
    stop: impl Stop,
) -> ResizeResponse {
    match try_handle(store, request, config, stop) {
        Ok(resized) => {
            info!(
                filename = %request.filename,
                key = %resized.key,
                width = resized.bbox.width,
                height = resized.bbox.height,
                "resized"
            );
            ResizeResponse::success(resized.download)
        }
        Err(err) => {
            warn!(filename = %request.filename, error = %err, "resize failed");
            ResizeResponse::failure(&err)
        }
    }
}
