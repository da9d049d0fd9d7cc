use chrono::{DateTime, Utc};

use crate::{
    encode::gif::GifEncodeOpts,
    render::{
        fonts::FontBook,
        pipeline::{AnimateOpts, render_countdown_gif},
    },
};

use super::store::TimerStore;

/// Options applied to every served render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServeOpts {
    /// Animation Driver options.
    pub animate: AnimateOpts,
    /// Container Encoder options.
    pub gif: GifEncodeOpts,
}

/// Transport-agnostic HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, in emission order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl TimerResponse {
    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON, for error payloads.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    fn gif(body: Vec<u8>) -> Self {
        let headers = [
            ("Content-Type", "image/gif"),
            ("Cache-Control", "no-cache, no-store, must-revalidate"),
            ("Pragma", "no-cache"),
            ("Expires", "0"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            status: 200,
            headers,
            body,
        }
    }

    fn error(status: u16, payload: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: payload.to_string().into_bytes(),
        }
    }
}

/// Serve `GET /timer/{id}`: look up the record and stream a freshly rendered countdown GIF.
///
/// Status contract: 400 for an empty id, 404 when the record is missing or the lookup fails,
/// 500 when the record cannot be rendered, 200 with non-cacheable GIF bytes otherwise.
#[tracing::instrument(skip(store, fonts, opts))]
pub fn handle_timer_request(
    store: &dyn TimerStore,
    id: &str,
    now: DateTime<Utc>,
    fonts: &FontBook,
    opts: &ServeOpts,
) -> TimerResponse {
    let id = id.trim();
    if id.is_empty() {
        return TimerResponse::error(400, serde_json::json!({ "error": "Timer ID is required" }));
    }

    let record = match store.get(id) {
        Ok(Some(record)) => record,
        Ok(None) => {
            return TimerResponse::error(
                404,
                serde_json::json!({
                    "error": "Timer not found",
                    "details": "No timer exists with this ID",
                    "id": id,
                }),
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "timer lookup failed");
            return TimerResponse::error(
                404,
                serde_json::json!({
                    "error": "Timer not found",
                    "details": e.to_string(),
                    "id": id,
                }),
            );
        }
    };

    let rendered = record
        .to_spec()
        .and_then(|spec| render_countdown_gif(&spec, now, fonts, &opts.animate, &opts.gif));
    match rendered {
        Ok(bytes) => TimerResponse::gif(bytes),
        Err(e) => {
            tracing::error!(error = %e, "error generating timer");
            TimerResponse::error(
                500,
                serde_json::json!({
                    "error": "Internal server error",
                    "details": e.to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/serve/handler.rs"]
mod tests;
