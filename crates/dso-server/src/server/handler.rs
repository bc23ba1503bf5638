//! Request routing and the `/modulate` handler.

use dso_types::{Limits, ModulateRequest};
use dso_synth::synthesize;

use crate::config::ServerConfig;
use crate::cors::ALLOWED_METHODS;
use crate::http::{Method, Request, Response, Status};

use super::types::{error_codes, ErrorResponse, JsonError};

/// Path of the synthesis endpoint.
pub const MODULATE_PATH: &str = "/modulate";

/// A response together with the error it reports, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Response to write.
    pub response: Response,
    /// First error in the body, kept for logging.
    pub error: Option<JsonError>,
}

impl Reply {
    /// A successful reply.
    pub fn ok(response: Response) -> Self {
        Self {
            response,
            error: None,
        }
    }

    /// Adds headers to the response.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.response = self.response.with_headers(headers);
        self
    }

    /// Adds a header to the response.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response = self.response.with_header(name, value);
        self
    }
}

/// Routes a request and attaches CORS headers for the caller's origin.
pub fn route(request: &Request, config: &ServerConfig) -> Reply {
    let origin = request.origin();

    if request.path != MODULATE_PATH {
        return error_response(
            Status::NotFound,
            ErrorResponse::new(
                error_codes::NOT_FOUND,
                format!("No route for {}", request.path),
            ),
        )
        .with_headers(config.cors.response_headers(origin));
    }

    let reply = match &request.method {
        Method::Post => match modulate_json(&request.body, &config.limits) {
            Ok(json) => Reply::ok(Response::json(Status::Ok, json)),
            Err((status, error)) => error_response(status, error),
        },
        Method::Options => {
            return Reply::ok(
                Response::new(Status::NoContent)
                    .with_header("Allow", ALLOWED_METHODS)
                    .with_headers(config.cors.preflight_headers(origin)),
            );
        }
        other => error_response(
            Status::MethodNotAllowed,
            ErrorResponse::new(
                error_codes::METHOD_NOT_ALLOWED,
                format!("{} is not allowed on {}", other.as_str(), MODULATE_PATH),
            ),
        )
        .with_header("Allow", ALLOWED_METHODS),
    };

    reply.with_headers(config.cors.response_headers(origin))
}

/// Handles a `/modulate` body and returns the serialized waveform set.
///
/// An empty body is treated as `{}`, so every field takes its default.
pub fn modulate_json(body: &[u8], limits: &Limits) -> Result<String, (Status, ErrorResponse)> {
    let request: ModulateRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ModulateRequest::default()
    } else {
        serde_json::from_slice(body).map_err(|e| {
            (
                Status::BadRequest,
                ErrorResponse::new(
                    error_codes::INVALID_JSON,
                    format!("Invalid request JSON: {}", e),
                ),
            )
        })?
    };

    let params = request.into_params(limits).map_err(|e| {
        (
            Status::BadRequest,
            ErrorResponse::from_error(JsonError::from(&e)),
        )
    })?;

    let waves = synthesize(&params).map_err(|e| {
        (
            Status::InternalServerError,
            ErrorResponse::new(error_codes::SYNTHESIS, e.to_string()),
        )
    })?;

    serde_json::to_string(&waves).map_err(|e| {
        (
            Status::InternalServerError,
            ErrorResponse::new(
                error_codes::SERIALIZE,
                format!("Failed to serialize response: {}", e),
            ),
        )
    })
}

/// Builds a JSON error reply.
pub fn error_response(status: Status, error: ErrorResponse) -> Reply {
    Reply {
        response: Response::json(status, error.to_json()),
        error: error.errors.into_iter().next(),
    }
}
