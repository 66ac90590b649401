use actix_web::dev::ServiceResponse;
use actix_web::error::JsonPayloadError;
use actix_web::http::header;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{Error, HttpRequest, ResponseError, Result};
use log::debug;

use crate::utils::error::CustomError;

/// Malformed or missing JSON bodies become `VALIDATION_ERROR` envelopes.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("Rejected JSON body for {}: {}", req.path(), err);
    CustomError::ValidationError(err.to_string()).into()
}

/// Renders 401s that did not come from `CustomError` (a missing `Authorization` header is
/// rejected by the bearer extractor before `verify_token` runs) as `UNAUTHENTICATED_ERROR`.
/// The `WWW-Authenticate` challenge is kept.
pub fn unauthenticated<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let rendered = res
        .response()
        .error()
        .and_then(|err| err.as_error::<CustomError>())
        .is_some();
    if rendered {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let challenge = res.response().headers().get(header::WWW_AUTHENTICATE).cloned();
    debug!("No bearer token for {} {}", res.request().method(), res.request().path());

    let mut response =
        CustomError::UnauthenticatedError("No token, authorization denied".into()).error_response();
    if let Some(value) = challenge {
        response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
    }

    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, response.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}
