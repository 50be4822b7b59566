use std::convert::Infallible;
use std::sync::Arc;

use log::{error, info};
use warp::http::StatusCode;
use warp::path::Tail;
use warp::reply::{self, Response};
use warp::{Filter, Rejection, Reply};

use super::docs::{serve_asset, OPENAPI_DOCUMENT, REDOC_PAGE};
use super::rate_limit::RateLimiter;
use super::types::{ApiError, ApiInfo, SessionCreatedResponse};
use super::validation::{is_valid_psn, is_valid_session_id};
use crate::error_handling::types::SessionError;
use crate::session_management::session::SessionId;
use crate::session_management::session_manager::{SessionManager, StatusReport};

/// Non-standard code the requesting party expects for a refused consent.
pub const CONSENT_DENIED: u16 = 590;

fn log_request(request_id: Option<&str>, operation: &str, details: &str) {
    match request_id {
        Some(id) => info!("[{}] {}: {}", id, operation, details),
        None => info!("{}: {}", operation, details),
    }
}

fn error_reply(message: impl Into<String>, status: StatusCode) -> Response {
    reply::with_status(reply::json(&ApiError::new(message)), status).into_response()
}

fn empty_reply(status: StatusCode) -> Response {
    reply::with_status(reply::reply(), status).into_response()
}

fn consent_denied_status() -> StatusCode {
    StatusCode::from_u16(CONSENT_DENIED).unwrap_or(StatusCode::FORBIDDEN)
}

fn with_manager(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
    warp::any().map(move || manager.clone())
}

fn with_limiter(
    limiter: Arc<RateLimiter>,
) -> impl Filter<Extract = (Arc<RateLimiter>,), Error = Infallible> + Clone {
    warp::any().map(move || limiter.clone())
}

fn request_id() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("x-request-id")
}

/// GET /citizen/:psn/BankingData
pub async fn handle_data_request(
    psn: String,
    request_id: Option<String>,
    manager: Arc<SessionManager>,
) -> Result<Response, Rejection> {
    let rid = request_id.as_deref();
    log_request(rid, "data_request", &format!("Received request for PSN {}", psn));

    if !is_valid_psn(&psn) {
        log_request(rid, "data_request", &format!("Invalid PSN format: {}", psn));
        return Ok(error_reply("Invalid PSN format", StatusCode::BAD_REQUEST));
    }

    match manager.request_data(&psn) {
        Ok(session) => {
            log_request(
                rid,
                "data_request",
                &format!("Created session {} for PSN {}", session.id, psn),
            );
            Ok(reply::with_status(
                reply::json(&SessionCreatedResponse::from(&session)),
                StatusCode::OK,
            )
            .into_response())
        }
        Err(e) => {
            log_request(rid, "data_request", &format!("{} (PSN {})", e, psn));
            Ok(error_reply(e.to_string(), StatusCode::NOT_FOUND))
        }
    }
}

/// GET /request/:session_id
pub async fn handle_session_status(
    session_id: String,
    request_id: Option<String>,
    manager: Arc<SessionManager>,
    limiter: Arc<RateLimiter>,
) -> Result<Response, Rejection> {
    let rid = request_id.as_deref();
    log_request(
        rid,
        "get_session_status",
        &format!("Status check for session {}", session_id),
    );

    if !is_valid_session_id(&session_id) {
        log_request(
            rid,
            "get_session_status",
            &format!("Invalid session ID format: {}", session_id),
        );
        return Ok(error_reply(
            "Invalid session ID format",
            StatusCode::BAD_REQUEST,
        ));
    }

    if !limiter.check(SessionId::normalize(&session_id).as_str()) {
        log_request(
            rid,
            "get_session_status",
            &format!("Rate limit exceeded for session {}", session_id),
        );
        return Ok(error_reply("Too many requests", StatusCode::TOO_MANY_REQUESTS));
    }

    let report = manager.session_status(&session_id);
    log_request(
        rid,
        "get_session_status",
        &format!("Session {} is {:?}", session_id, report),
    );

    Ok(match report {
        StatusReport::Ready => empty_reply(StatusCode::OK),
        StatusReport::Pending => empty_reply(StatusCode::ACCEPTED),
        StatusReport::Denied => empty_reply(consent_denied_status()),
        StatusReport::NotFound => {
            error_reply("Session not found or expired", StatusCode::NOT_FOUND)
        }
    })
}

/// GET /citizen/:psn/BankingData/:session_id
pub async fn handle_banking_data(
    psn: String,
    session_id: String,
    request_id: Option<String>,
    manager: Arc<SessionManager>,
) -> Result<Response, Rejection> {
    let rid = request_id.as_deref();
    log_request(
        rid,
        "get_data",
        &format!(
            "Data retrieval request for PSN {}, session {}",
            psn, session_id
        ),
    );

    if !is_valid_psn(&psn) {
        log_request(rid, "get_data", &format!("Invalid PSN format: {}", psn));
        return Ok(error_reply("Invalid PSN format", StatusCode::BAD_REQUEST));
    }
    if !is_valid_session_id(&session_id) {
        log_request(
            rid,
            "get_data",
            &format!("Invalid session ID format: {}", session_id),
        );
        return Ok(error_reply(
            "Invalid session ID format",
            StatusCode::BAD_REQUEST,
        ));
    }

    match manager.session_data(&psn, &session_id) {
        Ok(data) => {
            log_request(
                rid,
                "get_data",
                &format!("Returning banking data for PSN {}", psn),
            );
            Ok(reply::with_status(reply::json(&data), StatusCode::OK).into_response())
        }
        Err(e @ (SessionError::NotFound | SessionError::PsnMismatch)) => {
            log_request(
                rid,
                "get_data",
                &format!("No matching session for PSN {} ({})", psn, e),
            );
            Ok(error_reply("No matching session found", StatusCode::NOT_FOUND))
        }
        Err(e) => {
            log_request(
                rid,
                "get_data",
                &format!("Session {} not ready ({})", session_id, e),
            );
            Ok(error_reply(e.to_string(), StatusCode::NOT_FOUND))
        }
    }
}

/// GET /
pub fn api_info_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(|| reply::json(&ApiInfo::current()))
}

/// GET /citizen/:psn/BankingData
pub fn data_request_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("citizen" / String / "BankingData")
        .and(warp::get())
        .and(request_id())
        .and(with_manager(manager))
        .and_then(handle_data_request)
}

/// GET /request/:session_id
pub fn session_status_route(
    manager: Arc<SessionManager>,
    limiter: Arc<RateLimiter>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("request" / String)
        .and(warp::get())
        .and(request_id())
        .and(with_manager(manager))
        .and(with_limiter(limiter))
        .and_then(handle_session_status)
}

/// GET /citizen/:psn/BankingData/:session_id
pub fn banking_data_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("citizen" / String / "BankingData" / String)
        .and(warp::get())
        .and(request_id())
        .and(with_manager(manager))
        .and_then(handle_banking_data)
}

/// GET /docs/ and /redoc/, plus the files next to the Redoc page
pub fn docs_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let docs = warp::path("docs")
        .or(warp::path("redoc"))
        .unify()
        .and(warp::path::tail())
        .and(warp::get())
        .map(|tail: Tail| match tail.as_str() {
            "" => serve_asset(REDOC_PAGE),
            name => serve_asset(name),
        });

    let document = warp::path!("api-spec")
        .or(warp::path!("openapi.yaml"))
        .unify()
        .and(warp::get())
        .map(|| serve_asset(OPENAPI_DOCUMENT));

    docs.or(document)
}

/// Every endpoint of the API, with JSON errors for unmatched requests.
pub fn api_routes(
    manager: Arc<SessionManager>,
    limiter: Arc<RateLimiter>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    api_info_route()
        .or(data_request_route(manager.clone()))
        .or(banking_data_route(manager.clone()))
        .or(session_status_route(manager, limiter))
        .or(docs_route())
        .recover(handle_rejection)
}

pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.is_not_found() {
        return Ok(error_reply("Not found", StatusCode::NOT_FOUND));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(
            "Method not allowed",
            StatusCode::METHOD_NOT_ALLOWED,
        ));
    }

    error!("Unhandled rejection: {:?}", err);
    Ok(error_reply(
        "Internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    ))
}
