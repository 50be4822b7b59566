use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::session_management::session::Session;

/// API error payload
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Body returned when a data request opens a session.
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}

impl From<&Session> for SessionCreatedResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.to_string(),
            expires_at: format_timestamp(session.expires_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub example_psns: Vec<(&'static str, &'static str)>,
}

impl ApiInfo {
    pub fn current() -> Self {
        Self {
            name: "Bank Data API",
            version: env!("CARGO_PKG_VERSION"),
            endpoints: ENDPOINTS
                .iter()
                .map(|&(method, path, description)| EndpointInfo {
                    method,
                    path,
                    description,
                })
                .collect(),
            example_psns: EXAMPLE_PSNS.to_vec(),
        }
    }
}

pub const ENDPOINTS: [(&str, &str, &str); 6] = [
    ("GET", "/", "API information"),
    ("GET", "/docs/", "Redoc documentation"),
    ("GET", "/api-spec", "OpenAPI specification (YAML)"),
    ("GET", "/citizen/{PSN}/BankingData", "Initiate data request"),
    ("GET", "/request/{sessionID}", "Check session status"),
    ("GET", "/citizen/{PSN}/BankingData/{sessionID}", "Retrieve banking data"),
];

pub const EXAMPLE_PSNS: [(&str, &str); 6] = [
    ("1234567890", "Has banking data"),
    ("9876543210", "Has different banking data"),
    ("5555555555", "Has zero values"),
    ("1111111111", "Will deny consent"),
    ("3333333333", "Slow processing"),
    ("0000000000", "No data available (404)"),
];

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_management::session::SessionId;
    use crate::SessionStatus;
    use chrono::TimeZone;

    #[test]
    fn session_created_uses_wire_names() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let session = Session {
            id: SessionId::normalize("6f9619ff-8b86-4d11-b42d-00c04fc964ff"),
            psn: "1234567890".into(),
            status: SessionStatus::Pending,
            created_at: created,
            expires_at: created + chrono::Duration::minutes(30),
            data: None,
        };

        let json = serde_json::to_value(SessionCreatedResponse::from(&session)).unwrap();

        assert_eq!(json["sessionID"], "6F9619FF-8B86-4D11-B42D-00C04FC964FF");
        assert_eq!(json["expiresAt"], "2026-01-01T12:30:00Z");
    }

    #[test]
    fn api_info_lists_every_endpoint() {
        let info = serde_json::to_value(ApiInfo::current()).unwrap();

        assert_eq!(info["endpoints"].as_array().unwrap().len(), ENDPOINTS.len());
        assert_eq!(info["example_psns"][0][0], "1234567890");
    }
}
