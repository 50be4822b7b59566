use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use log::info;
use warp::{Filter, Rejection, Reply};

use super::rate_limit::RateLimiter;
use super::routes::api_routes;
use crate::error_handling::types::WebError;
use crate::session_management::session_manager::SessionManager;

/// HTTP front of the broker
pub struct WebServer {
    session_manager: Arc<SessionManager>,
    limiter: Arc<RateLimiter>,
}

impl WebServer {
    pub fn new(session_manager: Arc<SessionManager>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            session_manager,
            limiter,
        }
    }

    /// Full filter tree: API routes, CORS and access log.
    pub fn routes(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        let cors = warp::cors()
            .allow_any_origin()
            .allow_methods(vec!["GET"])
            .allow_headers(vec!["content-type", "x-request-id"]);

        api_routes(self.session_manager.clone(), self.limiter.clone())
            .with(cors)
            .with(warp::log("bankdata::request"))
    }

    /// Serve until the future is dropped.
    pub async fn start(&self, addr: SocketAddr) -> Result<(), WebError> {
        info!("Starting web server on http://{}", addr);
        warp::serve(self.routes()).run(addr).await;
        Ok(())
    }
}

/// Resolves the configured host and port into a bind address.
pub fn listen_address(host: &str, port: u16) -> Result<SocketAddr, WebError> {
    let ip: IpAddr = match host {
        "localhost" => IpAddr::from([127, 0, 0, 1]),
        other => other
            .parse()
            .map_err(|_| WebError::InvalidAddress(format!("{}:{}", host, port)))?,
    };
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_address_accepts_ip_literals() {
        let addr = listen_address("0.0.0.0", 8080).unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());

        assert!(listen_address("::1", 9000).unwrap().is_ipv6());
    }

    #[test]
    fn listen_address_maps_localhost() {
        let addr = listen_address("localhost", 3000).unwrap();
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
    }

    #[test]
    fn listen_address_rejects_hostnames() {
        assert!(matches!(
            listen_address("bank.example", 80),
            Err(WebError::InvalidAddress(_))
        ));
    }
}
