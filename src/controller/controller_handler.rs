use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::task::JoinHandle;

use crate::configuration::config::Config;
use crate::data_source::{DataSource, MockBankDataSource};
use crate::error_handling::types::*;
use crate::session_management::session_manager::SessionManager;
use crate::session_management::session_store::SessionStore;
use crate::web_interface::{listen_address, RateLimiter, WebServer};

/// Wires the store, the bank, the session manager and the HTTP server
/// together and owns their background tasks.
pub struct Controller {
    pub config: Config,
    session_manager: Arc<SessionManager>,
    limiter: Arc<RateLimiter>,
    web_server: WebServer,
    addr: SocketAddr,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        Self::with_data_source(config, Arc::new(MockBankDataSource::new()))
    }

    pub fn with_data_source(
        config: Config,
        data_source: Arc<dyn DataSource>,
    ) -> Result<Self, ControllerError> {
        debug!("[+] Building controller from {:?}", config);
        config.validate()?;
        let addr = listen_address(&config.host, config.port)?;

        let store = Arc::new(SessionStore::new(config.session_ttl()));
        let session_manager = Arc::new(SessionManager::new(
            store,
            data_source,
            config.consent_timing(),
        ));
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_window(),
            config.rate_limit_max_requests,
        ));
        let web_server = WebServer::new(session_manager.clone(), limiter.clone());

        Ok(Self {
            config,
            session_manager,
            limiter,
            web_server,
            addr,
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }

    /// Serves HTTP until Ctrl-C, then stops the background tasks.
    pub async fn run(&self) -> Result<(), ControllerError> {
        info!("[+] Starting controller");
        let every = self.config.cleanup_interval();
        let cleanup = self.session_manager.spawn_cleanup_task(every);
        let limiter_purge = self.spawn_limiter_purge();

        let result = tokio::select! {
            served = self.web_server.start(self.addr) => served.map_err(ControllerError::from),
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!("[+] Shutdown signal received");
                    Ok(())
                }
                Err(e) => {
                    error!("[!] Unable to listen for the shutdown signal: {}", e);
                    Err(ControllerError::SignalError(e.to_string()))
                }
            },
        };

        self.shutdown(&[cleanup, limiter_purge]);
        result
    }

    fn spawn_limiter_purge(&self) -> JoinHandle<()> {
        let limiter = self.limiter.clone();
        let every = self.config.rate_limit_window();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let purged = limiter.purge_idle();
                if purged > 0 {
                    debug!("Dropped {} idle rate limit bucket(s)", purged);
                }
            }
        })
    }

    fn shutdown(&self, tasks: &[JoinHandle<()>]) {
        for task in tasks {
            task.abort();
        }
        info!(
            "[+] Controller stopped with {} session(s) in store",
            self.session_manager.store().len()
        );
    }
}
