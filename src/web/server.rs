//! Web server for wicket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::auth::{AccessGuard, LoginLimiter, SessionStore};
use crate::config::Config;
use crate::error::WicketError;
use crate::store::CredentialStore;

use super::cookies::CookieSettings;
use super::handlers::AppState;
use super::middleware::RateLimitState;
use super::router::{create_health_router, create_router};

/// Seconds between sweeps of expired lockout entries.
const LIMITER_SWEEP_SECS: u64 = 60;

/// Web server hosting the login flow and the gated pages.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Access guard shared with the session middleware.
    guard: Arc<AccessGuard>,
    /// Per-IP login rate limiting state.
    rate_limit: Arc<RateLimitState>,
}

impl WebServer {
    /// Wire a server over the given credential store.
    ///
    /// The session store, authenticator, guard and lockout policy all
    /// come from configuration; the secret must already have passed
    /// [`Config::validate`].
    pub fn new(config: &Config, store: Arc<dyn CredentialStore>) -> crate::Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| WicketError::Validation(format!("invalid server address: {}", e)))?;

        let sessions = Arc::new(SessionStore::new(
            &config.auth.secret,
            Duration::from_secs(config.auth.session_ttl_secs),
        ));
        let guard = Arc::new(AccessGuard::new(sessions.clone()));
        let limiter = LoginLimiter::with_config(
            config.auth.max_login_attempts,
            config.auth.lockout_secs,
            config.auth.lockout_secs,
        );
        let cookies = CookieSettings {
            secure: config.auth.cookie_secure,
        };

        let app_state = AppState::new(store, sessions, cookies).with_limiter(limiter);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            guard,
            rate_limit: Arc::new(RateLimitState::new(config.auth.login_rate_limit)),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> axum::Router {
        create_router(
            self.app_state.clone(),
            self.guard.clone(),
            self.rate_limit.clone(),
        )
        .merge(create_health_router())
    }

    /// Start the background sweeps over the lockout and rate-limit maps.
    fn spawn_maintenance(&self) {
        self.rate_limit.clone().start_cleanup_task();

        let limiter = self.app_state.limiter.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(LIMITER_SWEEP_SECS));
            loop {
                ticker.tick().await;
                limiter.lock().await.cleanup();
            }
        });
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        self.spawn_maintenance();
        tracing::info!("Web server listening on http://{}", local_addr);

        Ok((listener, local_addr))
    }

    /// Run the web server until it fails or the process exits.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.build_router();
        let (listener, _) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }

    /// Serve in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let router = self.build_router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
