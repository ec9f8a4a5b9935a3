use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};

use styledoc_jobs::JobManager;
use styledoc_server::{build_router, AppState, InMemoryQuotaGate};

/// Run the HTTP server
#[derive(Debug, Parser)]
pub struct Cli {
    /// The address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)))]
    address: IpAddr,

    /// The port to listen on
    #[arg(long, default_value_t = 9000)]
    port: u16,

    /// The maximum number of jobs to run concurrently
    #[arg(long, default_value_t = 5)]
    max_concurrent_jobs: usize,

    /// How many hours to keep completed jobs before they're cleaned up
    #[arg(long, default_value_t = 24)]
    job_retention_hours: i64,

    /// The maximum accepted upload size, in megabytes
    #[arg(long, default_value_t = 20)]
    max_upload_mb: u64,

    /// Every card key granted this many uses before quota is exhausted
    ///
    /// `0` means unlimited.
    #[arg(long, default_value_t = 0)]
    usage_limit: u32,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let jobs = Arc::new(JobManager::new(self.max_concurrent_jobs, self.job_retention_hours));
        jobs.start_cleanup_loop(1);

        let ai_service = match styledoc_ai::HttpAiService::from_env() {
            Ok(service) => Some(Arc::new(service) as Arc<dyn styledoc_ai::AiService>),
            Err(error) => {
                tracing::info!("no AI service configured, AI-assisted endpoints will be unavailable: {error}");
                None
            }
        };

        let quota = Arc::new(InMemoryQuotaGate::new(self.usage_limit));
        let state = AppState::new(jobs, quota, ai_service, self.max_upload_mb);
        let router = build_router(state);

        let address = SocketAddr::new(self.address, self.port);
        let listener = tokio::net::TcpListener::bind(address).await.wrap_err_with(|| format!("binding to {address}"))?;
        tracing::info!("listening on http://{address}");

        axum::serve(listener, router).await.wrap_err("server error")?;
        Ok(())
    }
}
