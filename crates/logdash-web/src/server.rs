use crate::render::render_dashboard;
use crate::Result;
use http::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use logdash_core::analysis::{Report, analyze_file};
use logdash_core::AnalysisConfig;
use mime::Mime;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Pause after a failed accept before trying again
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serves a freshly computed dashboard for every request
///
/// Nothing is cached between requests: each one re-reads the log and builds
/// its own aggregates, so concurrent requests never see each other's state.
pub struct DashboardServer {
    addr: SocketAddr,
    state: Arc<DashboardState>,
}

struct DashboardState {
    input: PathBuf,
    config: AnalysisConfig,
}

impl DashboardServer {
    pub fn new(addr: SocketAddr, input: PathBuf, config: AnalysisConfig) -> Self {
        Self {
            addr,
            state: Arc::new(DashboardState { input, config }),
        }
    }

    /// Bind the configured address and serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;

        let shutdown_signal = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Received Ctrl+C, shutting down..."),
                Err(e) => {
                    tracing::error!("Failed to install Ctrl+C handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        self.serve(listener, shutdown_signal).await
    }

    /// Accept connections on `listener` until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            "Dashboard for {} listening on http://{}",
            self.state.input.display(),
            local_addr
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            // EMFILE and friends persist; don't spin on them
                            tracing::warn!("Failed to accept connection: {}", e);
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                    };
                    tracing::debug!("Accepted connection from {}", peer);

                    let state = Arc::clone(&self.state);
                    tokio::task::spawn(async move {
                        let service = service_fn(move |req| handle(req, Arc::clone(&state)));
                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            tracing::debug!("Connection from {} ended with error: {}", peer, e);
                        }
                    });
                }
                _ = &mut shutdown => {
                    tracing::info!("Dashboard server stopped");
                    return Ok(());
                }
            }
        }
    }
}

async fn handle(
    req: Request<Incoming>,
    state: Arc<DashboardState>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    tracing::debug!("{} {}", req.method(), req.uri());
    Ok(route(req.method(), req.uri().path(), state).await)
}

async fn route(method: &Method, path: &str, state: Arc<DashboardState>) -> Response<Full<Bytes>> {
    if method != Method::GET && method != Method::HEAD {
        return response(
            StatusCode::METHOD_NOT_ALLOWED,
            &mime::TEXT_PLAIN_UTF_8,
            "Method not allowed",
        );
    }

    match path {
        "/" | "/index.html" => match run_analysis(state).await {
            Ok(report) => response(
                StatusCode::OK,
                &mime::TEXT_HTML_UTF_8,
                render_dashboard(&report),
            ),
            Err(res) => res,
        },
        "/report.json" => match run_analysis(state).await {
            Ok(report) => match serde_json::to_string_pretty(&report) {
                Ok(json) => response(StatusCode::OK, &mime::APPLICATION_JSON, json),
                Err(e) => {
                    tracing::error!("Failed to serialize report: {}", e);
                    internal_error("Error rendering report")
                }
            },
            Err(res) => res,
        },
        _ => response(StatusCode::NOT_FOUND, &mime::TEXT_PLAIN_UTF_8, "Not found"),
    }
}

/// Analyze the log on the blocking pool; failures map straight to a 500
async fn run_analysis(
    state: Arc<DashboardState>,
) -> std::result::Result<Report, Response<Full<Bytes>>> {
    let analysis =
        tokio::task::spawn_blocking(move || analyze_file(&state.input, &state.config)).await;

    match analysis {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(logdash_core::Error::Io(e))) => {
            tracing::error!("Error opening file: {}", e);
            Err(internal_error("Error opening file"))
        }
        Ok(Err(e)) => {
            tracing::error!("Analysis failed: {}", e);
            Err(internal_error("Error analyzing file"))
        }
        Err(e) => {
            tracing::error!("Analysis task failed: {}", e);
            Err(internal_error("Error analyzing file"))
        }
    }
}

fn internal_error(message: &'static str) -> Response<Full<Bytes>> {
    response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &mime::TEXT_PLAIN_UTF_8,
        message,
    )
}

fn response(status: StatusCode, content_type: &Mime, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(body.into()));
    *res.status_mut() = status;

    if let Ok(value) = HeaderValue::from_str(content_type.as_ref()) {
        res.headers_mut().insert(CONTENT_TYPE, value);
    }
    res.headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    res
}
