//! Blocking HTTP front end for the dashboard.
//!
//! A fixed pool of worker threads shares one `tiny_http::Server`. Each
//! request rebuilds the record from literals and renders it from scratch, so
//! workers share nothing but the read-only configuration.

use crate::page::{render_page, PageOptions};
use crate::pedigree::Pedigree;
use crate::record::ClinicalRecord;
use crate::rendering::render_pedigree_svg;
use crate::theme::Theme;
use crate::{DashboardConfig, Error, Result};
use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server};
use url::form_urlencoded;

/// A fully rendered response, independent of the transport
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self { status, content_type, body: body.into() }
    }

    fn text(status: u16, body: &str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", body)
    }

    fn from_result(result: Result<Reply>, path: &str) -> Self {
        result.unwrap_or_else(|e| {
            warn!("failed to render {}: {}", path, e);
            Reply::text(500, "internal error")
        })
    }
}

/// Quoted strong ETag: hex SHA-256 of the body
pub fn etag(body: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

/// Page options from a query string, falling back to the configured defaults.
///
/// The settings forms always send `theme`, so a query with `theme` but no
/// `ranges` means the checkbox was cleared.
pub fn page_options(query: &str, config: &DashboardConfig) -> PageOptions {
    let mut options = PageOptions::from_config(config);
    let mut submitted = false;
    let mut ranges = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            "theme" => {
                submitted = true;
                options.theme = Theme::from_name(&value).unwrap_or(config.default_theme);
            }
            "ranges" => ranges = Some(matches!(&*value, "on" | "true" | "1")),
            _ => {}
        }
    }
    match ranges {
        Some(show) => options.show_reference_ranges = show,
        None if submitted => options.show_reference_ranges = false,
        None => {}
    }
    options
}

/// Map a request line to a reply.
pub fn route(method: &Method, url: &str, config: &DashboardConfig) -> Reply {
    if *method != Method::Get {
        return Reply::text(405, "method not allowed");
    }
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let record = ClinicalRecord::sample();

    match path {
        "/" | "/index.html" => {
            let options = page_options(query, config);
            Reply::from_result(
                render_page(&record, &options, config)
                    .map(|html| Reply::new(200, "text/html; charset=utf-8", html)),
                path,
            )
        }
        "/pedigree.svg" => Reply::from_result(
            Pedigree::build(&record.patient, &record.family_history)
                .and_then(|p| render_pedigree_svg(&p))
                .map(|svg| Reply::new(200, "image/svg+xml", svg)),
            path,
        ),
        "/pedigree.dot" => Reply::from_result(
            Pedigree::build(&record.patient, &record.family_history)
                .map(|p| Reply::new(200, "text/vnd.graphviz; charset=utf-8", p.to_dot())),
            path,
        ),
        "/api/record" => Reply::from_result(
            serde_json::to_vec_pretty(&record)
                .map_err(|e| Error::Render(e.to_string()))
                .map(|body| Reply::new(200, "application/json", body)),
            path,
        ),
        "/healthz" => Reply::text(200, "ok"),
        _ => Reply::text(404, "not found"),
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn handle_request(request: Request, config: &DashboardConfig) {
    let url = request.url().to_string();
    let reply = route(request.method(), &url, config);
    let tag = etag(&reply.body);
    debug!("{} {} -> {}", request.method(), url, reply.status);

    let not_modified = reply.status == 200
        && request
            .headers()
            .iter()
            .any(|h| h.field.equiv("If-None-Match") && h.value.as_str() == tag);

    let mut response = if not_modified {
        Response::from_data(Vec::new()).with_status_code(304)
    } else {
        Response::from_data(reply.body).with_status_code(reply.status)
    };
    if let Some(h) = header("Content-Type", reply.content_type) {
        response = response.with_header(h);
    }
    if let Some(h) = header("ETag", &tag) {
        response = response.with_header(h);
    }
    if let Err(e) = request.respond(response) {
        warn!("failed to write response for {}: {}", url, e);
    }
}

/// Serve requests until `recv` fails.
///
/// `recv` also fails when the server is unblocked, so the error only counts
/// as a failure if `stopping` was not raised first.
fn worker_loop(server: &Server, config: &DashboardConfig, stopping: &AtomicBool) -> Result<()> {
    loop {
        match server.recv() {
            Ok(request) => handle_request(request, config),
            Err(e) if stopping.load(Ordering::SeqCst) => {
                debug!("worker stopping: {}", e);
                return Ok(());
            }
            Err(e) => {
                error!("worker failed to accept a request: {}", e);
                return Err(Error::Server(format!("failed to accept a request: {}", e)));
            }
        }
    }
}

/// A bound, not yet running dashboard server
pub struct DashboardServer {
    server: Arc<Server>,
    config: Arc<DashboardConfig>,
    stopping: Arc<AtomicBool>,
}

impl DashboardServer {
    /// Validate `config` and bind the listening socket.
    pub fn bind(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let server = Server::http(&config.addr)
            .map_err(|e| Error::Server(format!("failed to bind {}: {}", config.addr, e)))?;
        info!("dashboard listening on http://{}", server.server_addr());
        Ok(Self {
            server: Arc::new(server),
            config: Arc::new(config),
            stopping: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address actually bound (useful with port 0)
    pub fn local_addr(&self) -> String {
        self.server.server_addr().to_string()
    }

    /// Each worker reports its exit status on `done`.
    fn start_workers(&self, done: Sender<Result<()>>) -> Vec<JoinHandle<()>> {
        (0..self.config.workers)
            .map(|_| {
                let server = Arc::clone(&self.server);
                let config = Arc::clone(&self.config);
                let stopping = Arc::clone(&self.stopping);
                let done = done.clone();
                thread::spawn(move || {
                    let result = worker_loop(&server, &config, &stopping);
                    let _ = done.send(result);
                })
            })
            .collect()
    }

    /// Serve requests on the worker pool until the process exits.
    ///
    /// Returns the first worker failure after stopping the remaining workers.
    pub fn run(self) -> Result<()> {
        info!("starting {} workers", self.config.workers);
        let (done, finished) = mpsc::channel();
        let workers = self.start_workers(done);

        let mut failure = None;
        for _ in 0..workers.len() {
            match finished.recv() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failure = Some(e);
                    break;
                }
                Err(_) => break,
            }
        }

        if failure.is_some() {
            self.stopping.store(true, Ordering::SeqCst);
            for _ in &workers {
                self.server.unblock();
            }
        }
        for worker in workers {
            worker
                .join()
                .map_err(|_| Error::Server("worker thread panicked".into()))?;
        }
        failure.map_or(Ok(()), Err)
    }

    /// Serve in the background and return a handle that can stop the pool.
    pub fn spawn(self) -> ServerHandle {
        let (done, _) = mpsc::channel();
        let workers = self.start_workers(done);
        ServerHandle {
            addr: self.local_addr(),
            server: self.server,
            stopping: self.stopping,
            workers,
        }
    }
}

/// Handle to a server started with [`DashboardServer::spawn`]
pub struct ServerHandle {
    addr: String,
    server: Arc<Server>,
    stopping: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Base URL, e.g. `http://127.0.0.1:34567`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Unblock every worker and wait for them to finish.
    pub fn shutdown(self) {
        self.stopping.store(true, Ordering::SeqCst);
        for _ in &self.workers {
            self.server.unblock();
        }
        for worker in self.workers {
            let _ = worker.join();
        }
        info!("dashboard on {} stopped", self.addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> DashboardConfig {
        DashboardConfig::default()
    }

    #[test]
    fn query_selects_theme_and_ranges() {
        let o = page_options("theme=Dark&ranges=on", &cfg());
        assert_eq!(o.theme, Theme::Dark);
        assert!(o.show_reference_ranges);

        let o = page_options("theme=bogus", &cfg());
        assert_eq!(o.theme, Theme::Default);
        assert!(!o.show_reference_ranges);
    }

    #[test]
    fn cleared_checkbox_overrides_config() {
        let config = DashboardConfig { show_reference_ranges: true, ..cfg() };
        assert!(page_options("", &config).show_reference_ranges);
        assert!(!page_options("theme=Light", &config).show_reference_ranges);
    }

    #[test]
    fn routes() {
        let c = cfg();
        assert_eq!(route(&Method::Get, "/", &c).status, 200);
        assert_eq!(route(&Method::Get, "/healthz", &c).body, b"ok".to_vec());
        assert_eq!(route(&Method::Get, "/missing", &c).status, 404);
        assert_eq!(route(&Method::Post, "/", &c).status, 405);

        let dot = route(&Method::Get, "/pedigree.dot", &c);
        assert!(String::from_utf8(dot.body).unwrap().contains("\"Father\" -> \"Patient\";"));

        let svg = route(&Method::Get, "/pedigree.svg", &c);
        assert_eq!(svg.content_type, "image/svg+xml");
    }

    #[test]
    fn etag_is_stable() {
        assert_eq!(etag(b"abc"), etag(b"abc"));
        assert_ne!(etag(b"abc"), etag(b"abd"));
        assert_eq!(etag(b"").len(), 64 + 2);
    }

    fn bound(workers: usize) -> DashboardServer {
        DashboardServer::bind(DashboardConfig { addr: "127.0.0.1:0".into(), workers, ..cfg() })
            .expect("bind")
    }

    #[test]
    fn recv_error_is_a_failure_unless_stopping() {
        let server = bound(1);
        let stopping = AtomicBool::new(false);

        server.server.unblock();
        let err = worker_loop(&server.server, &server.config, &stopping).unwrap_err();
        assert!(matches!(err, Error::Server(_)));

        stopping.store(true, Ordering::SeqCst);
        server.server.unblock();
        assert!(worker_loop(&server.server, &server.config, &stopping).is_ok());
    }

    #[test]
    fn run_returns_when_a_worker_fails() {
        let server = bound(3);
        // a single worker fails; the other two must be released
        server.server.unblock();
        let result = server.run();
        assert!(matches!(result, Err(Error::Server(_))));
    }

    #[test]
    fn shutdown_joins_every_worker() {
        let handle = bound(2).spawn();
        assert!(handle.addr().starts_with("127.0.0.1:"));
        handle.shutdown();
    }
}
