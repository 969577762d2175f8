// A running backend instance and the raw passthrough to it

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use http_body_util::BodyExt;
use hyper::{Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};

use super::{ContainerSpec, LifecycleHooks};
use crate::error::ForwardError;
use crate::http::{self, Body};
use crate::logger;

/// Upper bound on waiting for a freshly spawned backend to accept connections
const STARTUP_TIMEOUT: Duration = Duration::from_secs(30);
const STARTUP_POLL: Duration = Duration::from_millis(100);

pub type UpstreamClient = Client<HttpConnector, Body>;

pub struct ContainerInstance {
    id: String,
    authority: String,
    client: UpstreamClient,
    hooks: Arc<dyn LifecycleHooks>,
    process: tokio::sync::Mutex<Option<Child>>,
    last_activity: Mutex<Instant>,
    in_flight: AtomicUsize,
}

impl ContainerInstance {
    /// Bring up an instance: spawn the backend when a command is configured,
    /// then wait until its port accepts connections
    pub(super) async fn start(
        id: &str,
        spec: &ContainerSpec,
        client: UpstreamClient,
        hooks: Arc<dyn LifecycleHooks>,
    ) -> Result<Self, ForwardError> {
        let authority = format!("{}:{}", spec.host, spec.default_port);

        let process = match &spec.command {
            Some(argv) => {
                let child = spawn_backend(argv, spec)?;
                wait_until_listening(&authority).await?;
                Some(child)
            }
            None => None,
        };

        Ok(Self {
            id: id.to_string(),
            authority,
            client,
            hooks,
            process: tokio::sync::Mutex::new(process),
            last_activity: Mutex::new(Instant::now()),
            in_flight: AtomicUsize::new(0),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `host:port` the instance listens on
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Forward a request unmodified and hand back the instance's response
    /// unmodified. An unreachable instance yields `502 Bad Gateway` and fires
    /// the error hook.
    pub async fn fetch(&self, req: Request<Body>) -> Response<Body> {
        // Released on drop, so a cancelled request still lets the instance idle out
        let _in_flight = InFlight::enter(self);
        let result = self.forward(req).await;

        match result {
            Ok(resp) => resp,
            Err(e) => {
                self.hooks.on_error(&self.id, &e);
                http::build_502_response()
            }
        }
    }

    async fn forward(&self, req: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let (mut parts, body) = req.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map_or_else(|| "/".to_string(), ToString::to_string);
        parts.uri = Uri::builder()
            .scheme("http")
            .authority(self.authority.as_str())
            .path_and_query(path_and_query)
            .build()?;

        let resp = self.client.request(Request::from_parts(parts, body)).await?;
        Ok(resp.map(BodyExt::boxed_unsync))
    }

    /// Time since the last request touched this instance, `None` while a
    /// request is in flight
    pub fn idle_for(&self) -> Option<Duration> {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            return None;
        }
        let last = *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Some(last.elapsed())
    }

    fn touch(&self) {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Stop the backend process, if this instance owns one, and fire the stop hook
    pub(super) async fn stop(&self) {
        if let Some(mut child) = self.process.lock().await.take() {
            if let Err(e) = child.kill().await {
                logger::log_warning(&format!("Failed to kill backend '{}': {e}", self.id));
            }
        }
        self.hooks.on_stop(&self.id);
    }
}

/// Marks one request as in flight for as long as it lives
struct InFlight<'a>(&'a ContainerInstance);

impl<'a> InFlight<'a> {
    fn enter(instance: &'a ContainerInstance) -> Self {
        instance.in_flight.fetch_add(1, Ordering::SeqCst);
        instance.touch();
        Self(instance)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.touch();
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

fn spawn_backend(argv: &[String], spec: &ContainerSpec) -> Result<Child, ForwardError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(ForwardError::Start(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "empty container command",
        )));
    };

    Command::new(program)
        .args(args)
        .envs(&spec.env_vars)
        .env("PORT", spec.default_port.to_string())
        .kill_on_drop(true)
        .spawn()
        .map_err(ForwardError::Start)
}

async fn wait_until_listening(authority: &str) -> Result<(), ForwardError> {
    let deadline = tokio::time::Instant::now() + STARTUP_TIMEOUT;
    loop {
        if TcpStream::connect(authority).await.is_ok() {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ForwardError::Start(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("backend did not listen on {authority} within {STARTUP_TIMEOUT:?}"),
            )));
        }
        tokio::time::sleep(STARTUP_POLL).await;
    }
}
