//! Correlation identifier carried by every request.
//!
//! The id lives in task-local storage while a request is handled, so
//! [`crate::domain::Error`] constructors and log lines read it without it
//! being passed around. Spawned tasks do not inherit it; wrap their futures
//! in [`TraceId::scope`] when they need one.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used both to accept a caller supplied id and to echo the id back.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Per-request correlation id.
///
/// # Examples
/// ```
/// use travel_backend::domain::TraceId;
///
/// let id = TraceId::adopt_or_generate(Some("7f1f6a3e-2c1d-4d7a-9a0e-5b4c3d2e1f00"));
/// assert_eq!(id.to_string(), "7f1f6a3e-2c1d-4d7a-9a0e-5b4c3d2e1f00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse an upstream id when it is a well formed UUID, otherwise mint one.
    #[must_use]
    pub fn adopt_or_generate(upstream: Option<&str>) -> Self {
        upstream
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// The id in scope for the running task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `id` installed as the current trace id.
    pub async fn scope<Fut>(id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
