//! Blocking HTTP delivery of door events.

use std::time::Duration;

use doorwatch_core::{DoorEvent, EventSink};
use doorwatch_traits::BoxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("encode event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

/// POSTs each event as JSON; optionally GETs a trigger URL after every
/// successful post.
pub struct HttpSink {
    agent: ureq::Agent,
    url: String,
    trigger_url: Option<String>,
    post_timeout: Duration,
    trigger_timeout: Duration,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, post_timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("doorwatch/", env!("CARGO_PKG_VERSION")))
                .build(),
            url: url.into(),
            trigger_url: None,
            post_timeout,
            trigger_timeout: Duration::from_secs(3),
        }
    }

    pub fn with_trigger(mut self, url: Option<&str>, timeout: Duration) -> Self {
        self.trigger_url = url.map(str::to_string);
        self.trigger_timeout = timeout;
        self
    }

    pub fn from_config(cfg: &doorwatch_config::NotifyCfg) -> Self {
        Self::new(cfg.url.clone(), Duration::from_millis(cfg.post_timeout_ms)).with_trigger(
            cfg.trigger_url(),
            Duration::from_millis(cfg.trigger_timeout_ms),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn trigger_url(&self) -> Option<&str> {
        self.trigger_url.as_deref()
    }

    pub fn post(&self, event: &DoorEvent) -> Result<u16, SinkError> {
        let body = serde_json::to_string(event)?;
        let req = self
            .agent
            .post(&self.url)
            .timeout(self.post_timeout)
            .set("Content-Type", "application/json");
        let status = check(&self.url, req.send_string(&body))?;
        tracing::debug!(url = %self.url, status, "event posted");
        Ok(status)
    }

    /// `Ok(None)` when no trigger URL is configured.
    pub fn trigger(&self) -> Result<Option<u16>, SinkError> {
        let Some(url) = self.trigger_url.as_deref() else {
            return Ok(None);
        };
        let status = check(url, self.agent.get(url).timeout(self.trigger_timeout).call())?;
        tracing::debug!(url, status, "trigger fired");
        Ok(Some(status))
    }
}

/// Only 2xx counts as delivered.
fn check(url: &str, res: Result<ureq::Response, ureq::Error>) -> Result<u16, SinkError> {
    match res {
        Ok(resp) if (200..300).contains(&resp.status()) => Ok(resp.status()),
        Ok(resp) => Err(SinkError::Status {
            url: url.to_string(),
            status: resp.status(),
        }),
        Err(ureq::Error::Status(status, _)) => Err(SinkError::Status {
            url: url.to_string(),
            status,
        }),
        Err(ureq::Error::Transport(t)) => Err(SinkError::Transport {
            url: url.to_string(),
            reason: t.to_string(),
        }),
    }
}

impl EventSink for HttpSink {
    fn post_event(&mut self, event: &DoorEvent) -> Result<(), BoxError> {
        self.post(event)?;
        Ok(())
    }

    fn fire_trigger(&mut self) -> Result<(), BoxError> {
        self.trigger()?;
        Ok(())
    }
}
