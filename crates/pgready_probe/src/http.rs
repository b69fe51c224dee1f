//! HTTP endpoint probe.
//!
//! Reachability check for a dependent application endpoint: any HTTP
//! response counts as ready, whatever its status code. Health semantics
//! beyond "something answered" are out of scope.

use crate::{Probe, ProbeError};
use async_trait::async_trait;
use std::time::Duration;

/// Probes an HTTP endpoint with a bounded per-request timeout.
#[derive(Clone, Debug)]
pub struct HttpProbe {
    url: String,
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("reqwest client build should not fail");
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        match self.client.get(&self.url).send().await {
            Ok(_resp) => Ok(()),
            Err(e) => Err(ProbeError::Unreachable(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        format!("application at {}", self.url)
    }
}
