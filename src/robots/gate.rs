//! Politeness gate
//!
//! One exclusion decision per host, computed at most once. Every failure on
//! the way to a decision (unparsable URL, network error, timeout, non-success
//! status) resolves to "allowed".

use crate::crawler::Fetcher;
use crate::robots::cache::{DecisionCache, RobotsDecision};
use crate::robots::parser::ParsedRobots;
use crate::url::{host_key, robots_url};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub struct RobotsGate {
    fetcher: Arc<dyn Fetcher>,
    /// Product token matched against `User-agent` groups
    user_agent: String,
    timeout: Duration,
    cache: DecisionCache,
}

impl RobotsGate {
    pub fn new(fetcher: Arc<dyn Fetcher>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            user_agent: user_agent.into(),
            timeout,
            cache: DecisionCache::new(),
        }
    }

    /// Returns whether the URL's host may be crawled
    ///
    /// Never fails: any problem reaching a decision means "allowed".
    pub async fn is_allowed(&self, url: &str) -> bool {
        let Some(key) = Url::parse(url).ok().as_ref().and_then(host_key) else {
            tracing::debug!("No host key for {}, allowing", url);
            return true;
        };

        let slot = self.cache.slot(&key);
        slot.get_or_init(|| self.lookup(&key)).await.is_allowed()
    }

    /// The cached decision for a host key, without triggering a lookup
    pub fn cached_decision(&self, host_key: &str) -> Option<RobotsDecision> {
        self.cache.get(host_key)
    }

    /// Number of hosts with a decision
    pub fn hosts_checked(&self) -> usize {
        self.cache.len()
    }

    async fn lookup(&self, key: &str) -> RobotsDecision {
        let location = robots_url(key);
        tracing::debug!("Fetching {}", location);

        let page = match tokio::time::timeout(self.timeout, self.fetcher.fetch(&location)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                tracing::debug!("robots.txt unavailable for {} ({}), allowing", key, e);
                return RobotsDecision::Allowed;
            }
            Err(_) => {
                tracing::debug!("robots.txt lookup timed out for {}, allowing", key);
                return RobotsDecision::Allowed;
            }
        };

        let content = String::from_utf8_lossy(&page.body);
        if ParsedRobots::from_content(&content).disallows_root(&self.user_agent) {
            tracing::info!("{} excludes {} via robots.txt", key, self.user_agent);
            RobotsDecision::Disallowed
        } else {
            RobotsDecision::Allowed
        }
    }
}
