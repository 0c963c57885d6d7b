use std::{collections::HashMap, net::IpAddr, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracehold_di::Build;
use tracehold_shared_contracts::{rate_limit::RateLimitService, time::TimeService};
use tracehold_utils::trace_instrument;
use tracing::debug;

#[derive(Debug, Clone, Build)]
pub struct RateLimitServiceImpl<Time> {
    time: Time,
    config: RateLimitServiceConfig,
    #[state]
    state: Arc<RateLimitState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitServiceConfig {
    Disabled,
    /// Every client may burst up to `capacity` requests. One request slot is
    /// returned every `refill_interval`.
    TokenBucket {
        capacity: u32,
        refill_interval: Duration,
    },
}

#[derive(Debug, Default)]
struct RateLimitState {
    buckets: Mutex<HashMap<Option<IpAddr>, Bucket>>,
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: u32,
    updated_at: DateTime<Utc>,
}

impl Bucket {
    /// Add the tokens that have accumulated since `updated_at`.
    fn refill(&mut self, now: DateTime<Utc>, capacity: u32, refill_interval: Duration) {
        let elapsed = (now - self.updated_at).to_std().unwrap_or_default();
        let refills = (elapsed.as_nanos() / refill_interval.as_nanos().max(1))
            .min(capacity as u128) as u32;

        if self.tokens.saturating_add(refills) >= capacity {
            self.tokens = capacity;
            self.updated_at = now;
        } else {
            self.tokens += refills;
            self.updated_at = self.updated_at + refill_interval * refills;
        }
    }
}

impl<Time> RateLimitService for RateLimitServiceImpl<Time>
where
    Time: TimeService,
{
    #[trace_instrument(skip(self))]
    async fn acquire(&self, client_ip: Option<IpAddr>) -> bool {
        let RateLimitServiceConfig::TokenBucket {
            capacity,
            refill_interval,
        } = self.config
        else {
            return true;
        };

        let now = self.time.now();
        let mut buckets = self.state.buckets.lock().await;

        // buckets that have refilled completely carry no information
        buckets.retain(|_, bucket| {
            bucket.refill(now, capacity, refill_interval);
            bucket.tokens < capacity
        });

        let bucket = buckets.entry(client_ip).or_insert(Bucket {
            tokens: capacity,
            updated_at: now,
        });

        if bucket.tokens == 0 {
            debug!(?client_ip, "rate limit exceeded");
            return false;
        }

        bucket.tokens -= 1;
        true
    }
}
