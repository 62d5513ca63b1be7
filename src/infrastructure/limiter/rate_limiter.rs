use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        let now = Instant::now();
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
            last_seen: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Small epsilon to avoid fp surprises
    fn try_consume(&mut self, now: Instant) -> RateDecision {
        self.last_seen = now;
        self.refill(now);
        if self.tokens + 1e-12 >= 1.0 {
            self.tokens -= 1.0;
            RateDecision::Allowed { remaining: self.tokens.floor() as u64 }
        } else {
            let missing = 1.0 - self.tokens;
            let retry_after = ((missing / self.refill_per_sec).ceil() as u64).max(1);
            RateDecision::Limited { retry_after }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u64 },
    Limited { retry_after: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

type Key = String;

/// Per-client token buckets, keyed by IP.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<Key, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
    bucket_ttl: Duration,
}

impl RateLimiterStore {
    pub fn new(capacity: f64, refill_per_sec: f64, bucket_ttl: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            capacity,
            refill_per_sec,
            bucket_ttl,
        }
    }

    /// Spawns the task that forgets idle clients. Needs a running Tokio runtime.
    pub fn spawn_eviction(&self, interval: Duration) {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                sleep(interval).await;
                let evicted = store.evict_idle(Instant::now());
                if evicted > 0 {
                    tracing::debug!("Evicted {} idle rate-limit buckets", evicted);
                }
            }
        });
    }

    fn evict_idle(&self, now: Instant) -> usize {
        let before = self.map.len();
        let ttl = self.bucket_ttl;
        self.map
            .retain(|_, bucket| now.duration_since(bucket.lock().last_seen) <= ttl);
        before.saturating_sub(self.map.len())
    }

    fn get_bucket(&self, key: &str) -> Arc<Mutex<TokenBucket>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::new(self.capacity, self.refill_per_sec))))
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let bucket = self.get_bucket(key);
        let mut bucket = bucket.lock();
        bucket.try_consume(now)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
