// 🚦 Request Throttling State - TTL response cache and per-client rate limiter
//
// Both are plain values owned by whoever constructs them (the HTTP layer
// keeps one of each per process). Time is passed in, never sampled here.
//
// Eviction: each structure sweeps itself at most once per window (the cache
// TTL or the limiter period), on the next write after the window elapses.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

// ============================================================================
// TTL CACHE
// ============================================================================

/// Map whose entries expire `ttl` after insertion
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (V, Instant)>,
    last_sweep: Option<Instant>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: HashMap::new(),
            last_sweep: None,
        }
    }

    /// Fresh value for `key`; an expired entry is dropped on the way
    pub fn get(&mut self, key: &K, now: Instant) -> Option<V> {
        let fresh = match self.entries.get(key) {
            Some((_, stored_at)) => now.saturating_duration_since(*stored_at) < self.ttl,
            None => return None,
        };

        if fresh {
            self.entries.get(key).map(|(v, _)| v.clone())
        } else {
            self.entries.remove(key);
            None
        }
    }

    /// Store `value`; expired entries are purged first when a sweep is due
    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        if sweep_due(self.last_sweep, self.ttl, now) {
            self.purge_expired(now);
            self.last_sweep = Some(now);
        }
        self.entries.insert(key, (value, now));
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, (_, stored_at)| now.saturating_duration_since(*stored_at) < ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// RATE LIMITER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: usize },
    Limited { retry_after: Duration },
}

/// Sliding-window limiter: at most `max_calls` per client within `period`
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    calls: HashMap<String, VecDeque<Instant>>,
    last_sweep: Option<Instant>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        RateLimiter {
            max_calls,
            period,
            calls: HashMap::new(),
            last_sweep: None,
        }
    }

    /// Record a call from `client` at `now` unless it is over its quota.
    /// Rejected calls are not recorded. Idle clients are forgotten when a
    /// sweep is due.
    pub fn check(&mut self, client: &str, now: Instant) -> RateDecision {
        let period = self.period;
        if sweep_due(self.last_sweep, period, now) {
            self.evict_idle(now);
            self.last_sweep = Some(now);
        }

        let history = self.calls.entry(client.to_string()).or_default();

        while let Some(oldest) = history.front() {
            if now.saturating_duration_since(*oldest) >= period {
                history.pop_front();
            } else {
                break;
            }
        }

        if history.len() >= self.max_calls {
            let retry_after = history
                .front()
                .map(|oldest| period.saturating_sub(now.saturating_duration_since(*oldest)))
                .unwrap_or(period);
            return RateDecision::Limited { retry_after };
        }

        history.push_back(now);
        RateDecision::Allowed {
            remaining: self.max_calls - history.len(),
        }
    }

    /// Forget clients with no call inside the window
    pub fn evict_idle(&mut self, now: Instant) {
        let period = self.period;
        self.calls.retain(|_, history| {
            history
                .back()
                .map_or(false, |last| now.saturating_duration_since(*last) < period)
        });
    }

    pub fn tracked_clients(&self) -> usize {
        self.calls.len()
    }
}

fn sweep_due(last_sweep: Option<Instant>, window: Duration, now: Instant) -> bool {
    last_sweep.map_or(true, |last| now.saturating_duration_since(last) >= window)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_then_expiry() {
        let start = Instant::now();
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(300));

        cache.insert("GET:/employees".to_string(), 7, start);
        assert_eq!(cache.get(&"GET:/employees".to_string(), start + Duration::from_secs(299)), Some(7));
        assert_eq!(cache.get(&"GET:/employees".to_string(), start + Duration::from_secs(300)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_purge() {
        let start = Instant::now();
        let mut cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(10));

        cache.insert("a", 1, start);
        cache.insert("b", 2, start + Duration::from_secs(8));
        assert_eq!(cache.purge_expired(start + Duration::from_secs(12)), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_rate_limit_per_client() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));

        assert_eq!(limiter.check("10.0.0.1", start), RateDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check("10.0.0.1", start), RateDecision::Allowed { remaining: 0 });
        assert!(matches!(
            limiter.check("10.0.0.1", start + Duration::from_secs(10)),
            RateDecision::Limited { retry_after } if retry_after == Duration::from_secs(50)
        ));

        // Other clients are unaffected
        assert!(matches!(limiter.check("10.0.0.2", start), RateDecision::Allowed { .. }));
    }

    #[test]
    fn test_rate_limit_window_slides() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(matches!(limiter.check("c", start), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("c", start + Duration::from_secs(59)), RateDecision::Limited { .. }));
        assert!(matches!(limiter.check("c", start + Duration::from_secs(60)), RateDecision::Allowed { .. }));
    }

    #[test]
    fn test_evict_idle_clients() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(5, Duration::from_secs(60));

        limiter.check("old", start);
        limiter.check("new", start + Duration::from_secs(50));
        limiter.evict_idle(start + Duration::from_secs(70));

        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_cache_insert_sweeps_expired_keys() {
        let start = Instant::now();
        let mut cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(10));

        for (i, query) in ["a", "b", "c"].iter().enumerate() {
            cache.insert(format!("GET:/search?query={}", query), i as u32, start);
        }
        cache.insert("GET:/search?query=d".to_string(), 3, start + Duration::from_secs(5));
        assert_eq!(cache.len(), 4);

        // Nobody asks for a/b/c again; the next write after the TTL drops them
        cache.insert("GET:/search?query=e".to_string(), 4, start + Duration::from_secs(12));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_limiter_forgets_idle_clients_on_check() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(5, Duration::from_secs(60));

        for octet in 1..=50 {
            limiter.check(&format!("10.0.0.{}", octet), start);
        }
        limiter.check("10.0.1.1", start + Duration::from_secs(10));
        assert_eq!(limiter.tracked_clients(), 51);

        limiter.check("10.0.2.1", start + Duration::from_secs(65));
        assert_eq!(limiter.tracked_clients(), 2);
    }
}
