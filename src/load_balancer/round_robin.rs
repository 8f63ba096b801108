//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::{backend::Backend, Strategy};

/// Round-robin selector.
///
/// One counter is shared by every caller of this instance. Each attempt
/// pre-increments it and probes `counter % len`; failed attempts still advance
/// the counter, so the next call never restarts from the same slot.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&self) -> usize {
        self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}

impl Strategy for RoundRobin {
    fn next_backend(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>> {
        let len = backends.len();
        if len == 0 {
            return None;
        }

        for _ in 0..len {
            let backend = &backends[self.advance() % len];
            if backend.is_healthy() {
                return Some(backend.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::client::build_client;
    use crate::load_balancer::backend::HealthStatus;
    use std::time::{Duration, SystemTime};
    use url::Url;

    fn backends(health: &[bool]) -> Vec<Arc<Backend>> {
        let client = build_client().unwrap();
        health
            .iter()
            .enumerate()
            .map(|(i, &healthy)| {
                let url = Url::parse(&format!("http://127.0.0.1:{}", 8080 + i)).unwrap();
                let backend = Backend::http(url, client.clone(), Duration::from_secs(5));
                Arc::new(backend.with_status(HealthStatus::probed(healthy, SystemTime::now())))
            })
            .collect()
    }

    fn port(backend: &Backend) -> u16 {
        backend.url().port().unwrap()
    }

    #[test]
    fn test_round_robin_order() {
        let lb = RoundRobin::new();
        let backends = backends(&[true, true, true]);

        let order: Vec<u16> = (0..6)
            .map(|_| port(&lb.next_backend(&backends).unwrap()))
            .collect();
        assert_eq!(order, vec![8081, 8082, 8080, 8081, 8082, 8080]);
    }

    #[test]
    fn test_skips_unhealthy() {
        let lb = RoundRobin::new();
        let backends = backends(&[false, true]);

        for _ in 0..10 {
            let selected = lb.next_backend(&backends).unwrap();
            assert_eq!(port(&selected), 8081);
            assert!(selected.is_healthy());
        }
    }

    #[test]
    fn test_never_returns_unhealthy() {
        let lb = RoundRobin::new();
        let backends = backends(&[false, true, false, false, true, false]);

        for _ in 0..100 {
            assert!(lb.next_backend(&backends).unwrap().is_healthy());
        }
    }

    #[test]
    fn test_all_unhealthy_scans_exactly_once() {
        let lb = RoundRobin::new();
        let down = backends(&[false, false, false]);

        assert!(lb.next_backend(&down).is_none());
        assert_eq!(lb.counter.load(Ordering::Relaxed), 3);

        // The scan left the counter at 3, so the next call starts at index 1.
        let up = backends(&[true, true, true]);
        assert_eq!(port(&lb.next_backend(&up).unwrap()), 8081);
    }

    #[test]
    fn test_empty_set() {
        let lb = RoundRobin::new();
        assert!(lb.next_backend(&[]).is_none());
        assert_eq!(lb.counter.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_single_backend() {
        let lb = RoundRobin::new();

        let up = backends(&[true]);
        for _ in 0..3 {
            assert_eq!(port(&lb.next_backend(&up).unwrap()), 8080);
        }

        let before = lb.counter.load(Ordering::Relaxed);
        let down = backends(&[false]);
        assert!(lb.next_backend(&down).is_none());
        assert_eq!(lb.counter.load(Ordering::Relaxed), before + 1);
    }

    #[test]
    fn test_fair_distribution() {
        let lb = RoundRobin::new();
        let backends = backends(&[true, true, true, true]);
        let k = 25;

        let mut counts = [0usize; 4];
        for _ in 0..k * backends.len() {
            let selected = lb.next_backend(&backends).unwrap();
            counts[(port(&selected) - 8080) as usize] += 1;
        }
        for count in counts {
            assert!(count >= k - 1 && count <= k + 1, "unfair count {count}");
        }
    }

    #[test]
    fn test_counter_wraps() {
        let lb = RoundRobin {
            counter: AtomicUsize::new(usize::MAX - 1),
        };
        let backends = backends(&[true, true]);

        assert!(lb.next_backend(&backends).is_some());
        assert!(lb.next_backend(&backends).is_some());
        assert!(lb.next_backend(&backends).is_some());
    }
}
