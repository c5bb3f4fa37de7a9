// service/rate_limit.rs
// Rate limiting for admin wallet logins
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// Simple in-memory sliding window limiter (per process)
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<WindowState>,
    max_requests: usize,
    window: Duration,
}

#[derive(Debug, Default)]
struct WindowState {
    requests: HashMap<String, Vec<Instant>>,
    last_sweep: Option<Instant>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            state: Mutex::new(WindowState::default()),
            max_requests,
            window,
        }
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.is_allowed_at(key, Instant::now())
    }

    pub fn is_allowed_at(&self, key: &str, now: Instant) -> bool {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::error!("RateLimiter: lock poisoned, rejecting attempt for {}", key);
                return false;
            }
        };

        // At most once per window, drop keys with no attempt left inside it
        let sweep_due = state
            .last_sweep
            .map_or(true, |last| now.saturating_duration_since(last) >= self.window);
        if sweep_due {
            let window = self.window;
            state.requests.retain(|_, stamps| {
                stamps.retain(|&timestamp| now.saturating_duration_since(timestamp) < window);
                !stamps.is_empty()
            });
            state.last_sweep = Some(now);
        }

        if self.max_requests == 0 {
            return false;
        }

        let entry = state.requests.entry(key.to_string()).or_default();

        // Remove old requests outside the window
        entry.retain(|&timestamp| now.saturating_duration_since(timestamp) < self.window);

        if entry.len() < self.max_requests {
            entry.push(now);
            true
        } else {
            false
        }
    }

    /// Forget a key, e.g. after a successful login.
    pub fn reset(&self, key: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.requests.remove(key);
        }
    }

    /// Number of keys currently holding attempts.
    pub fn tracked_keys(&self) -> usize {
        self.state.lock().map_or(0, |state| state.requests.len())
    }
}
