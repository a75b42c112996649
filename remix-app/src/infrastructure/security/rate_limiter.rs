use dashmap::DashMap;
use remix_errors::AppError;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_CALLS_PER_MINUTE: u32 = 5;
const MAX_CALLS_PER_HOUR: u32 = 20;
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Clone)]
struct CallWindow {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl CallWindow {
    fn starting_at(now: Instant) -> Self {
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// Per-client budget of model calls. Each phase call counts once.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<IpAddr, CallWindow>>,
    last_cleanup: Arc<Mutex<Instant>>,
    per_minute: u32,
    per_hour: u32,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limits(MAX_CALLS_PER_MINUTE, MAX_CALLS_PER_HOUR)
    }

    pub fn with_limits(per_minute: u32, per_hour: u32) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
            per_minute,
            per_hour,
        }
    }

    pub fn check_rate_limit(&self, ip: IpAddr) -> Result<(), RateLimitError> {
        self.maybe_cleanup();

        let now = Instant::now();
        let mut window = self
            .windows
            .entry(ip)
            .or_insert_with(|| CallWindow::starting_at(now));

        if now.duration_since(window.minute_start) > Duration::from_secs(60) {
            window.minute_count = 0;
            window.minute_start = now;
        }

        if now.duration_since(window.hour_start) > Duration::from_secs(3600) {
            window.hour_count = 0;
            window.hour_start = now;
        }

        if window.minute_count >= self.per_minute {
            let elapsed = now.duration_since(window.minute_start).as_secs();
            return Err(RateLimitError::TooManyPerMinute(60u64.saturating_sub(elapsed)));
        }

        if window.hour_count >= self.per_hour {
            let elapsed = now.duration_since(window.hour_start).as_secs();
            return Err(RateLimitError::TooManyPerHour(3600u64.saturating_sub(elapsed)));
        }

        window.minute_count += 1;
        window.hour_count += 1;

        Ok(())
    }

    fn maybe_cleanup(&self) {
        let mut last_cleanup = self
            .last_cleanup
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if last_cleanup.elapsed() > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            let now = Instant::now();
            self.windows
                .retain(|_, w| now.duration_since(w.hour_start) <= Duration::from_secs(3600));
            *last_cleanup = now;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    TooManyPerMinute(u64),
    TooManyPerHour(u64),
}

impl RateLimitError {
    pub fn message(&self) -> String {
        match self {
            Self::TooManyPerMinute(secs) => {
                format!("요청이 너무 많습니다. {}초 후에 다시 시도해주세요.", secs)
            }
            Self::TooManyPerHour(secs) => {
                format!(
                    "시간당 요청 한도에 도달했습니다. {}분 후에 다시 시도해주세요.",
                    secs.div_ceil(60)
                )
            }
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::RateLimited(err.message())
    }
}
