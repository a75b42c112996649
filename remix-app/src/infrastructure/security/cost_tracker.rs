use crate::domain::Phase;
use chrono::{DateTime, Utc};
use remix_errors::AppError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

const DAILY_REQUEST_LIMIT: u32 = 200;
const DAILY_COST_LIMIT_CENTS: u32 = 500;
const ANALYSIS_COST_CENTS: u32 = 1;
const GENERATION_COST_CENTS: u32 = 2;

/// Server-wide daily budget of model calls, reset when the UTC date changes.
pub struct CostTracker {
    daily_requests: AtomicU32,
    daily_cost_cents: AtomicU32,
    request_limit: u32,
    cost_limit_cents: u32,
    last_reset: Mutex<DateTime<Utc>>,
}

impl CostTracker {
    pub fn new() -> Self {
        Self::with_limits(DAILY_REQUEST_LIMIT, DAILY_COST_LIMIT_CENTS)
    }

    pub fn with_limits(request_limit: u32, cost_limit_cents: u32) -> Self {
        Self {
            daily_requests: AtomicU32::new(0),
            daily_cost_cents: AtomicU32::new(0),
            request_limit,
            cost_limit_cents,
            last_reset: Mutex::new(Utc::now()),
        }
    }

    pub fn check_and_increment(&self, phase: Phase) -> Result<(), CostLimitError> {
        self.check_and_increment_on(Utc::now(), phase)
    }

    fn check_and_increment_on(&self, now: DateTime<Utc>, phase: Phase) -> Result<(), CostLimitError> {
        self.maybe_reset_daily(now);

        let cost = estimated_cost_cents(phase);
        let current_requests = self.daily_requests.load(Ordering::SeqCst);
        let current_cost = self.daily_cost_cents.load(Ordering::SeqCst);

        if current_requests >= self.request_limit {
            return Err(CostLimitError::DailyRequestLimitReached);
        }

        if current_cost + cost > self.cost_limit_cents {
            return Err(CostLimitError::DailyCostLimitReached);
        }

        self.daily_requests.fetch_add(1, Ordering::SeqCst);
        self.daily_cost_cents.fetch_add(cost, Ordering::SeqCst);

        Ok(())
    }

    pub fn get_remaining_requests(&self) -> u32 {
        self.request_limit
            .saturating_sub(self.daily_requests.load(Ordering::SeqCst))
    }

    fn maybe_reset_daily(&self, now: DateTime<Utc>) {
        let mut last_reset = self
            .last_reset
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if now.date_naive() != last_reset.date_naive() {
            self.daily_requests.store(0, Ordering::SeqCst);
            self.daily_cost_cents.store(0, Ordering::SeqCst);
            *last_reset = now;
            tracing::info!("Daily cost tracker reset");
        }
    }
}

impl Default for CostTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn estimated_cost_cents(phase: Phase) -> u32 {
    match phase {
        Phase::Analysis => ANALYSIS_COST_CENTS,
        Phase::Generation => GENERATION_COST_CENTS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostLimitError {
    DailyRequestLimitReached,
    DailyCostLimitReached,
}

impl CostLimitError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::DailyRequestLimitReached => "오늘의 요청 한도에 도달했습니다. 내일 다시 시도해주세요!",
            Self::DailyCostLimitReached => "오늘 사용할 수 있는 AI 예산이 모두 소진되었습니다. 내일 다시 시도해주세요!",
        }
    }
}

impl From<CostLimitError> for AppError {
    fn from(err: CostLimitError) -> Self {
        AppError::RateLimited(err.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_counts_requests() {
        let tracker = CostTracker::with_limits(3, 100);
        tracker.check_and_increment(Phase::Analysis).unwrap();
        tracker.check_and_increment(Phase::Generation).unwrap();
        assert_eq!(tracker.get_remaining_requests(), 1);
    }

    #[test]
    fn test_request_limit() {
        let tracker = CostTracker::with_limits(1, 100);
        tracker.check_and_increment(Phase::Analysis).unwrap();
        assert_eq!(
            tracker.check_and_increment(Phase::Analysis),
            Err(CostLimitError::DailyRequestLimitReached)
        );
    }

    #[test]
    fn test_cost_limit_uses_phase_cost() {
        let tracker = CostTracker::with_limits(10, 3);
        tracker.check_and_increment(Phase::Generation).unwrap();
        assert_eq!(
            tracker.check_and_increment(Phase::Generation),
            Err(CostLimitError::DailyCostLimitReached)
        );
        assert!(tracker.check_and_increment(Phase::Analysis).is_ok());
    }

    #[test]
    fn test_resets_on_new_day() {
        let tracker = CostTracker::with_limits(1, 100);
        let now = Utc::now();
        tracker.check_and_increment_on(now, Phase::Analysis).unwrap();
        assert!(tracker.check_and_increment_on(now, Phase::Analysis).is_err());

        let tomorrow = now + Duration::days(1);
        assert!(tracker.check_and_increment_on(tomorrow, Phase::Analysis).is_ok());
    }
}
