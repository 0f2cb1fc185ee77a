use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Free ORS plans allow 40 requests per minute on geocoding and directions.
pub const ORS_REQUESTS_PER_MINUTE: u32 = 40;

pub fn ors_limiter(per_minute: u32) -> Limiter {
    let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Blocks the current thread until the limiter grants a request.
pub fn wait_for_permit(limiter: &Limiter) {
    let clock = DefaultClock::default();
    while let Err(not_until) = limiter.check() {
        let wait = not_until.wait_time_from(clock.now());
        log::debug!("Rate limit reached, waiting {:?}", wait);
        std::thread::sleep(wait);
    }
}
