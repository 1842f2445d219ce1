use rand::Rng;
use std::time::Duration;

/// Exponential backoff with jitter for retried fetches.
pub fn retry_delay(attempt: u32, base_delay_secs: u32) -> Duration {
    // Cap the exponent to prevent overflow.
    let capped_attempt = attempt.min(10);
    let base_delay = base_delay_secs.saturating_mul(2_u32.saturating_pow(capped_attempt));

    // ±30% randomness so retries from concurrent workers spread out.
    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    let delay_with_jitter = (base_delay as f64 * jitter_factor).round() as u64;

    Duration::from_secs(delay_with_jitter)
}

/// Randomized inter-request delay. Defensive site infrastructure blocks
/// clients with metronomic request timing.
pub fn politeness_delay(min_ms: u64, max_ms: u64) -> Duration {
    if min_ms >= max_ms {
        return Duration::from_millis(min_ms);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}
