use rand::Rng;
use std::time::Duration;

/// Delay before retry number `attempt` (0-based): exponential with jitter.
pub fn calculate_backoff_delay(attempt: u32, base: Duration) -> Duration {
    // Cap the exponent so the delay stays bounded
    let capped_attempt = attempt.min(10);

    // base * 2^attempt
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(2_u64.saturating_pow(capped_attempt));

    // ±30% jitter
    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    let delay_with_jitter = (delay_ms as f64 * jitter_factor).round() as u64;

    Duration::from_millis(delay_with_jitter)
}
