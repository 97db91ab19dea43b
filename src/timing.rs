//! Environment-driven duration scaling for slow execution environments.

use std::time::Duration;

use crate::context::TestContext;

/// Environment variable holding an integer factor applied to configured
/// durations (never to intervals).
pub const SLOW_FACTOR_ENV: &str = "HOLDFAST_SLOW_FACTOR";

/// Scale `duration` by the slow factor, if one is configured.
///
/// The duration is truncated to whole seconds before multiplying. Invalid
/// values are logged through the context and ignored.
pub(crate) fn scale_duration(t: &dyn TestContext, duration: Duration) -> Duration {
    let Ok(raw) = std::env::var(SLOW_FACTOR_ENV) else {
        return duration;
    };
    match raw.trim().parse::<u64>() {
        Ok(factor) => Duration::from_secs(duration.as_secs().saturating_mul(factor)),
        Err(err) => {
            t.log(&format!(
                "Ignoring value of '{SLOW_FACTOR_ENV}' environment variable: {err}"
            ));
            duration
        }
    }
}
