use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// `LIFELINE_RENDER_TIMING=1` prints per-phase render timings to stderr.
pub(crate) fn render_timing_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("LIFELINE_RENDER_TIMING")
            .map(|v| {
                !matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "" | "0" | "false" | "no" | "off"
                )
            })
            .unwrap_or(false)
    })
}

#[derive(Debug, Default, Clone)]
pub(crate) struct RenderTimings {
    pub total: Duration,
    pub layout: Duration,
    pub svg: Duration,
    pub paint: Duration,
}

/// Adds the time until drop to `dst`.
pub(crate) struct TimingGuard<'a> {
    dst: &'a mut Duration,
    start: Instant,
}

impl<'a> TimingGuard<'a> {
    pub(crate) fn new(dst: &'a mut Duration) -> Self {
        Self {
            dst,
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        *self.dst += self.start.elapsed();
    }
}
