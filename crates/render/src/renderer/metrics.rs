use serde::Serialize;

/// Timing sample for one node instantiation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetric {
    /// Node id.
    pub component_id: String,
    /// Node type.
    pub component_type: String,
    /// Wall time spent in the factory, in milliseconds.
    pub render_time_ms: f64,
    /// How many times this node has been instantiated by the renderer.
    pub update_count: u32,
    /// Milliseconds since the Unix epoch.
    pub last_update: u64,
}

#[cfg(not(target_arch = "wasm32"))]
mod clock {
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    pub struct Stopwatch(Instant);

    impl Stopwatch {
        pub fn start() -> Self {
            Self(Instant::now())
        }

        pub fn elapsed_ms(&self) -> f64 {
            self.0.elapsed().as_secs_f64() * 1000.0
        }
    }

    pub fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

// std::time has no clock on wasm32-unknown-unknown; timings read as zero there.
#[cfg(target_arch = "wasm32")]
mod clock {
    pub struct Stopwatch;

    impl Stopwatch {
        pub fn start() -> Self {
            Self
        }

        pub fn elapsed_ms(&self) -> f64 {
            0.0
        }
    }

    pub fn now_ms() -> u64 {
        0
    }
}

pub(crate) use clock::{Stopwatch, now_ms};
