use std::fmt;
use std::io::{self, Stdout, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::entities::vitals::AlertEvent;

/// Delivers an out-of-range alert to a human operator.
///
/// Implementations may block: `raise_alert` returns only once the alert has
/// been perceivably delivered. The blink signaler holds the calling thread
/// for its whole pattern and there is no way to cancel it.
#[cfg_attr(test, mockall::automock)]
pub trait AlertSignaler: Send + Sync {
    fn raise_alert(&self, event: &AlertEvent);
}

impl<S: AlertSignaler + ?Sized> AlertSignaler for Box<S> {
    fn raise_alert(&self, event: &AlertEvent) {
        (**self).raise_alert(event)
    }
}

impl<S: AlertSignaler + ?Sized> AlertSignaler for Arc<S> {
    fn raise_alert(&self, event: &AlertEvent) {
        (**self).raise_alert(event)
    }
}

/// Which signaler the monitor should use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalerKind {
    /// Blocking blink pattern on stdout
    #[default]
    Blink,

    /// Non-blocking structured log event only
    Log,
}

impl FromStr for SignalerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blink" => Ok(SignalerKind::Blink),
            "log" => Ok(SignalerKind::Log),
            other => Err(format!("expected one of blink, log; got {}", other)),
        }
    }
}

impl fmt::Display for SignalerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalerKind::Blink => write!(f, "blink"),
            SignalerKind::Log => write!(f, "log"),
        }
    }
}

/// Alternating two-frame pattern, each frame held for `interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPattern {
    pub cycles: u32,
    pub interval: Duration,
}

impl BlinkPattern {
    const FRAMES: [&'static str; 2] = ["\r* ", "\r *"];

    /// Total time a single alert blocks its caller
    pub fn duration(&self) -> Duration {
        self.interval * (self.cycles * Self::FRAMES.len() as u32)
    }
}

impl Default for BlinkPattern {
    fn default() -> Self {
        Self {
            cycles: 6,
            interval: Duration::from_secs(1),
        }
    }
}

/// Prints the alert message and then blinks, blocking for the whole pattern
pub struct BlinkSignaler<W: Write + Send> {
    out: Mutex<W>,
    pattern: BlinkPattern,
}

impl BlinkSignaler<Stdout> {
    /// Blink on the process's standard output
    pub fn stdout(pattern: BlinkPattern) -> Self {
        Self::new(io::stdout(), pattern)
    }
}

impl<W: Write + Send> BlinkSignaler<W> {
    pub fn new(out: W, pattern: BlinkPattern) -> Self {
        Self {
            out: Mutex::new(out),
            pattern,
        }
    }

    pub fn pattern(&self) -> BlinkPattern {
        self.pattern
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Write one frame atomically; the lock is never held across a hold interval
    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            error!("Failed to write alert output: {}", e);
        }
    }
}

impl<W: Write + Send> AlertSignaler for BlinkSignaler<W> {
    fn raise_alert(&self, event: &AlertEvent) {
        warn!(vital = %event.vital, "{}", event.message);

        self.emit(&format!("{}\n", event.message));
        for _ in 0..self.pattern.cycles {
            for frame in BlinkPattern::FRAMES {
                self.emit(frame);
                thread::sleep(self.pattern.interval);
            }
        }
        self.emit("\n");
    }
}

/// Emits a structured log event and returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSignaler;

impl AlertSignaler for TracingSignaler {
    fn raise_alert(&self, event: &AlertEvent) {
        warn!(
            vital = %event.vital,
            label = event.vital.label(),
            raised_at = %event.raised_at.to_rfc3339(),
            "{}",
            event.message
        );
    }
}
