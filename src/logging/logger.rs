use bitflags::bitflags;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

bitflags! {
    /// Selects which sanitizer spans a listener reports.  Bit `n` stands for
    /// span id `n` from [`super::logging_defs`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SpanFilter: u32 {
        const NONE                    = 0;
        const SANITIZE                = 1 << 1;
        const PARSE_FRAGMENT          = 1 << 2;
        const STRIP_RAW_TEXT          = 1 << 3;
        const STRIP_EVENT_HANDLERS    = 1 << 4;
        const REPLACE_IFRAMES         = 1 << 5;
        const REWRITE_IMAGES          = 1 << 6;
        const REMOVE_PRELOAD_LINKS    = 1 << 7;
        const NEUTRALIZE_SCRIPT_LINKS = 1 << 8;
        const SERIALIZE               = 1 << 9;
        const UNWRAP_NESTED           = 1 << 10;
        const ALL                     = u32::MAX;
    }
}

impl SpanFilter {
    /// Whether the bit for `span_id` is set.  Ids past the width of the mask
    /// are only matched by [`SpanFilter::ALL`].
    pub fn covers(&self, span_id: u64) -> bool {
        if *self == SpanFilter::ALL {
            return true;
        }
        span_id < 32 && self.bits() & (1u32 << span_id) != 0
    }
}

/// Observer interface for performance-span events.  Implement this trait
/// and wrap it in a [`Listener`] to receive timing data from the sanitizer
/// pipeline.
///
/// Listeners are shared between threads through [`crate::SanitizeOptions`],
/// hence the `Send + Sync` bound.  All methods are called synchronously
/// from the sanitizer; keep them lightweight.
pub trait PerfListener: Send + Sync {
    /// Return whether this listener cares about the given span.  If `false`,
    /// none of the other callbacks will fire for that span.
    fn is_interested_in_span(&self, span_id: u64) -> bool;
    /// Called when a span begins.
    fn on_span_start(&self, span_id: u64, start_time: Instant);
    /// Called at each checkpoint within a span, with the wall-clock duration
    /// since the previous checkpoint (or span start).
    fn on_check_point(
        &self,
        span_id: u64,
        point_time: Instant,
        duration_since_last_checkpoint: Duration,
        label: &str,
    );
    /// Called when a free-text annotation is attached to a span.
    fn on_annotate(&self, span_id: u64, annotation: &str);
    /// Called when a span ends, with its total duration.
    fn on_span_end(&self, span_id: u64, span_duration: Duration);
}

/// A clonable, reference-counted wrapper around a [`PerfListener`].
#[derive(Clone)]
pub struct Listener {
    inner_impl: Arc<dyn PerfListener>,
}

impl Listener {
    /// Wrap a [`PerfListener`] implementation for use with [`PerfLogger`].
    pub fn new(listener: Arc<dyn PerfListener>) -> Listener {
        Listener {
            inner_impl: listener,
        }
    }
}

impl Deref for Listener {
    type Target = dyn PerfListener;
    fn deref(&self) -> &Self::Target {
        &*self.inner_impl
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener")
    }
}

struct PerfCheckPoint {
    pub label: String,
    pub time: Instant,
}

struct PerfEvent {
    pub span_id: u64,
    pub start_time: Instant,
    pub last_point: Option<Instant>,
    pub listeners: Vec<Listener>,
}

impl PerfEvent {
    pub fn point(&mut self, point: PerfCheckPoint) {
        let since = self.last_point.unwrap_or(self.start_time);
        let duration_since_last_checkpoint = point.time.duration_since(since);
        self.listeners.iter().for_each(|l| {
            l.on_check_point(
                self.span_id,
                point.time,
                duration_since_last_checkpoint,
                point.label.as_str(),
            )
        });
        self.last_point = Some(point.time);
    }

    pub fn annotate(&self, annotation: &str) {
        self.listeners
            .iter()
            .for_each(|l| l.on_annotate(self.span_id, annotation));
    }
}

/// Tracks in-flight performance spans and fans events out to registered
/// [`Listener`]s.
///
/// **Not `Sync`**: the event map uses `RefCell`.  Every sanitizer run
/// builds its own `PerfLogger` from the listeners in its options.
pub struct PerfLogger {
    events: RefCell<HashMap<u64, PerfEvent>>,
    listeners: Vec<Listener>,
}

impl PerfLogger {
    /// Create a new logger with the given set of listeners.  An empty
    /// `Vec` disables perf logging.
    pub fn new(listeners: Vec<Listener>) -> PerfLogger {
        PerfLogger {
            events: RefCell::new(HashMap::new()),
            listeners,
        }
    }

    /// Begin a new span identified by `span_id`.  Only listeners that
    /// return `true` from [`PerfListener::is_interested_in_span`] are
    /// notified and stored.
    pub fn start(&self, span_id: u64) {
        let event_listeners = self
            .listeners
            .iter()
            .filter(|l| l.is_interested_in_span(span_id))
            .cloned()
            .collect::<Vec<_>>();
        if event_listeners.is_empty() {
            return;
        }
        let start_time = Instant::now();
        event_listeners
            .iter()
            .for_each(|l| l.on_span_start(span_id, start_time));
        let event = PerfEvent {
            span_id,
            start_time,
            last_point: None,
            listeners: event_listeners,
        };
        self.events.borrow_mut().insert(span_id, event);
    }

    /// Record a checkpoint with a `&str` label inside the given span.
    pub fn check_point_str(&self, span_id: u64, label: &str) {
        if let Some(event) = self.events.borrow_mut().get_mut(&span_id) {
            event.point(PerfCheckPoint {
                label: String::from(label),
                time: Instant::now(),
            });
        }
    }

    /// Attach a free-text annotation to the given span.
    pub fn annotate(&self, span_id: u64, annotation: String) {
        if let Some(event) = self.events.borrow().get(&span_id) {
            event.annotate(annotation.as_str());
        }
    }

    /// End the span, notify listeners with the total duration, and remove
    /// it from the active-events map.
    pub fn end(&self, span_id: u64) {
        if let Some(event) = self.events.borrow_mut().remove(&span_id) {
            let duration = Instant::now().duration_since(event.start_time);
            event.listeners.iter().for_each(|l| {
                l.on_span_end(span_id, duration);
            });
        }
    }
}
