//! Browser tick source for the sequencer.

use demo_timer::TickScheduler;
use gloo_timers::callback::Interval;
use yew::Callback;

/// Recurring `setInterval` wrapper. Holding at most one [`Interval`] keeps a
/// single tick alive: arming drops (and so clears) the previous one.
pub struct IntervalTicker {
    period_ms: u32,
    on_tick: Callback<()>,
    handle: Option<Interval>,
}

impl IntervalTicker {
    pub fn new(period_ms: u32, on_tick: Callback<()>) -> Self {
        Self {
            period_ms,
            on_tick,
            handle: None,
        }
    }
}

impl TickScheduler for IntervalTicker {
    fn arm(&mut self) {
        let on_tick = self.on_tick.clone();
        self.handle = Some(Interval::new(self.period_ms, move || on_tick.emit(())));
    }

    fn cancel(&mut self) {
        // Dropping the handle clears the interval.
        self.handle = None;
    }
}
