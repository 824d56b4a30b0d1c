//! Countdown state machine that walks an [`AgendaSequence`] one tick at a time.
//!
//! The sequencer never looks at a clock. Something outside calls [`Sequencer::tick`]
//! once per second: in the browser that is a `gloo_timers` interval, in tests it
//! is a plain loop. Which of the two is in play is decided by the
//! [`TickScheduler`] handed to [`Sequencer::new`]; the sequencer only tells it
//! when a tick should be pending and when it must stop.
//!
//! Everything observable leaves through [`SequencerListener`] callbacks.

use crate::defaults::{
    COMPLETE_LABEL, IDLE_LABEL, IDLE_TIME, RED_THRESHOLD_SECS, TICK_SECONDS,
    YELLOW_THRESHOLD_SECS,
};
use crate::{build_agenda, format_clock, AgendaSequence, QueueError, Selection};
use log::{debug, info, warn};
use std::ops::Range;

/// Color band of the countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Urgency {
    Green,
    Yellow,
    Red,
    /// Terminal marker once the whole sequence has run out.
    TimeUp,
}

impl Urgency {
    /// Classify remaining seconds. Boundaries are inclusive: 60 is yellow, 10 is red.
    pub fn classify(remaining_seconds: u32) -> Self {
        if remaining_seconds <= RED_THRESHOLD_SECS {
            Urgency::Red
        } else if remaining_seconds <= YELLOW_THRESHOLD_SECS {
            Urgency::Yellow
        } else {
            Urgency::Green
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Urgency::Green => "green",
            Urgency::Yellow => "yellow",
            Urgency::Red => "red",
            Urgency::TimeUp => "time-up",
        }
    }
}

/// Progress of a single agenda entry as shown in the live agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    Pending,
    Active,
    Done,
}

impl EntryStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            EntryStatus::Pending => "status-pending",
            EntryStatus::Active => "status-active",
            EntryStatus::Done => "status-done",
        }
    }
}

/// What the status surfaces should show right now.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisplayUpdate {
    pub label: String,
    pub time: String,
    pub urgency: Urgency,
}

impl DisplayUpdate {
    fn for_entry(index: usize, agenda: &AgendaSequence, remaining_seconds: u32) -> Self {
        Self {
            label: format!("{}/{}: {}", index + 1, agenda.len(), agenda[index].name()),
            time: format_clock(remaining_seconds),
            urgency: Urgency::classify(remaining_seconds),
        }
    }

    pub fn complete() -> Self {
        Self {
            label: COMPLETE_LABEL.to_string(),
            time: format_clock(0),
            urgency: Urgency::TimeUp,
        }
    }

    /// Placeholder shown before the first run and after a reset.
    pub fn idle() -> Self {
        Self {
            label: IDLE_LABEL.to_string(),
            time: IDLE_TIME.to_string(),
            urgency: Urgency::Green,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running {
        index: usize,
        remaining_seconds: u32,
    },
    Complete,
}

/// Receiver of sequencer events. Every method except the display update has
/// a no-op default so surfaces only implement what they render.
pub trait SequencerListener {
    /// Read before each display update; inactive listeners are skipped.
    fn is_active(&self) -> bool {
        true
    }

    fn on_display_update(&mut self, update: &DisplayUpdate);

    fn on_agenda_built(&mut self, _agenda: &AgendaSequence) {}

    fn on_agenda_status_change(&mut self, _index: usize, _status: EntryStatus) {}

    fn on_queue_rejected(&mut self, _reason: &QueueError) {}

    fn on_reset(&mut self) {}
}

/// The recurring one-second timer driving [`Sequencer::tick`].
pub trait TickScheduler {
    /// Start ticking, replacing any tick that is already pending.
    fn arm(&mut self);
    /// Stop ticking. Calling it with nothing pending is a no-op.
    fn cancel(&mut self);
}

/// Scheduler that never fires on its own. The owner steps the sequencer by
/// hand; the counters record how the sequencer used the timer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualTicks {
    armed: bool,
    arms: usize,
    cancels: usize,
    replacements: usize,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of times a timer was started.
    pub fn arm_count(&self) -> usize {
        self.arms
    }

    /// Pending timers stopped through [`TickScheduler::cancel`].
    pub fn cancel_count(&self) -> usize {
        self.cancels
    }

    /// Pending timers discarded because a new one was armed over them.
    pub fn replace_count(&self) -> usize {
        self.replacements
    }
}

impl TickScheduler for ManualTicks {
    fn arm(&mut self) {
        if self.armed {
            self.replacements += 1;
        }
        self.armed = true;
        self.arms += 1;
    }

    fn cancel(&mut self) {
        if self.armed {
            self.cancels += 1;
        }
        self.armed = false;
    }
}

/// Owns the agenda of the current run, the countdown position and the timer.
pub struct Sequencer<S: TickScheduler> {
    scheduler: S,
    listeners: Vec<Box<dyn SequencerListener>>,
    agenda: Option<AgendaSequence>,
    state: TimerState,
}

impl<S: TickScheduler> Sequencer<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            listeners: Vec::new(),
            agenda: None,
            state: TimerState::Idle,
        }
    }

    pub fn with_listener(mut self, listener: impl SequencerListener + 'static) -> Self {
        self.add_listener(Box::new(listener));
        self
    }

    pub fn add_listener(&mut self, listener: Box<dyn SequencerListener>) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn agenda(&self) -> Option<&AgendaSequence> {
        self.agenda.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Derived status of one entry of the current agenda.
    pub fn entry_status(&self, index: usize) -> Option<EntryStatus> {
        let agenda = self.agenda.as_ref()?;
        if index >= agenda.len() {
            return None;
        }
        Some(match self.state {
            TimerState::Idle => EntryStatus::Pending,
            TimerState::Running { index: current, .. } => {
                if index < current {
                    EntryStatus::Done
                } else if index == current {
                    EntryStatus::Active
                } else {
                    EntryStatus::Pending
                }
            }
            TimerState::Complete => EntryStatus::Done,
        })
    }

    pub fn statuses(&self) -> Vec<EntryStatus> {
        let len = self.agenda.as_ref().map_or(0, AgendaSequence::len);
        (0..len).filter_map(|i| self.entry_status(i)).collect()
    }

    /// Build the agenda from checklist selections and start it.
    ///
    /// A rejected queue is reported to listeners and leaves any run in
    /// progress untouched.
    pub fn start_with(&mut self, selections: &[Selection]) -> Result<(), QueueError> {
        match build_agenda(selections) {
            Ok(agenda) => self.start(agenda),
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Start a run over `agenda`, discarding whatever was running before.
    pub fn start(&mut self, agenda: AgendaSequence) -> Result<(), QueueError> {
        if agenda.is_empty() {
            let err = QueueError::EmptyQueue;
            self.reject(&err);
            return Err(err);
        }

        if self.state != TimerState::Idle {
            debug!("Replacing run in state {:?}", self.state);
        }
        self.scheduler.cancel();
        self.state = TimerState::Idle;

        info!(
            "Starting sequence of {} topics ({} s total)",
            agenda.len(),
            agenda.total_seconds()
        );
        for listener in self.listeners.iter_mut() {
            listener.on_agenda_built(&agenda);
        }
        self.agenda = Some(agenda);
        self.enter(0, 0);
        Ok(())
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) {
        let TimerState::Running {
            index,
            remaining_seconds,
        } = self.state
        else {
            debug!("Ignoring tick while {:?}", self.state);
            return;
        };
        let Some(agenda) = self.agenda.as_ref() else {
            return;
        };

        let remaining = remaining_seconds.saturating_sub(TICK_SECONDS);
        let update = DisplayUpdate::for_entry(index, agenda, remaining);
        self.emit_display(&update);

        if remaining > 0 {
            self.state = TimerState::Running {
                index,
                remaining_seconds: remaining,
            };
        } else {
            self.enter(index, index + 1);
        }
    }

    /// Stop everything and forget the current agenda.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        info!("Reset from {:?}", self.state);
        self.state = TimerState::Idle;
        self.agenda = None;
        for listener in self.listeners.iter_mut() {
            listener.on_reset();
        }
    }

    // Move to the first entry at or after `index` with time on it. Entries in
    // `done_from..` up to that point are reported as done.
    fn enter(&mut self, done_from: usize, index: usize) {
        let Some(agenda) = self.agenda.as_ref() else {
            return;
        };
        let len = agenda.len();

        let mut next = index;
        while next < len && agenda[next].duration_seconds() == 0 {
            warn!(
                "Skipping zero-length topic {}/{}: {}",
                next + 1,
                len,
                agenda[next].name()
            );
            next += 1;
        }

        if next >= len {
            self.finish(done_from..len);
            return;
        }

        let remaining = agenda[next].duration_seconds();
        let update = DisplayUpdate::for_entry(next, agenda, remaining);
        debug!("Entering topic {}/{} with {} s", next + 1, len, remaining);

        self.mark(done_from..next, EntryStatus::Done);
        self.mark(next..next + 1, EntryStatus::Active);
        self.state = TimerState::Running {
            index: next,
            remaining_seconds: remaining,
        };
        self.emit_display(&update);
        self.scheduler.arm();
    }

    fn finish(&mut self, outstanding: Range<usize>) {
        self.scheduler.cancel();
        self.mark(outstanding, EntryStatus::Done);
        self.state = TimerState::Complete;
        info!("Sequence complete");
        self.emit_display(&DisplayUpdate::complete());
    }

    fn reject(&mut self, err: &QueueError) {
        warn!("Start rejected: {}", err);
        for listener in self.listeners.iter_mut() {
            listener.on_queue_rejected(err);
        }
    }

    fn mark(&mut self, indices: Range<usize>, status: EntryStatus) {
        for index in indices {
            for listener in self.listeners.iter_mut() {
                listener.on_agenda_status_change(index, status);
            }
        }
    }

    fn emit_display(&mut self, update: &DisplayUpdate) {
        for listener in self.listeners.iter_mut().filter(|l| l.is_active()) {
            listener.on_display_update(update);
        }
    }
}
