use crate::config::{MIRROR_CHANNEL, TICK_INTERVAL_MS};
use crate::mirror::{MirrorChannel, MirrorListener};
use crate::state::{TimerAction, TimerView};
use crate::ticker::IntervalTicker;
use demo_timer::{
    AgendaSequence, DisplayUpdate, EntryStatus, QueueError, Selection, Sequencer,
    SequencerListener,
};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use yew::prelude::*;

type AppSequencer = Sequencer<IntervalTicker>;

/// Feeds sequencer events into the [`TimerView`] reducer.
struct ViewListener {
    view: UseReducerDispatcher<TimerView>,
}

impl SequencerListener for ViewListener {
    fn on_display_update(&mut self, update: &DisplayUpdate) {
        self.view.dispatch(TimerAction::Display(update.clone()));
    }

    fn on_agenda_built(&mut self, agenda: &AgendaSequence) {
        self.view
            .dispatch(TimerAction::AgendaBuilt(TimerView::agenda_rows(agenda)));
    }

    fn on_agenda_status_change(&mut self, index: usize, status: EntryStatus) {
        self.view.dispatch(TimerAction::Status(index, status));
    }

    fn on_queue_rejected(&mut self, reason: &QueueError) {
        self.view.dispatch(TimerAction::Rejected(reason.to_string()));
    }

    fn on_reset(&mut self) {
        self.view.dispatch(TimerAction::Reset);
    }
}

/// Commands accepted by the page's single sequencer.
#[derive(Clone)]
pub struct SequencerHandle {
    /// Build the agenda from the given selections and run it.
    pub start: Callback<Vec<Selection>>,
    pub reset: Callback<()>,
}

/// Open the display channel once per component. `None` when the browser
/// has no `BroadcastChannel`; the timer then runs without a second window.
#[hook]
pub fn use_mirror_channel() -> Option<Rc<MirrorChannel>> {
    let channel = use_state(|| match MirrorChannel::open(MIRROR_CHANNEL) {
        Ok(channel) => Some(Rc::new(channel)),
        Err(e) => {
            warn!("{}", e);
            None
        }
    });
    (*channel).clone()
}

/// Create the page's sequencer, driven by a one-second [`IntervalTicker`].
///
/// The ticker calls back through a weak reference so that dropping the
/// component also drops the sequencer and its interval.
#[hook]
pub fn use_sequencer(
    view: UseReducerDispatcher<TimerView>,
    mirror: Option<Rc<MirrorChannel>>,
    mirror_active: Rc<Cell<bool>>,
) -> SequencerHandle {
    let sequencer = use_state(move || {
        Rc::new_cyclic(|weak: &Weak<RefCell<AppSequencer>>| {
            let weak = weak.clone();
            let on_tick = Callback::from(move |_| {
                if let Some(sequencer) = weak.upgrade() {
                    sequencer.borrow_mut().tick();
                }
            });

            let mut sequencer = Sequencer::new(IntervalTicker::new(TICK_INTERVAL_MS, on_tick))
                .with_listener(ViewListener { view });
            if let Some(channel) = mirror {
                sequencer.add_listener(Box::new(MirrorListener::new(channel, mirror_active)));
            }
            RefCell::new(sequencer)
        })
    });

    let start = {
        let sequencer = (*sequencer).clone();
        Callback::from(move |selections: Vec<Selection>| {
            if let Err(e) = sequencer.borrow_mut().start_with(&selections) {
                debug!("Start ignored: {}", e);
            }
        })
    };

    let reset = {
        let sequencer = (*sequencer).clone();
        Callback::from(move |_| sequencer.borrow_mut().reset())
    };

    SequencerHandle { start, reset }
}
