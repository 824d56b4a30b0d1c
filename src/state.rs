//! Reducer-backed UI state: the topic checklist and what the timer surfaces show.

use crate::utils::parse_minutes;
use demo_timer::{planned_minutes, AgendaSequence, DisplayUpdate, EntryStatus, Selection};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, PartialEq, Debug)]
pub struct TopicRow {
    pub name: String,
    pub checked: bool,
    /// Raw text of the minutes field; normalized only when read.
    pub minutes_text: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Checklist {
    pub rows: Vec<TopicRow>,
}

pub enum ChecklistAction {
    Toggle(usize, bool),
    SetMinutes(usize, String),
    Clear,
}

impl Checklist {
    pub fn from_topics(topics: &[&str], default_minutes: &str) -> Self {
        Self {
            rows: topics
                .iter()
                .map(|name| TopicRow {
                    name: name.to_string(),
                    checked: false,
                    minutes_text: default_minutes.to_string(),
                })
                .collect(),
        }
    }

    /// Checked rows in checklist order with their normalized minutes.
    pub fn selections(&self) -> Vec<Selection> {
        self.rows
            .iter()
            .filter(|r| r.checked)
            .map(|r| Selection::new(r.name.clone(), parse_minutes(&r.minutes_text)))
            .collect()
    }

    pub fn planned_minutes(&self) -> i64 {
        planned_minutes(&self.selections())
    }
}

impl Reducible for Checklist {
    type Action = ChecklistAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ChecklistAction::Toggle(idx, checked) => {
                if let Some(row) = next.rows.get_mut(idx) {
                    row.checked = checked;
                }
            }
            ChecklistAction::SetMinutes(idx, text) => {
                if let Some(row) = next.rows.get_mut(idx) {
                    row.minutes_text = text;
                }
            }
            ChecklistAction::Clear => {
                for row in next.rows.iter_mut() {
                    row.checked = false;
                    row.minutes_text = crate::config::DEFAULT_MINUTES.to_string();
                }
            }
        }
        Rc::new(next)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct AgendaRow {
    pub name: String,
    pub minutes: u64,
    pub status: EntryStatus,
}

/// Everything the embedded panel, the live agenda and the full-screen
/// surface render.
#[derive(Clone, PartialEq, Debug)]
pub struct TimerView {
    pub display: DisplayUpdate,
    pub agenda: Vec<AgendaRow>,
    pub notice: Option<String>,
    /// A display window has announced itself on the channel.
    pub mirror_connected: bool,
    pub mirror_enabled: bool,
}

impl Default for TimerView {
    fn default() -> Self {
        Self {
            display: DisplayUpdate::idle(),
            agenda: Vec::new(),
            notice: None,
            mirror_connected: false,
            mirror_enabled: false,
        }
    }
}

pub enum TimerAction {
    Display(DisplayUpdate),
    AgendaBuilt(Vec<AgendaRow>),
    Status(usize, EntryStatus),
    Rejected(String),
    /// Checklist edited; drop a stale agenda unless a topic is still running.
    ChecklistEdited,
    Reset,
    MirrorAttached,
    MirrorEnabled(bool),
}

impl TimerView {
    pub fn agenda_rows(agenda: &AgendaSequence) -> Vec<AgendaRow> {
        agenda
            .iter()
            .map(|entry| AgendaRow {
                name: entry.name().to_string(),
                minutes: entry.duration_minutes(),
                status: EntryStatus::Pending,
            })
            .collect()
    }

    pub fn is_running(&self) -> bool {
        self.agenda.iter().any(|r| r.status == EntryStatus::Active)
    }
}

impl Reducible for TimerView {
    type Action = TimerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            TimerAction::Display(update) => next.display = update,
            TimerAction::AgendaBuilt(rows) => {
                next.agenda = rows;
                next.notice = None;
            }
            TimerAction::Status(idx, status) => {
                if let Some(row) = next.agenda.get_mut(idx) {
                    row.status = status;
                }
            }
            TimerAction::Rejected(message) => next.notice = Some(message),
            TimerAction::ChecklistEdited => {
                if !next.is_running() {
                    next.agenda.clear();
                }
            }
            TimerAction::Reset => {
                next.display = DisplayUpdate::idle();
                next.agenda.clear();
                next.notice = None;
            }
            TimerAction::MirrorAttached => {
                next.mirror_connected = true;
                next.mirror_enabled = true;
            }
            TimerAction::MirrorEnabled(enabled) => next.mirror_enabled = enabled,
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo_timer::{build_agenda, Urgency};

    fn checklist() -> Rc<Checklist> {
        Rc::new(Checklist::from_topics(&["Chat", "Email", "Live"], "0"))
    }

    #[test]
    fn selections_keep_checked_rows_in_order() {
        let list = checklist()
            .reduce(ChecklistAction::Toggle(2, true))
            .reduce(ChecklistAction::SetMinutes(2, "4".into()))
            .reduce(ChecklistAction::Toggle(0, true))
            .reduce(ChecklistAction::SetMinutes(0, "2x".into()))
            .reduce(ChecklistAction::SetMinutes(1, "9".into()));

        assert_eq!(
            list.selections(),
            vec![Selection::new("Chat", 2), Selection::new("Live", 4)]
        );
        assert_eq!(list.planned_minutes(), 6);
    }

    #[test]
    fn checked_zero_minutes_never_reaches_agenda() {
        let list = checklist().reduce(ChecklistAction::Toggle(1, true));
        assert_eq!(list.selections(), vec![Selection::new("Email", 0)]);
        assert!(build_agenda(&list.selections()).is_err());
        assert_eq!(list.planned_minutes(), 0);
    }

    #[test]
    fn clear_unchecks_and_zeroes_every_row() {
        let list = checklist()
            .reduce(ChecklistAction::Toggle(0, true))
            .reduce(ChecklistAction::SetMinutes(0, "5".into()))
            .reduce(ChecklistAction::Clear);
        assert!(list.rows.iter().all(|r| !r.checked && r.minutes_text == "0"));
    }

    #[test]
    fn out_of_range_rows_are_ignored() {
        let list = checklist().reduce(ChecklistAction::Toggle(10, true));
        assert_eq!(*list, *checklist());
    }

    #[test]
    fn timer_view_tracks_agenda_statuses() {
        let agenda = build_agenda(&[Selection::new("A", 1), Selection::new("B", 2)]).unwrap();
        let view = Rc::new(TimerView::default())
            .reduce(TimerAction::AgendaBuilt(TimerView::agenda_rows(&agenda)))
            .reduce(TimerAction::Status(0, EntryStatus::Active));

        assert_eq!(view.agenda[0].minutes, 1);
        assert_eq!(view.agenda[1].minutes, 2);
        assert!(view.is_running());

        let view = view.reduce(TimerAction::ChecklistEdited);
        assert_eq!(view.agenda.len(), 2);

        let view = view
            .reduce(TimerAction::Status(0, EntryStatus::Done))
            .reduce(TimerAction::Status(1, EntryStatus::Done))
            .reduce(TimerAction::ChecklistEdited);
        assert!(view.agenda.is_empty());
    }

    #[test]
    fn agenda_rows_show_minutes_as_typed() {
        let list = checklist()
            .reduce(ChecklistAction::Toggle(2, true))
            .reduce(ChecklistAction::SetMinutes(2, "100000000".into()));
        let agenda = build_agenda(&list.selections()).unwrap();
        let rows = TimerView::agenda_rows(&agenda);
        assert_eq!(rows[0].minutes, 100_000_000);
    }

    #[test]
    fn reset_restores_idle_display() {
        let view = Rc::new(TimerView::default())
            .reduce(TimerAction::Display(DisplayUpdate::complete()))
            .reduce(TimerAction::Rejected("nope".into()))
            .reduce(TimerAction::Reset);
        assert_eq!(view.display, DisplayUpdate::idle());
        assert_eq!(view.display.urgency, Urgency::Green);
        assert!(view.notice.is_none());
    }

    #[test]
    fn attaching_a_display_enables_mirroring() {
        let view = Rc::new(TimerView::default()).reduce(TimerAction::MirrorAttached);
        assert!(view.mirror_connected && view.mirror_enabled);

        let view = view.reduce(TimerAction::MirrorEnabled(false));
        assert!(view.mirror_connected);
        assert!(!view.mirror_enabled);
    }
}
