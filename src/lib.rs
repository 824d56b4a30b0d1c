use log::{debug, info, warn};
use std::fmt;
use std::ops::Index;

/// Timing and labelling defaults shared by the sequencer and the UI.
pub mod defaults {
    /// Seconds removed from the active entry on every tick.
    pub const TICK_SECONDS: u32 = 1;
    /// At or below this many seconds the display turns yellow.
    pub const YELLOW_THRESHOLD_SECS: u32 = 60;
    /// At or below this many seconds the display turns red.
    pub const RED_THRESHOLD_SECS: u32 = 10;
    pub const COMPLETE_LABEL: &str = "DEMO SEQUENCE COMPLETE!";
    pub const IDLE_LABEL: &str = "Ready";
    pub const IDLE_TIME: &str = "00:00";
}

pub mod sequencer;

pub use sequencer::{
    DisplayUpdate, EntryStatus, ManualTicks, Sequencer, SequencerListener, TickScheduler,
    TimerState, Urgency,
};

/// A topic the user ticked on the checklist, with the minutes typed next to it.
///
/// Minutes are signed because the checklist hands over whatever the user typed
/// after normalization; anything `<= 0` is treated as "not selected".
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Selection {
    pub name: String,
    pub duration_minutes: i64,
}

impl Selection {
    pub fn new(name: impl Into<String>, duration_minutes: i64) -> Self {
        Self {
            name: name.into(),
            duration_minutes,
        }
    }
}

/// One timed slot of the agenda.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AgendaEntry {
    name: String,
    duration_seconds: u32,
    // As entered; the seconds may have saturated
    duration_minutes: u64,
}

impl AgendaEntry {
    pub fn new(name: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
            duration_minutes: u64::from(duration_seconds / 60),
        }
    }

    /// Entry timed in whole minutes. Seconds saturate at `u32::MAX`, the
    /// minutes are kept exactly as given.
    pub fn from_minutes(name: impl Into<String>, minutes: u64) -> Self {
        Self {
            name: name.into(),
            duration_seconds: minutes_to_seconds(minutes),
            duration_minutes: minutes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Whole minutes, as shown in the pending badge of the live agenda.
    pub fn duration_minutes(&self) -> u64 {
        self.duration_minutes
    }
}

/// Ordered agenda for a single run. Replaced, never mutated, between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct AgendaSequence {
    entries: Vec<AgendaEntry>,
}

impl AgendaSequence {
    /// Wraps entries without filtering them. [`build_agenda`] is the checked
    /// path; the sequencer still copes with empty or zero-length input.
    pub fn new(entries: Vec<AgendaEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AgendaEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AgendaEntry> {
        self.entries.iter()
    }

    pub fn total_seconds(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.duration_seconds))
            .sum()
    }
}

impl Index<usize> for AgendaSequence {
    type Output = AgendaEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a AgendaSequence {
    type Item = &'a AgendaEntry;
    type IntoIter = std::slice::Iter<'a, AgendaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Error raised when a run is requested with nothing eligible to time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    EmptyQueue,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::EmptyQueue => write!(
                f,
                "Please check topics and ensure they have a time greater than 0 minutes to start the sequence."
            ),
        }
    }
}

impl std::error::Error for QueueError {}

/// Convert whole minutes to seconds, saturating instead of wrapping.
#[inline]
fn minutes_to_seconds(minutes: u64) -> u32 {
    u32::try_from(minutes)
        .unwrap_or(u32::MAX)
        .saturating_mul(60)
}

/// Turns the checked topics into the agenda for one run.
///
/// Selections with a duration of zero or less are dropped silently, exactly
/// like unchecked topics. Order is preserved.
///
/// # Returns
/// * `Ok(AgendaSequence)` - at least one entry with a positive duration
/// * `Err(QueueError::EmptyQueue)` - nothing left to run after filtering
pub fn build_agenda(selections: &[Selection]) -> Result<AgendaSequence, QueueError> {
    let entries: Vec<AgendaEntry> = selections
        .iter()
        .filter(|s| {
            let keep = s.duration_minutes > 0;
            if !keep {
                debug!("Dropping '{}' with {} min", s.name, s.duration_minutes);
            }
            keep
        })
        .map(|s| AgendaEntry::from_minutes(s.name.clone(), s.duration_minutes.unsigned_abs()))
        .collect();

    if entries.is_empty() {
        warn!(
            "Refusing to build agenda: none of {} selections has a positive duration",
            selections.len()
        );
        return Err(QueueError::EmptyQueue);
    }

    info!(
        "Built agenda with {} of {} selections",
        entries.len(),
        selections.len()
    );
    Ok(AgendaSequence::new(entries))
}

/// Sum of minutes across selections that would make it into the agenda.
/// Saturates at `i64::MAX`.
pub fn planned_minutes(selections: &[Selection]) -> i64 {
    selections
        .iter()
        .filter(|s| s.duration_minutes > 0)
        .fold(0i64, |acc, s| acc.saturating_add(s.duration_minutes))
}

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}", minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(seq: &AgendaSequence) -> Vec<&str> {
        seq.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn build_keeps_positive_durations_in_order() {
        let selections = vec![
            Selection::new("Chat", 3),
            Selection::new("Email", 0),
            Selection::new("SMS 1:1", 1),
            Selection::new("Identity", -4),
            Selection::new("Copilot", 2),
        ];

        let seq = build_agenda(&selections).unwrap();

        assert_eq!(names(&seq), vec!["Chat", "SMS 1:1", "Copilot"]);
        assert_eq!(seq[0].duration_seconds(), 180);
        assert_eq!(seq[1].duration_seconds(), 60);
        assert_eq!(seq[2].duration_seconds(), 120);
        assert_eq!(seq.total_seconds(), 360);
    }

    #[test]
    fn build_rejects_empty_or_non_positive_input() {
        assert_eq!(build_agenda(&[]), Err(QueueError::EmptyQueue));

        let zeros = vec![Selection::new("Chat", 0), Selection::new("Email", -1)];
        assert_eq!(build_agenda(&zeros), Err(QueueError::EmptyQueue));
    }

    #[test]
    fn build_does_not_reorder_or_dedupe() {
        let selections = vec![
            Selection::new("Zeta", 1),
            Selection::new("Alpha", 1),
            Selection::new("Zeta", 2),
        ];
        let seq = build_agenda(&selections).unwrap();
        assert_eq!(names(&seq), vec!["Zeta", "Alpha", "Zeta"]);
    }

    #[test]
    fn huge_minute_values_saturate() {
        let seq = build_agenda(&[Selection::new("Live", i64::MAX)]).unwrap();
        assert_eq!(seq[0].duration_seconds(), u32::MAX);
    }

    #[test]
    fn entry_keeps_minutes_as_entered() {
        let seq = build_agenda(&[
            Selection::new("Live", 100_000_000),
            Selection::new("Admin", 3),
        ])
        .unwrap();
        assert_eq!(seq[0].duration_minutes(), 100_000_000);
        assert_eq!(seq[0].duration_seconds(), u32::MAX);
        assert_eq!(seq[1].duration_minutes(), 3);
        assert_eq!(AgendaEntry::new("Chat", 150).duration_minutes(), 2);
    }

    #[test]
    fn planned_minutes_ignores_non_positive() {
        let selections = vec![
            Selection::new("A", 5),
            Selection::new("B", 0),
            Selection::new("C", -3),
            Selection::new("D", 10),
        ];
        assert_eq!(planned_minutes(&selections), 15);
        assert_eq!(planned_minutes(&[]), 0);
    }

    #[test]
    fn planned_minutes_saturates_instead_of_overflowing() {
        let selections = vec![Selection::new("A", i64::MAX), Selection::new("B", 5)];
        assert_eq!(planned_minutes(&selections), i64::MAX);
    }

    #[test]
    fn format_clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(6_000), "100:00");
    }

    #[test]
    fn empty_queue_message_is_user_facing() {
        let msg = QueueError::EmptyQueue.to_string();
        assert!(msg.contains("greater than 0 minutes"));
    }
}
