//! Pure Yew view components for the demo timer.
//!
//! Everything here renders from props; state lives in [`crate::state`].

use crate::config::AGENDA_PLACEHOLDER;
use crate::state::{AgendaRow, TopicRow};
use demo_timer::{DisplayUpdate, EntryStatus};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Topic checklist: one checkbox and minutes field per topic.
#[derive(Properties, PartialEq)]
pub struct TopicChecklistProps {
    pub rows: Vec<TopicRow>,
    pub on_toggle: Callback<(usize, bool)>,
    pub on_minutes: Callback<(usize, String)>,
}

#[function_component(TopicChecklist)]
pub fn topic_checklist(props: &TopicChecklistProps) -> Html {
    html! {
        <form id="topic-form" onsubmit={Callback::from(|e: SubmitEvent| e.prevent_default())}>
            { props.rows.iter().enumerate().map(|(idx, row)| {
                render_topic_row(idx, row, &props.on_toggle, &props.on_minutes)
            }).collect::<Html>() }
        </form>
    }
}

fn render_topic_row(
    idx: usize,
    row: &TopicRow,
    on_toggle: &Callback<(usize, bool)>,
    on_minutes: &Callback<(usize, String)>,
) -> Html {
    let check_id = format!("check-{}", row.name);
    let time_id = format!("time-{}", row.name);

    let onchange = on_toggle.reform(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        (idx, input.checked())
    });
    let oninput = on_minutes.reform(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        (idx, input.value())
    });

    html! {
        <div class="topic-item" key={row.name.clone()}>
            <div class="topic-name-wrap">
                <input type="checkbox"
                    id={check_id.clone()}
                    name="topic-check"
                    value={row.name.clone()}
                    checked={row.checked}
                    {onchange}
                />
                <label for={check_id}>{ &row.name }</label>
            </div>
            <input type="number"
                id={time_id}
                class="time-input"
                min="0"
                value={row.minutes_text.clone()}
                {oninput}
            />
            <span>{ "min" }</span>
        </div>
    }
}

/// Live agenda for the current run.
#[derive(Properties, PartialEq)]
pub struct AgendaListProps {
    pub rows: Vec<AgendaRow>,
}

#[function_component(AgendaList)]
pub fn agenda_list(props: &AgendaListProps) -> Html {
    if props.rows.is_empty() {
        return html! {
            <ul id="live-agenda-list">
                <li>{ AGENDA_PLACEHOLDER }</li>
            </ul>
        };
    }

    html! {
        <ul id="live-agenda-list">
            { props.rows.iter().enumerate().map(|(idx, row)| render_agenda_item(idx, row)).collect::<Html>() }
        </ul>
    }
}

fn render_agenda_item(idx: usize, row: &AgendaRow) -> Html {
    let badge = match row.status {
        EntryStatus::Done => "DONE".to_string(),
        EntryStatus::Pending | EntryStatus::Active => format!("{} min", row.minutes),
    };

    html! {
        <li id={format!("agenda-item-{}", idx)}>
            <span>{ format!("{}. {}", idx + 1, row.name) }</span>
            <span class={classes!("agenda-status", row.status.css_class())}>{ badge }</span>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct TimerDisplayProps {
    pub display: DisplayUpdate,
}

/// Compact status in the control window.
#[function_component(EmbeddedStatus)]
pub fn embedded_status(props: &TimerDisplayProps) -> Html {
    html! {
        <div id="embedded-timer-status" class={classes!("embedded-status", props.display.urgency.css_class())}>
            <div id="current-topic-name">{ &props.display.label }</div>
            <div id="embedded-time">{ &props.display.time }</div>
        </div>
    }
}

/// Full-screen surface of a display window.
#[function_component(FullScreenTimer)]
pub fn full_screen_timer(props: &TimerDisplayProps) -> Html {
    html! {
        <div id="timer-screen">
            <div id="visual-indicator" class={props.display.urgency.css_class()}>
                <div id="screen-topic-text">{ &props.display.label }</div>
                <div id="screen-timer-text">{ &props.display.time }</div>
            </div>
        </div>
    }
}
