//! Demo timer web app using Yew.
//! Wires the checklist, the sequencer and the status surfaces together.

use std::cell::Cell;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod mirror;
mod state;
mod ticker;
mod utils;

use components::{AgendaList, EmbeddedStatus, FullScreenTimer, TopicChecklist};
use config::*;
use hooks::{use_mirror_channel, use_sequencer};
use mirror::{DisplayCommand, MirrorMessage, MirrorSink};
use state::{Checklist, ChecklistAction, TimerAction, TimerView};
use utils::is_display_mode;

/// Control window: checklist, buttons, embedded status and live agenda.
#[function_component(ControlPanel)]
fn control_panel() -> Html {
    let checklist = use_reducer(|| Checklist::from_topics(&TOPICS, DEFAULT_MINUTES));
    let view = use_reducer(TimerView::default);
    let show_display_hint = use_state(|| false);
    // Read by the mirror listener before every display update
    let mirror_active = use_state(|| Rc::new(Cell::new(false)));

    let mirror = use_mirror_channel();
    let sequencer = use_sequencer(
        view.dispatcher(),
        mirror.clone(),
        (*mirror_active).clone(),
    );

    // Display windows announce themselves; start mirroring to them. Ask on
    // load too, so windows opened before this one are found.
    {
        let mirror = mirror.clone();
        let view = view.dispatcher();
        let mirror_active = (*mirror_active).clone();
        use_effect_with((), move |_| {
            if let Some(channel) = mirror {
                channel.subscribe(Callback::from(move |message: MirrorMessage| {
                    if message == MirrorMessage::Attach {
                        log::info!("Display window attached");
                        mirror_active.set(true);
                        view.dispatch(TimerAction::MirrorAttached);
                    }
                }));
                if let Err(e) = channel.post(&MirrorMessage::Discover) {
                    log::warn!("{}", e);
                }
            }
        });
    }

    let on_toggle = {
        let checklist = checklist.dispatcher();
        let view = view.dispatcher();
        Callback::from(move |(idx, checked): (usize, bool)| {
            checklist.dispatch(ChecklistAction::Toggle(idx, checked));
            view.dispatch(TimerAction::ChecklistEdited);
        })
    };

    let on_minutes = {
        let checklist = checklist.dispatcher();
        let view = view.dispatcher();
        Callback::from(move |(idx, text): (usize, String)| {
            checklist.dispatch(ChecklistAction::SetMinutes(idx, text));
            view.dispatch(TimerAction::ChecklistEdited);
        })
    };

    let on_start = {
        let checklist = checklist.clone();
        let start = sequencer.start.clone();
        Callback::from(move |_: MouseEvent| start.emit(checklist.selections()))
    };

    let on_reset = {
        let checklist = checklist.dispatcher();
        let reset = sequencer.reset.clone();
        Callback::from(move |_: MouseEvent| {
            reset.emit(());
            checklist.dispatch(ChecklistAction::Clear);
        })
    };

    let on_open_display = {
        let show_display_hint = show_display_hint.clone();
        Callback::from(move |_: MouseEvent| show_display_hint.set(!*show_display_hint))
    };

    let on_mirror_toggle = {
        let view = view.dispatcher();
        let mirror_active = (*mirror_active).clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            mirror_active.set(input.checked());
            view.dispatch(TimerAction::MirrorEnabled(input.checked()));
        })
    };

    html! {
        <div class="container">
            <div id="control-panel">
                <h1>{ "Demo Timer" }</h1>
                <TopicChecklist
                    rows={checklist.rows.clone()}
                    {on_toggle}
                    {on_minutes}
                />
                <div class="total-time">
                    { "Total planned: " }
                    <span id="total-minutes">{ checklist.planned_minutes() }</span>
                    { " min" }
                </div>
                <div class="button-row">
                    <button id="start-demo-btn" class="btn-primary" onclick={on_start}>{ "Start Demo" }</button>
                    <button id="reset-times-btn" class="btn-secondary" onclick={on_reset}>{ "Reset Times" }</button>
                    <button id="open-display-btn" class="btn-secondary" onclick={on_open_display}>{ "Open Display" }</button>
                </div>
                if mirror.is_some() {
                    <div class="form-group checkbox-group">
                        <label>
                            <input type="checkbox"
                                checked={view.mirror_enabled}
                                onchange={on_mirror_toggle}
                            />
                            { "Mirror to display window" }
                            if view.mirror_connected {
                                <span class="mirror-connected">{ " (connected)" }</span>
                            }
                        </label>
                    </div>
                }
                if *show_display_hint {
                    <p class="display-hint">{ OPEN_DISPLAY_HINT }</p>
                }
                if let Some(ref notice) = view.notice {
                    <div class="current-error">{ notice }</div>
                }
            </div>

            <EmbeddedStatus display={view.display.clone()} />
            <AgendaList rows={view.agenda.clone()} />
        </div>
    }
}

/// Second window opened with `?display=true`: full-screen timer fed over the
/// display channel.
#[function_component(DisplayWindow)]
fn display_window() -> Html {
    let view = use_reducer(TimerView::default);
    let mirror = use_mirror_channel();

    {
        let view = view.dispatcher();
        use_effect_with((), move |_| {
            if let Some(channel) = mirror {
                let replies = Rc::downgrade(&channel);
                channel.subscribe(Callback::from(move |message: MirrorMessage| {
                    match DisplayCommand::from(message) {
                        DisplayCommand::Show(update) => view.dispatch(TimerAction::Display(update)),
                        DisplayCommand::Clear => view.dispatch(TimerAction::Reset),
                        DisplayCommand::Announce => {
                            if let Some(channel) = replies.upgrade() {
                                if let Err(e) = channel.post(&MirrorMessage::Attach) {
                                    log::warn!("{}", e);
                                }
                            }
                        }
                        DisplayCommand::Ignore => {}
                    }
                }));
                if let Err(e) = channel.post(&MirrorMessage::Attach) {
                    log::warn!("{}", e);
                }
            }
        });
    }

    html! {
        <div class="display-mode">
            <FullScreenTimer display={view.display.clone()} />
        </div>
    }
}

/// Picks the control panel or the full-screen display from the page URL.
#[function_component]
pub fn App() -> Html {
    let display_mode = use_state(|| {
        let query = gloo_utils::window().location().search().unwrap_or_default();
        is_display_mode(&query)
    });

    if *display_mode {
        html! { <DisplayWindow /> }
    } else {
        html! { <ControlPanel /> }
    }
}

/// Entry point: initializes Yew renderer for the App component.
fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
