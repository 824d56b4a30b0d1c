//! Cross-window link between the control panel and full-screen display windows.
//!
//! Both sides open the same `BroadcastChannel`. Messages are plain serde
//! values moved across the JS boundary with `serde_wasm_bindgen`.

use demo_timer::{DisplayUpdate, SequencerListener};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{BroadcastChannel, MessageEvent};
use yew::Callback;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum MirrorMessage {
    /// Sent by a control window on load; display windows answer with `Attach`.
    Discover,
    /// Sent by a display window once it is listening, and in reply to `Discover`.
    Attach,
    Display(DisplayUpdate),
    Reset,
}

#[derive(Debug)]
pub enum MirrorError {
    Unavailable(String),
    Encode(String),
    Decode(String),
    Post(String),
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorError::Unavailable(e) => write!(f, "Display channel unavailable: {}", e),
            MirrorError::Encode(e) => write!(f, "Failed to encode display message: {}", e),
            MirrorError::Decode(e) => write!(f, "Failed to decode display message: {}", e),
            MirrorError::Post(e) => write!(f, "Failed to post display message: {}", e),
        }
    }
}

impl std::error::Error for MirrorError {}

/// What a display window does with an incoming message.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    Show(DisplayUpdate),
    Clear,
    /// Reply with `Attach` so the sender starts mirroring.
    Announce,
    Ignore,
}

impl From<MirrorMessage> for DisplayCommand {
    fn from(message: MirrorMessage) -> Self {
        match message {
            MirrorMessage::Display(update) => DisplayCommand::Show(update),
            MirrorMessage::Reset => DisplayCommand::Clear,
            MirrorMessage::Discover => DisplayCommand::Announce,
            MirrorMessage::Attach => DisplayCommand::Ignore,
        }
    }
}

/// Anything a [`MirrorListener`] can post messages to.
pub trait MirrorSink {
    fn post(&self, message: &MirrorMessage) -> Result<(), MirrorError>;
}

pub fn encode(message: &MirrorMessage) -> Result<JsValue, MirrorError> {
    serde_wasm_bindgen::to_value(message).map_err(|e| MirrorError::Encode(e.to_string()))
}

pub fn decode(value: JsValue) -> Result<MirrorMessage, MirrorError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| MirrorError::Decode(e.to_string()))
}

/// One end of the display channel. Closing happens on drop.
pub struct MirrorChannel {
    channel: BroadcastChannel,
    on_message: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>>,
}

impl MirrorChannel {
    pub fn open(name: &str) -> Result<Self, MirrorError> {
        let channel =
            BroadcastChannel::new(name).map_err(|e| MirrorError::Unavailable(format!("{:?}", e)))?;
        debug!("Opened display channel '{}'", name);
        Ok(Self {
            channel,
            on_message: RefCell::new(None),
        })
    }

    /// Route incoming messages to `callback`, replacing any earlier subscriber.
    /// Undecodable messages are logged and dropped.
    pub fn subscribe(&self, callback: Callback<MirrorMessage>) {
        let closure = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match decode(event.data()) {
                Ok(message) => callback.emit(message),
                Err(e) => warn!("{}", e),
            }
        });
        self.channel
            .set_onmessage(Some(closure.as_ref().unchecked_ref()));
        *self.on_message.borrow_mut() = Some(closure);
    }
}

impl MirrorSink for MirrorChannel {
    fn post(&self, message: &MirrorMessage) -> Result<(), MirrorError> {
        let value = encode(message)?;
        self.channel
            .post_message(&value)
            .map_err(|e| MirrorError::Post(format!("{:?}", e)))
    }
}

impl Drop for MirrorChannel {
    fn drop(&mut self) {
        self.channel.set_onmessage(None);
        self.channel.close();
    }
}

/// Sequencer listener that forwards display updates to display windows.
///
/// It is inactive until a display window attaches or the user turns
/// mirroring on, and the flag is re-read before every update. Resets are
/// always forwarded so no display is left showing a cancelled run.
pub struct MirrorListener<S: MirrorSink = MirrorChannel> {
    channel: Rc<S>,
    active: Rc<Cell<bool>>,
}

impl<S: MirrorSink> MirrorListener<S> {
    pub fn new(channel: Rc<S>, active: Rc<Cell<bool>>) -> Self {
        Self { channel, active }
    }

    fn send(&self, message: &MirrorMessage) {
        if let Err(e) = self.channel.post(message) {
            warn!("{}", e);
        }
    }
}

impl<S: MirrorSink> SequencerListener for MirrorListener<S> {
    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn on_display_update(&mut self, update: &DisplayUpdate) {
        self.send(&MirrorMessage::Display(update.clone()));
    }

    fn on_reset(&mut self) {
        self.send(&MirrorMessage::Reset);
    }
}
