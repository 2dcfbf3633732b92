use demoscope_protocol::{Message, MessageType};
use serde::Serialize;

use crate::Reducer;

/// Round clock, loading bar, and end-of-demo flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Playback {
    /// Clock text exactly as the server formats it, e.g. `"1:42"`.
    pub round_time: String,
    /// Parse progress, 0..=100.
    pub progress: u8,
    pub progress_message: String,
    pub finished: bool,
}

impl Reducer for Playback {
    const TAGS: &'static [MessageType] = &[
        MessageType::RoundTime,
        MessageType::Progress,
        MessageType::DemoEnd,
    ];

    fn reduce(&mut self, msg: &Message) {
        match msg {
            Message::RoundTime(t) => self.round_time = t.round_time.clone(),
            Message::Progress(p) => {
                self.progress = p.progress.clamp(0, 100) as u8;
                self.progress_message = p.message.clone();
            }
            Message::DemoEnd => {
                tracing::info!("demo finished");
                self.finished = true;
            }
            _ => {}
        }
    }
}
