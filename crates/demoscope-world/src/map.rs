use demoscope_protocol::{Message, MessageType};
use serde::Serialize;

use crate::Reducer;

/// Map shown before the server announced one.
pub const DEFAULT_MAP: &str = "de_dust2";

/// The map identifier from the init message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapInfo {
    pub map_name: Option<String>,
}

impl MapInfo {
    /// Key for looking up radar images and calibration: the announced map,
    /// or [`DEFAULT_MAP`].
    pub fn asset_key(&self) -> &str {
        self.map_name.as_deref().unwrap_or(DEFAULT_MAP)
    }
}

impl Reducer for MapInfo {
    const TAGS: &'static [MessageType] = &[MessageType::Init];

    fn reduce(&mut self, msg: &Message) {
        if let Message::Init(init) = msg {
            if init.map_name.is_empty() {
                tracing::debug!("init without map name");
                return;
            }
            tracing::debug!(map = %init.map_name, "map announced");
            self.map_name = Some(init.map_name.clone());
        }
    }
}
