use crate::{
    back_buffer::BackBufferScheduler,
    bindings::{jsSendOtherError, MediaType, OtherErrorCode, SourceBufferId},
    media_element::MediaElementReference,
    utils::logger::LoggerLevel,
    wasm_bindgen, Logger,
};

use super::Dispatcher;

/// Methods exposed to the JavaScript-side.
///
/// Note that these are not the only methods callable by JavaScript. There's
/// also "event_listeners" which as its name point at, should be called when particular
/// events happen. Such "event_listeners" are defined in its own file.
#[wasm_bindgen]
impl Dispatcher {
    /// Create a new `Dispatcher`, which won't remove any back buffer until a live back buffer
    /// length is set through `set_live_back_buffer_length`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Dispatcher {
            media_element_ref: MediaElementReference::new(),
            back_buffer: BackBufferScheduler::new(),
            is_live: false,
            target_duration: None,
        }
    }

    /// Update the amount of media data, in seconds, to keep behind the current position when
    /// playing live contents.
    ///
    /// `undefined`, non-numbers and negative values disable back buffer removal, as does
    /// `Infinity`.
    /// The new value is considered from the next buffer update.
    pub fn set_live_back_buffer_length(&mut self, length: Option<f64>) {
        Logger::info(&format!("API: setting live back buffer length: {:?}", length));
        self.back_buffer.config_mut().live_back_buffer_length = length;
    }

    /// Update the maximum level of logs emitted, from `0` (no log) to `4` (debug logs).
    pub fn set_log_level(&mut self, level: u8) {
        Logger::set_logger_level(LoggerLevel::from(level));
    }

    /// Indicate that a `SourceBuffer` for the given `MediaType` has been created by the
    /// JavaScript-side and is now identified by `source_buffer_id`.
    pub fn attach_source_buffer(&mut self, media_type: MediaType, source_buffer_id: SourceBufferId) {
        if let Err(err) = self
            .media_element_ref
            .attach_source_buffer(media_type, source_buffer_id)
        {
            Logger::error(&format!("API: {}", err));
            jsSendOtherError(false, OtherErrorCode::Unknown, Some(&err.to_string()));
        }
    }

    /// Indicate that the JavaScript-side just started appending media data to the
    /// `SourceBuffer` identified by `source_buffer_id`.
    ///
    /// Its completion should then be announced through `on_source_buffer_update`, like for any
    /// other operation.
    pub fn announce_append(&mut self, source_buffer_id: SourceBufferId) {
        self.media_element_ref.announce_append(source_buffer_id);
    }

    /// Stop tracking the current content: the `SourceBuffer`s, the stream mode and the last
    /// known position are all forgotten. The configuration is kept.
    pub fn stop(&mut self) {
        Logger::info("API: Stopping current content");
        self.media_element_ref.reset();
        self.back_buffer.reset();
        self.is_live = false;
        self.target_duration = None;
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
