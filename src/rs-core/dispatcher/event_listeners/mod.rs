use crate::{bindings::SourceBufferId, dispatcher::Dispatcher, wasm_bindgen};

/// Methods triggered on JavaScript events by the JavaScript code.
#[wasm_bindgen]
impl Dispatcher {
    /// The JS code should call this method each time a SourceBuffer emits an `updateend`
    /// event, that is each time one of its append or remove operation ended.
    ///
    /// # Arguments
    ///
    /// * `source_buffer_id` - The identifier communicated through `attach_source_buffer`.
    ///   This allows the `Dispatcher` to identify which SourceBuffer actually emitted this
    ///   event.
    ///
    /// * `buffered` - The `buffered` attribute of that SourceBuffer, flattened as couples of
    ///   `f64`: the start of each contiguous range in seconds followed by its end.
    pub fn on_source_buffer_update(&mut self, source_buffer_id: SourceBufferId, buffered: &[f64]) {
        self.on_source_buffer_update_core(source_buffer_id, buffered);
    }

    /// The JS code should call this method when a SourceBuffer emits an `error`
    /// event, or when one of its operations could not be performed.
    ///
    /// # Arguments
    ///
    /// * `source_buffer_id` - The identifier communicated through `attach_source_buffer`.
    pub fn on_source_buffer_error(&mut self, source_buffer_id: SourceBufferId) {
        self.on_source_buffer_error_core(source_buffer_id);
    }

    /// The JS code should call this method each time a new Media Playlist has been loaded or
    /// refreshed.
    ///
    /// # Arguments
    ///
    /// * `is_live` - `true` if the Media Playlist describes a live content.
    ///
    /// * `target_duration` - Its `EXT-X-TARGETDURATION`, in seconds.
    pub fn on_media_playlist_update(&mut self, is_live: bool, target_duration: f64) {
        self.on_media_playlist_update_core(is_live, target_duration);
    }

    /// The JS code should call this method at each important media events (seek operations,
    /// regular playback progress, end of the streams etc.).
    pub fn on_playback_tick(&mut self, observation: MediaObservation) {
        self.on_observation(observation);
    }
}

/// Identify the event that lead to the `MediaObservation` being sent.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackTickReason {
    /// This is the initial observation emitted, right after it was started.
    Init,
    /// This designates MediaObservation sent after an interval without any
    /// of the other events.
    RegularInterval,
    /// The HTMLMediaElement's "seeking" event has just been triggered
    Seeking,
    /// The HTMLMediaElement's "seeked" event has just been triggered
    Seeked,
    /// The HTMLMediaElement's "ended" event has just been triggered
    Ended,
}

#[wasm_bindgen]
pub struct MediaObservation {
    reason: PlaybackTickReason,
    current_time: f64,
}

#[wasm_bindgen]
impl MediaObservation {
    #[wasm_bindgen(constructor)]
    pub fn new(reason: PlaybackTickReason, current_time: f64) -> Self {
        Self {
            reason,
            current_time,
        }
    }
}

impl MediaObservation {
    #[inline(always)]
    pub fn reason(&self) -> PlaybackTickReason {
        self.reason
    }

    #[inline(always)]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }
}
