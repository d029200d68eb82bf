use crate::{
    back_buffer::BackBufferScheduler, media_element::MediaElementReference, wasm_bindgen,
};

mod api;
mod core;
mod event_listeners;

pub use event_listeners::{MediaObservation, PlaybackTickReason};

/// The `Dispatcher` is the Interface exported to the JavaScript-side, which is notified of
/// every media buffer operation and playback update and which removes back buffer
/// behind the current position when playing live contents.
#[wasm_bindgen]
pub struct Dispatcher {
    /// Keeps track of the last known position and of the `SourceBuffer`s created by the
    /// JavaScript-side, through which media data is removed.
    media_element_ref: MediaElementReference,

    /// Decides when and which back buffer should be removed.
    back_buffer: BackBufferScheduler,

    /// `true` if the last loaded Media Playlist describes a live content.
    is_live: bool,

    /// Target duration, in seconds, of the last loaded Media Playlist.
    ///
    /// `None` if no Media Playlist has been loaded yet.
    target_duration: Option<f64>,
}
