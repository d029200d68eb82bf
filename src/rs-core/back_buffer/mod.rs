use crate::{bindings::MediaType, media_element::RemoveDataError, utils::time_ranges::TimeRanges};

pub(crate) use configuration::BackBufferConfiguration;
pub(crate) use decision::{PlaybackContext, RemovalInstruction};
pub(crate) use scheduler::BackBufferScheduler;

mod configuration;
mod decision;
mod scheduler;

/// Read and removal access to the media buffers on which back buffer eviction is performed.
///
/// The buffers themselves are owned by the JavaScript-side: implementors only report what they
/// last knew about them and forward removals.
pub(crate) trait BufferedMedia {
    /// Time ranges currently buffered for the given `MediaType`.
    ///
    /// `None` if there's no buffer for that type.
    fn buffered(&self, media_type: MediaType) -> Option<&TimeRanges>;

    /// Number of append and remove operations still pending on the buffer of the given
    /// `MediaType`. `0` if there's no buffer for that type.
    fn pending_operations(&self, media_type: MediaType) -> usize;

    /// Ask for the media data between `start` and `end`, in seconds, to be removed from the
    /// buffer of the given `MediaType`.
    ///
    /// The removal is asynchronous: its completion is only known once the buffer reports its
    /// next update.
    fn remove_range(
        &mut self,
        media_type: MediaType,
        start: f64,
        end: f64,
    ) -> Result<(), RemoveDataError>;
}
