use super::{Dispatcher, MediaObservation};
use crate::{
    back_buffer::PlaybackContext,
    bindings::{jsAnnounceBackBufferReached, jsSendOtherError, OtherErrorCode, SourceBufferId},
    media_element::SourceBufferQueueElement,
    utils::time_ranges::TimeRanges,
    Logger,
};

impl Dispatcher {
    /// Method to call when a SourceBuffer operation ended.
    pub(super) fn on_source_buffer_update_core(
        &mut self,
        source_buffer_id: SourceBufferId,
        buffered: &[f64],
    ) {
        let buffered = TimeRanges::from_flat(buffered);
        match self
            .media_element_ref
            .on_source_buffer_update(source_buffer_id, buffered)
        {
            None => return,
            Some((mt, Some(SourceBufferQueueElement::Remove { start, end }))) => {
                Logger::debug(&format!("Core: {} removal done: {} - {}", mt, start, end));
            }
            Some(_) => {}
        }
        self.check_back_buffer();
    }

    /// Method to call when a SourceBuffer operation failed.
    pub(super) fn on_source_buffer_error_core(&mut self, source_buffer_id: SourceBufferId) {
        match self.media_element_ref.on_source_buffer_error(source_buffer_id) {
            None => {}
            Some((mt, Some(SourceBufferQueueElement::Remove { start, end }))) => {
                self.back_buffer.on_removal_failure(mt);
                let message = format!(
                    "Could not remove {} data from {} to {} ({} consecutive failure(s))",
                    mt,
                    start,
                    end,
                    self.back_buffer.failed_removals()
                );
                Logger::warn(&format!("Core: {}", message));
                jsSendOtherError(false, OtherErrorCode::BufferRemovalError, Some(&message));
            }
            Some((mt, _)) => {
                let message = format!("A {} SourceBuffer operation failed", mt);
                Logger::warn(&format!("Core: {}", message));
                jsSendOtherError(false, OtherErrorCode::BufferAppendError, Some(&message));
            }
        }
    }

    /// Method to call when a Media Playlist has been loaded or refreshed.
    pub(super) fn on_media_playlist_update_core(&mut self, is_live: bool, target_duration: f64) {
        if self.is_live != is_live {
            Logger::info(&format!("Core: live content: {}", is_live));
        }
        self.is_live = is_live;
        self.target_duration = Some(target_duration);
    }

    /// Method to call when a new `MediaObservation` has been received.
    pub(super) fn on_observation(&mut self, observation: MediaObservation) {
        Logger::debug(&format!(
            "Tick received: {:?} {}",
            observation.reason(),
            observation.current_time()
        ));
        self.media_element_ref
            .on_observation(observation.current_time());
    }

    /// Check if back buffer can and should be removed and remove it if so.
    ///
    /// Removals are only performed when no buffer operation is pending, so this method can be
    /// called after any buffer update.
    fn check_back_buffer(&mut self) {
        let ctx = match self.playback_context() {
            Some(ctx) => ctx,
            None => return,
        };
        let dispatched = self
            .back_buffer
            .on_buffer_mutation_end(&ctx, &mut self.media_element_ref);
        for instruction in dispatched {
            jsAnnounceBackBufferReached(instruction.media_type(), instruction.end());
        }
    }

    /// Returns the current playback conditions, `None` if either the position or the target
    /// duration is not known yet.
    fn playback_context(&self) -> Option<PlaybackContext> {
        let position = self.media_element_ref.current_position();
        if position.is_none() || self.target_duration.is_none() {
            Logger::debug("Core: playback conditions not known yet");
        }
        Some(PlaybackContext {
            is_live: self.is_live,
            position: position?,
            target_duration: self.target_duration?,
        })
    }
}
