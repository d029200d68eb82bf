use thiserror::Error;

use crate::back_buffer::BufferedMedia;
use crate::bindings::{MediaType, SourceBufferId};
use crate::utils::time_ranges::TimeRanges;
use crate::Logger;

pub(crate) use source_buffers::{RemoveDataError, SourceBufferQueueElement};

mod source_buffers;

/// Structure linked to the HTMLMediaElement and the `SourceBuffer`s the JavaScript-side created
/// on it, keeping track of:
///   - the last known playback position
///   - the operations still pending on each `SourceBuffer`
///   - what each `SourceBuffer` last reported as buffered
///
/// It is also the only entry point through which media data is removed from those buffers.
pub(crate) struct MediaElementReference {
    /// Last playback position, in seconds, communicated through a playback observation.
    ///
    /// `None` if no observation has been received yet.
    last_position: Option<f64>,

    /// Video SourceBuffer currently created for video data.
    /// `None` if no SourceBuffer has been created for that type.
    video_buffer: Option<source_buffers::SourceBuffer>,

    /// Audio SourceBuffer currently created for audio data.
    /// `None` if no SourceBuffer has been created for that type.
    audio_buffer: Option<source_buffers::SourceBuffer>,
}

impl MediaElementReference {
    /// Create a new `MediaElementReference`, tracking no `SourceBuffer` yet.
    pub(crate) fn new() -> Self {
        Self {
            last_position: None,
            video_buffer: None,
            audio_buffer: None,
        }
    }

    /// Forget about every `SourceBuffer` and the last known position.
    ///
    /// To call once the current content is stopped.
    pub(crate) fn reset(&mut self) {
        self.last_position = None;
        self.video_buffer = None;
        self.audio_buffer = None;
    }

    /// Start tracking a `SourceBuffer` created by the JavaScript-side for the given `MediaType`.
    pub(crate) fn attach_source_buffer(
        &mut self,
        media_type: MediaType,
        id: SourceBufferId,
    ) -> Result<(), SourceBufferRegistrationError> {
        if self.source_buffer(id).is_some() {
            return Err(SourceBufferRegistrationError::IdAlreadyUsed { id });
        }
        let slot = match media_type {
            MediaType::Audio => &mut self.audio_buffer,
            MediaType::Video => &mut self.video_buffer,
        };
        if slot.is_some() {
            return Err(SourceBufferRegistrationError::AlreadyCreatedWithSameType { media_type });
        }
        *slot = Some(source_buffers::SourceBuffer::new(id, media_type));
        Ok(())
    }

    /// Returns the last known playback position, in seconds.
    pub(crate) fn current_position(&self) -> Option<f64> {
        self.last_position
    }

    /// Method to call once a new playback position has been observed.
    pub(crate) fn on_observation(&mut self, position: f64) {
        self.last_position = Some(position);
    }

    /// Indicate that the JavaScript-side started appending data to the `SourceBuffer` linked to
    /// the given `SourceBufferId`.
    ///
    /// Returns the `MediaType` of that `SourceBuffer`, `None` if it is unknown.
    pub(crate) fn announce_append(&mut self, source_buffer_id: SourceBufferId) -> Option<MediaType> {
        let sb = self.source_buffer_mut(source_buffer_id)?;
        sb.announce_append();
        Some(sb.media_type())
    }

    /// Remove media data, based on a `start` and `end` time in seconds.
    ///
    /// You should avoid removing data around the currently played media position. If you do
    /// this, playback issues may occur.
    pub(crate) fn remove_data(
        &mut self,
        media_type: MediaType,
        start: f64,
        end: f64,
    ) -> Result<(), RemoveDataError> {
        match self.buffer_mut_for(media_type) {
            None => Err(RemoveDataError::NoSourceBuffer(media_type)),
            Some(sb) => sb.remove_buffer(start, end),
        }
    }

    /// Callback that should be called once one of the `SourceBuffer` linked to this
    /// `MediaElementReference` has "updated" (meaning: one of its operation has ended).
    ///
    /// Returns the `MediaType` of that `SourceBuffer` and the operation which just ended, or
    /// `None` if no `SourceBuffer` has that `SourceBufferId`.
    pub(crate) fn on_source_buffer_update(
        &mut self,
        source_buffer_id: SourceBufferId,
        buffered: TimeRanges,
    ) -> Option<(MediaType, Option<SourceBufferQueueElement>)> {
        let sb = self.source_buffer_mut(source_buffer_id)?;
        Some((sb.media_type(), sb.on_operation_end(buffered)))
    }

    /// Callback that should be called once the current operation of one of the `SourceBuffer`
    /// linked to this `MediaElementReference` failed.
    ///
    /// Returns the `MediaType` of that `SourceBuffer` and the operation which failed, or
    /// `None` if no `SourceBuffer` has that `SourceBufferId`.
    pub(crate) fn on_source_buffer_error(
        &mut self,
        source_buffer_id: SourceBufferId,
    ) -> Option<(MediaType, Option<SourceBufferQueueElement>)> {
        let sb = self.source_buffer_mut(source_buffer_id)?;
        Some((sb.media_type(), sb.on_operation_failure()))
    }

    /// Get reference to SourceBuffer attached to this `MediaElementReference` for this
    /// `media_type`.
    ///
    /// `None` if no SourceBuffer has been created for this `MediaType`
    fn buffer_for(&self, media_type: MediaType) -> Option<&source_buffers::SourceBuffer> {
        match media_type {
            MediaType::Audio => self.audio_buffer.as_ref(),
            MediaType::Video => self.video_buffer.as_ref(),
        }
    }

    /// Get mutable reference to SourceBuffer attached to this `MediaElementReference` for this
    /// `media_type`.
    ///
    /// `None` if no SourceBuffer has been created for this `MediaType`
    fn buffer_mut_for(
        &mut self,
        media_type: MediaType,
    ) -> Option<&mut source_buffers::SourceBuffer> {
        match media_type {
            MediaType::Audio => self.audio_buffer.as_mut(),
            MediaType::Video => self.video_buffer.as_mut(),
        }
    }

    /// Get reference to SourceBuffer attached to this `MediaElementReference` for this
    /// `SourceBufferId`.
    fn source_buffer(
        &self,
        source_buffer_id: SourceBufferId,
    ) -> Option<&source_buffers::SourceBuffer> {
        [self.audio_buffer.as_ref(), self.video_buffer.as_ref()]
            .into_iter()
            .flatten()
            .find(|sb| sb.id() == source_buffer_id)
    }

    fn source_buffer_mut(
        &mut self,
        source_buffer_id: SourceBufferId,
    ) -> Option<&mut source_buffers::SourceBuffer> {
        let sb = [self.audio_buffer.as_mut(), self.video_buffer.as_mut()]
            .into_iter()
            .flatten()
            .find(|sb| sb.id() == source_buffer_id);
        if sb.is_none() {
            Logger::warn(&format!("Unknown SourceBuffer {}", source_buffer_id));
        }
        sb
    }
}

impl BufferedMedia for MediaElementReference {
    fn buffered(&self, media_type: MediaType) -> Option<&TimeRanges> {
        self.buffer_for(media_type).map(|sb| sb.buffered())
    }

    fn pending_operations(&self, media_type: MediaType) -> usize {
        self.buffer_for(media_type)
            .map(|sb| sb.pending_operations())
            .unwrap_or(0)
    }

    fn remove_range(
        &mut self,
        media_type: MediaType,
        start: f64,
        end: f64,
    ) -> Result<(), RemoveDataError> {
        self.remove_data(media_type, start, end)
    }
}

/// Error that may be returned by an `attach_source_buffer` call.
#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum SourceBufferRegistrationError {
    #[error("A SourceBuffer was already created for the {media_type} type.")]
    AlreadyCreatedWithSameType { media_type: MediaType },
    #[error("The SourceBuffer id {id} is already used by another SourceBuffer.")]
    IdAlreadyUsed { id: SourceBufferId },
}
