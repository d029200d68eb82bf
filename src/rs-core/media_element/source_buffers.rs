use std::collections::VecDeque;

use thiserror::Error;

use crate::bindings::{jsRemoveBuffer, JsResult, MediaType, RemoveBufferErrorCode, SourceBufferId};
use crate::utils::time_ranges::TimeRanges;
use crate::Logger;

/// Abstraction over the Media Source Extension's `SourceBuffer` concept.
///
/// The `SourceBuffer` itself is created and fed by the JavaScript-side. This struct keeps track of
/// the operations it still has to perform and of what it last reported as buffered.
pub(super) struct SourceBuffer {
    /// The `SourceBufferId` given on SourceBuffer creation, used to identify
    /// this `SourceBuffer` when communicating with JavaScript.
    id: SourceBufferId,

    /// The MediaType associated to this `SourceBuffer`.
    media_type: MediaType,

    /// The current queue of operations being performed on the `SourceBuffer`.
    ///
    /// From the most imminent to the least.
    queue: VecDeque<SourceBufferQueueElement>,

    /// Time ranges buffered by the `SourceBuffer`, as communicated after its last operation.
    buffered: TimeRanges,
}

impl SourceBuffer {
    /// Create a new `SourceBuffer` for a SourceBuffer already created on the JavaScript-side.
    pub(super) fn new(id: SourceBufferId, media_type: MediaType) -> Self {
        Logger::info(&format!("Tracking new {} SourceBuffer ({})", media_type, id));
        Self {
            id,
            media_type,
            queue: VecDeque::new(),
            buffered: TimeRanges::new(),
        }
    }

    /// Returns the `SourceBufferId` needed to refer to that SourceBuffer when interacting with
    /// JavaScript.
    pub(super) fn id(&self) -> SourceBufferId {
        self.id
    }

    /// Returns the `MediaType` linked to that SourceBuffer.
    pub(super) fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Returns the number of buffer operations that aren't finished yet.
    pub(super) fn pending_operations(&self) -> usize {
        self.queue.len()
    }

    /// Returns the time ranges last reported as buffered.
    pub(super) fn buffered(&self) -> &TimeRanges {
        &self.buffered
    }

    /// Indicate that the JavaScript-side began appending media data to this `SourceBuffer`.
    pub(super) fn announce_append(&mut self) {
        self.queue.push_back(SourceBufferQueueElement::Push);
        Logger::debug(&format!("Buffer {} ({}): Pushing", self.id, self.media_type));
    }

    /// Remove media data from this `SourceBuffer`, based on a `start` and `end` time in seconds.
    ///
    /// The operation is only considered pending if the JavaScript-side accepted it.
    pub(super) fn remove_buffer(&mut self, start: f64, end: f64) -> Result<(), RemoveDataError> {
        self.queue
            .push_back(SourceBufferQueueElement::Remove { start, end });
        Logger::debug(&format!(
            "Buffer {} ({}): Removing {} {}",
            self.id, self.media_type, start, end
        ));
        match jsRemoveBuffer(self.id, start, end).result() {
            Ok(()) => Ok(()),
            Err((code, message)) => {
                self.queue.pop_back();
                Err(RemoveDataError::Rejected {
                    media_type: self.media_type,
                    code,
                    message: message.unwrap_or_else(|| "Unknown error.".to_owned()),
                })
            }
        }
    }

    /// To call once a `SourceBuffer` operation has been finished by the underlying MSE
    /// SourceBuffer, with the time ranges it now contains.
    pub(super) fn on_operation_end(
        &mut self,
        buffered: TimeRanges,
    ) -> Option<SourceBufferQueueElement> {
        Logger::lazy_debug(&|| {
            format!(
                "Buffer {} ({}): operation ended, buffered: {}",
                self.id, self.media_type, buffered
            )
        });
        self.buffered = buffered;
        let queue_elt = self.queue.pop_front();
        if queue_elt.is_none() {
            Logger::warn(&format!(
                "Buffer {} ({}): operation ended while none was pending",
                self.id, self.media_type
            ));
        }
        queue_elt
    }

    /// To call once a `SourceBuffer` operation failed.
    ///
    /// All operations scheduled after the failing one are considered cancelled: the queue is
    /// emptied and the failed operation is returned.
    pub(super) fn on_operation_failure(&mut self) -> Option<SourceBufferQueueElement> {
        let failed = self.queue.pop_front();
        Logger::info(&format!(
            "Buffer {} ({}): clearing queue.",
            self.id, self.media_type
        ));
        self.queue.clear();
        failed
    }
}

/// Enum listing possible operations awaiting to be performed on a `SourceBuffer`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SourceBufferQueueElement {
    /// A new chunk of media data is being pushed.
    Push,

    /// Some already-buffered data needs to be removed, `start` and `end` giving the
    /// time range of the data to remove, in seconds.
    Remove { start: f64, end: f64 },
}

/// Error encountered synchronously after trying to remove media data from a `SourceBuffer`.
#[derive(Error, Debug)]
pub(crate) enum RemoveDataError {
    #[error("No SourceBuffer created for {0}")]
    NoSourceBuffer(MediaType),
    #[error("The {media_type} SourceBuffer refused the removal ({code:?}): {message}")]
    Rejected {
        media_type: MediaType,
        code: RemoveBufferErrorCode,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_accounting() {
        let mut sb = SourceBuffer::new(3, MediaType::Audio);
        assert_eq!(sb.id(), 3);
        assert_eq!(sb.media_type(), MediaType::Audio);
        assert_eq!(sb.pending_operations(), 0);

        sb.announce_append();
        sb.announce_append();
        assert_eq!(sb.pending_operations(), 2);

        let ended = sb.on_operation_end(TimeRanges::from_flat(&[0., 4.]));
        assert_eq!(ended, Some(SourceBufferQueueElement::Push));
        assert_eq!(sb.pending_operations(), 1);
        assert_eq!(sb.buffered(), &TimeRanges::from_flat(&[0., 4.]));

        sb.on_operation_end(TimeRanges::from_flat(&[0., 8.]));
        assert_eq!(sb.pending_operations(), 0);
        assert_eq!(sb.on_operation_end(TimeRanges::from_flat(&[0., 8.])), None);
        assert_eq!(sb.pending_operations(), 0);
    }

    #[test]
    fn test_failure_clears_queue() {
        let mut sb = SourceBuffer::new(1, MediaType::Video);
        sb.announce_append();
        sb.announce_append();
        assert_eq!(
            sb.on_operation_failure(),
            Some(SourceBufferQueueElement::Push)
        );
        assert_eq!(sb.pending_operations(), 0);
        assert_eq!(sb.on_operation_failure(), None);
    }

    #[test]
    fn test_remove_data_error_display() {
        let err = RemoveDataError::Rejected {
            media_type: MediaType::Video,
            code: RemoveBufferErrorCode::SourceBufferNotFound,
            message: "not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "The video SourceBuffer refused the removal (SourceBufferNotFound): not found"
        );
        assert_eq!(
            RemoveDataError::NoSourceBuffer(MediaType::Audio).to_string(),
            "No SourceBuffer created for audio"
        );
    }
}
