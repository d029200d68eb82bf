use super::{
    configuration::BackBufferConfiguration,
    decision::{self, PlaybackContext, RemovalInstruction},
    BufferedMedia,
};
use crate::{bindings::MediaType, Logger};

/// Media types whose buffers are considered for back buffer eviction, in evaluation order.
const TRACKED_MEDIA_TYPES: [MediaType; 2] = [MediaType::Video, MediaType::Audio];

/// Decides when back buffer eviction may be attempted and dispatches the corresponding removals.
///
/// Eviction is only ever attempted when no buffer has an operation pending, so that removals are
/// never interleaved with appends, nor with previous removals.
pub(crate) struct BackBufferScheduler {
    config: BackBufferConfiguration,

    /// Number of removals which failed since the last one was dispatched.
    failed_removals: u32,
}

impl BackBufferScheduler {
    pub(crate) fn new() -> Self {
        Self {
            config: BackBufferConfiguration::default(),
            failed_removals: 0,
        }
    }

    /// Returns a mutable reference to the configuration, whose changes will be considered on the
    /// next evaluation.
    pub(crate) fn config_mut(&mut self) -> &mut BackBufferConfiguration {
        &mut self.config
    }

    pub(crate) fn failed_removals(&self) -> u32 {
        self.failed_removals
    }

    /// To call each time an append or remove operation ended on any of the media buffers.
    ///
    /// Returns the removals which have been dispatched as a result, if any.
    pub(crate) fn on_buffer_mutation_end<M: BufferedMedia>(
        &mut self,
        ctx: &PlaybackContext,
        media: &mut M,
    ) -> Vec<RemovalInstruction> {
        if let Some(busy) = TRACKED_MEDIA_TYPES
            .into_iter()
            .find(|mt| media.pending_operations(*mt) > 0)
        {
            Logger::lazy_debug(&|| {
                format!("BackBuffer: {} buffer has pending operations, skipping", busy)
            });
            return vec![];
        }

        let retention = self.config.retention();
        let mut dispatched = vec![];
        for media_type in TRACKED_MEDIA_TYPES {
            let instruction =
                match decision::evaluate(ctx, retention, media_type, media.buffered(media_type)) {
                    Some(instruction) => instruction,
                    None => continue,
                };
            Logger::lazy_info(&|| {
                format!(
                    "BackBuffer: removing {} data from {} to {} (position: {})",
                    media_type,
                    instruction.start(),
                    instruction.end(),
                    ctx.position
                )
            });
            self.failed_removals = 0;
            match media.remove_range(media_type, instruction.start(), instruction.end()) {
                Ok(()) => dispatched.push(instruction),
                Err(err) => {
                    Logger::warn(&format!("BackBuffer: could not remove data: {}", err));
                    self.failed_removals += 1;
                }
            }
        }
        dispatched
    }

    /// To call when a removal previously dispatched failed asynchronously.
    ///
    /// No new removal will be attempted before the buffers have no operation pending anymore.
    pub(crate) fn on_removal_failure(&mut self, media_type: MediaType) {
        self.failed_removals += 1;
        Logger::lazy_warn(&|| {
            format!(
                "BackBuffer: {} removal failed ({} consecutive failure(s))",
                media_type, self.failed_removals
            )
        });
    }

    /// Reset the state linked to the current content. The configuration is kept.
    pub(crate) fn reset(&mut self) {
        self.failed_removals = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::RemoveBufferErrorCode;
    use crate::media_element::RemoveDataError;
    use crate::utils::time_ranges::{TimeRange, TimeRanges};

    /// In-memory buffers recording the removals asked for.
    #[derive(Default)]
    struct MockMedia {
        video: Option<TimeRanges>,
        audio: Option<TimeRanges>,
        pending_video: usize,
        pending_audio: usize,
        reject_removals: bool,
        removals: Vec<(MediaType, f64, f64)>,
    }

    impl MockMedia {
        fn with_video(flat: &[f64]) -> Self {
            Self {
                video: Some(TimeRanges::from_flat(flat)),
                ..Default::default()
            }
        }

        /// Apply every dispatched removal to the buffered ranges.
        fn complete_removals(&mut self) {
            for (media_type, start, end) in self.removals.drain(..) {
                let (ranges, pending) = match media_type {
                    MediaType::Video => (&mut self.video, &mut self.pending_video),
                    MediaType::Audio => (&mut self.audio, &mut self.pending_audio),
                };
                *pending -= 1;
                if let Some(ranges) = ranges.as_mut() {
                    let remaining: TimeRanges = (&*ranges)
                        .into_iter()
                        .flat_map(|r| {
                            let mut kept = vec![];
                            if r.start() < start {
                                kept.push(TimeRange::new(r.start(), r.end().min(start)));
                            }
                            if r.end() > end {
                                kept.push(TimeRange::new(r.start().max(end), r.end()));
                            }
                            kept
                        })
                        .collect();
                    *ranges = remaining;
                }
            }
        }
    }

    impl BufferedMedia for MockMedia {
        fn buffered(&self, media_type: MediaType) -> Option<&TimeRanges> {
            match media_type {
                MediaType::Video => self.video.as_ref(),
                MediaType::Audio => self.audio.as_ref(),
            }
        }

        fn pending_operations(&self, media_type: MediaType) -> usize {
            match media_type {
                MediaType::Video => self.pending_video,
                MediaType::Audio => self.pending_audio,
            }
        }

        fn remove_range(
            &mut self,
            media_type: MediaType,
            start: f64,
            end: f64,
        ) -> Result<(), RemoveDataError> {
            if self.reject_removals {
                return Err(RemoveDataError::Rejected {
                    media_type,
                    code: RemoveBufferErrorCode::UnknownError,
                    message: "rejected".to_owned(),
                });
            }
            match media_type {
                MediaType::Video => self.pending_video += 1,
                MediaType::Audio => self.pending_audio += 1,
            }
            self.removals.push((media_type, start, end));
            Ok(())
        }
    }

    fn live_ctx(position: f64) -> PlaybackContext {
        PlaybackContext {
            is_live: true,
            position,
            target_duration: 5.,
        }
    }

    fn scheduler(live_back_buffer_length: Option<f64>) -> BackBufferScheduler {
        let mut scheduler = BackBufferScheduler::new();
        scheduler.config_mut().live_back_buffer_length = live_back_buffer_length;
        scheduler
    }

    #[test]
    fn test_default_config_never_evicts() {
        let mut scheduler = BackBufferScheduler::new();
        let mut media = MockMedia::with_video(&[0., 20.]);
        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(15.), &mut media)
            .is_empty());
        assert!(media.removals.is_empty());
    }

    #[test]
    fn test_dispatches_removal() {
        let mut scheduler = scheduler(Some(10.));
        let mut media = MockMedia::with_video(&[0., 20.]);
        let dispatched = scheduler.on_buffer_mutation_end(&live_ctx(15.), &mut media);
        assert_eq!(
            dispatched,
            vec![RemovalInstruction {
                start: 0.,
                end: 5.,
                media_type: MediaType::Video,
            }]
        );
        assert_eq!(media.removals, vec![(MediaType::Video, 0., 5.)]);
        assert_eq!(media.pending_video, 1);
    }

    #[test]
    fn test_nothing_done_while_operations_are_pending() {
        let mut scheduler = scheduler(Some(10.));
        let mut media = MockMedia::with_video(&[0., 20.]);
        media.audio = Some(TimeRanges::from_flat(&[0., 20.]));
        media.pending_audio = 1;
        scheduler.on_removal_failure(MediaType::Video);

        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(15.), &mut media)
            .is_empty());
        assert!(media.removals.is_empty());
        assert_eq!(scheduler.failed_removals(), 1);

        media.pending_audio = 0;
        let dispatched = scheduler.on_buffer_mutation_end(&live_ctx(15.), &mut media);
        assert_eq!(dispatched.len(), 2);
        assert_eq!(dispatched[0].media_type(), MediaType::Video);
        assert_eq!(dispatched[1].media_type(), MediaType::Audio);
        assert_eq!(scheduler.failed_removals(), 0);
    }

    #[test]
    fn test_no_op_keeps_failure_count() {
        let mut scheduler = scheduler(Some(10.));
        let mut media = MockMedia::with_video(&[8., 20.]);
        scheduler.on_removal_failure(MediaType::Video);
        scheduler.on_removal_failure(MediaType::Video);
        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(15.), &mut media)
            .is_empty());
        assert_eq!(scheduler.failed_removals(), 2);

        scheduler.reset();
        assert_eq!(scheduler.failed_removals(), 0);
    }

    #[test]
    fn test_rejected_removal() {
        let mut scheduler = scheduler(Some(10.));
        let mut media = MockMedia::with_video(&[0., 20.]);
        media.reject_removals = true;
        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(15.), &mut media)
            .is_empty());
        assert_eq!(scheduler.failed_removals(), 1);
        assert_eq!(media.pending_video, 0);
    }

    #[test]
    fn test_config_is_read_on_each_evaluation() {
        let mut scheduler = scheduler(Some(f64::INFINITY));
        let mut media = MockMedia::with_video(&[0., 20.]);
        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(15.), &mut media)
            .is_empty());

        scheduler.config_mut().live_back_buffer_length = Some(0.);
        let dispatched = scheduler.on_buffer_mutation_end(&live_ctx(15.), &mut media);
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].end(), 10.);

        scheduler.config_mut().live_back_buffer_length = None;
        media.complete_removals();
        media.video = Some(TimeRanges::from_flat(&[0., 20.]));
        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(15.), &mut media)
            .is_empty());
    }

    #[test]
    fn test_not_live() {
        let mut scheduler = scheduler(Some(10.));
        let mut media = MockMedia::with_video(&[0., 20.]);
        let ctx = PlaybackContext {
            is_live: false,
            position: 15.,
            target_duration: 5.,
        };
        assert!(scheduler.on_buffer_mutation_end(&ctx, &mut media).is_empty());
    }

    #[test]
    fn test_eviction_cycle() {
        let mut scheduler = scheduler(Some(10.));
        let mut media = MockMedia::with_video(&[0., 20.]);

        assert_eq!(
            scheduler
                .on_buffer_mutation_end(&live_ctx(15.), &mut media)
                .len(),
            1
        );

        // the removal is still pending
        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(16.), &mut media)
            .is_empty());

        media.complete_removals();
        assert_eq!(media.video, Some(TimeRanges::from_flat(&[5., 20.])));
        assert!(scheduler
            .on_buffer_mutation_end(&live_ctx(15.), &mut media)
            .is_empty());

        let dispatched = scheduler.on_buffer_mutation_end(&live_ctx(18.), &mut media);
        assert_eq!(
            dispatched,
            vec![RemovalInstruction {
                start: 5.,
                end: 8.,
                media_type: MediaType::Video,
            }]
        );
    }
}
