use std::fmt;

use super::configuration::Retention;
use crate::{bindings::MediaType, utils::time_ranges::TimeRanges, Logger};

/// Playback-side conditions in which back buffer eviction is evaluated.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlaybackContext {
    /// `true` if the current content is a live content.
    pub(crate) is_live: bool,

    /// Current playback position, in seconds.
    pub(crate) position: f64,

    /// Nominal duration, in seconds, of the last loaded media segments.
    pub(crate) target_duration: f64,
}

/// Describes media data that should be removed from the buffer of a given `MediaType`.
///
/// `start` is always strictly inferior to `end` and `end` is never superior to the position at
/// which it was computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RemovalInstruction {
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) media_type: MediaType,
}

impl RemovalInstruction {
    pub(crate) fn start(&self) -> f64 {
        self.start
    }

    pub(crate) fn end(&self) -> f64 {
        self.end
    }

    pub(crate) fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// Reason for which no back buffer was selected for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoEviction {
    /// The content is not live.
    NotLive,
    /// The configured back buffer length disables eviction.
    RetentionDisabled,
    /// There's no buffer for that type, or nothing in it.
    NoBufferedData,
    /// The back buffer limit cannot be reached, e.g. when the whole back buffer is retained.
    UnreachableLimit,
    /// The target duration is unknown or negative, so no safety margin can be guaranteed.
    InvalidTargetDuration,
    /// The earliest buffered data is not behind the back buffer limit.
    NoIntersection,
    /// Everything behind the back buffer limit is within one target duration of the position.
    WithinSafetyMargin,
}

impl fmt::Display for NoEviction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let desc = match self {
            NoEviction::NotLive => "content is not live",
            NoEviction::RetentionDisabled => "back buffer length disables eviction",
            NoEviction::NoBufferedData => "nothing is buffered",
            NoEviction::UnreachableLimit => "back buffer limit is unreachable",
            NoEviction::InvalidTargetDuration => "target duration is invalid",
            NoEviction::NoIntersection => "buffer does not reach the back buffer limit",
            NoEviction::WithinSafetyMargin => "buffer is within the safety margin",
        };
        write!(f, "{}", desc)
    }
}

/// Check if some data should be removed from the back buffer of the given `MediaType` and return
/// the corresponding `RemovalInstruction` if so.
///
/// # Arguments
///
/// * `ctx` - Current playback conditions.
///
/// * `retention` - The interpreted configured back buffer length.
///
/// * `media_type` - The `MediaType` of the considered buffer.
///
/// * `buffered` - The ranges currently buffered for that `MediaType`. `None` if there's no
///   buffer for it.
pub(crate) fn evaluate(
    ctx: &PlaybackContext,
    retention: Retention,
    media_type: MediaType,
    buffered: Option<&TimeRanges>,
) -> Option<RemovalInstruction> {
    match decide(ctx, retention, media_type, buffered) {
        Ok(instruction) => Some(instruction),
        Err(reason) => {
            Logger::lazy_debug(&|| {
                format!("BackBuffer: no {} eviction: {}", media_type, reason)
            });
            None
        }
    }
}

/// Same as `evaluate` but returning the reason for which no removal was produced.
pub(crate) fn decide(
    ctx: &PlaybackContext,
    retention: Retention,
    media_type: MediaType,
    buffered: Option<&TimeRanges>,
) -> Result<RemovalInstruction, NoEviction> {
    if !ctx.is_live {
        return Err(NoEviction::NotLive);
    }
    if retention == Retention::Disabled {
        return Err(NoEviction::RetentionDisabled);
    }

    // Only the first range is considered: later ones will be reached on future evaluations.
    let buf_start = match buffered.and_then(|b| b.start(0)) {
        Some(start) => start,
        None => return Err(NoEviction::NoBufferedData),
    };

    let back_buffer_limit = match retention {
        Retention::Seconds(len) => ctx.position - len,
        _ => return Err(NoEviction::UnreachableLimit),
    };
    if !back_buffer_limit.is_finite() {
        return Err(NoEviction::UnreachableLimit);
    }

    if !(ctx.target_duration.is_finite() && ctx.target_duration >= 0.) {
        return Err(NoEviction::InvalidTargetDuration);
    }

    if buf_start >= back_buffer_limit {
        return Err(NoEviction::NoIntersection);
    }

    let end = back_buffer_limit.min(ctx.position - ctx.target_duration);
    if end <= buf_start {
        return Err(NoEviction::WithinSafetyMargin);
    }

    Ok(RemovalInstruction {
        start: buf_start,
        end,
        media_type,
    })
}
