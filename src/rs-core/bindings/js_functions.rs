use crate::wasm_bindgen;
use std::fmt;

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as well as
/// struct and enumeration used by those functions.

#[wasm_bindgen]
extern "C" {
    // Log the given text in the JavaScript console, with the log level given.
    pub fn jsLog(log_level: LogLevel, log: &str);

    // Remove media data from the given SourceBuffer.
    //
    // This process is asynchronous, meaning that the data might not be directly
    // considered after calling `jsRemoveBuffer`.
    //
    // Append and remove operations performed on that SourceBuffer are all
    // pushed to an internal queue of operations which will be executed in the
    // same order than their calls have been made.
    // You will be notified once each single one of these operations have
    // succeeded when the `on_source_buffer_update` function is called on this
    // `Dispatcher` instance, with the same `source_buffer_id`.
    //
    // If the `on_source_buffer_error` method of this `Dispatcher` instance is
    // called with the same `source_buffer_id`, it means that the currently
    // scheduled operation (the first one in the queue) failed.
    pub fn jsRemoveBuffer(
        source_buffer_id: SourceBufferId,
        start: f64,
        end: f64,
    ) -> RemoveBufferResult;

    // Announce that some back buffer behind the current position has been scheduled for
    // removal, `back_buffer_end` being the end, in seconds, of the removed range.
    pub fn jsAnnounceBackBufferReached(media_type: MediaType, back_buffer_end: f64);

    // Report an error that is not linked to a specific request or playlist.
    pub fn jsSendOtherError(fatal: bool, code: OtherErrorCode, message: Option<&str>);
}

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtherErrorCode {
    /// An operation removing data from a SourceBuffer failed.
    BufferRemovalError,
    /// An operation appending data to a SourceBuffer failed.
    BufferAppendError,
    Unknown,
}

/// Trait allowing to convert "JavaScript Results" as exposed by the JavaScript functions into
/// `Result` structs more idiomatic to Rust.
pub(crate) trait JsResult<T, E> {
    fn result(self) -> Result<T, (E, Option<String>)>;
}

/// Errors that can arise when calling the `jsRemoveBuffer` JavaScript function.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveBufferErrorCode {
    /// The operation failed because the SourceBuffer instance linked to the given
    /// `SourceBufferId` was not found.
    SourceBufferNotFound,

    /// The operation failed because of an unknown error.
    UnknownError,
}

/// Result of calling the `jsRemoveBuffer` JavaScript function.
///
/// Creation of an `RemoveBufferResult` should only be performed by the JavaScript side
/// through the exposed static constructors.
#[wasm_bindgen]
pub struct RemoveBufferResult {
    error: Option<(RemoveBufferErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl RemoveBufferResult {
    /// Creates an `RemoveBufferResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates an `RemoveBufferResult` indicating failure, with the corresponding
    /// error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: RemoveBufferErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), RemoveBufferErrorCode> for RemoveBufferResult {
    /// Basically unwrap and consume the `RemoveBufferResult`, converting it into a
    /// Result enum.
    fn result(self) -> Result<(), (RemoveBufferErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}

/// Levels with which a log can be emitted.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    /// Log level reserved for very important errors and highly unexpected events.
    Error = 0,

    /// Log level reserved for less important errors and unexpected events.
    Warn = 1,

    /// Log level reserved for important events
    Info = 2,

    /// Log level used when debugging. Small-ish yet impactful events should be logged with it.
    Debug = 3,
}

/// Identify a SourceBuffer.
pub type SourceBufferId = u32;

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Audio = 0,
    Video = 1,
}

impl fmt::Display for MediaType {
    /// When wanting to display the value, just format Audio as "audio" and
    /// Video as "video"
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MediaType::Audio => "audio",
                MediaType::Video => "video",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_buffer_result() {
        assert!(RemoveBufferResult::success().result().is_ok());
        let err = RemoveBufferResult::error(
            RemoveBufferErrorCode::SourceBufferNotFound,
            Some("gone".to_owned()),
        )
        .result();
        assert_eq!(
            err,
            Err((
                RemoveBufferErrorCode::SourceBufferNotFound,
                Some("gone".to_owned())
            ))
        );
    }

    #[test]
    fn test_media_type_display() {
        assert_eq!(MediaType::Audio.to_string(), "audio");
        assert_eq!(MediaType::Video.to_string(), "video");
    }
}
