/// Inner configuration on which the back buffer eviction relies.
/// Can be updated at any time, the new values being considered on the next evaluation.
pub(crate) struct BackBufferConfiguration {
    /// Amount of media data, in seconds, to keep in the buffer behind the current position when
    /// playing a live content.
    ///
    /// `None` when the value communicated was not a number at all.
    /// Any value that is not a finite positive number (or `0`) disables eviction.
    pub(crate) live_back_buffer_length: Option<f64>,
}

impl Default for BackBufferConfiguration {
    fn default() -> Self {
        Self {
            live_back_buffer_length: Some(f64::INFINITY),
        }
    }
}

impl BackBufferConfiguration {
    /// Interpret the configured back buffer length.
    pub(crate) fn retention(&self) -> Retention {
        match self.live_back_buffer_length {
            Some(len) if len == f64::INFINITY => Retention::Unbounded,
            Some(len) if len.is_finite() && len >= 0. => Retention::Seconds(len),
            _ => Retention::Disabled,
        }
    }
}

/// How much back buffer should be retained, as deduced from the `BackBufferConfiguration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Retention {
    /// The configured value is not a number, is negative or is `-Infinity`.
    Disabled,

    /// The whole back buffer has to be kept.
    Unbounded,

    /// Keep that amount of seconds behind the current position.
    Seconds(f64),
}
