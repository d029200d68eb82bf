pub(crate) mod logger;
pub(crate) mod time_ranges;
