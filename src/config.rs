//! # Codec Configuration
//!
//! The small configuration surface that affects codec behavior. Exactly
//! four knobs exist; nothing else changes how bytes are interpreted:
//!
//! | Field | Effect |
//! |-------|--------|
//! | `timezone` | Zone applied to `DateTime`/`DateTime64` columns without their own zone |
//! | `date_timezone` | Zone used to render date-only values |
//! | `reuse_records` | Recycle one row-shaped buffer across reads vs. allocate fresh |
//! | `max_buffer_size` | Ceiling applied to every decoded length/count prefix before allocation |
//!
//! Transport-level settings (timeouts, compression, retries) do not
//! belong here.

use chrono_tz::Tz;

/// Default ceiling for decoded length prefixes: 64 MiB.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Configuration consumed by the codec and the row reader/writer.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    pub timezone: Tz,
    pub date_timezone: Tz,
    pub reuse_records: bool,
    pub max_buffer_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            date_timezone: Tz::UTC,
            reuse_records: false,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default time zone for datetime columns without one.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Sets the time zone used to render date-only values.
    pub fn with_date_timezone(mut self, tz: Tz) -> Self {
        self.date_timezone = tz;
        self
    }

    /// Enables recycling of one row-shaped value buffer across reads.
    /// Rows handed out under this policy must be cloned before the next
    /// read if the caller retains them.
    pub fn with_reuse_records(mut self, reuse: bool) -> Self {
        self.reuse_records = reuse;
        self
    }

    /// Caps the byte length any single decoded string/array/map prefix
    /// may claim before the codec allocates for it.
    pub fn with_max_buffer_size(mut self, bytes: usize) -> Self {
        self.max_buffer_size = bytes;
        self
    }

    /// Validates a decoded length/count prefix against the ceiling.
    pub fn check_length(&self, length: u64) -> crate::error::Result<usize> {
        if length > self.max_buffer_size as u64 {
            return Err(crate::error::Error::BufferLimit {
                length,
                limit: self.max_buffer_size,
            });
        }
        Ok(length as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_utc_and_fresh_records() {
        let config = CodecConfig::default();
        assert_eq!(config.timezone, Tz::UTC);
        assert!(!config.reuse_records);
        assert_eq!(config.max_buffer_size, DEFAULT_MAX_BUFFER_SIZE);
    }

    #[test]
    fn builder_methods_chain() {
        let config = CodecConfig::new()
            .with_timezone(Tz::Asia__Tokyo)
            .with_reuse_records(true)
            .with_max_buffer_size(1024);
        assert_eq!(config.timezone, Tz::Asia__Tokyo);
        assert!(config.reuse_records);
        assert_eq!(config.max_buffer_size, 1024);
    }

    #[test]
    fn check_length_enforces_ceiling() {
        let config = CodecConfig::new().with_max_buffer_size(16);
        assert_eq!(config.check_length(16).unwrap(), 16);
        assert!(config.check_length(17).is_err());
    }
}
