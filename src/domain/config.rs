//! Gate configuration.
//!
//! A [`ThrottleConfig`] is validated once at the configuration boundary and
//! then handed to every evaluation. The gate never caches it, so callers are
//! free to change the interval or quota between calls.

use std::fmt;

const MILLIS_PER_SECOND: u64 = 1000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Default interval length, in units.
pub const DEFAULT_INTERVAL: u64 = 10;

/// Default number of executions allowed per interval.
pub const DEFAULT_EXECUTIONS: u32 = 1;

/// Error returned when a configuration fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Interval must be a positive number of units
    #[error("interval must be greater than 0, got {0}")]
    NonPositiveInterval(i64),
    /// Executions per interval must be at least one
    #[error("executions per interval must be greater than 0, got {0}")]
    NonPositiveMaxExecutions(i64),
    /// Executions per interval does not fit the counter
    #[error("executions per interval must be at most {max}, got {0}", max = u32::MAX)]
    MaxExecutionsOutOfRange(i64),
}

/// Unit of the throttle interval.
///
/// Unknown unit names are kept as [`IntervalUnit::Unrecognized`] instead of
/// being rejected. They convert to a zero-length interval, which makes the
/// gate reopen its window on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum IntervalUnit {
    /// Seconds
    #[default]
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Days
    Days,
    /// Any other unit name
    Unrecognized(String),
}

impl IntervalUnit {
    /// Milliseconds in one unit. Zero for unrecognized units.
    pub fn millis(&self) -> u64 {
        match self {
            IntervalUnit::Seconds => MILLIS_PER_SECOND,
            IntervalUnit::Minutes => MILLIS_PER_MINUTE,
            IntervalUnit::Hours => MILLIS_PER_HOUR,
            IntervalUnit::Days => MILLIS_PER_DAY,
            IntervalUnit::Unrecognized(_) => 0,
        }
    }

    /// The unit name as it appears in parameters.
    pub fn as_str(&self) -> &str {
        match self {
            IntervalUnit::Seconds => "seconds",
            IntervalUnit::Minutes => "minutes",
            IntervalUnit::Hours => "hours",
            IntervalUnit::Days => "days",
            IntervalUnit::Unrecognized(name) => name,
        }
    }

    /// Check if this is one of the four known units.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, IntervalUnit::Unrecognized(_))
    }
}

impl From<&str> for IntervalUnit {
    fn from(name: &str) -> Self {
        match name {
            "seconds" => IntervalUnit::Seconds,
            "minutes" => IntervalUnit::Minutes,
            "hours" => IntervalUnit::Hours,
            "days" => IntervalUnit::Days,
            other => IntervalUnit::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for IntervalUnit {
    fn from(name: String) -> Self {
        IntervalUnit::from(name.as_str())
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a counted window gets its start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowStart {
    /// The timestamp is only set when an exhausted quota is reset.
    ///
    /// Grants made while the quota still has room leave the timestamp alone,
    /// so the very first window is measured from whatever timestamp was
    /// stored before (zero for a fresh gate).
    #[default]
    OnOverflow,
    /// The timestamp is also set on the first grant of every window.
    OnFirstGrant,
}

/// Validated throttle configuration.
///
/// # Example
/// ```
/// use throttle_gate::{IntervalUnit, ThrottleConfig};
///
/// let config = ThrottleConfig::builder()
///     .interval(1, IntervalUnit::Minutes)
///     .max_executions(3)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.interval_duration_millis(), 60_000);
/// assert_eq!(config.to_string(), "3 executions per 1 minutes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    interval_value: u64,
    interval_unit: IntervalUnit,
    max_executions: Option<u32>,
    window_start: WindowStart,
}

impl ThrottleConfig {
    /// Start building a configuration.
    pub fn builder() -> ThrottleConfigBuilder {
        ThrottleConfigBuilder::default()
    }

    /// Single-slot configuration: one execution per interval, no counter.
    ///
    /// # Errors
    /// Returns `ConfigurationError::NonPositiveInterval` if `interval_value` is zero.
    pub fn simple(
        interval_value: u64,
        interval_unit: impl Into<IntervalUnit>,
    ) -> Result<Self, ConfigurationError> {
        Self::builder().interval(interval_value, interval_unit).build()
    }

    /// Counted configuration: up to `max_executions` per interval.
    ///
    /// # Errors
    /// Returns an error if `interval_value` or `max_executions` is zero.
    pub fn counted(
        interval_value: u64,
        interval_unit: impl Into<IntervalUnit>,
        max_executions: u32,
    ) -> Result<Self, ConfigurationError> {
        Self::builder()
            .interval(interval_value, interval_unit)
            .max_executions(max_executions)
            .build()
    }

    /// Interval length in units.
    pub fn interval_value(&self) -> u64 {
        self.interval_value
    }

    /// Interval unit.
    pub fn interval_unit(&self) -> &IntervalUnit {
        &self.interval_unit
    }

    /// Quota per window, or `None` in simple mode.
    pub fn max_executions(&self) -> Option<u32> {
        self.max_executions
    }

    /// Window start policy used in counted mode.
    pub fn window_start(&self) -> WindowStart {
        self.window_start
    }

    /// Check if this configuration counts executions.
    pub fn is_counted(&self) -> bool {
        self.max_executions.is_some()
    }

    /// Length of one interval in milliseconds.
    ///
    /// Saturates at `u64::MAX` instead of overflowing.
    pub fn interval_duration_millis(&self) -> u64 {
        self.interval_value.saturating_mul(self.interval_unit.millis())
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            interval_value: DEFAULT_INTERVAL,
            interval_unit: IntervalUnit::Seconds,
            max_executions: Some(DEFAULT_EXECUTIONS),
            window_start: WindowStart::OnOverflow,
        }
    }
}

impl fmt::Display for ThrottleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_executions {
            Some(max) if max != 1 => write!(
                f,
                "{} executions per {} {}",
                max, self.interval_value, self.interval_unit
            ),
            _ => write!(f, "{} {}", self.interval_value, self.interval_unit),
        }
    }
}

/// Builder for [`ThrottleConfig`].
#[derive(Debug, Clone)]
pub struct ThrottleConfigBuilder {
    interval_value: u64,
    interval_unit: IntervalUnit,
    max_executions: Option<u32>,
    window_start: WindowStart,
}

impl Default for ThrottleConfigBuilder {
    fn default() -> Self {
        Self {
            interval_value: DEFAULT_INTERVAL,
            interval_unit: IntervalUnit::Seconds,
            max_executions: None,
            window_start: WindowStart::OnOverflow,
        }
    }
}

impl ThrottleConfigBuilder {
    /// Set the interval.
    pub fn interval(mut self, value: u64, unit: impl Into<IntervalUnit>) -> Self {
        self.interval_value = value;
        self.interval_unit = unit.into();
        self
    }

    /// Enable counted mode with the given quota per window.
    pub fn max_executions(mut self, max: u32) -> Self {
        self.max_executions = Some(max);
        self
    }

    /// Set the window start policy for counted mode.
    pub fn window_start(mut self, window_start: WindowStart) -> Self {
        self.window_start = window_start;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the interval or the quota is zero.
    pub fn build(self) -> Result<ThrottleConfig, ConfigurationError> {
        if self.interval_value == 0 {
            return Err(ConfigurationError::NonPositiveInterval(0));
        }
        if self.max_executions == Some(0) {
            return Err(ConfigurationError::NonPositiveMaxExecutions(0));
        }

        Ok(ThrottleConfig {
            interval_value: self.interval_value,
            interval_unit: self.interval_unit,
            max_executions: self.max_executions,
            window_start: self.window_start,
        })
    }
}

/// Loosely typed gate parameters, as a workflow host supplies them.
///
/// Convert with `ThrottleConfig::try_from`. A missing `executions` value
/// selects simple mode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThrottleParameters {
    /// Interval length in units
    pub interval: i64,
    /// Interval unit name
    pub unit: String,
    /// Executions allowed per interval
    pub executions: Option<i64>,
}

impl Default for ThrottleParameters {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL as i64,
            unit: IntervalUnit::Seconds.as_str().to_string(),
            executions: Some(i64::from(DEFAULT_EXECUTIONS)),
        }
    }
}

impl TryFrom<ThrottleParameters> for ThrottleConfig {
    type Error = ConfigurationError;

    fn try_from(params: ThrottleParameters) -> Result<Self, Self::Error> {
        let interval = u64::try_from(params.interval)
            .ok()
            .filter(|v| *v > 0)
            .ok_or(ConfigurationError::NonPositiveInterval(params.interval))?;

        let mut builder = ThrottleConfig::builder().interval(interval, params.unit);

        if let Some(executions) = params.executions {
            if executions <= 0 {
                return Err(ConfigurationError::NonPositiveMaxExecutions(executions));
            }
            let max = u32::try_from(executions)
                .map_err(|_| ConfigurationError::MaxExecutionsOutOfRange(executions))?;
            builder = builder.max_executions(max);
        }

        builder.build()
    }
}
