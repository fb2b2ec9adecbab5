//! Clock functions, so the model can answer "what day is it" style questions.

use crate::invoker::{
    InvokerError, KernelFunction, ParameterType, Plugin, ToolDescriptor, ToolParameter,
};
use chrono::{DateTime, Duration, FixedOffset, Local, Utc};
use std::sync::Arc;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant in the local time zone.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Plugin exposing date and time functions.
///
/// All functions read the clock only; they are safe to call concurrently.
#[derive(Clone)]
pub struct TimePlugin {
    clock: Arc<dyn Clock>,
}

impl TimePlugin {
    /// Time plugin backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Time plugin backed by a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    fn clock_function(
        &self,
        name: &str,
        description: &str,
        render: fn(DateTime<FixedOffset>) -> String,
    ) -> KernelFunction {
        let clock = Arc::clone(&self.clock);
        KernelFunction::new(ToolDescriptor::new(name, description), move |_| {
            Ok(render(clock.now()))
        })
    }

    fn days_ago_function(&self) -> KernelFunction {
        let clock = Arc::clone(&self.clock);
        KernelFunction::new(
            ToolDescriptor::new("days_ago", "Gets the date a number of days in the past").with_parameter(
                ToolParameter::new("days", "The number of days to offset from today", ParameterType::Integer),
            ),
            move |args| {
                let days = args
                    .get_i64("days")
                    .ok_or_else(|| InvokerError::invalid_arguments("days_ago", "'days' must be an integer"))?;
                let offset = Duration::try_days(days)
                    .ok_or_else(|| InvokerError::invalid_arguments("days_ago", "'days' is out of range"))?;
                let date = clock
                    .now()
                    .checked_sub_signed(offset)
                    .ok_or_else(|| InvokerError::execution_failed("days_ago", "date out of range"))?;
                Ok(date.format("%A, %d %B, %Y").to_string())
            },
        )
    }
}

impl Default for TimePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimePlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimePlugin").finish_non_exhaustive()
    }
}

impl Plugin for TimePlugin {
    fn name(&self) -> &str {
        "time"
    }

    fn functions(&self) -> Vec<KernelFunction> {
        vec![
            self.clock_function("date", "Get the current date", |now| {
                now.format("%A, %d %B, %Y").to_string()
            }),
            self.clock_function("time", "Get the current time", |now| {
                now.format("%I:%M:%S %p").to_string()
            }),
            self.clock_function("now", "Get the current date and time in the local time zone", |now| {
                now.format("%A, %d %B, %Y %I:%M %p").to_string()
            }),
            self.clock_function("utc_now", "Get the current UTC date and time", |now| {
                now.with_timezone(&Utc).format("%A, %d %B, %Y %H:%M").to_string()
            }),
            self.clock_function("year", "Get the current year", |now| now.format("%Y").to_string()),
            self.clock_function("day_of_week", "Get the current day of the week", |now| {
                now.format("%A").to_string()
            }),
            self.days_ago_function(),
        ]
    }
}
