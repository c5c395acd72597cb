// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use opentelemetry_sdk::{logs, trace};

pub const DEFAULT_MAX_QUEUE_SIZE: usize = 2048;
pub const DEFAULT_MAX_EXPORT_BATCH_SIZE: usize = 512;
pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_SPAN_SCHEDULE_DELAY: Duration = Duration::from_millis(5_000);
pub const DEFAULT_LOG_SCHEDULE_DELAY: Duration = Duration::from_millis(1_000);

/// Settings shared by the batch span and log record processors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub schedule_delay: Duration,
    pub export_timeout: Duration,
    pub max_queue_size: usize,
    pub max_export_batch_size: usize,
}

impl BatchConfig {
    pub fn span_defaults() -> Self {
        BatchConfig {
            schedule_delay: DEFAULT_SPAN_SCHEDULE_DELAY,
            export_timeout: DEFAULT_EXPORT_TIMEOUT,
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            max_export_batch_size: DEFAULT_MAX_EXPORT_BATCH_SIZE,
        }
    }

    pub fn log_defaults() -> Self {
        BatchConfig {
            schedule_delay: DEFAULT_LOG_SCHEDULE_DELAY,
            ..Self::span_defaults()
        }
    }

    /// The queue holds at least one item and a batch never outgrows the queue
    fn sizes(&self) -> (usize, usize) {
        let max_queue_size = self.max_queue_size.max(1);
        (
            max_queue_size,
            self.max_export_batch_size.clamp(1, max_queue_size),
        )
    }

    /// `export_timeout` has no counterpart on the thread based SDK processors
    pub(crate) fn trace_config(&self) -> trace::BatchConfig {
        let (max_queue_size, max_export_batch_size) = self.sizes();
        trace::BatchConfigBuilder::default()
            .with_max_queue_size(max_queue_size)
            .with_max_export_batch_size(max_export_batch_size)
            .with_scheduled_delay(self.schedule_delay)
            .build()
    }

    pub(crate) fn log_config(&self) -> logs::BatchConfig {
        let (max_queue_size, max_export_batch_size) = self.sizes();
        logs::BatchConfigBuilder::default()
            .with_max_queue_size(max_queue_size)
            .with_max_export_batch_size(max_export_batch_size)
            .with_scheduled_delay(self.schedule_delay)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_are_clamped() {
        let config = BatchConfig {
            max_queue_size: 0,
            max_export_batch_size: 0,
            ..BatchConfig::span_defaults()
        };
        assert_eq!(config.sizes(), (1, 1));

        let config = BatchConfig {
            max_queue_size: 2,
            max_export_batch_size: 5,
            ..BatchConfig::log_defaults()
        };
        assert_eq!(config.sizes(), (2, 2));
        assert_eq!(BatchConfig::span_defaults().sizes(), (2048, 512));
    }
}
