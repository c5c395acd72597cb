// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Span and log record limits.
//!
//! A limit unset on the signal falls back to the top-level `attribute_limits`, then to the
//! default: 128 entries and no value length limit.

use otelconf::model::logger_provider;
use otelconf::model::tracer_provider;
use otelconf::model::AttributeLimits;

pub const DEFAULT_COUNT_LIMIT: u32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLimits {
    pub attribute_value_length_limit: Option<usize>,
    pub attribute_count_limit: u32,
    pub event_count_limit: u32,
    pub link_count_limit: u32,
    pub event_attribute_count_limit: u32,
    pub link_attribute_count_limit: u32,
}

impl Default for SpanLimits {
    fn default() -> Self {
        span_limits(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecordLimits {
    pub attribute_value_length_limit: Option<usize>,
    pub attribute_count_limit: u32,
}

impl Default for LogRecordLimits {
    fn default() -> Self {
        log_record_limits(None, None)
    }
}

fn count_limit(value: Option<u64>) -> u32 {
    value.map_or(DEFAULT_COUNT_LIMIT, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

fn length_limit(value: Option<u64>) -> Option<usize> {
    value.map(|v| usize::try_from(v).unwrap_or(usize::MAX))
}

pub fn span_limits(
    model: Option<&tracer_provider::SpanLimits>,
    global: Option<&AttributeLimits>,
) -> SpanLimits {
    let model = model.cloned().unwrap_or_default();
    let global = global.cloned().unwrap_or_default();
    SpanLimits {
        attribute_value_length_limit: length_limit(
            model
                .attribute_value_length_limit
                .or(global.attribute_value_length_limit),
        ),
        attribute_count_limit: count_limit(
            model.attribute_count_limit.or(global.attribute_count_limit),
        ),
        event_count_limit: count_limit(model.event_count_limit),
        link_count_limit: count_limit(model.link_count_limit),
        event_attribute_count_limit: count_limit(model.event_attribute_count_limit),
        link_attribute_count_limit: count_limit(model.link_attribute_count_limit),
    }
}

pub fn log_record_limits(
    model: Option<&logger_provider::LogRecordLimits>,
    global: Option<&AttributeLimits>,
) -> LogRecordLimits {
    let model = model.cloned().unwrap_or_default();
    let global = global.cloned().unwrap_or_default();
    LogRecordLimits {
        attribute_value_length_limit: length_limit(
            model
                .attribute_value_length_limit
                .or(global.attribute_value_length_limit),
        ),
        attribute_count_limit: count_limit(
            model.attribute_count_limit.or(global.attribute_count_limit),
        ),
    }
}
