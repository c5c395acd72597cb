// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::trace::{
    Link, SamplingDecision, SamplingResult, SpanKind, TraceContextExt, TraceId, TraceState,
};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::ShouldSample;
use std::fmt;

use crate::constants::{numeric, ratio};
use numeric::MAX_RANDOM_BITS;

/// Keeps (100 * `ratio`)% of the traces, deciding on the trace id alone so that every
/// participant of a trace reaches the same decision.
#[derive(Clone)]
pub struct TraceIdRatioSampler {
    ratio: f64,
    threshold: u64,
}

impl fmt::Debug for TraceIdRatioSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceIdRatioSampler")
            .field("ratio", &self.ratio)
            .finish()
    }
}

impl Default for TraceIdRatioSampler {
    fn default() -> Self {
        Self::new(ratio::DEFAULT_RATIO)
    }
}

impl TraceIdRatioSampler {
    fn calculate_threshold(ratio: f64) -> u64 {
        if ratio >= ratio::MAX_RATIO {
            MAX_RANDOM_BITS
        } else {
            (ratio * (MAX_RANDOM_BITS as f64)) as u64
        }
    }

    /// `ratio` is clamped between 0.0 and 1.0 inclusive. NaN is treated as 0.0.
    pub fn new(ratio: f64) -> Self {
        let clamped = if ratio.is_nan() {
            ratio::MIN_RATIO
        } else {
            ratio.clamp(ratio::MIN_RATIO, ratio::MAX_RATIO)
        };
        TraceIdRatioSampler {
            ratio: clamped,
            threshold: Self::calculate_threshold(clamped),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    fn sampled(&self, trace_id: TraceId) -> bool {
        let bytes = trace_id.to_bytes();
        let mut lower = [0u8; 8];
        lower.copy_from_slice(&bytes[8..16]);
        (u64::from_be_bytes(lower) >> 1) < self.threshold
    }
}

impl ShouldSample for TraceIdRatioSampler {
    fn should_sample(
        &self,
        parent_context: Option<&Context>,
        trace_id: TraceId,
        _name: &str,
        _span_kind: &SpanKind,
        _attributes: &[KeyValue],
        _links: &[Link],
    ) -> SamplingResult {
        let decision = if self.ratio <= ratio::MIN_RATIO {
            SamplingDecision::Drop
        } else if self.ratio >= ratio::MAX_RATIO || self.sampled(trace_id) {
            SamplingDecision::RecordAndSample
        } else {
            SamplingDecision::Drop
        };

        SamplingResult {
            decision,
            attributes: Vec::new(),
            trace_state: parent_trace_state(parent_context),
        }
    }
}

pub(crate) fn parent_trace_state(parent_context: Option<&Context>) -> TraceState {
    parent_context
        .filter(|cx| cx.has_active_span())
        .map(|cx| cx.span().span_context().trace_state().clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_id_with_lower(lower: u64) -> TraceId {
        let mut bytes = [0u8; 16];
        bytes[8..16].copy_from_slice(&lower.to_be_bytes());
        TraceId::from_bytes(bytes)
    }

    fn decide(sampler: &TraceIdRatioSampler, trace_id: TraceId) -> SamplingDecision {
        sampler
            .should_sample(None, trace_id, "span", &SpanKind::Internal, &[], &[])
            .decision
    }

    #[test]
    fn check_debug_impl() {
        let debug_output = format!("{:?}", TraceIdRatioSampler::new(0.5));
        assert!(debug_output.contains("TraceIdRatioSampler"));
        assert!(debug_output.contains("ratio: 0.5"));
    }

    #[test]
    fn test_ratio_is_clamped() {
        assert_eq!(TraceIdRatioSampler::new(-0.1).ratio(), 0.0);
        assert_eq!(TraceIdRatioSampler::new(1.1).ratio(), 1.0);
        assert_eq!(TraceIdRatioSampler::new(f64::NAN).ratio(), 0.0);
        assert_eq!(TraceIdRatioSampler::default().ratio(), 1.0);
    }

    #[test]
    fn test_bounds() {
        let never = TraceIdRatioSampler::new(0.0);
        let always = TraceIdRatioSampler::new(1.0);
        for lower in [0, 1, u64::MAX / 2, u64::MAX] {
            let id = trace_id_with_lower(lower);
            assert_eq!(decide(&never, id), SamplingDecision::Drop);
            assert_eq!(decide(&always, id), SamplingDecision::RecordAndSample);
        }
    }

    #[test]
    fn test_half_ratio_splits_on_high_bit() {
        let sampler = TraceIdRatioSampler::new(0.5);
        assert_eq!(
            decide(&sampler, trace_id_with_lower(0)),
            SamplingDecision::RecordAndSample
        );
        assert_eq!(
            decide(&sampler, trace_id_with_lower((1 << 63) - 1)),
            SamplingDecision::RecordAndSample
        );
        assert_eq!(
            decide(&sampler, trace_id_with_lower(u64::MAX)),
            SamplingDecision::Drop
        );
    }

    #[test]
    fn test_upper_bytes_are_ignored() {
        let sampler = TraceIdRatioSampler::new(0.5);
        let mut bytes = [0xffu8; 16];
        bytes[8..16].copy_from_slice(&0u64.to_be_bytes());
        assert_eq!(
            decide(&sampler, TraceId::from_bytes(bytes)),
            SamplingDecision::RecordAndSample
        );
    }

    #[test]
    fn test_ratio_is_roughly_respected() {
        let sampler = TraceIdRatioSampler::new(0.25);
        let total = 10_000u64;
        let step = u64::MAX / total;
        let kept = (0..total)
            .filter(|i| {
                decide(&sampler, trace_id_with_lower(i * step)) == SamplingDecision::RecordAndSample
            })
            .count();
        assert!((2400..=2600).contains(&kept), "kept {kept}");
    }
}
