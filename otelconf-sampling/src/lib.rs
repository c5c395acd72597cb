// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

pub mod constants;
pub mod glob_matcher;
pub mod parent_based_sampler;
pub mod predicates;
pub mod rule_based_sampler;
pub mod sampling_rule;
pub mod trace_id_ratio_sampler;

// Re-exports for convenient usage
pub use parent_based_sampler::ParentBasedSampler;
pub use predicates::{AttributeExactMatcher, AttributePatternMatcher, ParentClassification};
pub use rule_based_sampler::RuleBasedSampler;
pub use sampling_rule::SamplingRule;
pub use trace_id_ratio_sampler::TraceIdRatioSampler;
