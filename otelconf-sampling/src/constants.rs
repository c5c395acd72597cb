// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared constants for the otelconf-sampling crate

/// Sampling ratio limits
pub mod ratio {
    /// Ratio used when a trace id ratio sampler sets none
    pub const DEFAULT_RATIO: f64 = 1.0;
    pub const MAX_RATIO: f64 = 1.0;
    pub const MIN_RATIO: f64 = 0.0;
}

/// Numeric constants used in sampling algorithms
pub mod numeric {
    /// Upper bound of the 63 random bits taken from a trace id
    pub const MAX_RANDOM_BITS: u64 = 1 << 63;
}
