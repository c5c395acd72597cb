// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use otelconf::model::meter_provider::ExemplarFilter as ExemplarFilterModel;

/// Which measurements may be kept as exemplars
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExemplarFilter {
    /// Measurements recorded inside a sampled span
    #[default]
    TraceBased,
    AlwaysOn,
    AlwaysOff,
}

pub fn create(model: Option<ExemplarFilterModel>) -> ExemplarFilter {
    match model.unwrap_or_default() {
        ExemplarFilterModel::TraceBased => ExemplarFilter::TraceBased,
        ExemplarFilterModel::AlwaysOn => ExemplarFilter::AlwaysOn,
        ExemplarFilterModel::AlwaysOff => ExemplarFilter::AlwaysOff,
    }
}
