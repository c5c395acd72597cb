// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use opentelemetry_sdk::error::OTelSdkResult;
use otelconf::{conf_debug, conf_warn, ComponentKind};

use crate::registry::Closer;

struct Entry {
    kind: ComponentKind,
    name: String,
    close: Closer,
}

/// Ordered record of every closeable component created by a build
#[derive(Default)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.kind, e.name.as_str())))
            .finish()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ComponentKind, name: impl Into<String>, close: Closer) {
        self.entries.push(Entry {
            kind,
            name: name.into(),
            close,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kind and name of each entry in creation order
    pub fn components(&self) -> impl Iterator<Item = (ComponentKind, &str)> {
        self.entries.iter().map(|e| (e.kind, e.name.as_str()))
    }

    /// Closes every entry, newest first.
    ///
    /// A failure is logged and does not stop the remaining entries from closing. Returns the
    /// first failure.
    pub fn close_all(self) -> OTelSdkResult {
        let mut result = Ok(());
        for Entry { kind, name, close } in self.entries.into_iter().rev() {
            conf_debug!("Closing {} \"{}\"", kind, name);
            if let Err(e) = close() {
                conf_warn!("Error closing {} \"{}\": {}", kind, name, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}
