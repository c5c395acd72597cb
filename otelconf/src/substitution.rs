// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! `${...}` reference expansion for scalar text.
//!
//! Supported forms are `${NAME}`, `${NAME:-default}`, `${env:NAME}` and `${sys:NAME}`.
//! `$$` always collapses to a literal `$`. References whose name is not an identifier are
//! left untouched.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::sources::{EnvSource, MapSource, SourceOrigin, VariableSource};

lazy_static! {
    static ref VARIABLE_NAME_REGEX: Regex =
        Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("failed creating regex");
}

const ENV_PREFIX: &str = "env:";
const SYS_PREFIX: &str = "sys:";
const DEFAULT_SEPARATOR: &str = ":-";

enum Resolution {
    Value(String),
    Unset,
    /// Not a reference, the original text is kept
    Invalid,
}

/// Resolves references against an environment and a system property source
#[derive(Debug, Clone)]
pub struct Substitutor {
    env: Arc<dyn VariableSource>,
    system: Arc<dyn VariableSource>,
}

impl Default for Substitutor {
    /// Process environment and no system properties
    fn default() -> Self {
        Substitutor::new(EnvSource, MapSource::new())
    }
}

impl Substitutor {
    pub fn new<E, S>(env: E, system: S) -> Self
    where
        E: VariableSource + 'static,
        S: VariableSource + 'static,
    {
        Substitutor {
            env: Arc::new(env),
            system: Arc::new(system),
        }
    }

    pub fn from_maps(env: HashMap<String, String>, system: HashMap<String, String>) -> Self {
        Substitutor::new(MapSource::from(env), MapSource::from(system))
    }

    fn source(&self, origin: SourceOrigin) -> &dyn VariableSource {
        match origin {
            SourceOrigin::Environment => self.env.as_ref(),
            SourceOrigin::SystemProperties => self.system.as_ref(),
        }
    }

    /// Expands every reference in `raw`.
    ///
    /// Returns `None` when the whole text is a single reference that resolves to nothing.
    /// Unset references embedded in longer text are replaced by an empty string.
    pub fn substitute(&self, raw: &str) -> Option<String> {
        if !raw.contains('$') {
            return Some(raw.to_owned());
        }

        if let Some(body) = whole_reference(raw) {
            return match self.resolve(body) {
                Resolution::Value(value) => Some(value),
                Resolution::Unset => None,
                Resolution::Invalid => Some(raw.to_owned()),
            };
        }

        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with("$$") {
                out.push('$');
                rest = &tail[2..];
                continue;
            }
            if !tail.starts_with("${") {
                out.push('$');
                rest = &tail[1..];
                continue;
            }
            let Some(end) = closing_brace(&tail[2..]) else {
                // unterminated, keep as is
                out.push_str(tail);
                rest = "";
                break;
            };

            let reference = &tail[..end + 3];
            match self.resolve(&tail[2..end + 2]) {
                Resolution::Value(value) => out.push_str(&value),
                Resolution::Unset => {}
                Resolution::Invalid => out.push_str(reference),
            }
            rest = &tail[end + 3..];
        }
        out.push_str(rest);
        Some(out)
    }

    fn resolve(&self, body: &str) -> Resolution {
        let (origin, target) = if let Some(target) = body.strip_prefix(ENV_PREFIX) {
            (SourceOrigin::Environment, target)
        } else if let Some(target) = body.strip_prefix(SYS_PREFIX) {
            (SourceOrigin::SystemProperties, target)
        } else {
            (SourceOrigin::Environment, body)
        };

        let (name, default) = match target.find(DEFAULT_SEPARATOR) {
            Some(idx) => (&target[..idx], Some(&target[idx + DEFAULT_SEPARATOR.len()..])),
            None => (target, None),
        };
        if !VARIABLE_NAME_REGEX.is_match(name) {
            return Resolution::Invalid;
        }

        match (self.source(origin).get(name), default) {
            (Some(value), _) => Resolution::Value(value),
            (None, Some(default)) => match self.substitute(default) {
                Some(value) => Resolution::Value(value),
                None => Resolution::Unset,
            },
            (None, None) => Resolution::Unset,
        }
    }
}

/// Index, relative to `s`, of the `}` closing a reference whose `${` precedes `s`.
///
/// Nested `${` increase the depth, `$$` is skipped so an escaped `$${` never opens one.
fn closing_brace(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'$') => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// The reference body when `raw` is exactly one `${...}`
fn whole_reference(raw: &str) -> Option<&str> {
    let inner = raw.strip_prefix("${")?;
    let end = closing_brace(inner)?;
    (end + 1 == inner.len()).then(|| &inner[..end])
}
