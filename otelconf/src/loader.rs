// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Loads YAML text into a generic tree.
//!
//! Scalar values are run through the [`Substitutor`] first. Plain scalars are then resolved
//! with the core schema while quoted scalars always stay strings. Map keys are kept verbatim.

use std::collections::HashMap;
use std::io::Read;

use serde_json::{Map, Value};
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

use crate::error::{ConfigurationError, Result};
use crate::scalar::resolve_plain;
use crate::substitution::Substitutor;

/// Parses the first document of `text`. An empty stream loads as `Value::Null`.
pub fn load(text: &str, substitutor: &Substitutor) -> Result<Value> {
    let mut builder = TreeBuilder::new(substitutor);
    Parser::new(text.chars())
        .load(&mut builder, false)
        .map_err(ConfigurationError::parse)?;
    builder.finish()
}

pub fn load_reader<R: Read>(mut reader: R, substitutor: &Substitutor) -> Result<Value> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(ConfigurationError::parse)?;
    load(&text, substitutor)
}

enum Node {
    Sequence {
        items: Vec<Value>,
        anchor: usize,
    },
    Mapping {
        entries: Map<String, Value>,
        // key waiting for its value
        key: Option<String>,
        anchor: usize,
    },
}

struct TreeBuilder<'a> {
    substitutor: &'a Substitutor,
    stack: Vec<Node>,
    anchors: HashMap<usize, Value>,
    root: Option<Value>,
    error: Option<String>,
}

impl<'a> TreeBuilder<'a> {
    fn new(substitutor: &'a Substitutor) -> Self {
        TreeBuilder {
            substitutor,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn finish(self) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(ConfigurationError::parse(error));
        }
        Ok(self.root.unwrap_or(Value::Null))
    }

    fn expects_key(&self) -> bool {
        matches!(self.stack.last(), Some(Node::Mapping { key: None, .. }))
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.error.get_or_insert_with(|| message.into());
    }

    fn scalar_value(&self, text: &str, style: TScalarStyle) -> Value {
        match self.substitutor.substitute(text) {
            None => Value::Null,
            Some(text) if matches!(style, TScalarStyle::Plain) => resolve_plain(&text),
            Some(text) => Value::String(text),
        }
    }

    fn remember(&mut self, anchor: usize, value: &Value) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
    }

    fn push_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Node::Sequence { items, .. }) => items.push(value),
            Some(Node::Mapping { entries, key, .. }) => match key.take() {
                Some(key) => {
                    entries.insert(key, value);
                }
                None => self.fail("mapping keys must be scalars"),
            },
            None => {
                self.root.get_or_insert(value);
            }
        }
    }

    fn set_key(&mut self, text: String) {
        if let Some(Node::Mapping { key, .. }) = self.stack.last_mut() {
            *key = Some(text);
        }
    }

    fn close(&mut self) {
        let (value, anchor) = match self.stack.pop() {
            Some(Node::Sequence { items, anchor }) => (Value::Array(items), anchor),
            Some(Node::Mapping {
                entries, anchor, ..
            }) => (Value::Object(entries), anchor),
            None => return,
        };
        self.remember(anchor, &value);
        self.push_value(value);
    }
}

impl EventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        match event {
            Event::Scalar(text, ..) if self.expects_key() => self.set_key(text),
            Event::Scalar(text, style, anchor, ..) => {
                let value = self.scalar_value(&text, style);
                self.remember(anchor, &value);
                self.push_value(value);
            }
            Event::SequenceStart(..) | Event::MappingStart(..) if self.expects_key() => {
                self.fail("mapping keys must be scalars")
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Node::Sequence {
                items: Vec::new(),
                anchor,
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Node::Mapping {
                entries: Map::new(),
                key: None,
                anchor,
            }),
            Event::SequenceEnd | Event::MappingEnd => self.close(),
            Event::Alias(id) => match self.anchors.get(&id).cloned() {
                Some(Value::String(key)) if self.expects_key() => self.set_key(key),
                Some(value) => self.push_value(value),
                None => self.fail(format!("unknown anchor id {id}")),
            },
            _ => {}
        }
    }
}
