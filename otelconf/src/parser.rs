// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use serde_json::{Map, Value};

use crate::error::{ConfigurationError, Result};
use crate::loader;
use crate::model::OpenTelemetryConfiguration;
use crate::sources::{MapSource, VariableSource};
use crate::substitution::Substitutor;
use crate::conf_debug;

/// `file_format` versions this model can bind
pub const SUPPORTED_FILE_FORMATS: &[&str] = &["0.4", "1.0-rc.1", "1.0-rc.2", "1.0"];

pub type ModelCustomizer =
    Box<dyn Fn(OpenTelemetryConfiguration) -> OpenTelemetryConfiguration + Send + Sync>;

/// Text to model pipeline: substitution, loading, binding, format check, then customizers
pub struct Parser {
    substitutor: Substitutor,
    customizers: Vec<ModelCustomizer>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("substitutor", &self.substitutor)
            .field("customizers", &self.customizers.len())
            .finish()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::builder().build()
    }
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder {
            substitutor: Substitutor::default(),
            customizers: Vec::new(),
        }
    }

    pub fn parse(&self, text: &str) -> Result<OpenTelemetryConfiguration> {
        let document = loader::load(text, &self.substitutor)?;
        self.bind(document)
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<OpenTelemetryConfiguration> {
        let document = loader::load_reader(reader, &self.substitutor)?;
        self.bind(document)
    }

    /// Binds an already loaded document and runs the customizers
    pub fn bind(&self, document: Value) -> Result<OpenTelemetryConfiguration> {
        let model = bind(document)?;
        check_file_format(&model)?;
        Ok(self.customize(model))
    }

    fn customize(&self, model: OpenTelemetryConfiguration) -> OpenTelemetryConfiguration {
        if !self.customizers.is_empty() {
            conf_debug!("Applying {} model customizers", self.customizers.len());
        }
        self.customizers
            .iter()
            .fold(model, |model, customizer| customizer(model))
    }
}

/// Binds a generic tree onto the model, an empty document binding as an empty mapping
pub fn bind(document: Value) -> Result<OpenTelemetryConfiguration> {
    let document = match document {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(document).map_err(ConfigurationError::binding)
}

pub fn check_file_format(model: &OpenTelemetryConfiguration) -> Result<()> {
    match model.file_format.as_deref() {
        Some(format) if SUPPORTED_FILE_FORMATS.contains(&format) => Ok(()),
        found => Err(ConfigurationError::UnsupportedFileFormat {
            found: found.map(str::to_owned),
            supported: SUPPORTED_FILE_FORMATS,
        }),
    }
}

pub struct ParserBuilder {
    substitutor: Substitutor,
    customizers: Vec<ModelCustomizer>,
}

impl ParserBuilder {
    /// Finalizes the builder and returns the parser
    pub fn build(self) -> Parser {
        Parser {
            substitutor: self.substitutor,
            customizers: self.customizers,
        }
    }

    pub fn set_substitutor(&mut self, substitutor: Substitutor) -> &mut Self {
        self.substitutor = substitutor;
        self
    }

    pub fn set_variable_sources<E, S>(&mut self, env: E, system: S) -> &mut Self
    where
        E: VariableSource + 'static,
        S: VariableSource + 'static,
    {
        self.substitutor = Substitutor::new(env, system);
        self
    }

    /// Replaces the process environment and system properties with plain maps
    pub fn set_variables(
        &mut self,
        env: HashMap<String, String>,
        system_properties: HashMap<String, String>,
    ) -> &mut Self {
        self.set_variable_sources(MapSource::from(env), MapSource::from(system_properties))
    }

    /// Appends a model transformation, applied once per parse in registration order
    pub fn add_model_customizer<F>(&mut self, customizer: F) -> &mut Self
    where
        F: Fn(OpenTelemetryConfiguration) -> OpenTelemetryConfiguration + Send + Sync + 'static,
    {
        self.customizers.push(Box::new(customizer));
        self
    }
}
