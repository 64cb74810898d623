//! Named stage registry.
//!
//! Host model descriptions address pluggable stages by name. This registry
//! maps those names to factories producing ready-to-wire stages from a
//! type-tagged [`StageConfig`].

use crate::core::config::StageConfig;
use crate::core::errors::PixConvError;
use crate::core::traits::GraphStage;
use crate::stages::torch_input::TorchInputStage;
use once_cell::sync::Lazy;
use std::collections::HashMap;

type StageFactory =
    Box<dyn Fn(&StageConfig) -> Result<Box<dyn GraphStage>, PixConvError> + Send + Sync>;

/// Registry of stage factories keyed by stage name.
pub struct StageRegistry {
    factories: HashMap<String, StageFactory>,
}

impl StageRegistry {
    /// Creates a registry with no stages registered.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a factory under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&StageConfig) -> Result<Box<dyn GraphStage>, PixConvError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Builds the stage named by the configuration's tag.
    ///
    /// # Errors
    ///
    /// Returns an error if no factory is registered under that name, or if
    /// the factory rejects the configuration.
    pub fn build(&self, config: &StageConfig) -> Result<Box<dyn GraphStage>, PixConvError> {
        let name = config.stage_name();
        let factory = self.factories.get(name).ok_or_else(|| {
            PixConvError::invalid_input(format!(
                "no stage registered under '{name}'; known stages: {:?}",
                self.names()
            ))
        })?;
        factory(config)
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered stage names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for StageRegistry {
    /// Registry with the built-in stages registered.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TorchInputStage::NAME, |config| match config {
            StageConfig::TorchInput(stage_config) => Ok(
                Box::new(TorchInputStage::new(stage_config.clone())?) as Box<dyn GraphStage>,
            ),
        });
        registry
    }
}

impl std::fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRegistry")
            .field("stages", &self.names())
            .finish()
    }
}

static DEFAULT_REGISTRY: Lazy<StageRegistry> = Lazy::new(StageRegistry::default);

/// Process-wide registry with the built-in stages registered.
pub fn default_registry() -> &'static StageRegistry {
    &DEFAULT_REGISTRY
}
