//! Configuration types for generated model classes.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every field is optional; missing values fall back to the
//! defaults below.
//!
//! # Example
//!
//! ```
//! # use kmb::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [model]
//!     name = "mnist classifier"
//!     author = "shawn"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.model().name(), "mnist classifier");
//! assert_eq!(config.model().comment(), None);
//! ```

use serde::Deserialize;

const DEFAULT_NAME: &str = "Model";
const DEFAULT_AUTHOR: &str = "anonymous";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Settings for the generated class.
    #[serde(default)]
    model: ModelConfig,
}

impl AppConfig {
    pub fn new(model: ModelConfig) -> Self {
        Self { model }
    }

    /// Returns the model configuration.
    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Returns the model configuration for in-place overrides.
    pub fn model_mut(&mut self) -> &mut ModelConfig {
        &mut self.model
    }
}

/// Naming and documentation of the generated class.
///
/// All values are free text; they are sanitized when the class is
/// assembled.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Class name before sanitization.
    #[serde(default = "default_name")]
    name: String,

    /// Author named in the header comment.
    #[serde(default = "default_author")]
    author: String,

    /// Optional docstring of the class.
    #[serde(default)]
    comment: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            author: default_author(),
            comment: None,
        }
    }
}

impl ModelConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model().name(), "Model");
        assert_eq!(config.model().author(), "anonymous");
        assert!(config.model().comment().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str("[model]\nauthor = \"ada\"\n").unwrap();
        assert_eq!(config.model().name(), "Model");
        assert_eq!(config.model().author(), "ada");
    }

    #[test]
    fn test_empty_file() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.model().name(), "Model");
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.model_mut().set_name("resnet");
        config.model_mut().set_comment("A residual network.");

        assert_eq!(config.model().name(), "resnet");
        assert_eq!(config.model().comment(), Some("A residual network."));
    }
}
