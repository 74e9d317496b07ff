//! Emitted build statements.

use std::fmt;

/// Import group of every layer class.
pub const LAYER_SOURCE: &str = "layers";

/// Import group of the model class.
pub const MODEL_SOURCE: &str = "models";

/// One line of the generated build method.
///
/// Renders as `<var> = <source>.<class>(<args>)(<call>)`, where the
/// assignment and the trailing call are omitted when absent.
///
/// # Examples
///
/// ```
/// use kmb_compiler::Statement;
///
/// let stmt = Statement::new("dense_1", "layers", "Dense", "units=64", Some("input_1".into()));
/// assert_eq!(stmt.to_string(), "dense_1 = layers.Dense(units=64)(input_1)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    var: String,
    source: String,
    class: String,
    args: String,
    call: Option<String>,
}

impl Statement {
    pub fn new(
        var: impl Into<String>,
        source: impl Into<String>,
        class: impl Into<String>,
        args: impl Into<String>,
        call: Option<String>,
    ) -> Self {
        Self {
            var: var.into(),
            source: source.into(),
            class: class.into(),
            args: args.into(),
            call,
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// The rendered keyword-argument list.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// The positional input the constructed object is called with.
    pub fn call(&self) -> Option<&str> {
        self.call.as_deref()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.var.is_empty() {
            write!(f, "{} = ", self.var)?;
        }
        write!(f, "{}.{}({})", self.source, self.class, self.args)?;
        if let Some(call) = &self.call {
            write!(f, "({call})")?;
        }
        Ok(())
    }
}
