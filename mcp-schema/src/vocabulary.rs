//! Default descriptions for generated leaf schemas.

/// Configuration table of the generic descriptions the mapper attaches to
/// leaf nodes when a parameter carries no description of its own. Passing the
/// table in keeps the wording overridable without touching mapping logic.
#[derive(Clone, Debug)]
pub struct SchemaVocabulary {
    string_param: String,
    integer_param: String,
    number_param: String,
    boolean_param: String,
    array_param: String,
    complex_param: String,
}

impl SchemaVocabulary {
    /// Overrides the description for string parameters.
    #[must_use]
    pub fn with_string(mut self, description: impl Into<String>) -> Self {
        self.string_param = description.into();
        self
    }

    /// Overrides the description for integer parameters.
    #[must_use]
    pub fn with_integer(mut self, description: impl Into<String>) -> Self {
        self.integer_param = description.into();
        self
    }

    /// Overrides the description for floating-point parameters.
    #[must_use]
    pub fn with_number(mut self, description: impl Into<String>) -> Self {
        self.number_param = description.into();
        self
    }

    /// Overrides the description for boolean parameters.
    #[must_use]
    pub fn with_boolean(mut self, description: impl Into<String>) -> Self {
        self.boolean_param = description.into();
        self
    }

    /// Overrides the description for array parameters.
    #[must_use]
    pub fn with_array(mut self, description: impl Into<String>) -> Self {
        self.array_param = description.into();
        self
    }

    /// Overrides the description for unmappable parameters.
    #[must_use]
    pub fn with_complex(mut self, description: impl Into<String>) -> Self {
        self.complex_param = description.into();
        self
    }

    /// Returns the string-parameter description.
    #[must_use]
    pub fn string_param(&self) -> &str {
        &self.string_param
    }

    /// Returns the integer-parameter description.
    #[must_use]
    pub fn integer_param(&self) -> &str {
        &self.integer_param
    }

    /// Returns the number-parameter description.
    #[must_use]
    pub fn number_param(&self) -> &str {
        &self.number_param
    }

    /// Returns the boolean-parameter description.
    #[must_use]
    pub fn boolean_param(&self) -> &str {
        &self.boolean_param
    }

    /// Returns the array-parameter description.
    #[must_use]
    pub fn array_param(&self) -> &str {
        &self.array_param
    }

    /// Returns the complex-parameter description.
    #[must_use]
    pub fn complex_param(&self) -> &str {
        &self.complex_param
    }
}

impl Default for SchemaVocabulary {
    fn default() -> Self {
        Self {
            string_param: "String parameter".to_owned(),
            integer_param: "Integer parameter".to_owned(),
            number_param: "Number parameter".to_owned(),
            boolean_param: "Boolean parameter".to_owned(),
            array_param: "Array parameter".to_owned(),
            complex_param: "Complex parameter".to_owned(),
        }
    }
}
