use std::collections::{HashMap, HashSet};

/// Symbol table for one compilation: the set of identifiers that are callable
/// and the variable bindings used during evaluation. Fixed after construction.
#[derive(Debug, Clone, Default)]
pub struct MathContext {
    functions: HashSet<String>,
    variables: HashMap<String, f64>,
}

impl MathContext {
    pub fn new<I, S>(functions: I, variables: HashMap<String, f64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            functions: functions.into_iter().map(Into::into).collect(),
            variables,
        }
    }

    /// Context with function names only, no variable bindings.
    pub fn with_functions<I, S>(functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(functions, HashMap::new())
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    /// Resolves a variable to its bound value, defaulting to 0.0. A leading
    /// `-` represents literal negation baked into the name by the unary
    /// minus resolver and returns the negated lookup of the stripped name.
    pub fn read_variable(&self, name: &str) -> f64 {
        if let Some(stripped) = name.strip_prefix('-') {
            return -self.read_variable(stripped);
        }
        self.variables.get(name).copied().unwrap_or(0.0)
    }
}
