use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named scalar unknown.
///
/// Variables are identified by name alone: two variables with the same name
/// are the same unknown, no matter where they were created. Cloning is cheap
/// because the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(Arc<str>);

impl Variable {
    /// Creates a variable with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A binding of variables to numeric values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    values: HashMap<Variable, f64>,
}

impl Assignment {
    /// Creates an empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `variable` to `value`, replacing any previous binding.
    pub fn set(&mut self, variable: Variable, value: f64) {
        self.values.insert(variable, value);
    }

    /// Returns a copy of this assignment with `variable` bound to `value`.
    #[must_use]
    pub fn with(mut self, variable: Variable, value: f64) -> Self {
        self.set(variable, value);
        self
    }

    /// Returns the value bound to `variable`, if any.
    #[must_use]
    pub fn get(&self, variable: &Variable) -> Option<f64> {
        self.values.get(variable).copied()
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Variable, f64)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (Variable, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_name() {
        let a = Variable::new("p_0_x");
        let b = Variable::from("p_0_x");

        assert_eq!(a, b);
        assert_ne!(a, Variable::new("p_0_y"));
        assert_eq!(a.to_string(), "p_0_x");
    }

    #[test]
    fn assignment_overwrites_bindings() {
        let x = Variable::new("x");
        let assignment = Assignment::new().with(x.clone(), 1.0).with(x.clone(), 2.0);

        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.get(&x), Some(2.0));
        assert_eq!(assignment.get(&Variable::new("y")), None);
    }
}
