use std::fmt;

/// Dotted location of a value inside a template, e.g.
/// `Resources.MyService.Properties.LoadBalancers[0].ContainerPort`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(String);

impl FieldPath {
    /// The template root, rendered as `$`.
    pub fn root() -> Self {
        FieldPath(String::new())
    }

    pub fn new(segment: &str) -> Self {
        FieldPath(segment.to_string())
    }

    pub fn child(&self, key: &str) -> Self {
        if self.0.is_empty() {
            FieldPath(key.to_string())
        } else {
            FieldPath(format!("{}.{}", self.0, key))
        }
    }

    pub fn index(&self, index: usize) -> Self {
        FieldPath(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        if self.0.is_empty() {
            "$"
        } else {
            &self.0
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_as_dollar() {
        assert_eq!(FieldPath::root().to_string(), "$");
        assert_eq!(FieldPath::root().child("Resources").to_string(), "Resources");
    }

    #[test]
    fn test_nested_path() {
        let path = FieldPath::new("Resources")
            .child("Svc")
            .child("Properties")
            .child("LoadBalancers")
            .index(2)
            .child("ContainerPort");
        assert_eq!(
            path.as_str(),
            "Resources.Svc.Properties.LoadBalancers[2].ContainerPort"
        );
    }
}
