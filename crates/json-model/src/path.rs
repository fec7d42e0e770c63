use std::collections::VecDeque;
use std::fmt;

/// Location of a value inside a JSON document, rendered as `$.items[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    segments: VecDeque<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl JsonPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push_back(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push_back(PathSegment::Index(index));
        Self { segments }
    }

    // Errors are annotated while unwinding, so segments arrive innermost first.
    pub(crate) fn push_front_key(&mut self, key: impl Into<String>) {
        self.segments.push_front(PathSegment::Key(key.into()));
    }

    pub(crate) fn push_front_index(&mut self, index: usize) {
        self.segments.push_front(PathSegment::Index(index));
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_keys_and_indices() {
        let path = JsonPath::root().child("orders").index(1).child("sku");
        assert_eq!(path.to_string(), "$.orders[1].sku");
        assert_eq!(JsonPath::root().to_string(), "$");
    }

    #[test]
    fn front_pushes_build_outward() {
        let mut path = JsonPath::root();
        path.push_front_key("name");
        path.push_front_index(0);
        path.push_front_key("children");
        assert_eq!(path, JsonPath::root().child("children").index(0).child("name"));
    }
}
