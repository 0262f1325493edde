use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartAccount {
    pub id: String,
    pub number: String,
    pub name: String,
    /// Id of the parent account, empty for top-level accounts.
    pub parent: String,
    pub tags: HashSet<String>,
}

impl ChartAccount {
    pub fn new(id: impl Into<String>, number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            name: name.into(),
            parent: String::new(),
            tags: HashSet::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn with_tags<T, S>(mut self, tags: T) -> Self
    where
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
