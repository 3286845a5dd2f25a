use std::{fmt, sync::Arc};

/// Stable lookup key for a region across both data sources.
/// Keeps the source spelling but normalized (trimmed, uppercased) so the
/// tabular rows and the geometry features agree on a key, without repeated
/// owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionId(Arc<str>);

impl RegionId {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name.trim().to_uppercase().as_str()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::RegionId;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(RegionId::new("  Punjab "), RegionId::new("PUNJAB"));
        assert_eq!(RegionId::new("Tamil Nadu").as_str(), "TAMIL NADU");
    }
}
