//! Lookup of configured media formats by name and rendition group.
//!
//! Formats marked `internal` stay resolvable by name (code may reference them
//! directly) but are left out of [`FormatRegistry::offered`], the list shown
//! to editors and other external consumers.

use super::MediaFormat;

/// Ordered collection of media formats with unique names.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<MediaFormat>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a format. A later format with the same name replaces the earlier
    /// one in place, keeping its position.
    pub fn register(&mut self, format: MediaFormat) {
        match self.formats.iter_mut().find(|f| f.name() == format.name()) {
            Some(existing) => *existing = format,
            None => self.formats.push(format),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MediaFormat> {
        self.formats.iter().find(|f| f.name() == name)
    }

    /// All formats in registration order.
    pub fn all(&self) -> &[MediaFormat] {
        &self.formats
    }

    /// Non-internal formats, ordered by ranking then registration order.
    pub fn offered(&self) -> Vec<&MediaFormat> {
        let mut offered: Vec<&MediaFormat> =
            self.formats.iter().filter(|f| !f.is_internal()).collect();
        offered.sort_by_key(|f| f.ranking());
        offered
    }

    /// Members of a rendition group, ordered by ranking then registration order.
    pub fn group(&self, group: &str) -> Vec<&MediaFormat> {
        let mut members: Vec<&MediaFormat> = self
            .formats
            .iter()
            .filter(|f| f.rendition_group() == Some(group))
            .collect();
        members.sort_by_key(|f| f.ranking());
        members
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl FromIterator<MediaFormat> for FormatRegistry {
    fn from_iter<T: IntoIterator<Item = MediaFormat>>(iter: T) -> Self {
        let mut registry = Self::new();
        for format in iter {
            registry.register(format);
        }
        registry
    }
}
