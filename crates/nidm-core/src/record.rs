//! One subject's raw QC record.

use crate::value::ScalarValue;

/// Ordered mapping of metric name → scalar value, as read from the source.
///
/// Keys that configuration excluded before flattening are kept in
/// `excluded` so they stay visible in the conversion report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, ScalarValue)>,
    excluded: Vec<String>,
}

impl RawRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: ScalarValue) {
        self.fields.push((key.into(), value));
    }

    pub fn exclude(&mut self, key: impl Into<String>) {
        self.excluded.push(key.into());
    }

    /// Fields in source order.
    #[must_use]
    pub fn fields(&self) -> &[(String, ScalarValue)] {
        &self.fields
    }

    #[must_use]
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// First value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ScalarValue> {
        self.fields
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ScalarValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, ScalarValue)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.push(key, value);
        }
        record
    }
}
