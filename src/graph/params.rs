//! Request parameters and their wire encodings.
//!
//! Parameters keep insertion order. Multi-valued filters are sent the way the
//! Graph API expects them: a single comma-joined string.

use std::io::Read;

/// A file part for `multipart/form-data` uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl Upload {
    /// Default content type for uploads.
    pub const DEFAULT_CONTENT_TYPE: &'static str = "application/octet-stream";

    /// Creates an upload from in-memory bytes.
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content_type: Self::DEFAULT_CONTENT_TYPE.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Creates an upload by draining a reader.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading.
    pub fn from_reader(filename: impl Into<String>, mut reader: impl Read) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(filename, bytes))
    }

    /// Sets the content type of the part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the file name sent with the part.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the content type sent with the part.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Splits the upload into its filename, content type and bytes.
    #[must_use]
    pub fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.filename, self.content_type, self.bytes)
    }
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A plain string.
    Text(String),
    /// A list of strings, sent comma-joined.
    List(Vec<String>),
    /// A boolean, sent as `true`/`false`.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A file, sent as a separate multipart part.
    File(Upload),
}

impl ParamValue {
    /// Returns the wire form of non-file values.
    #[must_use]
    pub fn as_form_value(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::List(items) => Some(items.join(",")),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::File(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(ToString::to_string).collect())
    }
}

impl From<&[&str]> for ParamValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParamValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

impl From<Upload> for ParamValue {
    fn from(value: Upload) -> Self {
        Self::File(value)
    }
}

/// An ordered set of request parameters.
///
/// # Example
///
/// ```
/// use graphlink::graph::Params;
///
/// let params = Params::new()
///     .with("fields", ["id", "name"])
///     .with("limit", 25);
///
/// assert_eq!(
///     params.form_pairs(),
///     vec![
///         ("fields".to_string(), "id,name".to_string()),
///         ("limit".to_string(), "25".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `key` and returns the set (builder style).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key`, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns true if `key` is set.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if any parameter is a file upload.
    #[must_use]
    pub fn has_files(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, v)| matches!(v, ParamValue::File(_)))
    }

    /// Returns the non-file parameters as wire key/value pairs.
    #[must_use]
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_form_value().map(|v| (k.clone(), v)))
            .collect()
    }

    /// Encodes the non-file parameters as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn to_form_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form_pairs())
            .finish()
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
