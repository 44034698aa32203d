//! File attachments for multipart requests.

use serde_json::{Map, Value};

/// Binary file sent as the `file` part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct FilePart {
    /// Optional filename reported to the server
    name: Option<String>,
    /// Raw file content
    bytes: Vec<u8>,
}

impl FilePart {
    /// Create a file part from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: None,
            bytes: bytes.into(),
        }
    }

    /// Set the filename reported to the server.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Pull an embedded file out of request data.
    ///
    /// Recognizes `{"file": {"file": [bytes...], "name": "cover.png"}}` and
    /// removes the whole `file` entry from `data`, so the remaining fields can
    /// be serialized as the JSON part. Entries that do not carry a byte array
    /// are left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicvine_core::FilePart;
    /// use serde_json::json;
    ///
    /// let mut data = json!({
    ///     "file": {"file": [1, 2, 3], "name": "cover.png"},
    ///     "content": "hello",
    /// })
    /// .as_object()
    /// .cloned()
    /// .unwrap();
    ///
    /// let file = FilePart::extract(&mut data).unwrap();
    /// assert_eq!(file.bytes(), &vec![1u8, 2, 3]);
    /// assert_eq!(file.name().as_deref(), Some("cover.png"));
    /// assert!(!data.contains_key("file"));
    /// ```
    pub fn extract(data: &mut Map<String, Value>) -> Option<Self> {
        let entry = data.get("file")?.as_object()?;
        let bytes = entry
            .get("file")?
            .as_array()?
            .iter()
            .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<u8>>>()?;
        let name = entry.get("name").and_then(Value::as_str).map(str::to_string);
        data.remove("file");
        Some(Self { name, bytes })
    }
}
