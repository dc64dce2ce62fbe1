use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a material record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

/// Kind of media a material points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    Pdf,
    Video,
    Text,
    #[default]
    Other,
}

impl MediaKind {
    /// Parse the catalog's `type` column. Unknown values map to `Other`.
    pub fn from_type(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pdf" => MediaKind::Pdf,
            "video" => MediaKind::Video,
            "text" => MediaKind::Text,
            _ => MediaKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Pdf => "pdf",
            MediaKind::Video => "video",
            MediaKind::Text => "text",
            MediaKind::Other => "other",
        }
    }
}

/// Data attached to a record that the tree carries but never interprets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub url: String,
    pub size_label: Option<String>,
    pub page_count: Option<u32>,
    pub media_kind: MediaKind,
    pub description: Option<String>,
}

/// One study material: an id, a `/`-delimited path, and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub path: String,
    pub payload: Payload,
}

impl Record {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: RecordId(id.into()),
            path: path.into(),
            payload: Payload::default(),
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }
}

/// Resolve the resource a record points at. The payload is passed through unchanged.
pub fn resolve_payload_resource(record: &Record) -> &Payload {
    &record.payload
}

/// A row of the `materials` table as exported in a catalog file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaterialRow {
    pub id: String,
    pub module_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub display_order: i64,
}

impl From<MaterialRow> for Record {
    fn from(row: MaterialRow) -> Self {
        Record {
            id: RecordId(row.id),
            path: row.title,
            payload: Payload {
                url: row.file_url,
                size_label: row.file_size.filter(|s| !s.trim().is_empty()),
                // Uploads store 0 when the page count was never filled in.
                page_count: row.pages.filter(|&p| p > 0),
                media_kind: row
                    .kind
                    .as_deref()
                    .map(MediaKind::from_type)
                    .unwrap_or_default(),
                description: row.description.filter(|s| !s.trim().is_empty()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_is_lenient() {
        assert_eq!(MediaKind::from_type("pdf"), MediaKind::Pdf);
        assert_eq!(MediaKind::from_type(" Video "), MediaKind::Video);
        assert_eq!(MediaKind::from_type("TEXT"), MediaKind::Text);
        assert_eq!(MediaKind::from_type("image"), MediaKind::Other);
        assert_eq!(MediaKind::from_type(""), MediaKind::Other);
    }

    #[test]
    fn material_row_maps_title_to_path() {
        let json = r#"{
            "id": "m-1",
            "module_id": "mod-1",
            "title": "Unit1/Lesson1",
            "description": "Intro lesson",
            "type": "pdf",
            "file_url": "https://cdn.example/u1l1.pdf",
            "file_size": "1.25 MB",
            "pages": 12,
            "display_order": 3
        }"#;
        let row: MaterialRow = serde_json::from_str(json).unwrap();
        let record = Record::from(row);
        assert_eq!(record.id, RecordId::from("m-1"));
        assert_eq!(record.path, "Unit1/Lesson1");
        assert_eq!(record.payload.url, "https://cdn.example/u1l1.pdf");
        assert_eq!(record.payload.size_label.as_deref(), Some("1.25 MB"));
        assert_eq!(record.payload.page_count, Some(12));
        assert_eq!(record.payload.media_kind, MediaKind::Pdf);
        assert_eq!(record.payload.description.as_deref(), Some("Intro lesson"));
    }

    #[test]
    fn material_row_optional_fields_default() {
        let json = r#"{ "id": "m-2", "module_id": "mod-1", "title": "Notes" }"#;
        let row: MaterialRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.display_order, 0);
        let record = Record::from(row);
        assert_eq!(record.payload.media_kind, MediaKind::Other);
        assert!(record.payload.size_label.is_none());
        assert!(record.payload.page_count.is_none());
        assert!(record.payload.url.is_empty());
    }

    #[test]
    fn zero_pages_and_blank_strings_become_none() {
        let json = r#"{ "id": "m-3", "module_id": "x", "title": "A",
                        "pages": 0, "file_size": " ", "description": "" }"#;
        let record = Record::from(serde_json::from_str::<MaterialRow>(json).unwrap());
        assert!(record.payload.page_count.is_none());
        assert!(record.payload.size_label.is_none());
        assert!(record.payload.description.is_none());
    }

    #[test]
    fn resolve_payload_passes_through() {
        let payload = Payload {
            url: "https://cdn.example/a.pdf".into(),
            page_count: Some(4),
            media_kind: MediaKind::Pdf,
            ..Default::default()
        };
        let record = Record::new("1", "a.pdf").with_payload(payload.clone());
        assert_eq!(resolve_payload_resource(&record), &payload);
    }
}
