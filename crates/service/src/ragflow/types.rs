use serde::{Deserialize, Serialize};

/// Pass-through shape of one knowledge-base dataset as returned by the
/// vendor API. Unknown fields are ignored, absent ones default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub embedding_model: Option<String>,
    pub permission: Option<String>,
    pub chunk_count: Option<i64>,
    pub document_count: Option<i64>,
    pub create_date: Option<String>,
    pub update_date: Option<String>,
}

/// One retrieval hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalChunk {
    pub content: String,
    pub document_id: Option<String>,
    pub similarity: Option<f64>,
}

/// Vendor response envelope: `code` 0 means success, payload under `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RetrievalData {
    pub chunks: Vec<RetrievalChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_decodes_leniently() {
        let d: Dataset = serde_json::from_str(
            r#"{"id":"ds1","name":"manuals","chunk_count":12,"unknown_field":true}"#,
        )
        .unwrap();
        assert_eq!(d.id, "ds1");
        assert_eq!(d.chunk_count, Some(12));
        assert!(d.description.is_none());
    }

    #[test]
    fn envelope_requires_code() {
        let r: Result<Envelope<Vec<Dataset>>, _> = serde_json::from_str(r#"{"data":[]}"#);
        assert!(r.is_err());
    }
}
