//! Firestore REST adapter.
//!
//! Documents live under
//! `projects/{project}/databases/(default)/documents/<collection>/<id>`.
//! Field values use Firestore's typed representation; the codec below maps
//! them to and from plain JSON. Timestamps decode to RFC 3339 strings, which
//! is what the rest of the application stores and parses.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::credentials::ServiceCredentials;
use crate::config::store::StoreConfig;

use super::{DocumentStore, Fields, StoreError, StoredDocument};

pub struct FirestoreStore {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct QueryResult {
    document: Option<RestDocument>,
}

impl FirestoreStore {
    pub fn new(config: &StoreConfig, credentials: &ServiceCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: credentials.project_id.clone(),
            access_token: credentials.access_token.clone(),
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root(), collection, id)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn upstream_error(resp: reqwest::Response) -> StoreError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        StoreError::Upstream(format!("upstream status {status}: {body}"))
    }

    fn parse_document(doc: RestDocument) -> Result<StoredDocument, StoreError> {
        let id = doc
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(StoredDocument {
            id,
            fields: decode_fields(doc.fields)?,
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, StoreError> {
        let resp = self
            .request(self.http.get(self.doc_url(collection, id)))
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::upstream_error(resp).await);
        }

        let doc: RestDocument = resp.json().await?;
        Ok(Some(decode_fields(doc.fields)?))
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let resp = self
            .request(self.http.patch(self.doc_url(collection, id)))
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::upstream_error(resp).await);
        }
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mask: Vec<(&str, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.clone()))
            .collect();

        let resp = self
            .request(self.http.patch(self.doc_url(collection, id)))
            .query(&mask)
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::upstream_error(resp).await);
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let mut params: Vec<(&str, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.clone()))
            .collect();
        params.push(("currentDocument.exists", "true".to_string()));

        let resp = self
            .request(self.http.patch(self.doc_url(collection, id)))
            .query(&params)
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(Self::upstream_error(resp).await);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let url = format!("{}/{}", self.documents_root(), collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.request(self.http.get(&url));
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let resp = request.send().await?;
            if !resp.status().is_success() {
                return Err(Self::upstream_error(resp).await);
            }

            let body: ListResponse = resp.json().await?;
            for doc in body.documents {
                documents.push(Self::parse_document(doc)?);
            }

            match body.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        // The query parent is the path above the queried collection id.
        let (parent, collection_id) = match collection.rsplit_once('/') {
            Some((parent, last)) => (format!("{}/{}", self.documents_root(), parent), last),
            None => (self.documents_root(), collection),
        };

        let resp = self
            .request(self.http.post(format!("{parent}:runQuery")))
            .json(&json!({
                "structuredQuery": {
                    "from": [{ "collectionId": collection_id }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": field },
                            "op": "EQUAL",
                            "value": encode_value(value),
                        }
                    }
                }
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::upstream_error(resp).await);
        }

        let results: Vec<QueryResult> = resp.json().await?;
        results
            .into_iter()
            .filter_map(|result| result.document)
            .map(Self::parse_document)
            .collect()
    }
}

fn encode_fields(fields: &Fields) -> Value {
    let mut encoded = serde_json::Map::new();
    for (key, value) in fields {
        encoded.insert(key.clone(), encode_value(value));
    }
    Value::Object(encoded)
}

fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => {
            let mut fields = serde_json::Map::new();
            for (key, value) in map {
                fields.insert(key.clone(), encode_value(value));
            }
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

fn decode_fields(fields: serde_json::Map<String, Value>) -> Result<Fields, StoreError> {
    let mut decoded = serde_json::Map::new();
    for (key, value) in fields {
        decoded.insert(key, decode_value(value)?);
    }
    Ok(decoded)
}

fn decode_value(value: Value) -> Result<Value, StoreError> {
    let Value::Object(mut typed) = value else {
        return Err(StoreError::Decode("valor sin tipo".to_string()));
    };

    let (kind, mut inner) = typed
        .iter_mut()
        .next()
        .map(|(k, v)| (k.clone(), v.take()))
        .ok_or_else(|| StoreError::Decode("valor vacío".to_string()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(inner),
        "stringValue" | "referenceValue" | "bytesValue" => Ok(inner),
        // Timestamps arrive as RFC 3339 strings and stay that way.
        "timestampValue" => Ok(inner),
        "integerValue" => {
            let raw = inner.as_str().unwrap_or_default();
            let n: i64 = raw
                .parse()
                .map_err(|_| StoreError::Decode(format!("integerValue inválido: {raw}")))?;
            Ok(json!(n))
        }
        "doubleValue" => Ok(inner),
        "arrayValue" => {
            let values = inner
                .get_mut("values")
                .map(Value::take)
                .unwrap_or(Value::Array(vec![]));
            let Value::Array(items) = values else {
                return Err(StoreError::Decode("arrayValue inválido".to_string()));
            };
            let decoded: Result<Vec<Value>, StoreError> =
                items.into_iter().map(decode_value).collect();
            Ok(Value::Array(decoded?))
        }
        "mapValue" => {
            let fields = inner
                .get_mut("fields")
                .map(Value::take)
                .unwrap_or_else(|| json!({}));
            let Value::Object(map) = fields else {
                return Err(StoreError::Decode("mapValue inválido".to_string()));
            };
            Ok(Value::Object(decode_fields(map)?))
        }
        other => Err(StoreError::Decode(format!("tipo desconocido: {other}"))),
    }
}
