//! HTTP access to the trove search index and the JSON:API envelope it answers with.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, warn};

const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

static TROVE_HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

pub fn get_trove_url() -> String {
    std::env::var("SHARE_URL").unwrap_or("https://share.osf.io/trove".to_string())
}

#[derive(Debug, Deserialize)]
pub struct RawJsonApiDocument {
    pub data: RawResource,
    #[serde(default)]
    pub included: Vec<RawResource>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub relationships: BTreeMap<String, RawRelationship>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawRelationship {
    #[serde(default)]
    pub data: Option<RawRelationshipData>,
    #[serde(default)]
    pub links: BTreeMap<String, Option<RawLink>>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum RawRelationshipData {
    Many(Vec<RawResourceIdentifier>),
    One(RawResourceIdentifier),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RawResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum RawLink {
    Href(String),
    Object { href: String },
}

impl RawLink {
    pub fn href(&self) -> &str {
        match self {
            RawLink::Href(href) => href,
            RawLink::Object { href } => href,
        }
    }
}

impl RawRelationship {
    pub fn identifiers(&self) -> &[RawResourceIdentifier] {
        match &self.data {
            Some(RawRelationshipData::Many(many)) => many,
            Some(RawRelationshipData::One(one)) => std::slice::from_ref(one),
            None => &[],
        }
    }

    pub fn link(&self, name: &str) -> Option<&RawLink> {
        self.links.get(name).and_then(Option::as_ref)
    }
}

impl RawResource {
    pub fn relationship(&self, name: &str) -> Option<&RawRelationship> {
        self.relationships.get(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }
}

/// Lookup of `included` resources by `(type, id)`.
pub struct IncludedResources<'a> {
    by_identifier: HashMap<(&'a str, &'a str), &'a RawResource>,
}

impl<'a> IncludedResources<'a> {
    pub fn new(document: &'a RawJsonApiDocument) -> Self {
        let by_identifier = document
            .included
            .iter()
            .map(|resource| ((resource.resource_type.as_str(), resource.id.as_str()), resource))
            .collect();
        Self { by_identifier }
    }

    pub fn get(&self, identifier: &RawResourceIdentifier) -> Option<&'a RawResource> {
        let found = self
            .by_identifier
            .get(&(identifier.resource_type.as_str(), identifier.id.as_str()))
            .copied();
        if found.is_none() {
            warn!("JSON:API document does not include {} {}", identifier.resource_type, identifier.id);
        }
        found
    }

    /// Follows a relationship of `resource` into the included resources, skipping dangling links.
    pub fn related(&self, resource: &'a RawResource, relationship: &str) -> Vec<&'a RawResource> {
        resource
            .relationship(relationship)
            .map(|rel| rel.identifiers().iter().filter_map(|id| self.get(id)).collect())
            .unwrap_or_default()
    }
}

/// Cursor carried in a pagination link. A link without one points at the first page.
pub fn cursor_from_href(href: &str) -> Option<String> {
    let url = reqwest::Url::parse(href).ok()?;
    let cursor = url
        .query_pairs()
        .find(|(key, _)| key == "page[cursor]")
        .map(|(_, value)| value.into_owned());
    Some(cursor.unwrap_or_default())
}

pub async fn trove_get(path: &str, params: &[(String, String)]) -> anyhow::Result<RawJsonApiDocument> {
    let url = format!("{}/{}", get_trove_url(), path);
    let t0 = std::time::Instant::now();

    let response = TROVE_HTTP_CLIENT
        .get(&url)
        .query(params)
        .header(reqwest::header::ACCEPT, JSON_API_MEDIA_TYPE)
        .send()
        .await?;
    let status = response.status();
    let response_txt = response.text().await?;
    if status.is_client_error() || status.is_server_error() {
        anyhow::bail!("Error: {}: {}", status, response_txt);
    }
    let dt_ms = t0.elapsed().as_millis();
    debug!("TROVE RESPONSE: {} len = {} ({}ms)", path, response_txt.len(), dt_ms);

    let document = serde_json::from_str::<RawJsonApiDocument>(&response_txt)
        .with_context(|| format!("Invalid JSON:API document from {}", url))?;
    Ok(document)
}
