//! JSON:API documents returned by the deployment server, and their
//! conversion into store entities.

pub mod convert;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::ConversionError;

pub use convert::{Converted, convert_document};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub data: Data,
    #[serde(default)]
    pub included: Vec<Resource>,
}

impl Document {
    pub fn parse(json: &str) -> Result<Self, ConversionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Primary resources followed by included ones.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        let primary: &[Resource] = match &self.data {
            Data::One(resource) => std::slice::from_ref(resource),
            Data::Many(resources) => resources,
        };
        primary.iter().chain(self.included.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Data {
    One(Resource),
    Many(Vec<Resource>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

impl Resource {
    /// Ids linked under `name`, empty if the relationship is missing.
    pub fn related_ids(&self, name: &str) -> Vec<&str> {
        match self.relationships.get(name).and_then(|r| r.data.as_ref()) {
            None => Vec::new(),
            Some(Linkage::One(target)) => vec![target.id.as_str()],
            Some(Linkage::Many(targets)) => targets.iter().map(|t| t.id.as_str()).collect(),
        }
    }

    pub fn related_id(&self, name: &str) -> Option<&str> {
        self.related_ids(name).into_iter().next()
    }

    /// Whether the relationship carries resource linkage at all, even an
    /// empty list.
    pub fn has_linkage(&self, name: &str) -> bool {
        self.relationships
            .get(name)
            .is_some_and(|r| r.data.is_some())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}
