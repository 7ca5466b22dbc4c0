//! A client-side model of the Siren hypermedia documents cnd serves.
//!
//! Pure data plus structural queries. Network I/O happens in [`crate::cnd`];
//! absence of a link or action is an `Option::None`, which polling callers
//! treat as "not yet available" and everyone else treats as a hard error.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<SubEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl Entity {
    pub fn link_by_rel(&self, rel: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|link| link.rel.iter().any(|r| r == rel))
    }

    pub fn action_by_name(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.name == name)
    }

    /// Deserialize the properties value into a typed view.
    pub fn properties_as<T>(&self) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        let properties = self
            .properties
            .clone()
            .ok_or_else(|| anyhow::anyhow!("entity has no properties"))?;

        Ok(serde_json::from_value(properties)?)
    }

    pub fn with_properties<T>(mut self, properties: T) -> anyhow::Result<Self>
    where
        T: Serialize,
    {
        self.properties = Some(serde_json::to_value(properties)?);
        Ok(self)
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_sub_entity(mut self, sub_entity: SubEntity) -> Self {
        self.entities.push(sub_entity);
        self
    }
}

/// An embedded sub-entity.
///
/// Either an embedded link (only `rel` + `href` set) or an embedded
/// representation (`rel` + a full entity). The swap collection embeds full
/// representations that each carry a `self` link.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubEntity {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rel: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(flatten)]
    pub entity: Entity,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: Vec<String>,
    pub href: String,
}

impl Link {
    pub fn new(rel: &[&str], href: impl Into<String>) -> Self {
        Self {
            rel: rel.iter().map(|r| (*r).to_owned()).collect(),
            href: href.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}
