//! Wire model of `types.xml` for the quick-xml serde layer.
//!
//! These structs mirror the file literally (everything as text, every child
//! optional) so that a lenient import never fails on a value it could coerce.
//! [`codec`](super::codec) converts them to and from [`TypeRecord`](crate::models::TypeRecord).

use serde::{Deserialize, Serialize};

/// `<types>` root.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "types")]
pub(crate) struct TypesDocument {
    #[serde(rename = "type", default)]
    pub types: Vec<TypeElement>,
}

/// `<type name="...">`
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct TypeElement {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    // Numeric children are lists so a repeated child is tolerated; the first
    // non-blank one counts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nominal: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lifetime: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restock: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub min: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantmin: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantmax: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cost: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagsElement>,

    // Only the first one counts; extra copies are tolerated on import.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<NamedElement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usage: Vec<NamedElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<NamedElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<NamedElement>,
}

/// `<flags count_in_cargo="0" .../>`
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct FlagsElement {
    #[serde(rename = "@count_in_cargo", default, skip_serializing_if = "Option::is_none")]
    pub count_in_cargo: Option<String>,
    #[serde(rename = "@count_in_hoarder", default, skip_serializing_if = "Option::is_none")]
    pub count_in_hoarder: Option<String>,
    #[serde(rename = "@count_in_map", default, skip_serializing_if = "Option::is_none")]
    pub count_in_map: Option<String>,
    #[serde(rename = "@count_in_player", default, skip_serializing_if = "Option::is_none")]
    pub count_in_player: Option<String>,
    #[serde(rename = "@crafted", default, skip_serializing_if = "Option::is_none")]
    pub crafted: Option<String>,
    #[serde(rename = "@deloot", default, skip_serializing_if = "Option::is_none")]
    pub deloot: Option<String>,
}

/// `<category name="..."/>`, `<usage name="..."/>`, `<value .../>`, `<tag .../>`
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct NamedElement {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NamedElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }
}
