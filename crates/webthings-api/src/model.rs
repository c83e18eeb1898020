// Thing records returned by `GET /things`.
//
// The schema belongs to the gateway (a Web Thing Description). Only the
// common fields are typed; everything else is kept verbatim in `extra`,
// and every field is optional so unfamiliar gateways still deserialize.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One device descriptor from the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Semantic capabilities, e.g. `["OnOffSwitch", "Light"]`.
    #[serde(
        rename = "@type",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Gateway-relative path of this thing, e.g. `/things/lamp-1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub actions: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub events: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Value>,

    /// Any field not listed above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Thing {
    /// Best human-readable label: `title`, then legacy `name`, then `id`.
    pub fn display_name(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or_else(|| self.extra.get("name").and_then(Value::as_str))
            .or(self.id.as_deref())
    }

    /// Stable identifier: `id`, else `href`.
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.href.as_deref())
    }
}

/// `@type` may be a single string or an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_thing_description() {
        let thing: Thing = serde_json::from_value(json!({
            "id": "https://gateway.local/things/lamp-1",
            "title": "Desk Lamp",
            "@context": "https://webthings.io/schemas",
            "@type": ["OnOffSwitch", "Light"],
            "href": "/things/lamp-1",
            "properties": {
                "on": { "type": "boolean", "title": "On/Off" }
            },
            "links": [{ "rel": "properties", "href": "/things/lamp-1/properties" }],
            "selectedCapability": "Light"
        }))
        .unwrap();

        assert_eq!(thing.display_name(), Some("Desk Lamp"));
        assert_eq!(thing.types, vec!["OnOffSwitch", "Light"]);
        assert_eq!(thing.href.as_deref(), Some("/things/lamp-1"));
        assert!(thing.properties.contains_key("on"));
        assert_eq!(thing.links.len(), 1);
        assert_eq!(thing.extra.get("selectedCapability"), Some(&json!("Light")));
    }

    #[test]
    fn single_string_type_is_accepted() {
        let thing: Thing = serde_json::from_value(json!({ "@type": "Thermostat" })).unwrap();
        assert_eq!(thing.types, vec!["Thermostat"]);
    }

    #[test]
    fn empty_object_is_a_valid_thing() {
        let thing: Thing = serde_json::from_value(json!({})).unwrap();
        assert_eq!(thing.display_name(), None);
        assert_eq!(thing.identifier(), None);
        assert!(thing.types.is_empty());
    }

    #[test]
    fn legacy_name_field_is_used_for_display() {
        let thing: Thing = serde_json::from_value(json!({
            "name": "Porch Light",
            "href": "/things/porch"
        }))
        .unwrap();
        assert_eq!(thing.display_name(), Some("Porch Light"));
        assert_eq!(thing.identifier(), Some("/things/porch"));
    }

    #[test]
    fn serialization_keeps_unknown_fields() {
        let input = json!({
            "title": "Sensor",
            "@type": ["TemperatureSensor"],
            "floorplanX": 12
        });
        let thing: Thing = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&thing).unwrap(), input);
    }
}
