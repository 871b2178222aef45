use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub occupation: String,
    pub personality: String,
}

/// A character that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCharacter {
    pub name: String,
    pub age: i64,
    pub occupation: String,
    pub personality: String,
}

impl NewCharacter {
    pub fn with_id(self, id: i64) -> Character {
        Character {
            id,
            name: self.name,
            age: self.age,
            occupation: self.occupation,
            personality: self.personality,
        }
    }
}

// Request payloads
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CreateCharacterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
}

impl CreateCharacterRequest {
    /// Checks required fields in declaration order and reports the first one absent.
    pub fn into_new_character(self) -> Result<NewCharacter, MissingField> {
        Ok(NewCharacter {
            name: self.name.ok_or(MissingField("name"))?,
            age: self.age.ok_or(MissingField("age"))?,
            occupation: self.occupation.ok_or(MissingField("occupation"))?,
            personality: self.personality.ok_or(MissingField("personality"))?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required value: '{}'", self.0)
    }
}

impl std::error::Error for MissingField {}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateCharacterRequest {
        CreateCharacterRequest {
            name: Some("Vesemir".to_string()),
            age: Some(280),
            occupation: Some("witcher".to_string()),
            personality: Some("gruff".to_string()),
        }
    }

    #[test]
    fn complete_request_builds_character() {
        let character = full_request().into_new_character().unwrap().with_id(7);
        assert_eq!(character.id, 7);
        assert_eq!(character.name, "Vesemir");
        assert_eq!(character.age, 280);
        assert_eq!(character.occupation, "witcher");
        assert_eq!(character.personality, "gruff");
    }

    #[test]
    fn reports_first_missing_field() {
        let mut req = full_request();
        req.occupation = None;
        req.personality = None;
        assert_eq!(req.into_new_character(), Err(MissingField("occupation")));
    }

    #[test]
    fn missing_field_message_names_key() {
        let err = CreateCharacterRequest::default()
            .into_new_character()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required value: 'name'");
    }

    #[test]
    fn absent_json_keys_deserialize_as_none() {
        let req: CreateCharacterRequest =
            serde_json::from_str(r#"{"name": "Triss", "age": 30}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Triss"));
        assert!(req.occupation.is_none());
    }

    #[test]
    fn character_serializes_with_flat_fields() {
        let character = full_request().into_new_character().unwrap().with_id(1);
        let value = serde_json::to_value(&character).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "name": "Vesemir",
                "age": 280,
                "occupation": "witcher",
                "personality": "gruff",
            })
        );
    }
}
