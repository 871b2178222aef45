use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Greeting {
    pub id: i64,
    pub greeting_text: String,
    pub character_id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreetingEntry {
    pub greeting: String,
}

/// Body of `GET /characters/{id}/greetings` when greetings exist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterGreetings {
    #[serde(rename = "Character Name")]
    pub character_name: String,
    #[serde(rename = "Greetings")]
    pub greetings: Vec<GreetingEntry>,
}

impl CharacterGreetings {
    pub fn new(character_name: impl Into<String>, greetings: Vec<Greeting>) -> Self {
        Self {
            character_name: character_name.into(),
            greetings: greetings
                .into_iter()
                .map(|g| GreetingEntry {
                    greeting: g.greeting_text,
                })
                .collect(),
        }
    }
}

/// Removes one layer of leading and trailing double quotes from a generated phrase.
pub fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_single_layer_of_quotes() {
        assert_eq!(strip_quotes("\"Well met, traveler.\""), "Well met, traveler.");
        assert_eq!(strip_quotes("\"\"nested\"\""), "\"nested\"");
    }

    #[test]
    fn strips_unbalanced_quotes() {
        assert_eq!(strip_quotes("\"Leave me be."), "Leave me be.");
        assert_eq!(strip_quotes("Leave me be.\""), "Leave me be.");
        assert_eq!(strip_quotes("no quotes"), "no quotes");
        assert_eq!(strip_quotes("\""), "");
    }

    #[test]
    fn greetings_body_uses_display_keys() {
        let body = CharacterGreetings::new(
            "Dandelion",
            vec![Greeting {
                id: 1,
                greeting_text: "A song for a coin?".to_string(),
                character_id: 3,
            }],
        );
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "Character Name": "Dandelion",
                "Greetings": [{"greeting": "A song for a coin?"}],
            })
        );
    }
}
