use serde_json::{json, Map, Value};

/// Response schema for the analysis phase, in the Gemini `responseSchema` dialect.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hookStrategy": {
                "type": "STRING",
                "description": "The specific technique used in the first 15 seconds to grab attention."
            },
            "retentionTechniques": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 3-4 methods used to keep viewers watching."
            },
            "emotionalArc": {
                "type": "STRING",
                "description": "How the energy or emotion shifts throughout the video."
            },
            "pacingStructure": {
                "type": "STRING",
                "description": "Description of the editing speed and structural rhythm."
            },
            "callToActionType": {
                "type": "STRING",
                "description": "How and when the creator asks for engagement."
            },
            "suggestedTopics": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "5 creative and viral-worthy new topics that fit this video structure. Output in Korean."
            }
        },
        "required": [
            "hookStrategy",
            "retentionTechniques",
            "emotionalArc",
            "pacingStructure",
            "callToActionType",
            "suggestedTopics"
        ]
    })
}

/// Response schema for the script phase, in the Gemini `responseSchema` dialect.
pub fn script_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A click-worthy title for the new video."
            },
            "thumbnailIdea": {
                "type": "STRING",
                "description": "A concept for the thumbnail."
            },
            "sections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "heading": { "type": "STRING", "description": "Section header." },
                        "visualCue": { "type": "STRING", "description": "Detailed visual instructions." },
                        "audioScript": { "type": "STRING", "description": "The spoken words." }
                    },
                    "required": ["heading", "visualCue", "audioScript"]
                }
            }
        },
        "required": ["title", "thumbnailIdea", "sections"]
    })
}

/// Converts a Gemini-dialect schema into strict JSON Schema: lowercase type
/// names and closed objects.
pub fn to_json_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len() + 1);
            for (key, value) in map {
                let converted = match (key.as_str(), value) {
                    ("type", Value::String(kind)) => Value::String(kind.to_lowercase()),
                    _ => to_json_schema(value),
                };
                out.insert(key.clone(), converted);
            }
            if out.get("type").and_then(Value::as_str) == Some("object") {
                out.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_json_schema).collect()),
        other => other.clone(),
    }
}
