//! Response schemas declared to the model
//!
//! Expressed in the Generative Language API's OpenAPI subset, which uses
//! uppercase type names.

use serde_json::{json, Value};

/// `string[]` of topic titles
pub fn topics_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

pub fn curriculum_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "cp": { "type": "STRING" },
            "tp": { "type": "ARRAY", "items": { "type": "STRING" } },
            "dimensions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "suggestedMeetings": { "type": "INTEGER" },
            "suggestedPedagogy": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["cp", "tp", "dimensions", "suggestedMeetings", "suggestedPedagogy"]
    })
}

fn learning_step_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "type": { "type": "STRING" },
            "steps": { "type": "STRING" }
        },
        "required": ["type", "steps"]
    })
}

pub fn content_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "students": { "type": "STRING" },
            "interdisciplinary": { "type": "STRING" },
            "partnership": { "type": "STRING" },
            "environment": { "type": "STRING" },
            "digitalTools": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "meetings": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "understand": learning_step_schema(),
                        "apply": learning_step_schema(),
                        "reflect": learning_step_schema()
                    },
                    "required": ["understand", "apply", "reflect"]
                }
            },
            "assessments": {
                "type": "OBJECT",
                "properties": {
                    "initial": { "type": "STRING" },
                    "process": { "type": "STRING" },
                    "final": { "type": "STRING" }
                },
                "required": ["initial", "process", "final"]
            },
            "lkpd": { "type": "STRING" },
            "formativeQuestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": {
                            "type": "OBJECT",
                            "properties": {
                                "a": { "type": "STRING" },
                                "b": { "type": "STRING" },
                                "c": { "type": "STRING" },
                                "d": { "type": "STRING" }
                            },
                            "required": ["a", "b", "c", "d"]
                        },
                        "answer": { "type": "STRING" }
                    },
                    "required": ["question", "options", "answer"]
                }
            }
        },
        "required": [
            "students", "interdisciplinary", "partnership", "environment", "digitalTools",
            "summary", "meetings", "assessments", "lkpd", "formativeQuestions"
        ]
    })
}
