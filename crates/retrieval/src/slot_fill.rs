//! `{{slot}}` placeholder validation and filling (spec §4.7, §4.9, S3).

use std::collections::HashMap;

use crate::error::RetrievalError;

/// Rejects content with an unclosed `{{...}}` placeholder. Called at
/// ingestion time so a malformed template never reaches the template store.
pub fn validate_placeholders(template_id: &str, content: &str) -> Result<(), RetrievalError> {
    let mut depth = 0i32;
    let mut chars = content.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c == '{' && matches!(chars.peek(), Some((_, '{'))) {
            chars.next();
            depth += 1;
        } else if c == '}' && matches!(chars.peek(), Some((_, '}'))) {
            chars.next();
            depth -= 1;
            if depth < 0 {
                return Err(RetrievalError::MalformedTemplate {
                    template_id: template_id.to_string(),
                });
            }
        }
    }
    if depth != 0 {
        return Err(RetrievalError::MalformedTemplate {
            template_id: template_id.to_string(),
        });
    }
    Ok(())
}

/// Replaces every `{{slot}}` occurrence with its value from `context`. Fails
/// with `UnfilledSlot` naming the first placeholder left unresolved.
pub fn fill_slots(content: &str, context: &HashMap<String, String>) -> Result<String, RetrievalError> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .expect("validate_placeholders rejects unclosed braces before this runs");
        let slot_name = after_open[..end].trim();
        match context.get(slot_name) {
            Some(value) => result.push_str(value),
            None => return Err(RetrievalError::UnfilledSlot(slot_name.to_string())),
        }
        rest = &after_open[end + 2..];
    }
    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unclosed_placeholder() {
        assert!(validate_placeholders("t1", "hello {{name").is_err());
    }

    #[test]
    fn accepts_well_formed_placeholders() {
        assert!(validate_placeholders("t1", "hello {{name}}, bye {{farewell}}").is_ok());
    }

    #[test]
    fn fills_all_slots_from_context() {
        let mut ctx = HashMap::new();
        ctx.insert("user_title".to_string(), "Renowned Adventurer".to_string());
        ctx.insert("npc_name".to_string(), "Theron".to_string());
        ctx.insert("npc_role".to_string(), "merchant".to_string());

        let out = fill_slots(
            "Good day, {{user_title}}. I am {{npc_name}}, {{npc_role}}.",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "Good day, Renowned Adventurer. I am Theron, merchant.");
    }

    #[test]
    fn missing_slot_fails_with_unfilled_slot() {
        let ctx = HashMap::new();
        let err = fill_slots("hi {{name}}", &ctx).unwrap_err();
        assert_eq!(err, RetrievalError::UnfilledSlot("name".to_string()));
    }
}
