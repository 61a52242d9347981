//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when template files are not found.

/// System prompt for idea generation
pub const IDEAS_SYSTEM: &str = r#"You are a content strategist who writes short, actionable content-creation ideas.
You answer with the ideas only: one idea per line, no numbering, no bullets, no headings, and no commentary before or after the list."#;

/// User prompt for idea generation
pub const IDEAS_USER: &str = r#"Topic: {{topic}}
Number of ideas: {{count}}
Style: {{style}}
Tone: {{tone}}

Write exactly {{count}} distinct content ideas about "{{topic}}" in the {{style}} style with a {{tone}} tone.
Format: {{format_hint}}.
Return one idea per line. Do not number the ideas, do not use bullets, and do not add any introduction or commentary.
Each idea should be concise (preferably under 140 characters), actionable, and unique."#;

/// Get an embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "ideas-system" => Some(IDEAS_SYSTEM),
        "ideas-user" => Some(IDEAS_USER),
        _ => None,
    }
}
