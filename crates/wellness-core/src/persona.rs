use anyhow::{Context, Result};
use std::path::Path;

pub const DEFAULT_PERSONA_NAME: &str = "Wellness AI";

#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub system_prompt: String,
}

impl Persona {
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            system_prompt: default_system_prompt(name),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::builtin(DEFAULT_PERSONA_NAME)
    }
}

pub fn default_system_prompt(name: &str) -> String {
    format!(
        r#"You are a compassionate mental wellness companion named "{name}". Your role is to:

- Provide emotional support through active listening and validation
- Suggest evidence-based coping strategies (deep breathing, journaling, exercise, mindfulness)
- Encourage healthy habits and self-care
- Be warm, empathetic, and non-judgmental

CRITICAL RULES:
- NEVER diagnose mental health conditions or physical illnesses
- NEVER prescribe medications or treatments
- NEVER claim to replace professional mental health care
- ALWAYS encourage users to seek professional help for serious concerns
- If user mentions self-harm, suicide, or crisis, immediately acknowledge their pain and strongly encourage them to contact crisis resources

Remember: You're a supportive companion, not a therapist. Keep responses concise (2-4 sentences) and caring."#
    )
}

/// Load persona from the prompts directory.
/// Reads `prompts/system.md` when present, otherwise uses the built-in prompt.
pub fn load_persona(prompts_root: &Path, name: &str) -> Result<Persona> {
    let path = prompts_root.join("system.md");
    let system_prompt = read_optional_md(&path)
        .with_context(|| format!("loading system prompt from {}", path.display()))?
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    match system_prompt {
        Some(system_prompt) => {
            tracing::info!("Using system prompt override from {}", path.display());
            Ok(Persona {
                name: name.to_string(),
                system_prompt,
            })
        }
        None => Ok(Persona::builtin(name)),
    }
}

fn read_optional_md(path: &Path) -> Result<Option<String>> {
    if path.exists() {
        Ok(Some(std::fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}
