//! Context builder for assembling the system prompt

use maya_core::utils::clock_greeting;

/// Builds the system prompt for completion requests
pub struct ContextBuilder {
    persona: String,
}

impl ContextBuilder {
    /// Create a context builder with the configured persona text
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
        }
    }

    /// Assemble the full system prompt: persona plus the current time,
    /// so the model can answer date and time questions directly.
    pub fn build_system_prompt(&self) -> String {
        format!("{}\n\n{}", self.persona.trim_end(), clock_greeting())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_persona_and_time() {
        let builder = ContextBuilder::new("You are a test assistant.");
        let prompt = builder.build_system_prompt();
        assert!(prompt.starts_with("You are a test assistant."));
        assert!(prompt.contains("It's "));
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let builder = ContextBuilder::new("Persona.\n\n");
        let prompt = builder.build_system_prompt();
        assert!(prompt.starts_with("Persona.\n\nIt's "));
    }
}
