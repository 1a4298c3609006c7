// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file holds the cross-cutting persona.

/// System message sent with every generation.
pub const CONTRACT_LAWYER_SYSTEM: &str = "You are a contract lawyer.";
