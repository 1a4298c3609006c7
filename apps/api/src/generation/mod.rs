// SoW generation: prompt composition, the end-to-end pipeline, and its HTTP handlers.
// All LLM calls go through llm_client; no direct API calls here.

pub mod composer;
pub mod generator;
pub mod handlers;
pub mod prompts;
