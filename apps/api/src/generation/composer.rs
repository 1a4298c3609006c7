//! Prompt Composer: merges extracted text, the user's description and the
//! collected clauses into one `GenerationRequest`.
//!
//! Pure and deterministic: identical inputs yield byte-identical prompts.

use crate::generation::prompts::{
    CLAUSE_DELIMITER, NO_EXAMPLES, SOW_PROMPT_TEMPLATE, SOW_SECTIONS,
};
use crate::llm_client::prompts::CONTRACT_LAWYER_SYSTEM;
use crate::models::sow::{ExampleClause, ExtractedText, GenerationRequest};

const FENCE_CHAR: char = '~';
const MIN_FENCE_LEN: usize = 3;

/// Composes the two-message request for the model.
pub fn compose(
    extracted: &ExtractedText,
    user_description: &str,
    clauses: &[ExampleClause],
) -> GenerationRequest {
    let examples = examples_block(clauses);
    let fence = fence_for(&[user_description, extracted.as_str(), &examples]);
    let structure = structure_block();

    let prompt = render_template(
        SOW_PROMPT_TEMPLATE,
        &[
            ("fence", &fence),
            ("user_description", user_description),
            ("base_text", extracted.as_str()),
            ("examples", &examples),
            ("structure", &structure),
        ],
    );

    GenerationRequest {
        system: CONTRACT_LAWYER_SYSTEM.to_string(),
        prompt,
    }
}

/// Clause texts joined by `\n---\n`, or `None included` when there are none.
pub fn examples_block(clauses: &[ExampleClause]) -> String {
    if clauses.is_empty() {
        return NO_EXAMPLES.to_string();
    }
    clauses
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CLAUSE_DELIMITER)
}

/// One `N. Name – guidance` line per required section.
pub fn structure_block() -> String {
    SOW_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, (name, guidance))| format!("{}. {} – {}", i + 1, name, guidance))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A run of `~` strictly longer than any run inside `blocks`, so embedded
/// content can never reproduce the fence line.
fn fence_for(blocks: &[&str]) -> String {
    let longest = blocks
        .iter()
        .map(|b| longest_run(b, FENCE_CHAR))
        .max()
        .unwrap_or(0);
    FENCE_CHAR
        .to_string()
        .repeat(MIN_FENCE_LEN.max(longest + 1))
}

fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Substitutes `{name}` placeholders in one left-to-right pass over the
/// template. Values are copied verbatim and never rescanned. Unknown
/// placeholders are left in place.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
