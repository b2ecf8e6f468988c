//! Prompt composition: one fixed instruction block, the knowledge document, and the
//! user's question, folded into a single prompt string. Pure and deterministic.
//!
//! User text is interpolated as-is. A message crafted to break out of the template
//! (e.g. fake `---` fences or counter-instructions) will reach the model unchanged;
//! that risk is accepted here rather than patched with sanitization.

/// Canned refusal the instructions tell the model to use when the document has no answer.
pub const REFUSAL_TEXT: &str = "The handover notes do not cover that. For anything else, \
please contact the engineer on duty directly.";

/// Behavioral rules sent ahead of the reference document on every request.
const INSTRUCTIONS: &str = "\
You are a courteous duty-handover assistant. You answer questions from colleagues \
and managers on behalf of an engineer who is away, using only the handover notes below.
Follow these rules strictly:
1. Answer only from the provided notes. Never invent information or pull it from outside sources.
2. If the notes do not cover the question, or the question is unrelated to the handover, reply exactly: \
\"The handover notes do not cover that. For anything else, please contact the engineer on duty directly.\"
3. Keep answers short and specific.
4. Use a friendly, polite tone.
5. Answer only the part that was asked. Do not dump unrelated sections of the notes.";

/// Build the full prompt for one user message.
pub fn compose(knowledge: &str, user_message: &str) -> String {
    format!(
        "{INSTRUCTIONS}\n\n---\nHandover notes:\n{knowledge}\n---\n\nNow answer the following question using the notes above.\nUser question: \"{user_message}\"\n"
    )
}
