//! Prompt text sent to the reasoning service.

/// Shown as a `thinking` event when the iteration ceiling is hit.
pub const FORCED_SYNTHESIS_NOTICE: &str =
    "Maximum iterations reached. Synthesizing final answer from gathered information.";

/// Appended to the transcript before the forced answer call.
pub const FORCED_SYNTHESIS_REQUEST: &str =
    "Please provide a final answer based on all the information gathered.";

/// System prompt for the think-act-observe loop.
pub fn exploration_system_prompt(tools_description: &str) -> String {
    format!(
        r#"You are an intelligent codebase exploration agent. You help users understand and work with a codebase by using tools to search and explore indexed types.

You have access to the following tools:

{tools_description}

When answering a question, follow this process:
1. THINK: Analyze what information you need
2. ACT: Use a tool to gather information (or provide final answer if you have enough)
3. OBSERVE: Review the tool results
4. Repeat until you can answer confidently

Your response should follow this format:

THINKING: [Your reasoning about what to do next]

ACTION: [One of the following]
- TOOL: tool_name(arg1="value1", arg2="value2")
- ANSWER: [Your final answer to the user]

Important guidelines:
- Start broad (search_types) then narrow down (get_type_details)
- Use tags to filter by category (database, api, service, etc.)
- When you find relevant types, get their full details
- Provide code examples in your final answer
- Be concise but thorough
- If you can't find something after 2-3 searches, explain what you found

Always format your response as:
THINKING: ...
ACTION: TOOL: ... OR ACTION: ANSWER: ..."#
    )
}

/// First user message of a run.
pub fn question(query: &str) -> String {
    format!("Question: {query}")
}

/// Sent back after a response whose action could not be parsed.
pub fn parse_correction(error: &str) -> String {
    format!(
        "Your last response could not be parsed ({error}). Reply with THINKING: followed by exactly one line \
         of the form ACTION: TOOL: tool_name(arg=\"value\") or ACTION: ANSWER: your answer."
    )
}

/// Tool output fed back into the transcript.
pub fn observation(envelope: &serde_json::Value) -> String {
    format!("OBSERVATION: {envelope}")
}

/// Asks for a comma-separated keyword list.
pub fn keyword_extraction(query: &str) -> String {
    format!(
        r#"Extract search keywords from this question for searching a codebase.
Return ONLY a comma-separated list of keywords.
Include:
- Main concepts (e.g., "user", "authentication", "database")
- Technical terms (e.g., "API", "REST", "query")
- Action words (e.g., "create", "send", "validate")
- Related terms (e.g., for "login" include "auth", "authenticate", "credentials")

Question: "{query}"

Keywords:"#
    )
}

/// System prompt for a one-shot answer grounded in rendered context.
pub fn answer_system_prompt(context: &str) -> String {
    format!(
        r#"You are a helpful AI assistant that answers questions about a codebase.

You have been provided with relevant types and methods from the indexed codebase.
Use this information to provide accurate, specific answers with code examples when appropriate.

Context:
{context}

Answer the question directly and concisely. If the answer involves using specific classes or methods,
show how to use them with code examples. If you're not sure, say so."#
    )
}
