//! System prompt templates for the agent.

/// Build the system prompt, addressing the user by name.
pub fn build_system_prompt(user_name: &str) -> String {
    format!(
        "You are a helpful assistant. Address the user as {user_name}.",
        user_name = user_name
    )
}
