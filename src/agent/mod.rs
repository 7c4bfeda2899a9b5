//! Agent module - the tool-calling agent loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Restore the thread history and append the user prompt
//! 2. Call the LLM with the system prompt and available tools
//! 3. If the LLM requests tool calls, execute them and feed the results back
//! 4. Repeat until the LLM produces a final response or max iterations is reached
//! 5. Optionally ask for a structured response, then checkpoint the thread

mod agent_loop;
mod prompt;
mod types;

pub use agent_loop::Agent;
pub use prompt::build_system_prompt;
pub use types::{AgentError, AgentRun, LogEntryType, RunConfig, RunLogEntry};
