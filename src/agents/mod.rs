//! Prompt-templated code agents
//!
//! Four agents wrap the active file's content in an instruction template and
//! run one non-interactive completion: explain, refactor, tests, plan.

use crate::core::LlmError;
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest, ProviderRegistry};

/// Agent error
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("No code in the active file to analyze")]
    EmptyFile,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// The available agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Explain,
    Refactor,
    Tests,
    Plan,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Explain,
        AgentKind::Refactor,
        AgentKind::Tests,
        AgentKind::Plan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Explain => "explain",
            AgentKind::Refactor => "refactor",
            AgentKind::Tests => "tests",
            AgentKind::Plan => "plan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explain" => Some(AgentKind::Explain),
            "refactor" => Some(AgentKind::Refactor),
            "tests" => Some(AgentKind::Tests),
            "plan" => Some(AgentKind::Plan),
            _ => None,
        }
    }

    /// Instruction prompt wrapping the given code
    pub fn prompt(&self, code: &str) -> String {
        let instruction = match self {
            AgentKind::Explain => {
                "You are a code explanation expert. Analyze the following code and provide \
                 a clear, comprehensive explanation of what it does, how it works, and any \
                 notable patterns or techniques used."
            }
            AgentKind::Refactor => {
                "You are a code refactoring expert. Review the following code and suggest \
                 improvements for readability, performance, maintainability, and best \
                 practices. Provide the refactored code with explanations."
            }
            AgentKind::Tests => {
                "You are a test generation expert. Write comprehensive unit tests for the \
                 following code. Include edge cases, error handling, and use appropriate \
                 testing frameworks."
            }
            AgentKind::Plan => {
                "You are a software architect. Based on the following code or requirements, \
                 create a detailed implementation plan with clear steps, architecture \
                 decisions, and recommendations."
            }
        };
        format!("{}\n\n```\n{}\n```", instruction, code)
    }
}

/// Run an agent over a piece of code, non-streaming
///
/// An empty (or whitespace-only) input is rejected before any request is made.
pub fn run_agent(
    kind: AgentKind,
    code: &str,
    client: &CompletionClient,
    registry: &ProviderRegistry,
    provider_id: &str,
    model: &str,
    api_key: &str,
) -> Result<String, AgentError> {
    if code.trim().is_empty() {
        return Err(AgentError::EmptyFile);
    }

    let request = CompletionRequest {
        provider_id: provider_id.to_string(),
        model: model.to_string(),
        api_key: api_key.to_string(),
        messages: vec![ChatMessage::user(kind.prompt(code))],
    };
    tracing::debug!(agent = kind.name(), provider = provider_id, "running agent");
    Ok(client.complete(registry, &request, None)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_agent_names() {
        assert_eq!(AgentKind::parse("explain"), Some(AgentKind::Explain));
        assert_eq!(AgentKind::parse(" Tests "), Some(AgentKind::Tests));
        assert_eq!(AgentKind::parse("REFACTOR"), Some(AgentKind::Refactor));
        assert_eq!(AgentKind::parse("deploy"), None);
    }

    #[test]
    fn test_prompt_wraps_code_in_fence() {
        let prompt = AgentKind::Plan.prompt("fn main() {}");
        assert!(prompt.starts_with("You are a software architect."));
        assert!(prompt.contains("```\nfn main() {}\n```"));
    }

    #[test]
    fn test_every_agent_has_distinct_prompt() {
        let prompts: Vec<String> = AgentKind::ALL.iter().map(|a| a.prompt("x")).collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_empty_code_rejected_without_request() {
        let client = CompletionClient::new();
        let registry = ProviderRegistry::new();
        let result = run_agent(
            AgentKind::Explain,
            "   \n",
            &client,
            &registry,
            "openai",
            "gpt-4o",
            "sk-test",
        );
        assert!(matches!(result, Err(AgentError::EmptyFile)));
    }
}
