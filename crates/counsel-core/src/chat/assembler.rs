//! Conversation assembly.
//!
//! Turns a session's persisted message log into the system instruction and
//! ordered turn list handed to a generation provider. Pure: no I/O, no
//! state between calls.

use counsel_types::chat::{ChatMessage, ServiceType};
use counsel_types::config::ContextConfig;
use counsel_types::llm::{Message, MessageRole, ProviderCapabilities};

use super::instructions;

/// Bounds on the history forwarded to the provider.
///
/// The newest turns are kept; older ones are dropped once either bound is
/// exceeded. A bound of `0` is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    pub max_turns: usize,
    pub max_chars: usize,
}

/// Rough characters-per-token ratio for English prose.
const CHARS_PER_TOKEN: usize = 4;

impl ContextWindow {
    pub fn unbounded() -> Self {
        Self {
            max_turns: 0,
            max_chars: 0,
        }
    }

    /// Tighten `max_chars` so the history plus a full-length reply fits the
    /// provider's context. A tighter configured bound is kept as is.
    pub fn fit_to(self, capabilities: &ProviderCapabilities) -> Self {
        let input_tokens = capabilities
            .max_context_tokens
            .saturating_sub(capabilities.max_output_tokens) as usize;
        if input_tokens == 0 {
            return self;
        }

        let budget = input_tokens.saturating_mul(CHARS_PER_TOKEN);
        let max_chars = match self.max_chars {
            0 => budget,
            configured => configured.min(budget),
        };
        Self { max_chars, ..self }
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        ContextConfig::default().into()
    }
}

impl From<ContextConfig> for ContextWindow {
    fn from(config: ContextConfig) -> Self {
        Self {
            max_turns: config.max_turns,
            max_chars: config.max_chars,
        }
    }
}

/// Provider-ready conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledConversation {
    pub system_instruction: String,
    pub turns: Vec<Message>,
    /// Number of older messages left out by the context window.
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationAssembler {
    window: ContextWindow,
}

impl ConversationAssembler {
    pub fn new(window: ContextWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> ContextWindow {
        self.window
    }

    /// Build the instruction and turn list for `messages`, which must be in
    /// ascending sequence order.
    ///
    /// Within the window, roles and content are copied unchanged and order
    /// is preserved. When older turns are cut, any assistant turns left at
    /// the front are also dropped so the history opens with a user turn.
    /// The newest message is always kept.
    pub fn assemble(
        &self,
        service_type: ServiceType,
        messages: &[ChatMessage],
    ) -> AssembledConversation {
        let keep = self.window_len(messages);
        let mut start = messages.len() - keep;

        if start > 0 {
            while start + 1 < messages.len() && messages[start].role == MessageRole::Assistant {
                start += 1;
            }
        }

        let turns = messages[start..]
            .iter()
            .map(|m| Message {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();

        AssembledConversation {
            system_instruction: instructions::system_instruction(service_type),
            turns,
            dropped: start,
        }
    }

    /// How many of the newest messages fit inside the window (at least one
    /// when any exist).
    fn window_len(&self, messages: &[ChatMessage]) -> usize {
        let mut kept = 0;
        let mut chars = 0;

        for message in messages.iter().rev() {
            let len = message.content.chars().count();
            let over_turns = self.window.max_turns > 0 && kept >= self.window.max_turns;
            let over_chars = self.window.max_chars > 0 && chars + len > self.window.max_chars;
            if kept > 0 && (over_turns || over_chars) {
                break;
            }
            kept += 1;
            chars += len;
        }

        kept
    }
}
