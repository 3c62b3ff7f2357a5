//! Canned starter prompts offered on an empty conversation.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QuickAction {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        key: "career_assessment",
        title: "Career Assessment",
        description: "Evaluate your current career position",
        prompt: "I'd like a comprehensive career assessment. Please help me evaluate my \
current position, strengths, areas for improvement, and potential career paths. I want to \
understand where I stand professionally and what opportunities might be available to me.",
    },
    QuickAction {
        key: "linkedin_optimization",
        title: "LinkedIn Optimization",
        description: "Enhance your professional profile",
        prompt: "I need help optimizing my LinkedIn profile to attract better opportunities. \
Please guide me on: profile headline optimization, summary writing, experience descriptions, \
skills section, recommendations strategy, and networking approaches to increase my \
professional visibility.",
    },
    QuickAction {
        key: "networking_strategy",
        title: "Networking Strategy",
        description: "Build professional connections",
        prompt: "I want to develop an effective networking strategy to advance my career. \
Please help me with: identifying key contacts, networking event strategies, online networking \
approaches, relationship building techniques, and how to leverage my network for career \
opportunities.",
    },
    QuickAction {
        key: "career_pivot",
        title: "Career Pivot",
        description: "Transition to a new field",
        prompt: "I'm considering a career pivot and need strategic guidance. Please help me \
with: assessing transferable skills, identifying target industries/roles, creating a \
transition timeline, addressing potential challenges, and developing a plan to successfully \
change career paths.",
    },
];

pub fn find(key: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|a| a.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_types::chat::MAX_MESSAGE_CHARS;

    #[test]
    fn test_quick_action_prompts_fit_message_limit() {
        for action in QUICK_ACTIONS {
            let len = action.prompt.chars().count();
            assert!(len > 0 && len <= MAX_MESSAGE_CHARS, "{} is {len} chars", action.key);
        }
    }

    #[test]
    fn test_find_quick_action() {
        assert_eq!(find("career_pivot").map(|a| a.title), Some("Career Pivot"));
        assert!(find("unknown").is_none());
    }
}
