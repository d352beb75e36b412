//! Prompt Templates

use crate::topics::AdviceTopic;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rendered prompt for an assistant model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub topic: AdviceTopic,
    pub text: String,
}

/// Topic template: assistant role, answer tone, points to cover
struct Template {
    role: &'static str,
    tone: &'static str,
    include: &'static [&'static str],
}

fn template(topic: AdviceTopic) -> Template {
    match topic {
        AdviceTopic::Insurance => Template {
            role: "providing {platform} driver insurance information",
            tone: "clearly and accurately",
            include: &[
                "What is typically covered by {platform} driver insurance",
                "Steps to file a claim",
                "Contact information or where to find more help",
            ],
        },
        AdviceTopic::Fatigue => Template {
            role: "giving fatigue prevention tips to drivers",
            tone: "clearly and compassionately",
            include: &[
                "Signs of fatigue while driving",
                "What to do immediately if tired",
                "Preventive strategies for future trips",
            ],
        },
        AdviceTopic::Finance => Template {
            role: "offering financial advice to {platform} drivers",
            tone: "clearly and practically",
            include: &[
                "Practical steps to save money from daily earnings",
                "Budgeting tips for gig workers",
                "Recommended tools or apps (optional)",
            ],
        },
        AdviceTopic::Weather => Template {
            role: "giving weather-related driving advice to {platform} drivers",
            tone: "clearly and safely",
            include: &[
                "Safety tips for driving in bad weather",
                "When to consider stopping work",
                "How to stay visible and safe",
            ],
        },
        AdviceTopic::Traffic => Template {
            role: "giving traffic management advice to {platform} drivers",
            tone: "clearly",
            include: &[
                "Tips for navigating heavy traffic",
                "Best times to avoid peak congestion",
                "Apps or tools to monitor real-time traffic",
            ],
        },
        AdviceTopic::Health => Template {
            role: "giving health & wellness advice to {platform} drivers",
            tone: "clearly and empathetically",
            include: &[
                "General guidance for staying healthy as a driver",
                "What to do if feeling unwell while working",
                "Resources available through {platform} or local services",
            ],
        },
        AdviceTopic::Documents => Template {
            role: "guiding drivers on document requirements and renewals",
            tone: "clearly",
            include: &[
                "Required documents for ride-hailing drivers",
                "Where and how to renew expired licenses",
                "What to do if documents are lost or stolen",
            ],
        },
        AdviceTopic::Maintenance => Template {
            role: "giving motorcycle maintenance tips to {platform} drivers",
            tone: "clearly",
            include: &[
                "Basic maintenance schedule",
                "Signs that something might be wrong",
                "Where to get reliable service",
            ],
        },
        AdviceTopic::General => Template {
            role: "supporting {platform} drivers with welfare and safety information",
            tone: "politely and usefully",
            include: &[],
        },
    }
}

/// Prompt renderer for one ride-hailing platform
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    platform: String,
}

impl PromptBuilder {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    /// Classify the question and render its topic's prompt
    pub fn build(&self, query: &str) -> Prompt {
        let topic = AdviceTopic::classify(query);
        debug!("Routed question to topic {}", topic.as_str());
        Prompt {
            topic,
            text: self.render(topic, query.trim()),
        }
    }

    /// Render a specific topic's prompt
    pub fn render(&self, topic: AdviceTopic, query: &str) -> String {
        let t = template(topic);
        let fill = |s: &str| s.replace("{platform}", &self.platform);

        let mut text = format!(
            "You are a helpful assistant {}.\nAnswer the following question {}:\nQuestion: {}\n\n",
            fill(t.role),
            t.tone,
            query
        );
        if t.include.is_empty() {
            text.push_str("Try to provide actionable advice, even if it's general.");
        } else {
            text.push_str("Include:");
            for &item in t.include {
                text.push_str("\n- ");
                text.push_str(&fill(item));
            }
        }
        text
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("Gojek")
    }
}

/// Build a prompt with the default platform
pub fn build_prompt(query: &str) -> Prompt {
    PromptBuilder::default().build(query)
}
