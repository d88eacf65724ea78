use crate::providers::ProviderMessage;
use crate::session::Turn;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Order-support assistant: detect intent, then track an order, start a
/// return, or answer a product question.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an Order Support Assistant for a small e-commerce shop. \
Your job is to detect the user's intent and complete ONE task:
1) Track an order, 2) Start a return, or 3) Answer basic product questions.

- If tracking: ask for order number and email/phone to verify.
- If return: ask for order number, item, reason (brief), and email/phone.
- If product: answer briefly; if specs/policies are missing, say you will forward the question to a human.

Rules:
- Be concise and friendly.
- Ask only for the next required field; do not dump long lists.
- Confirm the captured fields back to the user.
- If the user switches intent mid-chat, confirm the new intent.
- Always include a short next step.
";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds the message list for one generation call.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system_prompt: String,
    timezone: Tz,
}

impl PromptTemplate {
    pub fn new(system_prompt: impl Into<String>, timezone: Tz) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            timezone,
        }
    }

    /// `timezone` must be an IANA name, e.g. `America/Mexico_City`.
    pub fn from_config(system_prompt: &str, timezone: &str) -> anyhow::Result<Self> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone {timezone}: {e}"))?;
        Ok(Self::new(system_prompt, timezone))
    }

    /// Local wall-clock time in the configured zone.
    pub fn format_now(&self, now: DateTime<Utc>) -> String {
        now.with_timezone(&self.timezone)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    /// System prompt, time grounding, history in replay order, then the new message.
    pub fn render(
        &self,
        history: &[Turn],
        user_text: &str,
        now: DateTime<Utc>,
    ) -> Vec<ProviderMessage> {
        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(ProviderMessage::system(self.system_prompt.clone()));
        messages.push(ProviderMessage::system(format!(
            "Current date/time: {}. Output language must match the user's input language.",
            self.format_now(now)
        )));
        messages.extend(history.iter().map(Turn::to_provider_message));
        messages.push(ProviderMessage::user(user_text));
        messages
    }
}
