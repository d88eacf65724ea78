use serde::{Deserialize, Serialize};

/// Messaging-gateway credentials. Replies travel back in the webhook response
/// body, so these are only checked and reported at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Sending number, e.g. `whatsapp:+14155238886`
    #[serde(default)]
    pub whatsapp_number: Option<String>,
}

impl TwilioConfig {
    pub fn is_configured(&self) -> bool {
        [&self.account_sid, &self.auth_token, &self.whatsapp_number]
            .iter()
            .all(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Last four characters behind a mask, for startup output.
    pub fn masked(secret: Option<&str>) -> String {
        match secret.map(str::trim).filter(|v| !v.is_empty()) {
            None => "(unset)".into(),
            Some(value) => {
                let chars: Vec<char> = value.chars().collect();
                if chars.len() <= 8 {
                    "***".into()
                } else {
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("***{tail}")
                }
            }
        }
    }

    /// Names of the credentials that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("account_sid", &self.account_sid),
            ("auth_token", &self.auth_token),
            ("whatsapp_number", &self.whatsapp_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}
