use super::Config;

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Environment overrides; the `CHATBRIDGE_*` name wins over the plain one.
    pub(super) fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = non_empty(&lookup, &["CHATBRIDGE_API_KEY", "OPENAI_API_KEY"]) {
            self.llm.api_key = Some(key);
        }

        if let Some(url) = non_empty(&lookup, &["CHATBRIDGE_BASE_URL", "OPENAI_BASE_URL"]) {
            self.llm.base_url = url;
        }

        if let Some(model) = non_empty(&lookup, &["CHATBRIDGE_MODEL"]) {
            self.llm.model = model;
        }

        if let Some(temp_str) = non_empty(&lookup, &["CHATBRIDGE_TEMPERATURE"])
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.llm.temperature = temp;
        }

        if let Some(sid) = non_empty(&lookup, &["TWILIO_ACCOUNT_SID"]) {
            self.twilio.account_sid = Some(sid);
        }

        if let Some(token) = non_empty(&lookup, &["TWILIO_AUTH_TOKEN"]) {
            self.twilio.auth_token = Some(token);
        }

        if let Some(number) = non_empty(&lookup, &["TWILIO_WHATSAPP_NUMBER"]) {
            self.twilio.whatsapp_number = Some(number);
        }

        if let Some(port_str) = non_empty(&lookup, &["CHATBRIDGE_GATEWAY_PORT", "PORT"])
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(host) = non_empty(&lookup, &["CHATBRIDGE_GATEWAY_HOST", "HOST"]) {
            self.gateway.host = host;
        }

        if let Some(timeout_str) = non_empty(&lookup, &["CHATBRIDGE_REPLY_TIMEOUT_MS"])
            && let Ok(timeout_ms) = timeout_str.parse::<u64>()
        {
            self.bridge.reply_timeout_ms = timeout_ms;
        }

        if let Some(level) = non_empty(&lookup, &["CHATBRIDGE_LOG_LEVEL"]) {
            self.observability.log_level = level;
        }
    }
}
