use super::Config;
use crate::error::ConfigError;

fn check_range(
    name: &str,
    value: f64,
    range: std::ops::RangeInclusive<f64>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{name} must be within {}..={}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;
        check_range("llm.temperature", llm.temperature, 0.0..=2.0)?;
        check_range("llm.top_p", llm.top_p, 0.0..=1.0)?;
        check_range("llm.frequency_penalty", llm.frequency_penalty, -2.0..=2.0)?;
        check_range("llm.presence_penalty", llm.presence_penalty, -2.0..=2.0)?;

        if llm.max_tokens == 0 {
            return Err(ConfigError::Validation("llm.max_tokens must be > 0".into()));
        }
        if llm.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("llm.base_url is empty".into()));
        }
        if llm.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Validation(format!(
                "llm.timezone is not an IANA zone: {}",
                llm.timezone
            )));
        }
        if self.bridge.reply_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "bridge.reply_timeout_ms must be > 0".into(),
            ));
        }
        if self.session.idle_ttl_secs > 0 && self.session.sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "session.sweep_interval_secs must be > 0 when idle_ttl_secs is set".into(),
            ));
        }
        Ok(())
    }
}
