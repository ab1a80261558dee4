//! Server settings, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use debrief_gemini::client::GeminiConfig;
use debrief_pipeline::{PipelineConfig, SweepErrorPolicy};
use eyre::{WrapErr, bail, eyre};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_WORKBOOK: &str = "debrief-workbook.json";
pub const DEFAULT_OUTBOX_DIR: &str = "outbox";
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);
/// Timeout for calls to the mail relay.
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub enum MailSettings {
    Outbox { dir: PathBuf },
    Relay { url: String, token: Option<String> },
    Disabled,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailSettings::Outbox { dir } => f.debug_struct("Outbox").field("dir", dir).finish(),
            MailSettings::Relay { url, token } => f
                .debug_struct("Relay")
                .field("url", url)
                .field("token", &token.as_ref().map(|_| "<redacted>"))
                .finish(),
            MailSettings::Disabled => f.write_str("Disabled"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub workbook_path: PathBuf,
    pub gemini: GeminiConfig,
    pub pipeline: PipelineConfig,
    pub mail: MailSettings,
    /// `None` disables the periodic sweep.
    pub sweep_interval: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_or(
            &get,
            "DEBRIEF_BIND_ADDR",
            DEFAULT_BIND_ADDR.parse::<SocketAddr>()?,
        )?;
        let workbook_path = get("DEBRIEF_WORKBOOK")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK));

        let mut gemini = GeminiConfig::default();
        if let Some(url) = get("GEMINI_BASE_URL") {
            gemini.base_url = url;
        }
        if let Some(model) = get("GEMINI_MODEL") {
            gemini.model = model;
        }
        gemini.temperature = parse_or(&get, "GEMINI_TEMPERATURE", gemini.temperature)?;
        if !(0.0..=2.0).contains(&gemini.temperature) {
            bail!("GEMINI_TEMPERATURE must be between 0 and 2");
        }
        gemini.timeout = Duration::from_secs(parse_or(
            &get,
            "GEMINI_TIMEOUT_SECS",
            gemini.timeout.as_secs(),
        )?);
        gemini.api_key = get("GEMINI_API_KEY");

        let mut pipeline = PipelineConfig::default();
        if let Some(name) = get("DEBRIEF_RESPONSES_TABLE") {
            pipeline.tables.responses = name;
        }
        if let Some(name) = get("DEBRIEF_RUBRIC_TABLE") {
            pipeline.tables.rubric = name;
        }
        if let Some(name) = get("DEBRIEF_CASES_TABLE") {
            pipeline.tables.cases = name;
        }
        if let Some(prefix) = get("DEBRIEF_EMAIL_SUBJECT_PREFIX") {
            pipeline.email_subject_prefix = prefix;
        }
        pipeline.email_from = get("DEBRIEF_MAIL_FROM");
        pipeline.sweep_delay = Duration::from_millis(parse_or(
            &get,
            "DEBRIEF_SWEEP_DELAY_MS",
            pipeline.sweep_delay.as_millis() as u64,
        )?);
        pipeline.sweep_error_policy = match get("DEBRIEF_SWEEP_ON_ERROR") {
            Some(v) => v
                .parse::<SweepErrorPolicy>()
                .map_err(|e| eyre!("DEBRIEF_SWEEP_ON_ERROR: {e}"))?,
            None => SweepErrorPolicy::default(),
        };
        pipeline.max_model_attempts =
            parse_or(&get, "GEMINI_MAX_ATTEMPTS", pipeline.max_model_attempts)?;
        if pipeline.max_model_attempts == 0 {
            bail!("GEMINI_MAX_ATTEMPTS must be at least 1");
        }

        let mail = match get("DEBRIEF_MAIL_MODE").as_deref() {
            None | Some("outbox") => MailSettings::Outbox {
                dir: get("DEBRIEF_OUTBOX_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTBOX_DIR)),
            },
            Some("relay") => MailSettings::Relay {
                url: get("DEBRIEF_MAIL_RELAY_URL")
                    .ok_or_else(|| eyre!("DEBRIEF_MAIL_RELAY_URL is required in relay mode"))?,
                token: get("DEBRIEF_MAIL_RELAY_TOKEN"),
            },
            Some("disabled") => MailSettings::Disabled,
            Some(other) => bail!(
                "DEBRIEF_MAIL_MODE must be outbox, relay or disabled (got {other:?})"
            ),
        };

        let interval_secs: u64 = parse_or(
            &get,
            "DEBRIEF_SWEEP_INTERVAL_SECS",
            DEFAULT_SWEEP_INTERVAL.as_secs(),
        )?;
        let sweep_interval = (interval_secs > 0).then(|| Duration::from_secs(interval_secs));

        Ok(Self {
            bind_addr,
            workbook_path,
            gemini,
            pipeline,
            mail,
            sweep_interval,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .wrap_err_with(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> eyre::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(s.workbook_path, PathBuf::from(DEFAULT_WORKBOOK));
        assert_eq!(s.pipeline.tables.responses, "documentationResponses");
        assert_eq!(s.pipeline.sweep_delay, Duration::from_millis(400));
        assert_eq!(s.pipeline.sweep_error_policy, SweepErrorPolicy::Abort);
        assert_eq!(s.sweep_interval, Some(DEFAULT_SWEEP_INTERVAL));
        assert!(s.gemini.api_key.is_none());
        assert!(matches!(s.mail, MailSettings::Outbox { .. }));
    }

    #[test]
    fn overrides_are_read() {
        let s = settings(&[
            ("DEBRIEF_RUBRIC_TABLE", "rubric v2"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_TIMEOUT_SECS", "15"),
            ("DEBRIEF_SWEEP_INTERVAL_SECS", "0"),
            ("DEBRIEF_SWEEP_ON_ERROR", "continue"),
            ("DEBRIEF_MAIL_MODE", "relay"),
            ("DEBRIEF_MAIL_RELAY_URL", "http://relay.local/send"),
            ("DEBRIEF_MAIL_RELAY_TOKEN", "t0ken"),
        ])
        .unwrap();
        assert_eq!(s.pipeline.tables.rubric, "rubric v2");
        assert_eq!(s.gemini.model, "gemini-2.0-flash");
        assert_eq!(s.gemini.timeout, Duration::from_secs(15));
        assert_eq!(s.sweep_interval, None);
        assert_eq!(s.pipeline.sweep_error_policy, SweepErrorPolicy::Continue);
        assert!(matches!(s.mail, MailSettings::Relay { ref url, .. } if url == "http://relay.local/send"));
    }

    #[test]
    fn invalid_values_fail_startup() {
        let rejected: &[&[(&str, &str)]] = &[
            &[("DEBRIEF_BIND_ADDR", "not an address")],
            &[("GEMINI_TEMPERATURE", "hot")],
            &[("GEMINI_TEMPERATURE", "3.5")],
            &[("GEMINI_MAX_ATTEMPTS", "0")],
            &[("DEBRIEF_SWEEP_ON_ERROR", "ignore")],
            &[("DEBRIEF_MAIL_MODE", "smtp")],
            &[("DEBRIEF_MAIL_MODE", "relay")],
        ];
        for vars in rejected {
            assert!(settings(vars).is_err(), "{vars:?} should be rejected");
        }
    }

    #[test]
    fn secrets_stay_out_of_debug_output() {
        let s = settings(&[
            ("GEMINI_API_KEY", "super-secret-key"),
            ("DEBRIEF_MAIL_MODE", "relay"),
            ("DEBRIEF_MAIL_RELAY_URL", "http://relay.local/send"),
            ("DEBRIEF_MAIL_RELAY_TOKEN", "relay-secret"),
        ])
        .unwrap();
        let debug = format!("{s:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("relay-secret"));
    }
}
