//! Doctor command - verify store reachability and configuration.

use crate::card_store::{AnkiConnectStore, CardStore};
use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Kartei Doctor");
    println!();
    println!("Checking store connectivity and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Card Store").bold());
    let store_check = check_store(settings).await;
    store_check.print();
    checks.push(store_check);

    println!();

    println!("{}", style("API Configuration").bold());
    for check in [
        check_gemini_key(settings),
        check_elevenlabs_key(settings),
        check_voice_id(settings),
    ] {
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Kartei.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Kartei is ready to use.");
    }

    Ok(())
}

/// Check that AnkiConnect answers a version probe.
async fn check_store(settings: &Settings) -> CheckResult {
    let store = match AnkiConnectStore::new(&settings.store) {
        Ok(store) => store,
        Err(e) => {
            return CheckResult::error(
                "AnkiConnect",
                &format!("client setup failed: {}", e),
                "Check the [store] endpoint in your config file",
            )
        }
    };

    match store.version().await {
        Ok(version) => CheckResult::ok(
            "AnkiConnect",
            &format!("reachable at {} (version {})", settings.store.endpoint, version),
        ),
        Err(e) => CheckResult::error(
            "AnkiConnect",
            &e.to_string(),
            "Start Anki and install the AnkiConnect add-on (code 2055492159)",
        ),
    }
}

fn check_gemini_key(settings: &Settings) -> CheckResult {
    match settings.gemini_api_key() {
        Some(key) => CheckResult::ok("GEMINI_API_KEY", &format!("configured ({})", mask(&key))),
        None => CheckResult::warning(
            "GEMINI_API_KEY",
            "not set",
            "Needed for 'kartei generate'. Set with: export GEMINI_API_KEY='...'",
        ),
    }
}

fn check_elevenlabs_key(settings: &Settings) -> CheckResult {
    match settings.elevenlabs_api_key() {
        Some(key) => CheckResult::ok(
            "ELEVENLABS_API_KEY",
            &format!("configured ({})", mask(&key)),
        ),
        None => CheckResult::warning(
            "ELEVENLABS_API_KEY",
            "not set",
            "Needed for 'kartei audio'. Set with: export ELEVENLABS_API_KEY='...'",
        ),
    }
}

fn check_voice_id(settings: &Settings) -> CheckResult {
    match settings.voice_id() {
        Some(voice) => CheckResult::ok("Voice id", &voice),
        None => CheckResult::warning(
            "Voice id",
            "not set",
            "Set ELEVENLABS_VOICE_ID or [speech].voice_id, or you will be prompted per run",
        ),
    }
}

/// Check if the config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: kartei config edit",
        )
    }
}

/// Mask a credential for display.
fn mask(key: &str) -> String {
    let count = key.chars().count();
    if count > 8 {
        let head: String = key.chars().take(4).collect();
        let tail: String = key.chars().skip(count - 4).collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_keeps_edges_only() {
        assert_eq!(mask("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(mask("short"), "****");
    }

    #[test]
    fn test_mask_handles_multibyte_keys() {
        // slicing must follow characters, not bytes
        assert_eq!(mask("012345678äbcd"), "0123...äbcd");
        assert_eq!(mask("ääääääää"), "****");
    }
}
