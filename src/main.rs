use chrono::NaiveDate;
use intake_core::constants::{API_URL_ENV, DEFAULT_LOG_FILTER, DUPLICATE_PAYLOAD_ENV};
use intake_core::{Alert, AlertSink, ClientConfig, FormField, FormState, FormView, RegistrationPipeline};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const GENDERS: [&str; 4] = ["male", "female", "other", "unknown"];

/// Terminal rendition of the registration form.
///
/// Each round prompts every field, showing the current value; an empty answer keeps it and
/// `-` clears it. A focused field is prompted first.
struct TerminalForm {
    state: FormState,
    lines: Lines<BufReader<Stdin>>,
}

impl FormView for TerminalForm {
    fn value(&self, field: FormField) -> Option<String> {
        self.state.value(field)
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn focus(&mut self, field: FormField) {
        self.state.focus(field);
    }

    fn clear_focus(&mut self) {
        self.state.clear_focus();
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        if !enabled {
            println!("Processing...");
        }
        self.state.set_submit_enabled(enabled);
    }
}

impl TerminalForm {
    fn new() -> Self {
        Self {
            state: FormState::new(),
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Read one line from stdin. `None` at end of input.
    async fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        print!("{text}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }

    /// Prompt every field once. Returns `false` at end of input.
    async fn fill(&mut self) -> anyhow::Result<bool> {
        let mut order: Vec<FormField> = FormField::ALL.to_vec();
        if let Some(focused) = self.state.focused() {
            order.retain(|f| *f != focused);
            order.insert(0, focused);
        }

        for field in order {
            loop {
                let current = self.state.value(field).unwrap_or_default();
                let text = if current.is_empty() {
                    format!("{}: ", field.label())
                } else {
                    format!("{} [{current}]: ", field.label())
                };

                let Some(answer) = self.prompt(&text).await? else {
                    return Ok(false);
                };
                let answer = answer.trim();
                let value = match answer {
                    "" => current,
                    "-" => String::new(),
                    other => other.to_string(),
                };

                match check_native_input(field, &value) {
                    Ok(()) => {
                        self.state.set(field, value);
                        break;
                    }
                    Err(hint) => println!("  {hint}"),
                }
            }
        }

        Ok(true)
    }

    /// Ask whether to submit. Only offered while the submit control is enabled.
    async fn confirm_submit(&mut self) -> anyhow::Result<Option<bool>> {
        if !self.state.is_submit_enabled() {
            return Ok(Some(false));
        }
        let answer = self.prompt("Register patient? [Y/n] ").await?;
        Ok(answer.map(|a| !matches!(a.trim().to_ascii_lowercase().as_str(), "n" | "no")))
    }
}

/// Input constraints a browser enforces natively for date and select inputs.
///
/// Empty values pass; required-ness is the validator's job.
fn check_native_input(field: FormField, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    match field {
        FormField::BirthDate => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| "Enter a date as YYYY-MM-DD".to_string()),
        FormField::Gender if !GENDERS.contains(&value) => {
            Err(format!("Choose one of: {}", GENDERS.join(", ")))
        }
        _ => Ok(()),
    }
}

/// Prints alerts between form rounds.
struct TerminalAlerts;

impl AlertSink for TerminalAlerts {
    fn show(&mut self, alert: Alert) {
        println!("\n{alert}\n");
    }
}

/// `RUST_LOG` when set and parsable, otherwise [`DEFAULT_LOG_FILTER`].
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Interactive patient registration in the terminal.
///
/// Prompts for every field, submits on confirmation, shows the result and starts over.
/// Ends at end of input.
///
/// # Environment Variables
/// - `INTAKE_API_URL`: backend base URL (default: "https://back-end-santiago.onrender.com")
/// - `INTAKE_DUPLICATE_PAYLOAD`: duplicate-check body, `full` or `key` (default: "full")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env_values(
        std::env::var(API_URL_ENV).ok(),
        std::env::var(DUPLICATE_PAYLOAD_ENV).ok(),
    )?;
    tracing::info!("++ Patient intake against {}", config.api_base_url());

    let pipeline = RegistrationPipeline::new(config)?;
    let mut form = TerminalForm::new();
    let mut alerts = TerminalAlerts;

    println!("Patient registration (Enter keeps a value, '-' clears it, Ctrl-D quits)\n");
    while form.fill().await? {
        match form.confirm_submit().await? {
            Some(true) => {
                pipeline.submit(&mut form, &mut alerts).await;
            }
            Some(false) => continue,
            None => break,
        }
    }

    Ok(())
}
