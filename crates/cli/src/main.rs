use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use intake_core::constants::{API_URL_ENV, DEFAULT_LOG_FILTER, DUPLICATE_PAYLOAD_ENV};
use intake_core::fhir::Patient;
use intake_core::{
    to_patient_record, validate, Alert, AlertSink, ClientConfig, FormField, FormInput, FormState,
    RegistrationPipeline, ValidationVerdict,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Patient intake registration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a patient: validate, check for duplicates and submit
    Register {
        #[command(flatten)]
        form: FormArgs,
        /// Backend base URL (overrides INTAKE_API_URL)
        #[arg(long)]
        api_url: Option<String>,
        /// Duplicate-check body: 'full' or 'key' (overrides INTAKE_DUPLICATE_PAYLOAD)
        #[arg(long)]
        duplicate_payload: Option<String>,
    },
    /// Validate the form without contacting the backend
    Validate {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print the Patient resource that would be submitted
    Preview {
        #[command(flatten)]
        form: FormArgs,
        /// Print the reduced duplicate-lookup key instead
        #[arg(long)]
        key: bool,
    },
}

/// Form fields. Flags override values read from `--file`.
#[derive(Args)]
struct FormArgs {
    /// JSON file with form fields (camelCase keys, e.g. "familyName")
    #[arg(long)]
    file: Option<PathBuf>,
    /// Given name
    #[arg(long)]
    name: Option<String>,
    /// Family name
    #[arg(long)]
    family_name: Option<String>,
    /// Gender (male, female, other, unknown)
    #[arg(long)]
    gender: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<String>,
    /// Identification type (e.g. CC, TI, CE)
    #[arg(long)]
    identifier_system: Option<String>,
    /// Identification number
    #[arg(long)]
    identifier_value: Option<String>,
    /// Phone number
    #[arg(long)]
    cell_phone: Option<String>,
    /// Email address
    #[arg(long)]
    email: Option<String>,
    /// Street address
    #[arg(long)]
    address: Option<String>,
    /// City
    #[arg(long)]
    city: Option<String>,
    /// Postal code
    #[arg(long)]
    postal_code: Option<String>,
}

impl FormArgs {
    fn into_form(self) -> anyhow::Result<FormState> {
        let mut form = match &self.file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading form file {}", path.display()))?;
                let input: FormInput = serde_json::from_str(&text)
                    .with_context(|| format!("parsing form file {}", path.display()))?;
                FormState::from_input(&input)
            }
            None => FormState::new(),
        };

        let flags = [
            (FormField::Name, self.name),
            (FormField::FamilyName, self.family_name),
            (FormField::Gender, self.gender),
            (FormField::BirthDate, self.birth_date),
            (FormField::IdentifierSystem, self.identifier_system),
            (FormField::IdentifierValue, self.identifier_value),
            (FormField::CellPhone, self.cell_phone),
            (FormField::Email, self.email),
            (FormField::Address, self.address),
            (FormField::City, self.city),
            (FormField::PostalCode, self.postal_code),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                form.set(field, value);
            }
        }

        Ok(form)
    }
}

/// Prints alerts to stdout.
struct TerminalAlerts;

impl AlertSink for TerminalAlerts {
    fn show(&mut self, alert: Alert) {
        println!("{alert}");
    }
}

/// `RUST_LOG` when set and parsable, otherwise [`DEFAULT_LOG_FILTER`].
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Register {
            form,
            api_url,
            duplicate_payload,
        }) => {
            let config = ClientConfig::from_env_values(
                api_url.or_else(|| std::env::var(API_URL_ENV).ok()),
                duplicate_payload.or_else(|| std::env::var(DUPLICATE_PAYLOAD_ENV).ok()),
            )?;
            tracing::info!("registering against {}", config.api_base_url());

            let pipeline = RegistrationPipeline::new(config)?;
            let mut form = form.into_form()?;
            let outcome = pipeline.submit(&mut form, &mut TerminalAlerts).await;

            if !outcome.is_registered() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Validate { form }) => {
            let input = FormInput::read(&form.into_form()?);
            match validate(&input) {
                ValidationVerdict::Valid => println!("Form is valid"),
                ValidationVerdict::Invalid { field, message } => {
                    eprintln!("{field}: {message}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(Commands::Preview { form, key }) => {
            let record = to_patient_record(&FormInput::read(&form.into_form()?));
            let json = if key {
                serde_json::to_string_pretty(&record.lookup_key())?
            } else {
                Patient::render(&record)?
            };
            println!("{json}");
        }
        None => {
            println!("Use 'intake --help' for commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::FormView;
    use std::io::Write;

    fn form_args(args: &[&str]) -> FormArgs {
        let argv = ["intake", "validate"].into_iter().chain(args.iter().copied());
        match Cli::try_parse_from(argv).expect("parse args").command {
            Some(Commands::Validate { form }) => form,
            _ => panic!("expected the validate subcommand"),
        }
    }

    fn form_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(json.as_bytes()).expect("write form file");
        file
    }

    #[test]
    fn flags_override_file_values() {
        let file = form_file(r#"{"name": "Ana", "familyName": "Ruiz", "city": "Cali"}"#);
        let path = file.path().to_str().expect("utf-8 temp path");

        let form = form_args(&[
            "--file",
            path,
            "--family-name",
            "Gómez",
            "--cell-phone",
            "3001234567",
        ])
        .into_form()
        .expect("build form");

        assert_eq!(form.value(FormField::Name).as_deref(), Some("Ana"));
        assert_eq!(form.value(FormField::FamilyName).as_deref(), Some("Gómez"));
        assert_eq!(form.value(FormField::City).as_deref(), Some("Cali"));
        assert_eq!(form.value(FormField::CellPhone).as_deref(), Some("3001234567"));
        assert_eq!(form.value(FormField::Email), None);
    }

    #[test]
    fn flags_alone_build_a_form() {
        let form = form_args(&["--name", "Ana", "--birth-date", "1990-01-01"])
            .into_form()
            .expect("build form");

        let input = FormInput::read(&form);
        assert_eq!(input.name, "Ana");
        assert_eq!(input.birth_date, "1990-01-01");
        assert_eq!(input.family_name, "");
    }

    #[test]
    fn unreadable_form_file_is_an_error() {
        let file = form_file(r#"{"nickname": "Anita"}"#);
        let path = file.path().to_str().expect("utf-8 temp path");
        let err = form_args(&["--file", path])
            .into_form()
            .expect_err("unknown key should fail");
        assert!(err.to_string().contains("parsing form file"));

        let err = form_args(&["--file", "/nonexistent/intake-form.json"])
            .into_form()
            .expect_err("missing file should fail");
        assert!(err.to_string().contains("reading form file"));
    }

    #[test]
    fn register_accepts_backend_overrides() {
        let cli = Cli::try_parse_from([
            "intake",
            "register",
            "--name",
            "Ana",
            "--api-url",
            "http://127.0.0.1:8000",
            "--duplicate-payload",
            "key",
        ])
        .expect("parse args");

        match cli.command {
            Some(Commands::Register {
                form,
                api_url,
                duplicate_payload,
            }) => {
                assert_eq!(form.name.as_deref(), Some("Ana"));
                assert_eq!(api_url.as_deref(), Some("http://127.0.0.1:8000"));
                assert_eq!(duplicate_payload.as_deref(), Some("key"));
            }
            _ => panic!("expected the register subcommand"),
        }
    }
}
