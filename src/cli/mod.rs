//! Command dispatcher behind the `intake_cli` binary.

pub mod output;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ConfigManager, IntakeConfig};
use crate::core::rules::Ruleset;
use crate::core::transform::{canonicalize, ValidatedForm};
use crate::domain::common::RecordId;
use crate::domain::form::FlexibleFormState;
use crate::errors::{CliError, IntakeError};
use crate::storage::{JsonStorage, SubmissionStore};
use crate::utils::{self, build_info};

pub const USAGE: &str = "Usage: intake_cli <command>\n\
     Commands:\n  \
     steps                          show the wizard layout\n  \
     validate <draft.json>          list every problem in a saved form\n  \
     submit <draft.json> [record]   validate, convert and store a form\n  \
     show <record>                  print a stored submission\n  \
     version                        print build information";

struct CliContext {
    manager: ConfigManager,
    config: IntakeConfig,
    rules: Ruleset,
}

impl CliContext {
    fn load() -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        utils::init_tracing(config.log_filter.as_deref());
        Ok(Self {
            manager,
            config,
            rules: Ruleset::standard(),
        })
    }

    fn storage(&self) -> Result<JsonStorage, CliError> {
        Ok(JsonStorage::new(Some(self.manager.data_dir(&self.config)))?)
    }
}

/// Runs one command. `args` excludes the program name.
pub fn run_cli<I>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = args
        .next()
        .ok_or_else(|| CliError::Input("missing command".into()))?;
    debug!(%command, "dispatching");

    match command.as_str() {
        "steps" => show_steps(&CliContext::load()?),
        "validate" => {
            let path = required_path(args.next(), "validate")?;
            validate_draft(&CliContext::load()?, &path)
        }
        "submit" => {
            let path = required_path(args.next(), "submit")?;
            let record = match args.next() {
                Some(raw) => raw
                    .parse::<RecordId>()
                    .map_err(|err| CliError::Input(format!("record id `{raw}`: {err}")))?,
                None => RecordId::new(),
            };
            submit_draft(&CliContext::load()?, &path, record)
        }
        "show" => {
            let raw = args
                .next()
                .ok_or_else(|| CliError::Input("`show` needs a record id".into()))?;
            let record = raw
                .parse::<RecordId>()
                .map_err(|err| CliError::Input(format!("record id `{raw}`: {err}")))?;
            show_record(&CliContext::load()?, &record)
        }
        "version" => {
            show_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => Err(CliError::Input(format!("unknown command `{other}`"))),
    }
}

fn required_path(arg: Option<String>, command: &str) -> Result<PathBuf, CliError> {
    arg.map(PathBuf::from)
        .ok_or_else(|| CliError::Input(format!("`{command}` needs a draft file")))
}

fn read_draft(path: &Path) -> Result<FlexibleFormState, CliError> {
    let data = fs::read_to_string(path)
        .map_err(|err| CliError::Input(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&data)
        .map_err(|err| CliError::Input(format!("{}: {}", path.display(), err)))
}

fn show_steps(context: &CliContext) -> Result<(), CliError> {
    let catalog = context.manager.load_catalog(&context.config, &context.rules)?;
    for (index, step) in catalog.steps().iter().enumerate() {
        output::section(format!("{}. {}", index + 1, step.name));
        for subpage in &step.subpages {
            println!("  {} [{}]", subpage.name, subpage.fields.join(", "));
        }
    }
    Ok(())
}

fn validate_draft(context: &CliContext, path: &Path) -> Result<(), CliError> {
    let state = read_draft(path)?;
    let report = context.rules.validate(&state);
    if report.is_valid() {
        output::success(format!("{} is ready to submit.", path.display()));
        return Ok(());
    }
    for (field, message) in report.iter() {
        output::warning(format!("{field}: {message}"));
    }
    Err(CliError::Command(format!(
        "{} field(s) need attention",
        report.len()
    )))
}

fn submit_draft(context: &CliContext, path: &Path, record: RecordId) -> Result<(), CliError> {
    let state = read_draft(path)?;
    let form = ValidatedForm::new(&state, &context.rules).map_err(IntakeError::from)?;
    let info = canonicalize(&form);
    let storage = context.storage()?;
    storage.save(&record, &info)?;
    output::success(format!("Stored submission {record}."));
    println!("{record}");
    Ok(())
}

fn show_record(context: &CliContext, record: &RecordId) -> Result<(), CliError> {
    let info = context.storage()?.load(record)?;
    let json = serde_json::to_string_pretty(&info).map_err(IntakeError::from)?;
    println!("{json}");
    Ok(())
}

fn show_version() {
    let build = build_info::current();
    println!(
        "intake_cli {} ({} {}, built {}, {})",
        build.version, build.git_hash, build.git_status, build.timestamp, build.profile
    );
}
