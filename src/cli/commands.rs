use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::clause::Clause;
use crate::config::{self, Config};
use crate::error::Error;
use crate::predicate::Predicate;
use crate::trigger::{
    ListTriggersResult, Trigger, TriggerContext, TriggerOptions, TriggerRequest,
    TriggeredCommandForm, TypedId,
};

use super::exit_codes;
use super::output::{
    self, CheckData, EvalData, JsonRpcError, OutputMode, TriggerData, TriggerListData, VerifyData,
};
use super::ConfigError;

#[derive(Parser)]
#[command(name = "thingif")]
#[command(about = "Check, format and evaluate trigger predicates and build trigger requests")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides THINGIF_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more to stderr (-v info, -vv debug, -vvv trace); RUST_LOG applies otherwise
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a clause or predicate document ("-" reads stdin)
    Check {
        input: String,

        /// Also validate the cron expression of SCHEDULE predicates
        #[arg(long)]
        schedule: bool,
    },

    /// Print the canonical JSON of a clause or predicate
    Fmt {
        input: String,

        /// Print on one line
        #[arg(long)]
        compact: bool,
    },

    /// Evaluate a clause (or STATES predicate) against a state document
    Eval {
        clause: String,
        state: String,

        /// Exit with a distinct code when the clause does not match
        #[arg(long)]
        exit_code: bool,
    },

    /// Build trigger requests or parse trigger responses
    Trigger {
        #[command(subcommand)]
        command: TriggerCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum TriggerCommands {
    /// Print the request that creates a command trigger
    New {
        /// Predicate JSON file
        #[arg(long)]
        predicate: String,

        /// Command form JSON file ({"actions": [...], ...})
        #[arg(long)]
        command: String,

        /// Target thing (defaults.target otherwise)
        #[arg(long)]
        target: Option<TypedId>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Print the request that patches a trigger
    Patch {
        id: String,

        #[arg(long)]
        predicate: Option<String>,

        #[arg(long)]
        command: Option<String>,

        #[arg(long)]
        target: Option<TypedId>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Print the request that enables a trigger
    Enable {
        id: String,
        #[arg(long)]
        target: Option<TypedId>,
    },

    /// Print the request that disables a trigger
    Disable {
        id: String,
        #[arg(long)]
        target: Option<TypedId>,
    },

    /// Print the request that deletes a trigger
    Delete {
        id: String,
        #[arg(long)]
        target: Option<TypedId>,
    },

    /// Print the request that fetches a trigger
    Get {
        id: String,
        #[arg(long)]
        target: Option<TypedId>,
    },

    /// Print the request that lists triggers
    List {
        /// Best-effort page size (0 means server default)
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        pagination_key: Option<String>,

        #[arg(long)]
        target: Option<TypedId>,
    },

    /// Parse a trigger (or with --list, a trigger listing) returned by the server
    Parse {
        input: String,

        #[arg(long)]
        list: bool,

        #[arg(long)]
        target: Option<TypedId>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "app.site", "defaults.target")
        key: String,
        /// Value to set (empty clears optional values)
        value: String,
    },
    /// Verify configuration file for errors
    Verify,
}

/// a document is a predicate when it carries `eventSource`, a clause otherwise
#[derive(Debug)]
enum Document {
    Clause(Clause),
    Predicate(Predicate),
}

impl Document {
    fn parse(json: &JsonValue) -> crate::error::Result<Self> {
        if json.get("eventSource").is_some() {
            Predicate::from_json(json).map(Document::Predicate)
        } else {
            Clause::from_json(json).map(Document::Clause)
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            Document::Clause(c) => c.to_json(),
            Document::Predicate(p) => p.to_json(),
        }
    }
}

pub fn execute(cli: Cli) -> Result<i32> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Check { input, schedule } => {
            let json = read_json(&input)?;
            let data = match Document::parse(&json)? {
                Document::Clause(clause) => CheckData {
                    kind: "clause",
                    summary: clause.to_string(),
                    event_source: None,
                    leaves: Some(clause.leaf_count()),
                },
                Document::Predicate(predicate) => {
                    if schedule {
                        if let Predicate::Schedule(p) = &predicate {
                            p.validate_schedule()
                                .map_err(|e| Error::malformed(e, "schedule"))?;
                        }
                    }
                    CheckData {
                        kind: "predicate",
                        summary: predicate.to_string(),
                        event_source: Some(predicate.event_source().to_string()),
                        leaves: match &predicate {
                            Predicate::State(p) => Some(p.condition.leaf_count()),
                            _ => None,
                        },
                    }
                }
            };
            info!(kind = data.kind, "input is valid");

            emit(output_mode, &data, || {
                println!("✓ valid {}: {}", data.kind, data.summary);
            });
            Ok(exit_codes::SUCCESS)
        }

        Commands::Fmt { input, compact } => {
            let json = read_json(&input)?;
            let canonical = Document::parse(&json)?.to_json();

            emit(output_mode, &canonical, || {
                let text = if compact {
                    serde_json::to_string(&canonical)
                } else {
                    serde_json::to_string_pretty(&canonical)
                };
                if let Ok(text) = text {
                    println!("{}", text);
                }
            });
            Ok(exit_codes::SUCCESS)
        }

        Commands::Eval {
            clause,
            state,
            exit_code,
        } => {
            let clause = match Document::parse(&read_json(&clause)?)? {
                Document::Clause(c) => c,
                Document::Predicate(p) => p.require_state()?.condition.clone(),
            };
            let state = read_json(&state)?;
            if !state.is_object() {
                warn!("state is not a JSON object, every field lookup will miss");
            }

            let result = clause.evaluate(&state);
            debug!(clause = %clause, result, "evaluated");

            let data = EvalData {
                clause: clause.to_string(),
                result,
            };
            emit(output_mode, &data, || println!("{}", result));

            if exit_code && !result {
                return Ok(exit_codes::CONDITION_FALSE);
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Trigger { command } => execute_trigger(command, config_path, output_mode),

        Commands::Config { command } => execute_config(command, config_path, output_mode),
    }
}

fn execute_trigger(
    command: TriggerCommands,
    config_path: Option<&Path>,
    output_mode: OutputMode,
) -> Result<i32> {
    let request = match command {
        TriggerCommands::New {
            predicate,
            command,
            target,
            title,
            description,
        } => {
            let ctx = context(config_path, target)?;
            let predicate = Predicate::from_json(&read_json(&predicate)?)?;
            let form = read_command_form(&command)?;
            let options = TriggerOptions {
                title,
                description,
                metadata: None,
            };
            ctx.post_new_trigger(&form, &predicate, Some(&options))?
        }

        TriggerCommands::Patch {
            id,
            predicate,
            command,
            target,
            title,
            description,
        } => {
            let ctx = context(config_path, target)?;
            let predicate = match predicate {
                Some(path) => Some(Predicate::from_json(&read_json(&path)?)?),
                None => None,
            };
            let form = match command {
                Some(path) => Some(read_command_form(&path)?),
                None => None,
            };
            let options = TriggerOptions {
                title,
                description,
                metadata: None,
            };
            let options = (!options.is_empty()).then_some(&options);
            ctx.patch_trigger(&id, form.as_ref(), predicate.as_ref(), options)?
        }

        TriggerCommands::Enable { id, target } => {
            context(config_path, target)?.enable_trigger(&id, true)
        }
        TriggerCommands::Disable { id, target } => {
            context(config_path, target)?.enable_trigger(&id, false)
        }
        TriggerCommands::Delete { id, target } => context(config_path, target)?.delete_trigger(&id),
        TriggerCommands::Get { id, target } => context(config_path, target)?.get_trigger(&id),
        TriggerCommands::List {
            limit,
            pagination_key,
            target,
        } => context(config_path, target)?.list_triggers(limit, pagination_key.as_deref()),

        TriggerCommands::Parse {
            input,
            list,
            target,
        } => {
            let target = match target {
                Some(t) => t,
                None => load_config(config_path)?.defaults.target.ok_or_else(|| {
                    ConfigError(anyhow!("no --target given and defaults.target is not set"))
                })?,
            };
            let json = read_json(&input)?;

            if list {
                let page = ListTriggersResult::from_response(&json, &target)?;
                let data = TriggerListData {
                    triggers: page.triggers.iter().map(trigger_data).collect(),
                    next_pagination_key: page.next_pagination_key.clone(),
                };
                emit(output_mode, &data, || {
                    for t in &data.triggers {
                        println!("{}", trigger_line(t));
                    }
                    if let Some(key) = &data.next_pagination_key {
                        println!("next page: {}", key);
                    }
                });
            } else {
                let trigger = Trigger::from_response(&json, &target)?;
                let data = trigger_data(&trigger);
                emit(output_mode, &data, || println!("{}", trigger_line(&data)));
            }
            return Ok(exit_codes::SUCCESS);
        }
    };

    print_request(output_mode, &request);
    Ok(exit_codes::SUCCESS)
}

fn execute_config(
    command: ConfigCommands,
    config_path: Option<&Path>,
    output_mode: OutputMode,
) -> Result<i32> {
    match command {
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            emit(output_mode, &config, || {
                if let Ok(json) = serde_json::to_string_pretty(&config) {
                    println!("{}", json);
                }
            });
            Ok(exit_codes::SUCCESS)
        }
        ConfigCommands::Path => {
            let path = config::get_config_path_with_override(config_path).map_err(ConfigError)?;
            let display = path.display().to_string();
            emit(output_mode, &serde_json::json!({ "path": display }), || {
                println!("{}", display)
            });
            Ok(exit_codes::SUCCESS)
        }
        ConfigCommands::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config::set_value(&mut config, &key, &value).map_err(ConfigError)?;
            config::save_with_override(&config, config_path).map_err(ConfigError)?;
            emit(
                output_mode,
                &serde_json::json!({ "key": key, "value": value }),
                || println!("Set {} = {}", key, value),
            );
            Ok(exit_codes::SUCCESS)
        }
        ConfigCommands::Verify => {
            let path = config::get_config_path_with_override(config_path).map_err(ConfigError)?;
            let errors = config::verify(&path).map_err(ConfigError)?;
            let display = path.display().to_string();

            if errors.is_empty() {
                let data = VerifyData {
                    path: display.clone(),
                    valid: true,
                    errors: vec![],
                };
                emit(output_mode, &data, || {
                    println!("✓ Configuration is valid: {}", display)
                });
                return Ok(exit_codes::SUCCESS);
            }

            let message = format!("configuration has {} error(s)", errors.len());
            if output_mode.is_json() {
                output::print_json_error(
                    &JsonRpcError::new(exit_codes::CONFIG_ERROR, &message)
                        .with_data(None, errors),
                );
            } else {
                eprintln!("✗ Configuration has {} error(s): {}", errors.len(), display);
                eprintln!();
                for error in &errors {
                    eprintln!("  - {}", error);
                }
            }
            Ok(exit_codes::CONFIG_ERROR)
        }
    }
}

fn emit<T: Serialize>(mode: OutputMode, data: &T, text: impl FnOnce()) {
    match mode {
        OutputMode::Json => output::print_json(data),
        OutputMode::Text => text(),
        OutputMode::Quiet => {}
    }
}

fn print_request(mode: OutputMode, request: &TriggerRequest) {
    debug!(method = %request.method, url = %request.url, "request ready");
    emit(mode, &request.to_json(), || {
        println!("{} {}", request.method, request.url);
        for (name, value) in &request.headers {
            println!("{}: {}", name, value);
        }
        if let Some(body) = &request.body {
            println!();
            if let Ok(text) = serde_json::to_string_pretty(body) {
                println!("{}", text);
            }
        }
    });
}

fn trigger_data(trigger: &Trigger) -> TriggerData {
    TriggerData {
        trigger_id: trigger.trigger_id.clone(),
        target: trigger.target.to_string(),
        enabled: trigger.enabled,
        predicate: trigger.predicate.to_string(),
        title: trigger.title.clone(),
        actions: trigger.command.as_ref().map(|c| c.actions.len()),
    }
}

fn trigger_line(t: &TriggerData) -> String {
    format!(
        "{} [{}] {}",
        t.trigger_id,
        if t.enabled { "enabled" } else { "disabled" },
        t.predicate
    )
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    Ok(config::load_with_override(config_path).map_err(ConfigError)?)
}

fn context(config_path: Option<&Path>, target: Option<TypedId>) -> Result<TriggerContext> {
    let config = load_config(config_path)?;
    Ok(config::trigger_context(&config, target).map_err(ConfigError)?)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

/// unparseable JSON counts as malformed input, not an I/O failure
fn read_json(input: &str) -> Result<JsonValue> {
    let text = read_input(input)?;
    let name = if input == "-" { "stdin" } else { input };
    let json = serde_json::from_str(&text)
        .map_err(|e| Error::malformed(format!("invalid JSON in {}: {}", name, e), ""))?;
    Ok(json)
}

fn read_command_form(input: &str) -> Result<TriggeredCommandForm> {
    let json = read_json(input)?;
    let form = serde_json::from_value(json).map_err(|e| Error::malformed(e.to_string(), "command"))?;
    Ok(form)
}
