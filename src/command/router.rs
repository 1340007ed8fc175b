//! Command routing - turns literal `gcloud`/`bq` command strings into
//! argument vectors and runs them

use crate::command::args::{ensure_format_flag, tokenize};
use crate::command::sql::{split_query_flags, TableRefQuoter};
use crate::core::config::AssistantConfig;
use crate::core::error::{AssistantError, Result};
use crate::core::types::{ExecutionResult, Tool};
use crate::exec::CommandRunner;
use std::path::PathBuf;

const BQ_QUERY_PREFIX: &str = "bq query ";

/// Which handler builds the argument vector for a command string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `bq query …` with SQL-aware splitting
    BqQuery,
    /// Any other `bq …` command
    Bq,
    /// Any `gcloud …` command
    Gcloud,
}

impl Dialect {
    /// Detect the dialect from the command prefix
    ///
    /// `bq query ` is checked before `bq `, which is checked before `gcloud `.
    pub fn detect(command: &str) -> Option<Self> {
        if command.starts_with(BQ_QUERY_PREFIX) {
            Some(Dialect::BqQuery)
        } else if command.starts_with(Tool::Bq.prefix()) {
            Some(Dialect::Bq)
        } else if command.starts_with(Tool::Gcloud.prefix()) {
            Some(Dialect::Gcloud)
        } else {
            None
        }
    }
}

/// Whether `command` starts with a prefix the router accepts
pub fn is_literal_command(command: &str) -> bool {
    Dialect::detect(command).is_some()
}

/// Resolved executable paths, empty when unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    pub gcloud: String,
    pub bq: String,
}

impl ToolPaths {
    pub fn from_config(config: &AssistantConfig) -> Self {
        let display = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        Self {
            gcloud: display(&config.gcloud_path),
            bq: display(&config.bq_path),
        }
    }

    pub fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::Gcloud => &self.gcloud,
            Tool::Bq => &self.bq,
        }
    }
}

/// Dispatches literal command strings to the runner
pub struct CommandRouter<R> {
    runner: R,
    tools: ToolPaths,
    quoter: TableRefQuoter,
    debug: bool,
}

impl<R: CommandRunner> CommandRouter<R> {
    pub fn new(runner: R, config: &AssistantConfig) -> Result<Self> {
        Ok(Self {
            runner,
            tools: ToolPaths::from_config(config),
            quoter: TableRefQuoter::new()?,
            debug: config.debug,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    /// Build and run the argument vector for `command`
    ///
    /// Malformed commands come back as `ExecutionResult::Error` without
    /// touching the runner.
    pub fn route(&self, command: &str) -> ExecutionResult {
        if self.debug {
            tracing::debug!("Routing command: {}", command);
        }
        match self.build_argv(command) {
            Ok(argv) => self.runner.execute(&argv),
            Err(e) => {
                if self.debug {
                    tracing::debug!("Rejected command `{}`: {}", command, e);
                }
                ExecutionResult::error(e.to_string(), None)
            }
        }
    }

    /// Build the final argument vector for a literal command string
    pub fn build_argv(&self, command: &str) -> Result<Vec<String>> {
        match Dialect::detect(command) {
            Some(Dialect::BqQuery) => self.build_query_argv(command),
            Some(Dialect::Bq) => self.build_generic_argv(Tool::Bq, command),
            Some(Dialect::Gcloud) => self.build_generic_argv(Tool::Gcloud, command),
            None => Err(AssistantError::UnsupportedCommand(command.to_string())),
        }
    }

    fn build_generic_argv(&self, tool: Tool, command: &str) -> Result<Vec<String>> {
        let tail = &command[tool.prefix().len()..];
        let mut args = tokenize(tail)?;
        ensure_format_flag(&mut args);

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(self.tools.program(tool).to_string());
        argv.extend(args);
        Ok(argv)
    }

    fn build_query_argv(&self, command: &str) -> Result<Vec<String>> {
        let tail = query_tail(command).ok_or(AssistantError::MissingSqlQuery)?;
        let parts = split_query_flags(tail)?;

        let mut flags = parts.flags;
        ensure_format_flag(&mut flags);
        let body = self.quoter.quote(&parts.body);

        if self.debug {
            tracing::debug!("Query flags: {:?}", flags);
            tracing::debug!("Final SQL query: {}", body);
        }

        let mut argv = Vec::with_capacity(flags.len() + 3);
        argv.push(self.tools.program(Tool::Bq).to_string());
        argv.push("query".to_string());
        argv.extend(flags);
        argv.push(body);
        Ok(argv)
    }
}

/// Everything after the first two whitespace-delimited segments
///
/// Leading whitespace of the remainder is skipped; `None` when there is
/// no third segment.
fn query_tail(command: &str) -> Option<&str> {
    let mut rest = command.trim_start();
    for _ in 0..2 {
        let end = rest.find(char::is_whitespace)?;
        rest = rest[end..].trim_start();
    }
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}
