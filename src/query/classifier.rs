//! Query classification - maps free text onto commands and runs them
//!
//! Literal `gcloud`/`bq` commands bypass the rule table. Everything else
//! is matched against the ordered intent rules; the first rule that
//! matches builds the command, which is routed and formatted.

use crate::command::router::{is_literal_command, CommandRouter};
use crate::core::config::AssistantConfig;
use crate::core::error::Result;
use crate::core::types::ToolResponse;
use crate::exec::CommandRunner;
use crate::query::rules::{default_rules, IntentRule, Plan, QualifierPatterns, QueryIntent};
use crate::report::formatter::{format_execution, Presentation};
use crate::report::suggest::suggested_commands;

const BILLING_PREFIX: &str = "gcloud billing ";

/// Heading for reports of literal commands
pub const LITERAL_SUCCESS_HEADING: &str = "Command executed successfully:";

/// Rule-based front end over a `CommandRouter`
pub struct QueryClassifier<R> {
    router: CommandRouter<R>,
    rules: Vec<IntentRule>,
    qualifiers: QualifierPatterns,
}

impl<R: CommandRunner> QueryClassifier<R> {
    pub fn new(router: CommandRouter<R>) -> Result<Self> {
        Ok(Self {
            router,
            rules: default_rules()?,
            qualifiers: QualifierPatterns::new()?,
        })
    }

    /// Build the router and classifier from one config
    pub fn from_config(runner: R, config: &AssistantConfig) -> Result<Self> {
        Self::new(CommandRouter::new(runner, config)?)
    }

    pub fn router(&self) -> &CommandRouter<R> {
        &self.router
    }

    /// Determine the intent of `query` without executing anything
    pub fn classify(&self, query: &str) -> QueryIntent {
        if let Some(phrase) = billing_alias(query) {
            return self.classify(&phrase);
        }
        if is_literal_command(query) {
            return QueryIntent::LiteralCommand;
        }
        self.match_rule(query)
            .map(|rule| rule.intent)
            .unwrap_or(QueryIntent::Unrecognized)
    }

    /// Classify `query`, run the resulting command and format the reply
    pub fn classify_and_execute(&self, query: &str) -> ToolResponse {
        if let Some(phrase) = billing_alias(query) {
            tracing::debug!("Rewrote `{}` as `{}`", query, phrase);
            return self.classify_and_execute(&phrase);
        }

        if is_literal_command(query) {
            let execution = self.router.route(query);
            return format_execution(
                &execution,
                &Presentation::Prefixed(LITERAL_SUCCESS_HEADING.into()),
                query,
            );
        }

        let Some((rule, captures)) = self
            .rules
            .iter()
            .find_map(|rule| rule.captures(query).map(|caps| (rule, caps)))
        else {
            tracing::info!("No intent matched query: {}", query);
            return unrecognized(query);
        };

        let qualifiers = self.qualifiers.extract(query);
        tracing::debug!("Matched {:?} with {:?}", rule.intent, qualifiers);

        match rule.plan(&captures, &qualifiers) {
            Plan::Run {
                command,
                presentation,
            } => {
                let execution = self.router.route(&command);
                format_execution(&execution, &presentation, query)
            }
            Plan::Respond(response) => response,
        }
    }

    fn match_rule(&self, query: &str) -> Option<&IntentRule> {
        self.rules
            .iter()
            .find(|rule| rule.captures(query).is_some())
    }
}

/// Natural-language phrase for the `gcloud billing` sub-forms that have
/// their own intent
///
/// `gcloud billing accounts list …` becomes "list billing accounts";
/// `gcloud billing projects link P … --billing-account=B` becomes
/// "link billing account B to project P". Other commands return `None`.
pub fn billing_alias(query: &str) -> Option<String> {
    let rest = query.strip_prefix(BILLING_PREFIX)?;
    let parts: Vec<&str> = rest.split_whitespace().collect();

    match parts.as_slice() {
        ["accounts", "list", ..] => Some("list billing accounts".to_string()),
        ["projects", "link", project, _, ..] => {
            let account = parts
                .iter()
                .find_map(|p| p.strip_prefix("--billing-account="))
                .filter(|account| !account.is_empty())?;
            Some(format!(
                "link billing account {} to project {}",
                account, project
            ))
        }
        _ => None,
    }
}

fn unrecognized(query: &str) -> ToolResponse {
    ToolResponse::error(
        format!(
            "I'm not sure how to process your query: '{}'. Try asking about listing projects, \
             instances, buckets, regions, zones, services, billing accounts, or BigQuery datasets \
             and tables.",
            query
        ),
        suggested_commands(query),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ExecutionResult;
    use crate::exec::RecordingRunner;
    use serde_json::json;
    use std::path::PathBuf;

    fn classifier(responses: Vec<ExecutionResult>) -> QueryClassifier<RecordingRunner> {
        let config = AssistantConfig {
            gcloud_path: Some(PathBuf::from("gcloud")),
            bq_path: Some(PathBuf::from("bq")),
            ..Default::default()
        };
        QueryClassifier::from_config(RecordingRunner::with_responses(responses), &config).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_billing_alias() {
        assert_eq!(
            billing_alias("gcloud billing accounts list --filter=open=true"),
            Some("list billing accounts".to_string())
        );
        assert_eq!(
            billing_alias("gcloud billing projects link myproj --billing-account=123-456"),
            Some("link billing account 123-456 to project myproj".to_string())
        );
        assert_eq!(billing_alias("gcloud billing projects link myproj"), None);
        assert_eq!(
            billing_alias("gcloud billing projects link myproj --quiet"),
            None
        );
        assert_eq!(
            billing_alias("gcloud billing projects link myproj --billing-account="),
            None
        );
        assert_eq!(billing_alias("gcloud billing projects describe myproj"), None);
        assert_eq!(billing_alias("list billing accounts"), None);
    }

    #[test]
    fn test_classify() {
        let c = classifier(vec![]);
        assert_eq!(c.classify("list all gcp projects"), QueryIntent::ListProjects);
        assert_eq!(c.classify("gcloud projects list"), QueryIntent::LiteralCommand);
        assert_eq!(c.classify("bq ls"), QueryIntent::LiteralCommand);
        assert_eq!(
            c.classify("gcloud billing accounts list"),
            QueryIntent::ListBillingAccounts
        );
        assert_eq!(c.classify("asdkjasd"), QueryIntent::Unrecognized);
        // Nothing ran
        assert!(c.router().runner().calls().is_empty());
    }

    #[test]
    fn test_literal_command_report() {
        let c = classifier(vec![ExecutionResult::success(json!({"projectId": "demo"}))]);
        let response = c.classify_and_execute("gcloud projects describe demo");
        assert_eq!(
            response,
            ToolResponse::success("Command executed successfully:\n{\n  \"projectId\": \"demo\"\n}")
        );
        assert_eq!(
            c.router().runner().last_call().unwrap(),
            strings(&["gcloud", "projects", "describe", "demo", "--format=json"])
        );
    }

    #[test]
    fn test_literal_command_failure_suggests() {
        let c = classifier(vec![ExecutionResult::error(
            "ERROR: (gcloud.compute.zones.list) some failure",
            Some(1),
        )]);
        let response = c.classify_and_execute("gcloud compute zones list");
        match response {
            ToolResponse::Error {
                error_message,
                suggested_commands,
            } => {
                assert!(error_message.starts_with("Error executing command: ERROR:"));
                assert!(suggested_commands.contains("gcloud compute zones list"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_literal_reports_router_error() {
        let c = classifier(vec![]);
        let response = c.classify_and_execute("bq query   ");
        match response {
            ToolResponse::Error { error_message, .. } => {
                assert_eq!(
                    error_message,
                    "Error executing command: Invalid BigQuery query command. Missing SQL query."
                );
            }
            other => panic!("expected error, got {:?}", other),
        }
        assert!(c.router().runner().calls().is_empty());
    }

    #[test]
    fn test_link_without_account_runs_literally() {
        let c = classifier(vec![]);
        let query = "gcloud billing projects link myproj --billing-account=";
        assert_eq!(c.classify(query), QueryIntent::LiteralCommand);

        let response = c.classify_and_execute(query);
        assert!(response.is_success());
        assert_eq!(
            c.router().runner().last_call().unwrap(),
            strings(&[
                "gcloud",
                "billing",
                "projects",
                "link",
                "myproj",
                "--billing-account=",
                "--format=json"
            ])
        );
    }

    #[test]
    fn test_services_in_project() {
        let c = classifier(vec![ExecutionResult::success(json!([
            {"name": "projects/1/services/bigquery.googleapis.com"}
        ]))]);
        let response = c.classify_and_execute("list services in project acme");
        assert_eq!(
            response,
            ToolResponse::success(
                "Available services in project acme:\n- projects/1/services/bigquery.googleapis.com"
            )
        );
        assert_eq!(
            c.router().runner().last_call().unwrap(),
            strings(&["gcloud", "services", "list", "--project=acme", "--format=json"])
        );
    }

    #[test]
    fn test_buckets_keep_gsutil_format() {
        let c = classifier(vec![ExecutionResult::success(json!("gs://a/\ngs://b/"))]);
        let response = c.classify_and_execute("list buckets");
        assert_eq!(
            response,
            ToolResponse::success("Here are the available storage buckets:\ngs://a/\ngs://b/")
        );
        assert_eq!(
            c.router().runner().last_call().unwrap(),
            strings(&["gcloud", "storage", "ls", "--format=gsutil"])
        );
    }

    #[test]
    fn test_describe_project_passes_through() {
        let c = classifier(vec![ExecutionResult::success(json!({"lifecycleState": "ACTIVE"}))]);
        let response = c.classify_and_execute("describe project acme-prod ");
        assert_eq!(
            response,
            ToolResponse::success("{\n  \"lifecycleState\": \"ACTIVE\"\n}")
        );
        assert_eq!(
            c.router().runner().last_call().unwrap(),
            strings(&["gcloud", "projects", "describe", "acme-prod", "--format=json"])
        );
    }

    #[test]
    fn test_tables_require_dataset() {
        let c = classifier(vec![]);
        let response = c.classify_and_execute("show bigquery tables");
        assert!(!response.is_success());
        assert!(c.router().runner().calls().is_empty());
    }

    #[test]
    fn test_unrecognized_query() {
        let c = classifier(vec![]);
        let response = c.classify_and_execute("asdkjasd");
        match response {
            ToolResponse::Error {
                error_message,
                suggested_commands,
            } => {
                assert!(error_message.contains("'asdkjasd'"));
                assert!(suggested_commands.lines().count() > 1);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }
}
