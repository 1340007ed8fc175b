//! Intent rules - the ordered pattern table behind the query classifier
//!
//! Each rule pairs case-insensitive patterns with a builder that turns the
//! match into a command string and a presentation. Rules are evaluated in
//! table order and the first match wins, so more specific phrasings must
//! come before looser ones.

use crate::core::error::Result;
use crate::core::types::ToolResponse;
use crate::report::formatter::{field, field_or, ListSpec, Presentation};
use crate::report::suggest::render_under;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classified purpose of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryIntent {
    ListProjects,
    ListInstances,
    ListBuckets,
    DescribeProject,
    ListServices,
    ListRegions,
    ListZones,
    ListBillingAccounts,
    LinkBilling,
    ListBqDatasets,
    ListBqTables,
    /// Query was already a `gcloud`/`bq` command string
    LiteralCommand,
    Unrecognized,
}

/// Optional "in project X" / "in dataset Y" qualifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub project: Option<String>,
    pub dataset: Option<String>,
}

impl Qualifiers {
    /// " in project X" when a project was given, else empty
    pub fn project_suffix(&self) -> String {
        self.project
            .as_ref()
            .map(|p| format!(" in project {}", p))
            .unwrap_or_default()
    }
}

/// Extracts qualifiers independently of the matched intent
#[derive(Debug, Clone)]
pub struct QualifierPatterns {
    project: Regex,
    dataset: Regex,
}

impl QualifierPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            project: Regex::new(r"(?i)in\s+project\s+(\S+)")?,
            dataset: Regex::new(r"(?i)in\s+dataset\s+(\S+)")?,
        })
    }

    pub fn extract(&self, query: &str) -> Qualifiers {
        let first_group = |re: &Regex| {
            re.captures(query)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };
        Qualifiers {
            project: first_group(&self.project),
            dataset: first_group(&self.dataset),
        }
    }
}

/// What a matched rule wants done
#[derive(Debug, Clone)]
pub enum Plan {
    /// Route `command` and shape the result with `presentation`
    Run {
        command: String,
        presentation: Presentation,
    },
    /// Answer immediately without running anything
    Respond(ToolResponse),
}

impl Plan {
    fn run(command: impl Into<String>, presentation: Presentation) -> Self {
        Plan::Run {
            command: command.into(),
            presentation,
        }
    }

    fn list(command: impl Into<String>, spec: ListSpec) -> Self {
        Self::run(command, Presentation::Listing(spec))
    }
}

/// Turns a pattern match plus qualifiers into a plan
pub type PlanBuilder = fn(&Captures<'_>, &Qualifiers) -> Plan;

/// One row of the intent table
pub struct IntentRule {
    pub intent: QueryIntent,
    patterns: Vec<Regex>,
    build: PlanBuilder,
}

impl IntentRule {
    /// Compile a rule; every pattern is matched case-insensitively
    pub fn new(intent: QueryIntent, patterns: &[&str], build: PlanBuilder) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            intent,
            patterns,
            build,
        })
    }

    /// Captures of the first pattern that matches `query`
    pub fn captures<'t>(&self, query: &'t str) -> Option<Captures<'t>> {
        self.patterns.iter().find_map(|re| re.captures(query))
    }

    pub fn plan(&self, captures: &Captures<'_>, qualifiers: &Qualifiers) -> Plan {
        (self.build)(captures, qualifiers)
    }
}

/// The intent table in evaluation order
pub fn default_rules() -> Result<Vec<IntentRule>> {
    use QueryIntent::*;

    Ok(vec![
        IntentRule::new(
            ListProjects,
            &[r"list\s+(?:all\s+)?(?:gcp\s+)?projects"],
            |_, _| {
                Plan::list(
                    "gcloud projects list",
                    ListSpec::new("Available GCP projects", project_line),
                )
            },
        )?,
        IntentRule::new(
            ListInstances,
            &[r"list\s+(?:all\s+)?(?:gcp\s+)?instances"],
            |_, _| {
                Plan::list(
                    "gcloud compute instances list",
                    ListSpec::new("Available compute instances", instance_line),
                )
            },
        )?,
        IntentRule::new(
            ListBuckets,
            &[r"list\s+(?:all\s+)?(?:gcp\s+)?buckets"],
            |_, _| {
                Plan::run(
                    "gcloud storage ls --format=gsutil",
                    Presentation::Prefixed("Here are the available storage buckets:".into()),
                )
            },
        )?,
        IntentRule::new(DescribeProject, &[r"describe\s+project\s+(.+)"], |caps, _| {
            let project_id = caps.get(1).map_or("", |m| m.as_str()).trim();
            Plan::run(
                format!("gcloud projects describe {}", project_id),
                Presentation::PassThrough,
            )
        })?,
        IntentRule::new(ListServices, &[r"list\s+(?:all\s+)?services"], |_, q| {
            let command = match &q.project {
                Some(project) => format!("gcloud services list --project={}", project),
                None => "gcloud services list".to_string(),
            };
            let title = format!("Available services{}", q.project_suffix());
            Plan::list(command, ListSpec::new(title, service_line))
        })?,
        IntentRule::new(
            ListRegions,
            &[r"list\s+(?:all\s+)?(?:gcp\s+)?regions"],
            |_, _| {
                Plan::list(
                    "gcloud compute regions list",
                    ListSpec::new("Available GCP regions", region_line),
                )
            },
        )?,
        IntentRule::new(
            ListZones,
            &[r"list\s+(?:all\s+)?(?:gcp\s+)?zones"],
            |_, _| {
                Plan::list(
                    "gcloud compute zones list",
                    ListSpec::new("Available GCP zones", zone_line),
                )
            },
        )?,
        IntentRule::new(
            ListBillingAccounts,
            &[r"list\s+(?:all\s+)?billing\s+accounts"],
            |_, _| {
                Plan::list(
                    "gcloud billing accounts list",
                    ListSpec::new("Available billing accounts", billing_account_line),
                )
            },
        )?,
        IntentRule::new(
            LinkBilling,
            &[
                r"link\s+billing\s+account\s+(.+?)\s+to\s+project\s+(.+)",
                r"set\s+billing\s+account\s+(.+?)\s+for\s+project\s+(.+)",
                r"connect\s+billing\s+account\s+(.+?)\s+to\s+project\s+(.+)",
            ],
            link_billing_plan,
        )?,
        IntentRule::new(
            ListBqDatasets,
            &[r"(?:show|list)\s+(?:all\s+)?(?:bigquery|bq)\s+datasets"],
            |_, q| {
                let command = match &q.project {
                    Some(project) => format!("bq ls --project={}", project),
                    None => "bq ls".to_string(),
                };
                let suffix = q.project_suffix();
                let spec = ListSpec::new(format!("BigQuery datasets{}", suffix), dataset_line)
                    .with_empty_text(format!("No BigQuery datasets found{}.", suffix));
                Plan::list(command, spec)
            },
        )?,
        IntentRule::new(
            ListBqTables,
            &[r"(?:show|list)\s+(?:all\s+)?(?:bigquery|bq)\s+tables"],
            list_tables_plan,
        )?,
    ])
}

fn link_billing_plan(caps: &Captures<'_>, _: &Qualifiers) -> Plan {
    let group = |i| caps.get(i).map_or("", |m| m.as_str()).trim();
    let raw_account = group(1);
    let project_id = group(2);

    let account_id = if raw_account.starts_with("billingAccounts/") {
        raw_account.rsplit('/').next().unwrap_or(raw_account)
    } else {
        raw_account
    };

    Plan::run(
        format!(
            "gcloud billing projects link {} --billing-account={}",
            project_id, account_id
        ),
        Presentation::Confirmation(format!(
            "Successfully linked billing account '{}' to project '{}'.",
            account_id, project_id
        )),
    )
}

const DATASET_HINT_HEADER: &str = "You might want to try these commands:";

fn list_tables_plan(_: &Captures<'_>, q: &Qualifiers) -> Plan {
    let Some(dataset) = &q.dataset else {
        return Plan::Respond(ToolResponse::error(
            "Please specify a dataset. For example: 'Show BigQuery tables in dataset my_dataset'.",
            render_under(
                DATASET_HINT_HEADER,
                &[
                    "bq ls [DATASET_ID]".to_string(),
                    "bq ls --project=[PROJECT_ID] [DATASET_ID]".to_string(),
                ],
            ),
        ));
    };

    let command = match &q.project {
        Some(project) => format!("bq ls --project={} {}", project, dataset),
        None => format!("bq ls {}", dataset),
    };
    let suffix = q.project_suffix();
    let spec = ListSpec::new(format!("Tables in dataset {}{}", dataset, suffix), table_line)
        .with_empty_text(format!("No tables found in dataset {}{}.", dataset, suffix));
    Plan::list(command, spec)
}

fn project_line(p: &Value) -> String {
    format!("- {} (ID: {})", field(p, "name"), field(p, "projectId"))
}

fn instance_line(i: &Value) -> String {
    format!(
        "- {} ({}, {})",
        field(i, "name"),
        field(i, "zone"),
        field(i, "status")
    )
}

fn service_line(s: &Value) -> String {
    format!("- {}", field(s, "name"))
}

fn region_line(r: &Value) -> String {
    format!("- {} ({})", field(r, "name"), field(r, "status"))
}

fn zone_line(z: &Value) -> String {
    format!(
        "- {} ({}, {})",
        field(z, "name"),
        field(z, "region"),
        field(z, "status")
    )
}

fn billing_account_line(a: &Value) -> String {
    let name = field(a, "name");
    let id = name.rsplit('/').next().unwrap_or(&name);
    format!(
        "- {} (ID: {}, Open: {})",
        field(a, "displayName"),
        id,
        field_or(a, "open", "false")
    )
}

fn dataset_line(d: &Value) -> String {
    format!("- {} ({})", field(d, "id"), field(d, "location"))
}

fn table_line(t: &Value) -> String {
    format!("- {} ({})", field(t, "tableId"), field_or(t, "type", "TABLE"))
}
