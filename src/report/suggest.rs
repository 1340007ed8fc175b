//! Keyword-driven command suggestions
//!
//! Used when a query matches no intent or a command fails. Keywords are
//! matched as case-insensitive substrings, so "projects" hits "project"
//! and "vms" hits "vm".

/// Header placed above the rendered suggestion list
pub const SUGGESTION_HEADER: &str =
    "You can try these commands (type the full command to execute directly):";

const LIST_WORDS: &[&str] = &["list", "show", "all"];

/// Commands offered when no keyword combination matches
pub const GENERIC_SUGGESTIONS: &[&str] = &[
    "gcloud projects list",
    "gcloud compute instances list",
    "gcloud storage ls",
    "gcloud compute regions list",
    "gcloud compute zones list",
    "gcloud services list",
    "gcloud billing accounts list",
    "gcloud logging read --limit=10",
    "bq ls",
];

/// Propose command strings for `text`
///
/// Groups are checked in a fixed order and duplicates are kept. Never
/// returns an empty list.
pub fn suggest(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    let listing = contains_any(&text, LIST_WORDS);
    let mut out: Vec<&str> = Vec::new();

    if contains_any(&text, &["project"]) {
        if listing {
            out.push("gcloud projects list");
        }
        if contains_any(&text, &["describe", "detail", "info"]) {
            out.push("gcloud projects describe [PROJECT_ID]");
        }
    }

    if contains_any(&text, &["instance", "vm", "compute"]) && listing {
        out.push("gcloud compute instances list");
    }

    if contains_any(&text, &["storage", "bucket"]) && listing {
        out.push("gcloud storage ls");
    }

    if contains_any(&text, &["region"]) && listing {
        out.push("gcloud compute regions list");
    }

    if contains_any(&text, &["zone"]) && listing {
        out.push("gcloud compute zones list");
    }

    if contains_any(&text, &["service"]) && listing {
        out.push("gcloud services list");
        out.push("gcloud services list --project=[PROJECT_ID]");
    }

    if contains_any(&text, &["billing", "account"]) {
        if listing {
            out.push("gcloud billing accounts list");
        }
        if contains_any(&text, &["link", "connect", "set"]) {
            out.push("gcloud billing projects link [PROJECT_ID] --billing-account=[ACCOUNT_ID]");
        }
    }

    if contains_any(&text, &["bigquery", "bq", "dataset"]) {
        if contains_any(&text, &["dataset"]) && listing {
            out.push("bq ls");
            out.push("bq ls --format=json");
            out.push("bq ls --project=[PROJECT_ID]");
        }
        if contains_any(&text, &["table"]) && listing {
            out.push("bq ls [DATASET_ID]");
            out.push("bq ls --project=[PROJECT_ID] [DATASET_ID]");
        }
    }

    if contains_any(&text, &["log"]) {
        if contains_any(&text, &["read", "view", "show", "get"]) {
            out.push(r#"gcloud logging read "resource.type=gce_instance" --limit=10"#);
            out.push(r#"gcloud logging read "severity>=ERROR" --project=[PROJECT_ID] --limit=10"#);
        }
        if contains_any(&text, &["list"]) {
            out.push("gcloud logging logs list");
            out.push("gcloud logging logs list --project=[PROJECT_ID]");
        }
    }

    if out.is_empty() {
        out.extend_from_slice(GENERIC_SUGGESTIONS);
    }
    out.into_iter().map(String::from).collect()
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// `SUGGESTION_HEADER` plus one command per line
pub fn render_suggestions(commands: &[String]) -> String {
    render_under(SUGGESTION_HEADER, commands)
}

/// `header` plus one command per line
pub fn render_under(header: &str, commands: &[String]) -> String {
    let mut rendered = String::from(header);
    for command in commands {
        rendered.push('\n');
        rendered.push_str(command);
    }
    rendered
}

/// `suggest` followed by `render_suggestions`
pub fn suggested_commands(text: &str) -> String {
    render_suggestions(&suggest(text))
}
