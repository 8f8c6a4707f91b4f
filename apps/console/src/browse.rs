//! Interactive paging session over stdin/stdout.

use std::{io::Write as _, sync::Arc};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use client_core::{
    is_link_enabled, DeleteConfirmation, DeleteOutcome, EditTarget, FetchOutcome, ListController,
    MutationOrchestrator, SaveOutcome,
};
use serde_json::{Map, Value};
use shared::domain::{Resource, SortDirection};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};

use crate::render::{render_page, render_size_options};

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    /// Follow the pagination link with this label.
    Follow(String),
    Sort(String),
    Direction(SortDirection),
    Size(u32),
    Refresh,
    Edit {
        target: String,
        fields: Map<String, Value>,
    },
    Delete(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  first | prev | next | last | <n>   follow a pagination link
  sort <field>                       change the sort field
  dir asc|desc                       change the sort direction
  size <n>                           change the page size
  refresh                            reload the current page
  edit <id|new> name=value...        update or create a record
  delete <id>                        delete a record
  quit";

pub fn parse_command(line: &str) -> Result<BrowseCommand> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        bail!("empty command");
    };
    let rest: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("first" | "prev" | "next" | "last", []) => BrowseCommand::Follow(head.to_ascii_lowercase()),
        ("sort", [field]) => BrowseCommand::Sort(field.to_string()),
        ("dir", [direction]) => BrowseCommand::Direction(direction.parse()?),
        ("size", [size]) => BrowseCommand::Size(
            size.parse()
                .map_err(|_| anyhow!("page size must be a number, got {size:?}"))?,
        ),
        ("refresh", []) => BrowseCommand::Refresh,
        ("edit", [target, assignments @ ..]) => BrowseCommand::Edit {
            target: target.to_string(),
            fields: parse_assignments(assignments)?,
        },
        ("delete", [id]) => BrowseCommand::Delete(id.to_string()),
        ("help" | "?", []) => BrowseCommand::Help,
        ("quit" | "exit" | "q", []) => BrowseCommand::Quit,
        (page, []) if page.parse::<u32>().is_ok() => BrowseCommand::Follow(page.to_string()),
        _ => bail!("unrecognized command {line:?}; type `help`"),
    };
    Ok(command)
}

/// Parses `name=value` pairs. Numbers and booleans keep their JSON type,
/// everything else is taken as a string.
pub fn parse_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Map<String, Value>> {
    let mut fields = Map::new();
    for assignment in assignments {
        let assignment = assignment.as_ref();
        let Some((name, raw)) = assignment.split_once('=') else {
            bail!("expected name=value, got {assignment:?}");
        };
        let name = name.trim();
        if name.is_empty() || name == "id" {
            bail!("invalid field name in {assignment:?}");
        }
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
            _ => Value::String(raw.to_string()),
        };
        fields.insert(name.to_string(), value);
    }
    Ok(fields)
}

/// Line-oriented stdin shared between the command loop and prompts.
pub struct ConsoleInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleInput {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        })
    }

    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = std::io::stdout().flush();
        self.lines.lock().await.next_line().await.ok().flatten()
    }
}

pub struct StdinConfirmation {
    input: Arc<ConsoleInput>,
}

impl StdinConfirmation {
    pub fn new(input: Arc<ConsoleInput>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl DeleteConfirmation for StdinConfirmation {
    async fn confirm_delete(&self, resource: &Resource) -> bool {
        let id = resource
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let answer = self
            .input
            .read_line(&format!("delete #{id}? [y/N] "))
            .await
            .unwrap_or_default();
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

pub struct BrowseSession {
    pub list: Arc<ListController>,
    pub mutations: MutationOrchestrator,
    pub input: Arc<ConsoleInput>,
    pub collection: String,
    pub columns: Vec<String>,
}

impl BrowseSession {
    pub async fn run(&self, first_load: FetchOutcome) -> Result<()> {
        report(&first_load);
        self.print_page().await;

        while let Some(line) = self.input.read_line("> ").await {
            if line.trim().is_empty() {
                continue;
            }
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            };
            if command == BrowseCommand::Quit {
                break;
            }
            if let Err(err) = self.apply(command).await {
                println!("{err}");
            }
            self.print_page().await;
        }
        Ok(())
    }

    async fn apply(&self, command: BrowseCommand) -> Result<()> {
        match command {
            BrowseCommand::Follow(label) => {
                let state = self.list.snapshot().await;
                let link = state
                    .links
                    .iter()
                    .find(|link| link.label.eq_ignore_ascii_case(&label))
                    .ok_or_else(|| anyhow!("no {label:?} link on this page"))?;
                if !is_link_enabled(&state, link) {
                    bail!("{label:?} is disabled on this page");
                }
                report(&self.list.navigate(link).await);
            }
            BrowseCommand::Sort(field) => report(&self.list.set_sort_field(&field).await?),
            BrowseCommand::Direction(direction) => {
                report(&self.list.set_sort_direction(direction).await)
            }
            BrowseCommand::Size(size) => report(&self.list.set_page_size(size).await?),
            BrowseCommand::Refresh => report(&self.list.fetch_page(None).await),
            BrowseCommand::Edit { target, fields } => {
                let state = self.list.snapshot().await;
                let mut resource = match EditTarget::resolve(&state, &target) {
                    EditTarget::Pending => bail!("the list is still loading"),
                    EditTarget::Missing => bail!("no record {target:?} on this page"),
                    EditTarget::New => Resource::new(),
                    EditTarget::Existing(resource) => resource,
                };
                resource.fields.extend(fields);
                match self.mutations.save(&resource).await? {
                    SaveOutcome::Created { created, refresh } => {
                        if let Some(id) = created.and_then(|created| created.id) {
                            println!("created #{id}");
                        }
                        report(&refresh);
                    }
                    SaveOutcome::Updated { refresh } => report(&refresh),
                }
            }
            BrowseCommand::Delete(id) => {
                let state = self.list.snapshot().await;
                let resource = match EditTarget::resolve(&state, &id) {
                    EditTarget::Existing(resource) => resource,
                    _ => bail!("no record {id:?} on this page"),
                };
                match self.mutations.delete(&resource).await? {
                    DeleteOutcome::Declined => println!("kept #{id}"),
                    DeleteOutcome::Deleted { refresh } => report(&refresh),
                }
            }
            BrowseCommand::Help => {
                let state = self.list.snapshot().await;
                println!("{HELP}\npage sizes: {}", render_size_options(state.page_size));
            }
            BrowseCommand::Quit => {}
        }
        Ok(())
    }

    async fn print_page(&self) {
        let state = self.list.snapshot().await;
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        print!("{}", render_page(&state, &self.collection, &columns));
    }
}

/// Failed loads keep the previous page on screen; say why.
pub fn report(outcome: &FetchOutcome) {
    if let FetchOutcome::Failed(err) = outcome {
        println!("request failed: {err}");
    }
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
