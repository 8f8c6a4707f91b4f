use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    DeleteOutcome, Endpoints, FetchOutcome, ListController, MutationOrchestrator, PreConfirmed,
    ReqwestTransport, SaveOutcome, StayOnList,
};
use shared::domain::{Resource, ResourceId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod browse;
mod config;
mod render;

use browse::{parse_assignments, report, BrowseSession, ConsoleInput, StdinConfirmation};
use config::{load_settings, Settings};
use render::render_page;

#[derive(Parser, Debug)]
#[command(name = "paged-list", about = "Browse and edit a paginated REST collection")]
struct Cli {
    /// Base URL of the REST API.
    #[arg(long)]
    api_url: Option<String>,
    /// Collection path below the base URL.
    #[arg(long)]
    collection: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct ViewArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    per_page: Option<u32>,
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(long)]
    sort_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page and its pagination controls.
    List(ViewArgs),
    /// Page through the collection interactively.
    Browse(ViewArgs),
    /// Create a record, or update it when --id is given.
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Delete a record after confirmation.
    Delete {
        #[arg(long)]
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(v) = cli.api_url {
        settings.api_url = v;
    }
    if let Some(v) = cli.collection {
        settings.collection = v;
    }

    match cli.command {
        Command::List(view) => {
            let app = App::connect(&settings, &view)?;
            let outcome = app.first_load(view.page).await?;
            if let FetchOutcome::Failed(err) = outcome {
                bail!("failed to load {}: {err}", settings.collection);
            }
            app.print_page().await;
        }
        Command::Browse(view) => {
            let app = App::connect(&settings, &view)?;
            let first_load = app.first_load(view.page).await?;
            let input = ConsoleInput::new();
            let mutations = app.mutations(Arc::new(StdinConfirmation::new(Arc::clone(&input))));
            let session = BrowseSession {
                list: Arc::clone(&app.list),
                mutations,
                input,
                collection: settings.collection.clone(),
                columns: settings.sort_fields.clone(),
            };
            session.run(first_load).await?;
        }
        Command::Save { id, fields } => {
            let app = App::connect(&settings, &ViewArgs::default())?;
            let resource = Resource {
                id: id.as_deref().map(ResourceId::from_route),
                fields: parse_assignments(&fields)?,
            };
            let mutations = app.mutations(Arc::new(PreConfirmed));
            match mutations.save(&resource).await? {
                SaveOutcome::Created { created, refresh } => {
                    let id = created
                        .and_then(|created| created.id)
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "?".to_string());
                    println!("created #{id}");
                    report(&refresh);
                }
                SaveOutcome::Updated { refresh } => {
                    println!("updated #{}", id.unwrap_or_default());
                    report(&refresh);
                }
            }
            app.print_page().await;
        }
        Command::Delete { id, yes } => {
            let app = App::connect(&settings, &ViewArgs::default())?;
            report(&app.list.initialize().await);
            let target = ResourceId::from_route(&id);
            let resource = app
                .list
                .find_resource(&target)
                .await
                .unwrap_or_else(|| Resource::with_id(target));

            let mutations = if yes {
                app.mutations(Arc::new(PreConfirmed))
            } else {
                app.mutations(Arc::new(StdinConfirmation::new(ConsoleInput::new())))
            };
            match mutations.delete(&resource).await? {
                DeleteOutcome::Declined => println!("kept #{id}"),
                DeleteOutcome::Deleted { refresh } => {
                    println!("deleted #{id}");
                    report(&refresh);
                    app.print_page().await;
                }
            }
        }
    }

    Ok(())
}

struct App {
    transport: Arc<ReqwestTransport>,
    list: Arc<ListController>,
    collection: String,
    columns: Vec<String>,
}

impl App {
    fn connect(settings: &Settings, view: &ViewArgs) -> Result<Self> {
        let mut settings = settings.clone();
        if let Some(v) = view.per_page {
            settings.page_size = v;
        }
        if let Some(v) = &view.sort_by {
            settings.sort_field = v.clone();
        }
        if let Some(v) = &view.sort_dir {
            settings.sort_direction = v.clone();
        }

        let config = settings.list_config()?;
        let endpoints = Endpoints::new(&settings.api_url, &settings.collection)
            .context("invalid api location")?;
        let transport = Arc::new(ReqwestTransport::with_timeout(settings.request_timeout())?);
        info!(api_url = %settings.api_url, collection = %settings.collection, "console: connecting");

        Ok(Self {
            list: ListController::new(transport.clone(), endpoints, config),
            transport,
            collection: settings.collection,
            columns: settings.sort_fields,
        })
    }

    async fn first_load(&self, page: Option<u32>) -> Result<FetchOutcome> {
        Ok(match page {
            Some(page) => self.list.go_to_page(page).await?,
            None => self.list.initialize().await,
        })
    }

    fn mutations(
        &self,
        confirmer: Arc<dyn client_core::DeleteConfirmation>,
    ) -> MutationOrchestrator {
        MutationOrchestrator::new(
            self.transport.clone(),
            Arc::clone(&self.list),
            Arc::new(StayOnList),
            confirmer,
        )
    }

    async fn print_page(&self) {
        let state = self.list.snapshot().await;
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        print!("{}", render_page(&state, &self.collection, &columns));
    }
}
