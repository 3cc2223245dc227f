use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    load_settings, sort_filter::arrange, ActionClient, Arrangement, BindOptions, ControlHandle,
    ControlValue, FieldBinding, FileSelector, FilterState, HttpTransport, ListingProfile, Row,
    StoreTransport, TracingIndicator,
};
use serde_json::{Map, Value};
use shared::{
    domain::{CategoryTag, FieldKey, JobId, NodeIdent, ResourcePath, SortMode, SyncState},
    protocol::RenderJobDraft,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Command-line access to the render farm tracker")]
struct Cli {
    /// Overrides the server url from farm.toml / FARM_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one field through a debounced binding.
    Set {
        resource: String,
        key: String,
        value: String,
        /// Send the value as a checkbox boolean.
        #[arg(long)]
        checkbox: bool,
        /// Extra identifying fields sent with a checkbox write, as name=value.
        #[arg(long = "extra", value_parser = parse_extra)]
        extra: Vec<(String, String)>,
    },
    Checkpoint {
        asset: String,
    },
    ResetStats {
        asset: String,
    },
    Delete {
        asset: String,
    },
    Emergency {
        #[arg(value_enum)]
        mode: EmergencyMode,
    },
    Job {
        #[arg(value_enum)]
        op: JobOp,
        job: JobId,
    },
    Node {
        #[arg(value_enum)]
        op: NodeOp,
        node: String,
    },
    /// Submit a render job, prefilled from the file's info unless overridden.
    Render {
        path: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long = "final")]
        is_final: bool,
    },
    /// Print the rendered file selector for a directory.
    Selector {
        #[arg(default_value = "")]
        path: String,
        #[arg(long)]
        show_all: bool,
        #[arg(long)]
        inc_tail: bool,
    },
    /// Sort and filter a listing exported as a JSON array of rows.
    List {
        rows: PathBuf,
        #[arg(long, value_enum, default_value_t = Listing::Assets)]
        listing: Listing,
        #[arg(long, default_value = "name_asc")]
        sort: String,
        #[arg(long = "filter", default_value = "")]
        filter_text: String,
        /// Show only this category.
        #[arg(long)]
        only: Option<String>,
        /// Hide a category; may be repeated.
        #[arg(long)]
        hide: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmergencyMode {
    Stop,
    Start,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum JobOp {
    Pause,
    Resume,
    Remove,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NodeOp {
    Pause,
    Resume,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Listing {
    Assets,
    Shots,
}

fn parse_extra(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn print_arrangement(arrangement: &Arrangement) {
    for placement in &arrangement.placements {
        let marker = if placement.visible { ' ' } else { '-' };
        println!("{marker} {}", placement.id);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    let transport: Arc<dyn StoreTransport> = Arc::new(
        HttpTransport::new(&settings.server_url)
            .with_context(|| format!("invalid server url '{}'", settings.server_url))?,
    );
    let actions = ActionClient::new(Arc::clone(&transport));

    match cli.command {
        Command::Set {
            resource,
            key,
            value,
            checkbox,
            extra,
        } => {
            let resource = ResourcePath::new(resource);
            let key = FieldKey::new(key);
            let options = BindOptions::from_settings(&settings);
            let indicator = Arc::new(TracingIndicator);
            let mut binding = if checkbox {
                let checked = matches!(value.as_str(), "true" | "1" | "on" | "yes");
                let extra: Map<String, Value> = extra
                    .into_iter()
                    .map(|(name, value)| (name, Value::String(value)))
                    .collect();
                let mut binding = FieldBinding::checkbox(
                    ControlHandle::new(ControlValue::Checkbox(!checked)),
                    resource,
                    key,
                    extra,
                    Arc::clone(&transport),
                    indicator,
                    options,
                );
                binding.edit(ControlValue::Checkbox(checked));
                binding
            } else {
                let mut binding = FieldBinding::bind(
                    ControlHandle::new(ControlValue::text("")),
                    resource,
                    key,
                    Arc::clone(&transport),
                    indicator,
                    options,
                );
                binding.edit(ControlValue::Text(value));
                binding
            };
            binding.settle().await;
            if binding.state() == SyncState::Error {
                bail!(
                    "store rejected {}={} on {}",
                    binding.field().key,
                    binding.control().get().to_wire(),
                    binding.field().resource
                );
            }
            println!("stored");
        }
        Command::Checkpoint { asset } => {
            let at = actions.checkpoint(&asset).await?;
            println!("Checkpointed at {}", at.format("%H:%M:%S %Z"));
        }
        Command::ResetStats { asset } => {
            actions.reset_stats(&asset).await?;
            println!("render statistics reset");
        }
        Command::Delete { asset } => {
            actions.delete_asset(&asset).await?;
            println!("deleted {asset}");
        }
        Command::Emergency { mode } => {
            match mode {
                EmergencyMode::Stop => actions.emergency_stop().await?,
                EmergencyMode::Start => actions.emergency_start().await?,
            }
            println!("ok");
        }
        Command::Job { op, job } => {
            match op {
                JobOp::Pause => actions.pause_job(job).await?,
                JobOp::Resume => actions.resume_job(job).await?,
                JobOp::Remove => actions.remove_job(job).await?,
            }
            println!("ok");
        }
        Command::Node { op, node } => {
            let node = NodeIdent::new(node);
            match op {
                NodeOp::Pause => actions.pause_node(&node).await?,
                NodeOp::Resume => actions.resume_node(&node).await?,
            }
            println!("ok");
        }
        Command::Render {
            path,
            name,
            start,
            end,
            is_final,
        } => {
            let info = actions.file_info(&path).await?;
            let mut draft = RenderJobDraft::from_file_info(path, &info);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(start) = start {
                draft.start = start;
            }
            if let Some(end) = end {
                draft.end = end;
            }
            draft.is_final |= is_final;
            actions.submit_render_job(&draft).await?;
            println!("render job '{}' queued", draft.name);
        }
        Command::Selector {
            path,
            show_all,
            inc_tail,
        } => {
            let mut selector =
                FileSelector::new(Arc::clone(&transport), show_all, inc_tail, |path: &str| {
                    println!("{path}")
                });
            let html = selector.load(&path).await?;
            println!("{html}");
        }
        Command::List {
            rows,
            listing,
            sort,
            filter_text,
            only,
            hide,
        } => {
            let raw = fs::read_to_string(&rows)
                .with_context(|| format!("failed to read '{}'", rows.display()))?;
            let mut rows: Vec<Row> = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse rows in '{}'", rows.display()))?;
            let profile = match listing {
                Listing::Assets => ListingProfile::assets(),
                Listing::Shots => ListingProfile::shots(),
            };
            let mut filter =
                FilterState::all_enabled(rows.iter().map(|row| row.category.clone()));
            filter.text_filter = filter_text;
            if let Some(only) = only {
                for enabled in filter.categories.values_mut() {
                    *enabled = false;
                }
                filter.categories.insert(CategoryTag::new(only), true);
            }
            for tag in hide {
                filter.categories.insert(CategoryTag::new(tag), false);
            }

            filter.sort_mode = match sort.parse::<SortMode>() {
                Ok(mode) => mode,
                Err(err) => bail!(err.operator_message()),
            };
            let arrangement = arrange(&mut rows, &filter, &profile)
                .map_err(|err| anyhow!(err.operator_message()))?;
            print_arrangement(&arrangement);
        }
    }

    Ok(())
}
