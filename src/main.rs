use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kopf_console::config::Settings;
use kopf_console::es::{CatApi, EsClient, HotThreadsRequest, HotThreadsType};
use kopf_console::filters::{IndexFilter, IndexSortField, NodeFilter, NodeSortField};
use kopf_console::models::{Cluster, Paginator};
use kopf_console::monitor::{ClusterEvent, ClusterMonitor, RefreshOutcome};
use kopf_console::utils::{format_bytes, format_delta, format_number, format_uptime};

#[derive(Parser, Debug)]
#[command(name = "kopf-console")]
#[command(about = "OpenSearch / Elasticsearch cluster console", long_about = None)]
struct Args {
    /// URL clusteru (přepíše `location` ze settings.json)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Prefix cesty za hostem
    #[arg(long, global = true)]
    root_path: Option<String>,

    /// Timeout HTTP requestů v sekundách
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sleduje cluster a loguje změny mezi refreshi
    Watch {
        /// Jen jeden refresh
        #[arg(long)]
        once: bool,

        /// Perioda refreshe v ms
        #[arg(long)]
        refresh_rate: Option<u64>,

        /// Uloží refresh rate do local_settings.json
        #[arg(long)]
        save: bool,

        /// Regex (nebo podřetězec) pro názvy nodů, indexů a aliasů
        #[arg(long, default_value = "")]
        filter: String,

        #[arg(long)]
        hide_special: bool,

        #[arg(long)]
        unhealthy_only: bool,

        #[arg(long, default_value = "10")]
        page_size: usize,

        #[arg(long, value_enum, default_value_t = NodeSortField::Name)]
        node_sort: NodeSortField,

        #[arg(long, value_enum, default_value_t = IndexSortField::Name)]
        index_sort: IndexSortField,

        /// Řadit sestupně
        #[arg(long)]
        desc: bool,

        /// Vypisovat celý snapshot jako JSON
        #[arg(long)]
        json: bool,
    },

    /// Vypíše výstup cat API (aliases, count, master, plugins, recovery)
    Cat { api: CatApi },

    /// Vypíše hot threads
    HotThreads {
        /// ID nebo název nodu, bez něj všechny nody
        #[arg(long)]
        node: Option<String>,

        #[arg(long, default_value = "cpu")]
        kind: HotThreadsType,

        #[arg(long, default_value = "3")]
        threads: u32,

        #[arg(long, default_value = "500ms")]
        interval: String,

        #[arg(long)]
        include_idle: bool,
    },

    /// Aktualizuje cluster settings (JSON body)
    ClusterSettings { body: String },
}

struct WatchView {
    filter: String,
    hide_special: bool,
    unhealthy_only: bool,
    page_size: usize,
    node_sort: NodeSortField,
    index_sort: IndexSortField,
    asc: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializuj logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kopf_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI argumenty
    let args = Args::parse();

    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(host) = args.host {
        settings.location = host;
    }
    if let Some(root_path) = args.root_path {
        settings.opensearch_root_path = Some(root_path);
    }

    let client = EsClient::new(
        &settings.location,
        settings.root_path(),
        Duration::from_secs(args.timeout),
    )?;
    tracing::debug!("Using cluster at {}", client.base_url());

    match args.command {
        Command::Watch {
            once,
            refresh_rate,
            save,
            filter,
            hide_special,
            unhealthy_only,
            page_size,
            node_sort,
            index_sort,
            desc,
            json,
        } => {
            if let Some(refresh_rate) = refresh_rate {
                settings.refresh_rate = refresh_rate;
            }
            if save {
                if let Err(e) = settings.save_local() {
                    tracing::warn!("Failed to save local settings: {:#}", e);
                }
            }

            let view = WatchView {
                filter,
                hide_special,
                unhealthy_only,
                page_size,
                node_sort,
                index_sort,
                asc: !desc,
                json,
            };
            watch(&client, &settings, &view, once).await?;
        }
        Command::Cat { api } => {
            let table = client.cat(api).await?;
            print!("{}", table);
        }
        Command::HotThreads {
            node,
            kind,
            threads,
            interval,
            include_idle,
        } => {
            let request = HotThreadsRequest {
                node,
                kind,
                threads,
                interval,
                ignore_idle_threads: !include_idle,
            };
            let output = client.hot_threads(&request).await?;
            print!("{}", output);
        }
        Command::ClusterSettings { body } => {
            let body: serde_json::Value = serde_json::from_str(&body).context("Invalid settings JSON")?;
            let response = client.update_cluster_settings(&body).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

async fn watch(client: &EsClient, settings: &Settings, view: &WatchView, once: bool) -> Result<()> {
    let mut monitor = ClusterMonitor::new();
    monitor.subscribe(log_changes);

    let mut ticker = tokio::time::interval(settings.refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "Watching {} every {} ms",
        client.base_url(),
        settings.refresh_interval().as_millis()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                tracing::info!("Stopping");
                break;
            }
        }

        // Ctrl-C během fetche refresh zruší
        let outcome = tokio::select! {
            outcome = monitor.refresh(client) => outcome,
            _ = &mut shutdown => {
                tracing::info!("Stopping");
                break;
            }
        };

        match outcome {
            Ok(RefreshOutcome::Committed(cluster)) if view.json => print_json(&cluster)?,
            Ok(RefreshOutcome::Committed(cluster)) => print_overview(&cluster, view),
            Ok(_) => {}
            // Chyba už je zalogovaná, při sledování se pokračuje dalším tickem
            Err(e) if once => return Err(e.into()),
            Err(_) => {}
        }

        if once {
            break;
        }
    }

    Ok(())
}

fn log_changes(event: &ClusterEvent) {
    let changes = event.changes();

    for node in changes.node_joins().unwrap_or_default() {
        tracing::info!("Node joined: {} ({})", node.name, node.transport_address);
    }
    for node in changes.node_leaves().unwrap_or_default() {
        tracing::info!("Node left: {} ({})", node.name, node.transport_address);
    }
    for index in changes.indices_created().unwrap_or_default() {
        tracing::info!("Index created: {}", index.name);
    }
    for index in changes.indices_deleted().unwrap_or_default() {
        tracing::info!("Index deleted: {}", index.name);
    }

    if changes.doc_delta() != 0 {
        tracing::info!("Documents: {}", format_delta(changes.doc_delta()));
    }
    if changes.data_delta() != 0 {
        let sign = if changes.data_delta() > 0 { "+" } else { "-" };
        tracing::info!("Data: {}{}", sign, changes.abs_data_delta());
    }
}

fn print_json(cluster: &Cluster) -> Result<()> {
    let json = serde_json::to_string_pretty(cluster).context("Failed to serialize cluster snapshot")?;
    println!("{}", json);
    Ok(())
}

fn print_overview(cluster: &Cluster, view: &WatchView) {
    println!(
        "{} [{}] at {}",
        cluster.name,
        cluster.status,
        cluster.fetched_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  nodes: {} ({} data)  indices: {} ({} closed, {} special)  docs: {}  size: {}",
        cluster.number_of_nodes(),
        cluster.number_of_data_nodes,
        cluster.total_indices(),
        cluster.closed_indices,
        cluster.special_indices,
        format_number(cluster.num_docs),
        format_bytes(cluster.total_size_in_bytes)
    );
    println!(
        "  shards: {} active ({} primary), {} relocating, {} initializing, {} unassigned",
        cluster.active_shards,
        cluster.active_primary_shards,
        cluster.relocating_shards,
        cluster.initializing_shards,
        cluster.unassigned_shards
    );

    let mut node_filter = NodeFilter::new(&view.filter, true, true, true, 0);
    node_filter.sort = view.node_sort;
    node_filter.asc = view.asc;
    let mut nodes = Paginator::new(1, view.page_size, cluster.nodes.clone(), node_filter);
    let page = nodes.get_page();

    println!();
    println!("Nodes {}-{} of {}", page.first, page.last, page.total);
    for node in page.items() {
        println!(
            "  {} {:<24} {:<21} heap {:>3}%  disk {:>3}%  cpu {:>3}%  load {:>5.2}  up {}",
            if node.is_current_master() { "*" } else { " " },
            node.name,
            node.transport_address,
            node.heap_used_percent,
            node.disk_used_percent,
            node.cpu,
            node.load_average,
            format_uptime(node.uptime)
        );
    }

    let mut index_filter = IndexFilter::new(&view.filter, true, !view.hide_special, !view.unhealthy_only, view.asc, 0);
    index_filter.sort = view.index_sort;
    let mut indices = Paginator::new(1, view.page_size, cluster.indices.clone(), index_filter);
    let page = indices.get_page();

    println!();
    println!("Indices {}-{} of {}", page.first, page.last, page.total);
    for index in page.items() {
        println!(
            "  {:<32} {:<5} {}x{}  docs {:>14}  size {:>10}{}",
            index.name,
            index.state.as_str(),
            index.num_of_shards,
            index.num_of_replicas,
            index.num_docs_formatted(),
            index.size_formatted(),
            if index.unhealthy { "  unhealthy" } else { "" }
        );
    }
    println!();
}
