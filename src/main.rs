use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use live_state_graph::render::{Report, render_html_report, render_json_report};
use live_state_graph::{GraphView, Platform, RootRule, Snapshot, ViewConfig};
use regex::Regex;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "live-state-graph")]
#[command(about = "Live resource-state graph viewer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a snapshot and write the view as HTML or JSON.
    Render {
        #[arg(long)]
        snapshot: String,

        /// Platform that reported the snapshot (application, kubernetes, ecs, cloudrun, lambda).
        #[arg(long, default_value = "application")]
        platform: Platform,

        /// Overrides the platform default (default, single-root-fan-out).
        #[arg(long)]
        root_rule: Option<RootRule>,

        /// Hide every kind matching this regex. May be repeated.
        #[arg(long = "hide-kind")]
        hide_kinds: Vec<String>,

        #[arg(long)]
        select: Option<String>,

        #[arg(long)]
        config: Option<String>,

        #[arg(long, value_enum, default_value = "html")]
        format: Format,

        #[arg(short = 'o', long)]
        out: String,
    },
    /// List resource kinds in a snapshot with their counts.
    Kinds {
        #[arg(long)]
        snapshot: String,

        #[arg(long, default_value = "application")]
        platform: Platform,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Render {
            snapshot,
            platform,
            root_rule,
            hide_kinds,
            select,
            config,
            format,
            out,
        } => {
            // 1) Config file, then CLI overrides.
            let mut view_config = match &config {
                Some(path) => ViewConfig::load(path).with_context(|| format!("load config {}", path))?,
                None => ViewConfig::default(),
            };
            if root_rule.is_some() {
                view_config.root_rule = root_rule;
            }

            // 2) Snapshot.
            let snap = Snapshot::from_path(&snapshot, platform)
                .with_context(|| format!("read snapshot {}", snapshot))?;

            // 3) Filter.
            let mut filter = live_state_graph::FilterState::from_resources(&snap.resources);
            for pattern in &hide_kinds {
                let re = Regex::new(pattern)
                    .with_context(|| format!("bad --hide-kind pattern {:?}", pattern))?;
                filter = filter.set_matching(&re, false);
            }

            // 4) View.
            let mut view = GraphView::new(&view_config, snap.platform);
            view.set_collection_with_filter(snap.collection_key(), snap.resources, filter);
            if let Some(id) = select {
                view.select(id.as_str());
                if view.selected().is_none() {
                    bail!("--select {}: no such visible resource", id);
                }
            }

            // 5) Write.
            let report = Report::from_view(&view, snap.platform, &view_config);
            let text = match format {
                Format::Html => render_html_report(&report)?,
                Format::Json => render_json_report(&report)?,
            };
            std::fs::write(&out, text).with_context(|| format!("write {}", out))?;
            println!("Wrote {}", out);
        }
        Commands::Kinds { snapshot, platform } => {
            let snap = Snapshot::from_path(&snapshot, platform)
                .with_context(|| format!("read snapshot {}", snapshot))?;
            for (kind, count) in snap.kind_counts() {
                println!("{}\t{}", if kind.is_empty() { "(none)" } else { kind }, count);
            }
        }
    }

    Ok(())
}
