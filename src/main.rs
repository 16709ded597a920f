use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use folio_cms::{
    ArticleCollection,
    config::Config,
    date::{DateStyle, format_date},
    render,
};
use tracing::error;

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "FOLIO_CMS_CONFIG")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List articles, newest first
    List {
        #[clap(long, default_value = "all")]
        category: String,
        #[clap(long, default_value = "")]
        search: String,
        #[clap(long)]
        json: bool,
    },
    /// Render one article to HTML
    Show {
        id: String,
        /// Use the basic converter instead of the configured renderer
        #[clap(long)]
        basic: bool,
        #[clap(long)]
        json: bool,
    },
    /// Print the source identifiers that would be loaded
    Discover,
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let config = tokio::fs::read_to_string(&opts.config)
        .await
        .with_context(|| "read config")?;
    let config: Config = serde_yaml::from_str(&config)
        .with_context(|| format!("parse config from {}", opts.config.display()))?;
    let base_dir = opts.config.parent().unwrap_or(Path::new("."));
    let source = config.source(base_dir);

    match opts.command {
        Command::List {
            category,
            search,
            json,
        } => {
            let source_ids = config
                .resolve_source_ids(&source)
                .await
                .with_context(|| "resolve article list")?;
            let (mut collection, report) =
                ArticleCollection::load_with_report(&source_ids, &source, &config.reading).await;
            collection.set_category_filter(category.as_str());
            collection.set_search_query(search);
            let view = collection.filtered_view();
            let stats = collection.stats();
            if json {
                let out = serde_json::json!({
                    "articles": view,
                    "stats": stats,
                    "dropped": report.dropped.len(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if view.is_empty() {
                println!("No articles found");
            } else {
                for article in &view {
                    println!(
                        "{:<13} {:<14} {} ({})",
                        format_date(&article.date, DateStyle::Short),
                        article.category,
                        article.title,
                        article.read_time,
                    );
                }
                println!(
                    "\n{} of {} articles, {} categories, {} failed to load",
                    stats.shown,
                    stats.total,
                    stats.category_count,
                    report.dropped.len()
                );
            }
        }
        Command::Show { id, basic, json } => {
            let source_id = format!("{id}.md");
            let (collection, report) = ArticleCollection::load_with_report(
                std::slice::from_ref(&source_id),
                &source,
                &config.reading,
            )
            .await;
            if let Some(error) = report.dropped.into_iter().next() {
                return Err(error).with_context(|| format!("load article {id}"));
            }
            let article = collection
                .get(&id)
                .ok_or_else(|| anyhow!("article {id} not found"))?;
            let renderer = if basic {
                render::Renderer::Basic
            } else {
                config.renderer
            };
            let html = render::render_html(&article.content, renderer);
            if json {
                let out = serde_json::json!({
                    "article": article,
                    "displayDate": format_date(&article.date, DateStyle::Long),
                    "html": html,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{html}");
            }
        }
        Command::Discover => {
            let source_ids = config
                .resolve_source_ids(&source)
                .await
                .with_context(|| "resolve article list")?;
            for source_id in source_ids {
                println!("{source_id}");
            }
        }
    }
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(?e, "failed to start runtime");
            std::process::exit(1);
        }
    };
    if let Err(e) = runtime.block_on(run(opts)) {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
