//! blog_autopublish CLI
//!
//! Usage:
//!   blog_autopublish search "러스트 입문" --out posts.json
//!   blog_autopublish titles --posts posts.json --count 5 --out titles.txt
//!   blog_autopublish generate --titles titles.txt --out-dir articles
//!   blog_autopublish queue --dir articles --start "2026-10-20 09:00"
//!   blog_autopublish publish --dir articles --visibility private --launch

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use blog_autopublish::browser::{connect_to_browser_and_page, launch_browser, wait_for_login};
use blog_autopublish::models::{
    load_all_articles, load_queue_manifest, parse_schedule_time, queue_from_dir, BlogPost, PublishItem, Visibility,
};
use blog_autopublish::orchestrator::{
    default_start, generate_articles, validate_schedule, PublishBatch, DEFAULT_INTERVAL_MINS,
};
use blog_autopublish::services::{ArticleStore, BlogSearch, LlmService};
use blog_autopublish::utils::logging::{self, init_log_file, log_startup};
use blog_autopublish::utils::truncate_text;
use blog_autopublish::workflow::TistoryEditor;
use blog_autopublish::Config;

#[derive(Parser)]
#[command(name = "blog_autopublish")]
#[command(about = "📝 Search, generate and schedule blog posts")]
struct Cli {
    /// Debug logging for this crate
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search Naver blogs for a keyword
    Search {
        keyword: String,
        /// Save the posts as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate candidate titles from searched posts
    Titles {
        /// Posts saved by `search --out`
        #[arg(long, conflicts_with = "keyword")]
        posts: Option<PathBuf>,
        /// Search this keyword first
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Write one title per line
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write an article for each title
    Generate {
        /// File with one title per line
        #[arg(long)]
        titles: Option<PathBuf>,
        /// Title given directly, repeatable
        #[arg(long = "title")]
        title: Vec<String>,
        /// Defaults to DEFAULT_SAVE_PATH
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Writing instructions; a built-in prompt is used otherwise
        #[arg(long)]
        prompt_file: Option<PathBuf>,
    },
    /// List saved articles
    List {
        /// Defaults to DEFAULT_SAVE_PATH
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show the publish schedule without opening a browser
    Queue(QueueArgs),
    /// Schedule the queued articles on Tistory
    Publish {
        #[command(flatten)]
        queue: QueueArgs,
        #[arg(long, default_value = "public")]
        visibility: Visibility,
        /// Launch a browser with a persistent profile instead of attaching
        #[arg(long)]
        launch: bool,
        /// Only with --launch, once the profile holds a login
        #[arg(long, requires = "launch")]
        headless: bool,
        /// DevTools port of the running browser
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct QueueArgs {
    /// Queue every *.txt in this folder
    #[arg(long, conflicts_with = "manifest", required_unless_present = "manifest")]
    dir: Option<PathBuf>,
    /// TOML manifest with explicit times
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// First slot, "YYYY-MM-DD HH:MM"; defaults to five minutes from now
    #[arg(long, value_parser = parse_start)]
    start: Option<NaiveDateTime>,
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MINS)]
    interval_mins: i64,
}

fn parse_start(value: &str) -> Result<NaiveDateTime, String> {
    parse_schedule_time(value).ok_or_else(|| format!("expected YYYY-MM-DD HH:MM, got '{}'", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    logging::init(cli.verbose || config.verbose_logging);

    match cli.command {
        Commands::Search { keyword, out } => run_search(&config, &keyword, out.as_deref()).await,
        Commands::Titles {
            posts,
            keyword,
            count,
            out,
        } => run_titles(&config, posts.as_deref(), keyword.as_deref(), count, out.as_deref()).await,
        Commands::Generate {
            titles,
            title,
            out_dir,
            prompt_file,
        } => run_generate(&config, titles.as_deref(), title, out_dir, prompt_file.as_deref()).await,
        Commands::List { dir } => {
            run_list(&dir.unwrap_or_else(|| PathBuf::from(&config.default_save_path))).await
        }
        Commands::Queue(args) => run_queue(&args).await,
        Commands::Publish {
            queue,
            visibility,
            launch,
            headless,
            port,
        } => run_publish(config, &queue, visibility, launch, headless, port).await,
    }
}

async fn run_search(config: &Config, keyword: &str, out: Option<&Path>) -> Result<()> {
    log_startup("search");
    let posts = BlogSearch::new(config)?.search(keyword).await?;

    for (i, post) in posts.iter().enumerate() {
        info!("{:>2}. {}", i + 1, post.title);
        info!("    {}", truncate_text(&post.description, 80));
        debug!("{}", post.summary());
    }

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&posts)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("💾 글 {}건 저장: {}", posts.len(), path.display());
    }
    Ok(())
}

async fn run_titles(
    config: &Config,
    posts_file: Option<&Path>,
    keyword: Option<&str>,
    count: usize,
    out: Option<&Path>,
) -> Result<()> {
    log_startup("titles");

    let posts: Vec<BlogPost> = match (posts_file, keyword) {
        (Some(path), _) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("invalid posts file {}", path.display()))?
        }
        (None, Some(keyword)) => BlogSearch::new(config)?.search(keyword).await?,
        (None, None) => bail!("either --posts or --keyword is required"),
    };

    let titles = LlmService::new(config)?.generate_titles(&posts, count).await?;
    for (i, title) in titles.iter().enumerate() {
        info!("{:>2}. {}", i + 1, title);
    }

    if let Some(path) = out {
        let mut content = titles.join("\n");
        content.push('\n');
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("💾 제목 {}개 저장: {}", titles.len(), path.display());
    }
    Ok(())
}

async fn run_generate(
    config: &Config,
    titles_file: Option<&Path>,
    mut titles: Vec<String>,
    out_dir: Option<PathBuf>,
    prompt_file: Option<&Path>,
) -> Result<()> {
    log_startup("generate");

    if let Some(path) = titles_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        titles.extend(raw.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from));
    }
    if titles.is_empty() {
        bail!("no titles given; use --titles or --title");
    }

    let prompt = match prompt_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => String::new(),
    };

    let llm = LlmService::new(config)?;
    let store = ArticleStore::new(out_dir.unwrap_or_else(|| PathBuf::from(&config.default_save_path)));
    let report = generate_articles(&llm, &store, &titles, &prompt).await;

    if report.saved.is_empty() {
        bail!("no article could be generated");
    }
    Ok(())
}

async fn run_list(dir: &Path) -> Result<()> {
    log_startup("list");
    let articles = load_all_articles(dir).await?;
    if articles.is_empty() {
        warn!("⚠️ {} 폴더에 글이 없습니다", dir.display());
        return Ok(());
    }
    for (i, article) in articles.iter().enumerate() {
        let generated = article
            .generated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let file = article
            .source_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        info!("{:>2}. {}  {}  ({})", i + 1, generated, article.title, file);
    }
    Ok(())
}

async fn build_queue(args: &QueueArgs, now: NaiveDateTime) -> Result<Vec<PublishItem>> {
    if let Some(manifest) = &args.manifest {
        return load_queue_manifest(manifest).await;
    }
    let Some(dir) = &args.dir else {
        bail!("either --dir or --manifest is required");
    };
    if args.interval_mins < 0 {
        bail!("--interval-mins must not be negative");
    }
    let interval = Duration::try_minutes(args.interval_mins)
        .with_context(|| format!("--interval-mins {} is out of range", args.interval_mins))?;
    let start = args.start.unwrap_or_else(|| default_start(now));
    queue_from_dir(dir, start, interval).await
}

fn log_queue(items: &[PublishItem]) {
    for (i, item) in items.iter().enumerate() {
        info!(
            "{:>2}. {}  {}",
            i + 1,
            item.scheduled_at.format("%Y-%m-%d %H:%M"),
            item.label
        );
    }
}

async fn run_queue(args: &QueueArgs) -> Result<()> {
    log_startup("queue");
    let now = Local::now().naive_local();
    let items = build_queue(args, now).await?;
    if items.is_empty() {
        warn!("⚠️ 발행할 글이 없습니다");
        return Ok(());
    }
    log_queue(&items);
    validate_schedule(&items, now)?;
    info!("✓ {}건 모두 미래 시각으로 예약됨", items.len());
    Ok(())
}

async fn run_publish(
    config: Config,
    args: &QueueArgs,
    visibility: Visibility,
    launch: bool,
    headless: bool,
    port: Option<u16>,
) -> Result<()> {
    log_startup("publish");
    init_log_file(&config.output_log_file, "Publish log")?;

    let now = Local::now().naive_local();
    let items = build_queue(args, now).await?;
    if items.is_empty() {
        warn!("⚠️ 발행할 글이 없습니다");
        return Ok(());
    }
    log_queue(&items);
    // Reject the schedule before a browser is opened
    validate_schedule(&items, now)?;

    let (browser, page) = if launch {
        let (browser, page) = launch_browser(
            Path::new(&config.browser_profile_dir),
            &config.tistory_home_url,
            headless,
        )
        .await?;
        wait_for_login(
            &page,
            &config.tistory_login_url,
            &config.tistory_home_url,
            std::time::Duration::from_secs(config.login_wait_secs),
        )
        .await?;
        (browser, page)
    } else {
        connect_to_browser_and_page(
            port.unwrap_or(config.browser_debug_port),
            Some(&config.tistory_home_url),
            Some("tistory"),
        )
        .await?
    };

    let mut editor = TistoryEditor::new(browser, page, &config);
    let report = PublishBatch::new(&config, visibility)
        .with_progress(Box::new(|index, item, status| {
            debug!("#{} {} → {}", index + 1, item.label, status);
        }))
        .run(&mut editor, items, Local::now().naive_local())
        .await?;

    if report.failed() > 0 {
        warn!(
            "⚠️ 실패 {}건, 자세한 내용은 {} 참고",
            report.failed(),
            config.failure_log_file
        );
    }
    Ok(())
}
