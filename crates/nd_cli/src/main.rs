use clap::Parser;
use tracing::info;

use nd_client::ArticleGateway;
use nd_core::{
    source_options, Article, ArticleDraft, ArticleQuery, Result, SortOrder, SourceFilter,
    DEFAULT_PAGE_SIZE,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and edit news articles from the terminal", long_about = None)]
struct Cli {
    /// Base URL of the articles backend
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Launch the interactive UI (the default)
    Ui,
    /// List articles through the client-side query pipeline
    List {
        /// Case-insensitive search over title, content and summary
        #[arg(long, default_value = "")]
        search: String,
        /// Exact source to keep, or "all"
        #[arg(long, default_value = "all")]
        source: String,
        /// newest, oldest, title-asc or title-desc
        #[arg(long, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Show the distinct sources with article counts
    Sources,
    /// Print one article
    Show { id: String },
    /// Create an article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        img_url: Option<String>,
    },
    /// Update an article, overlaying only the provided fields
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        img_url: Option<String>,
    },
    /// Delete an article
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let gateway = ArticleGateway::new(&cli.api_url)?;

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => nd_tui::run(gateway).await?,
        Commands::List {
            search,
            source,
            sort,
            page,
            page_size,
        } => {
            let articles = gateway.list().await?;
            let query = ArticleQuery {
                search,
                source: SourceFilter::from_arg(&source),
                sort,
                page,
                page_size,
            };
            let result = query.run(&articles);
            for article in &result.items {
                print_row(article);
            }
            println!(
                "page {} of {} ({} matches)",
                query.page, result.total_pages, result.total_matches
            );
        }
        Commands::Sources => {
            let articles = gateway.list().await?;
            println!("all ({})", articles.len());
            for option in source_options(&articles) {
                println!("{} ({})", option.name, option.count);
            }
        }
        Commands::Show { id } => {
            let article = gateway.get(&id).await?;
            print_article(&article);
        }
        Commands::Create {
            title,
            content,
            url,
            summary,
            source,
            img_url,
        } => {
            let draft = ArticleDraft {
                title,
                content,
                url,
                summary,
                source,
                img_url,
                published_at: None,
            };
            let created = gateway.create(&draft).await?;
            info!("Article created successfully");
            print_article(&created);
        }
        Commands::Edit {
            id,
            title,
            content,
            url,
            summary,
            source,
            img_url,
        } => {
            let existing = gateway.get(&id).await?;
            let mut draft = ArticleDraft::from(&existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(content) = content {
                draft.content = content;
            }
            if let Some(url) = url {
                draft.url = url;
            }
            if summary.is_some() {
                draft.summary = summary;
            }
            if source.is_some() {
                draft.source = source;
            }
            if img_url.is_some() {
                draft.img_url = img_url;
            }
            let updated = gateway.update(&id, &draft).await?;
            info!("Article updated successfully");
            print_article(&updated);
        }
        Commands::Delete { id } => {
            gateway.delete(&id).await?;
            info!("Article deleted successfully");
        }
    }

    Ok(())
}

fn print_row(article: &Article) {
    let id = article.id.as_str().unwrap_or("-");
    let date = article
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no date".into());
    println!(
        "{:<24} {:<10} {:<12} {}",
        id,
        article.source_label(),
        date,
        article.title
    );
}

fn print_article(article: &Article) {
    println!("{}", article.title);
    if let Some(source) = &article.source {
        println!("source: {}", source.to_uppercase());
    }
    if let Some(published) = article.published_at {
        println!("published: {}", published.format("%B %e, %Y"));
    }
    println!();
    println!("{}", article.content);
    println!();
    println!("summary: {}", article.summary_text());
    println!("url: {}", article.url);
    if let Some(base_url) = article.base_url() {
        println!("from: {}", base_url);
    }
}
