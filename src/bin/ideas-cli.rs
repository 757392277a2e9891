use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ideas_relay::listing::pagination::{page_buttons, summary};
use ideas_relay::listing::{
    load_page_state, save_page_state, IdeasQuery, IdeasResponse, JsonFileStore, PageState,
    SortOrder,
};

#[derive(Parser)]
#[command(name = "ideas-cli")]
#[command(about = "Browse the Ideas listing through the relay", long_about = None)]
struct Cli {
    /// Relay base URL.
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// File holding the saved page state.
    #[arg(short, long, default_value = ".ideas-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the current page
    List,
    /// Go to the next page
    Next,
    /// Go to the previous page
    Prev,
    /// Jump to a page
    Page { number: u32 },
    /// Change items per page (10, 20 or 50)
    PerPage { size: u32 },
    /// Change sort order (newest or oldest)
    Sort { order: SortOrder },
    /// Print the saved page state
    ShowState,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let mut store = JsonFileStore::new(&cli.state);
    let mut state = load_page_state(&store);

    match cli.command {
        Commands::ShowState => {
            println!("{}", serde_json::to_string_pretty(&state)?);
            return Ok(());
        }
        Commands::List => {}
        Commands::Prev => state.prev(),
        Commands::Next => {
            // bounds come from the server, so look before moving
            let page = fetch_page(&client, &cli.url, &state).await?;
            state.next(page.meta.last_page);
        }
        Commands::Page { number } => {
            let page = fetch_page(&client, &cli.url, &state).await?;
            state.go_to(number, page.meta.last_page);
        }
        Commands::PerPage { size } => state.set_items_per_page(size)?,
        Commands::Sort { order } => state.set_sort(order),
    }

    save_page_state(&mut store, &state)?;
    let page = fetch_page(&client, &cli.url, &state).await?;
    print_page(&state, &page);
    Ok(())
}

async fn fetch_page(
    client: &reqwest::Client,
    base: &str,
    state: &PageState,
) -> Result<IdeasResponse, Box<dyn std::error::Error>> {
    let query = IdeasQuery::from(state).to_query_string();
    let res = client
        .get(format!("{}/api/ideas?{}", base.trim_end_matches('/'), query))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("relay returned status {status}: {text}").into());
    }
    Ok(res.json().await?)
}

fn print_page(state: &PageState, page: &IdeasResponse) {
    println!(
        "{}  (sort: {}, per page: {})",
        summary(state.current_page, state.items_per_page, page.meta.total),
        state.sort_by,
        state.items_per_page
    );
    if page.data.is_empty() {
        println!("No ideas found.");
    }
    for post in &page.data {
        println!("{}  {}", post.published_date(), post.title);
        println!("            {}", post.thumbnail_url());
    }

    let buttons: Vec<String> = page_buttons(state.current_page, page.meta.last_page)
        .iter()
        .map(ToString::to_string)
        .collect();
    if !buttons.is_empty() {
        println!("pages: {}", buttons.join(" "));
    }
}
