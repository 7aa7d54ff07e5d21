//! Command line search against the trove index named by `SHARE_URL`.

use clap::Parser;
use common::search_query::{ResourceTypeFilter, SortOption};
use frontend::api::search_api::ShareSearchTransport;
use frontend::pages::search_page::{SearchOutcome, SearchPage, SearchPageArgs};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "frontend", about = "Search a SHARE/trove index from the terminal")]
struct Cli {
    /// Free text; empty lists everything.
    #[arg(default_value = "")]
    text: String,

    /// One of -relevance, -dateCreated, dateCreated, -dateModified, dateModified.
    #[arg(long, default_value = "-relevance", allow_hyphen_values = true)]
    sort: SortOption,

    /// Restrict to one group, e.g. "Preprint" or "Agent".
    #[arg(long)]
    resource_type: Option<ResourceTypeFilter>,

    /// Follow the next-page cursor this many times.
    #[arg(long, default_value_t = 0)]
    pages: u32,

    /// List values of a related property (by short form label) after searching.
    #[arg(long)]
    facet: Option<String>,

    /// Print the parameters of every completed search as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("frontend=info,backend=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let print_json = cli.json;
    let args = SearchPageArgs {
        card_search_text: cli.text,
        sort: cli.sort,
        resource_type: cli.resource_type,
        ..Default::default()
    }
    .on_search(move |params| {
        if print_json {
            match serde_json::to_string(params) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("cannot encode search params: {}", e),
            }
        }
    })
    .on_error(|e| eprintln!("search failed: {:#}", e));
    let page = SearchPage::new(ShareSearchTransport, args);

    if page.search().await != SearchOutcome::Applied {
        anyhow::bail!("initial search did not complete");
    }
    print_page(&page);

    for _ in 0..cli.pages {
        let Some(next) = page.page_cursor().offered().next.clone() else {
            break;
        };
        if page.switch_page(&next).await? != SearchOutcome::Applied {
            break;
        }
        print_page(&page);
    }

    if let Some(facet) = cli.facet {
        let Some(property) = page
            .related_properties()
            .into_iter()
            .find(|p| p.short_form_label() == facet)
        else {
            anyhow::bail!("property not offered by this search: {}", facet);
        };
        let values = page.facet_values(&property, "").await?;
        println!("{} ({})", property.display_label(), property.card_search_result_count);
        for item in values.facet_values {
            println!("  {:>6}  {}  <{}>", item.count, item.display_string, item.value);
        }
    }

    Ok(())
}

fn print_page(page: &SearchPage<ShareSearchTransport>) {
    let Some(results) = page.results() else {
        return;
    };
    println!("{} results", results.total_result_count);
    for result in &results.results {
        let metadata = result.metadata();
        println!(
            "[{}] {}",
            metadata.resource_kind().as_str(),
            metadata.display_title().unwrap_or("(untitled)")
        );
        if let Some(url) = metadata.absolute_url() {
            println!("    {}", url);
        }
        if let Some(context) = result.context() {
            println!("    {}", context);
        }
    }
}
