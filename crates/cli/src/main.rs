use anyhow::Context;
use booksearch_app::books::{
    models::{SearchForm, SearchResponse, DEFAULT_RESULT_LIMIT},
    service::BookSearch,
};
use booksearch_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Search OpenLibrary from the terminal or run the HTTP service.
#[derive(Debug, Parser)]
#[command(name = "booksearch", version, about)]
struct Cli {
    /// Log at debug level instead of warnings only
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Run a single search and print the results
    Search {
        /// Title, author name or subject to look for
        query: String,
        /// What the query matches: title, author or subject
        #[arg(long, default_value = "title")]
        by: String,
        /// Maximum number of books to show (1-20)
        #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT)]
        limit: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load settings")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    match cli.command {
        Command::Serve => {
            booksearch_telemetry::init(&settings.telemetry)?;
            runtime.block_on(booksearch_app::serve(settings))
        }
        Command::Search { query, by, limit } => {
            settings.telemetry.filter = if cli.verbose { "debug" } else { "warn" }.to_string();
            booksearch_telemetry::init(&settings.telemetry)?;

            let form = SearchForm {
                search_query: query,
                search_type: Some(by),
                result_limit: Some(limit.to_string()),
            };
            let request = form.into_request()?;
            let search = BookSearch::from_settings(&settings.openlibrary)?;

            tracing::debug!(?request, "running search from the command line");

            let results = runtime.block_on(search.search(&request))?;
            print_results(&SearchResponse::new(&request, results));
            Ok(())
        }
    }
}

fn print_results(response: &SearchResponse) {
    println!(
        "{} result(s) for {} \"{}\", showing {}",
        response.total_found,
        response.search_type,
        response.search_query,
        response.books.len()
    );

    for (index, book) in response.books.iter().enumerate() {
        println!();
        println!("{}. {}", index + 1, book.title);
        println!("   by {}", book.authors);
        println!(
            "   first published {} (editions {}, published {})",
            book.year, book.edition_count, book.publish_years
        );
        println!("   isbn {}  languages {}", book.isbn, book.languages);
        println!("   subjects {}", book.subjects);
        if let Some(url) = &book.source_url {
            println!("   {}", url);
        }
        if let Some(url) = &book.cover_url {
            println!("   cover {}", url);
        }
    }
}
