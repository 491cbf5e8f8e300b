//! GiftLink CLI: browse and search listed gifts from the terminal.
//!
//! Talks to a running listing service over HTTP.

use clap::{Parser, Subcommand};
use std::sync::Arc;

use giftlink_cli::view::PRODUCT_ROUTE;
use giftlink_cli::{FetchOutcome, HttpGiftSource, SearchView, DEFAULT_BACKEND_URL};
use giftlink_core::{AgeCeiling, Category, Condition, Gift};

/// GiftLink CLI: find gifts by name, age, category, and condition.
#[derive(Parser)]
#[command(name = "gl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Listing service base URL
    #[arg(long, global = true, env = "GIFTLINK_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every gift
    Browse {
        /// Open the Nth card (1-indexed) after listing
        #[arg(long)]
        open: Option<usize>,
    },
    /// Search gifts with filters
    Search {
        /// Name contains (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Maximum age in years (1-10)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        max_age: Option<u8>,

        /// Living, Bedroom, Bathroom, Kitchen, or Office
        #[arg(long)]
        category: Option<Category>,

        /// New, "Like New", or Older
        #[arg(long)]
        condition: Option<Condition>,

        /// Open the Nth card (1-indexed) after searching
        #[arg(long)]
        open: Option<usize>,
    },
    /// Show one gift by id
    Show {
        /// Business id or native id
        id: String,
    },
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => fail(format!("Could not encode output: {e}")),
    }
}

fn print_gift(gift: &Gift, json: bool) {
    if json {
        print_json(gift);
        return;
    }
    for (field, value) in gift.fields() {
        match value.as_str() {
            Some(s) => println!("{field:<14} {s}"),
            None => println!("{field:<14} {value}"),
        }
    }
}

async fn show_results(view: &SearchView, outcome: FetchOutcome, open: Option<usize>, json: bool) {
    if outcome == FetchOutcome::Failed {
        fail("Could not reach the listing service");
    }

    if let Some(n) = open {
        let Some(index) = n.checked_sub(1) else {
            fail("Cards are numbered from 1");
        };
        let path = match view.select_card(index) {
            Ok(path) => path,
            Err(e) => fail(e),
        };
        let id = path.trim_start_matches(PRODUCT_ROUTE);
        match view.open_detail(id).await {
            Ok(Some(gift)) => {
                if !json {
                    println!("{path}\n");
                }
                print_gift(&gift, json);
            }
            Ok(None) => fail("Gift not found"),
            Err(e) => fail(e),
        }
        return;
    }

    if json {
        print_json(&view.results());
    } else {
        let page = view.render();
        print!("{page}");
        let count = page.cards().len();
        if count > 0 {
            eprintln!("\n{count} results");
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("giftlink=warn".parse().expect("static directive")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let source = match HttpGiftSource::new(&cli.backend_url) {
        Ok(s) => Arc::new(s),
        Err(e) => fail(e),
    };
    let mut view = SearchView::new(source);

    match cli.command {
        Commands::Browse { open } => {
            let outcome = view.load().await;
            show_results(&view, outcome, open, cli.json).await;
        }
        Commands::Search { name, max_age, category, condition, open } => {
            if let Some(name) = name {
                view.set_name(name);
            }
            if let Some(years) = max_age {
                match AgeCeiling::new(years) {
                    Ok(age) => view.set_max_age(age),
                    Err(e) => fail(e),
                }
            }
            view.set_category(category);
            view.set_condition(condition);
            let outcome = view.search().await;
            show_results(&view, outcome, open, cli.json).await;
        }
        Commands::Show { id } => match view.open_detail(&id).await {
            Ok(Some(gift)) => print_gift(&gift, cli.json),
            Ok(None) => fail("Gift not found"),
            Err(e) => fail(e),
        },
    }
}
