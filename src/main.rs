use clap::{Parser, Subcommand};
use forkify::dom::{Mount, MountStatus, Region, UiEvent};
use forkify::events::Action;
use forkify::{AppConfig, Controller};
use log::{debug, warn};
use std::num::NonZeroU32;

#[derive(Parser)]
#[command(name = "forkify", about = "Search, scale, bookmark and upload recipes")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search recipes and list one page of results
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show one recipe
    Show {
        id: String,
        /// Scale the ingredients to this many servings
        #[arg(long)]
        servings: Option<NonZeroU32>,
        /// Toggle the bookmark on this recipe
        #[arg(long)]
        bookmark: bool,
    },
    /// List saved bookmarks
    Bookmarks,
    /// Upload a recipe of your own
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        publisher: String,
        #[arg(long)]
        source_url: String,
        #[arg(long)]
        image: String,
        #[arg(long)]
        cooking_time: String,
        #[arg(long)]
        servings: String,
        /// "Quantity,Unit,Description", repeatable
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default());
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let config = AppConfig::load()?;
    debug!("Using {:?}", config);
    let mut app = Controller::from_config(&config)?;

    match cli.command {
        Command::Search { query, page } => {
            app.document_mut().fill(Region::Search, "query", &query);
            let submit = app.document().submit(Region::Search);
            app.dispatch(submit);
            app.settle().await;
            if page > 1 {
                app.show_page(page);
            }
            print_list(app.document().mount(Region::Results));
            print_text(app.document().mount(Region::Pagination));
        }
        Command::Show {
            id,
            servings,
            bookmark,
        } => {
            app.document_mut().push_hash(&id);
            app.dispatch(UiEvent::Load);
            app.settle().await;
            if let Some(servings) = servings {
                app.handle(Action::UpdateServings(servings));
            }
            if bookmark {
                app.handle(Action::ToggleBookmark);
            }
            print_text(app.document().mount(Region::Recipe));
        }
        Command::Bookmarks => {
            app.dispatch(UiEvent::Load);
            print_list(app.document().mount(Region::Bookmarks));
        }
        Command::Upload {
            title,
            publisher,
            source_url,
            image,
            cooking_time,
            servings,
            ingredients,
        } => {
            let fields = [
                ("title", title),
                ("sourceUrl", source_url),
                ("image", image),
                ("publisher", publisher),
                ("cookingTime", cooking_time),
                ("servings", servings),
            ];
            let document = app.document_mut();
            for (name, value) in fields {
                document.fill(Region::Upload, name, &value);
            }
            for (i, ingredient) in ingredients.iter().enumerate() {
                let name = format!("ingredient-{}", i + 1);
                if !document.fill(Region::Upload, &name, ingredient) {
                    warn!("Only 6 ingredients fit the form, skipping '{}'", ingredient);
                }
            }
            let submit = app.document().submit(Region::Upload);
            app.dispatch(submit);
            app.settle().await;

            print_text(app.document().mount(Region::Upload));
            if app.document().mount(Region::Upload).status() == MountStatus::Message {
                println!("#{}", app.document().hash());
                print_text(app.document().mount(Region::Recipe));
            }
        }
    }

    Ok(())
}

fn print_text(mount: &Mount) {
    let text = mount.text_content();
    if !text.is_empty() {
        println!("{}", text);
    }
}

/// One line per preview link: id, then title and publisher
fn print_list(mount: &Mount) {
    if mount.status() != MountStatus::Content {
        print_text(mount);
        return;
    }
    for index in mount.find_all("preview__link") {
        let Some(link) = mount.element(index) else {
            continue;
        };
        let id = link.attr("href").unwrap_or_default().trim_start_matches('#');
        let text = link.text_content();
        let label = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let marker = if link.has_class("preview__link--active") {
            "*"
        } else {
            " "
        };
        println!("{} {:<26} {}", marker, id, label);
    }
}
