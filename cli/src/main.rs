//! Terminal host for the product management screen.
//!
//! Every invocation mounts the page (one list call), performs one action
//! through the page controller and prints the resulting table or
//! notifications.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use product_core::{
    ClientConfig, Column, FetchOutcome, Field, HttpTransport, Notification, NotificationLevel,
    ProductId, ProductService, ProductsPage, SortColumn, Sorting, SubmitOutcome,
};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "products", version, about = "Manage products on a catalog API")]
struct Cli {
    /// API base URL, e.g. http://127.0.0.1:8000/api/v1 (overrides PRODUCTS_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the product table
    List(ListArgs),
    /// Create a product
    Create(FieldArgs),
    /// Edit an existing product; omitted fields keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a product
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Server-side search term
    #[arg(long)]
    search: Option<String>,

    /// Client-side filter on the name column
    #[arg(long)]
    filter: Option<String>,

    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = product_core::table::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Hide a column (repeatable)
    #[arg(long = "hide", value_enum)]
    hidden: Vec<ColumnArg>,
}

#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

impl FieldArgs {
    fn values(&self) -> [(Field, Option<&String>); 4] {
        [
            (Field::Name, self.name.as_ref()),
            (Field::Description, self.description.as_ref()),
            (Field::Price, self.price.as_ref()),
            (Field::Category, self.category.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Price,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortColumn::Name,
            SortArg::Price => SortColumn::Price,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColumnArg {
    Name,
    Description,
    Price,
    Category,
}

impl From<ColumnArg> for Column {
    fn from(arg: ColumnArg) -> Self {
        match arg {
            ColumnArg::Name => Column::Name,
            ColumnArg::Description => Column::Description,
            ColumnArg::Price => Column::Price,
            ColumnArg::Category => Column::Category,
        }
    }
}

type Page = ProductsPage<HttpTransport>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load().context("loading client configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }
    init_tracing(&config.log_level, config.log_json);
    debug!(base_url = %config.base_url, "starting");

    let mut page = ProductsPage::new(ProductService::from_config(&config));
    let search = match &cli.command {
        Command::List(args) => args.search.as_deref(),
        _ => None,
    };
    if let FetchOutcome::Failed(error) = page.refresh(search) {
        print_notifications(&mut page);
        return Err(error).context("initial load failed");
    }

    match cli.command {
        Command::List(args) => list(&mut page, &args),
        Command::Create(fields) => {
            page.open_create();
            save(&mut page, &fields)
        }
        Command::Update { id, fields } => {
            let id = ProductId::new(id);
            if !page.open_edit(&id) {
                bail!("no product with id {id}");
            }
            save(&mut page, &fields)
        }
        Command::Delete { id, yes } => delete(&mut page, ProductId::new(id), yes),
    }
}

fn list(page: &mut Page, args: &ListArgs) -> Result<()> {
    let table = page.table_mut();
    if let Some(filter) = &args.filter {
        table.set_filter(filter.as_str());
    }
    table.set_sorting(args.sort.map(|column| Sorting {
        column: column.into(),
        descending: args.desc,
    }));
    for column in &args.hidden {
        table.set_visible((*column).into(), false);
    }
    table.set_page_size(args.page_size);
    page.go_to_page(args.page.saturating_sub(1));

    println!("{}", page.render_table());
    println!(
        "Page {} of {} ({} products)",
        page.table().page_index() + 1,
        page.table().page_count(page.products()),
        page.products().len()
    );
    Ok(())
}

fn save(page: &mut Page, fields: &FieldArgs) -> Result<()> {
    if let Some(form) = page.editor_mut() {
        for (field, value) in fields.values() {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }
    }

    let outcome = page.submit_editor();
    print_notifications(page);
    match outcome {
        SubmitOutcome::Saved(product) => {
            println!("{}", product.id);
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            bail!("the product has invalid fields")
        }
        SubmitOutcome::Rejected(error) => Err(error).context("the server rejected the product"),
        SubmitOutcome::NoEditor => bail!("no editor is open"),
    }
}

fn delete(page: &mut Page, id: ProductId, confirmed: bool) -> Result<()> {
    page.request_delete(id.clone());
    if !confirmed {
        page.cancel();
        println!("Deletion of {id} cancelled; pass --yes to confirm");
        return Ok(());
    }
    let result = page.confirm_delete();
    print_notifications(page);
    match result {
        Some(result) => result.with_context(|| format!("deleting product {id}")),
        None => bail!("no deletion was pending"),
    }
}

fn print_notifications(page: &mut Page) {
    for Notification {
        level,
        title,
        messages,
    } in page.take_notifications()
    {
        match level {
            NotificationLevel::Success => println!("✓ {title}"),
            NotificationLevel::Error => {
                eprintln!("✗ {title}");
                for message in messages {
                    eprintln!("  - {message}");
                }
            }
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("product_core={level},product_cli={level}");
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let builder = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
