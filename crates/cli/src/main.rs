//! `ayura`: the Ayura's Lab admin screens on the command line.
//!
//! Each list command fetches one collection, applies the search, status,
//! date-range and sort options, then prints the rows followed by summary
//! counts over the whole fetched list. Write commands call the backend and
//! report the outcome.
//!
//! ## Environment Variables
//! - `AYURA_API_URL`: backend base URL (default: "http://localhost:5000")
//! - `AYURA_SESSION_FILE`: session file (default: "$HOME/.ayura/session.json")
//! - `AYURA_UTC_OFFSET`: offset for day and month boundaries (default: "+00:00")
//! - `AYURA_HTTP_TIMEOUT_SECS`: request timeout (default: 30)
//! - `RUST_LOG`: log filter, logs go to stderr

mod render;

use anyhow::{bail, Context, Result};
use ayura_client::{
    refresh, screen, ApiClient, ClientError, ClientResult, ReportUpload, SharedScreen,
};
use ayura_core::models::{
    CategoryForm, LabTestForm, LabTestInput, Order, OrderStatus, Patient, Report, ReportStatus,
};
use ayura_core::{
    CoreConfig, DashboardError, DateRange, EnvValues, ListScreen, LoadState, QueryFor, Record,
    Selection, SessionHandle, SessionStore, SortDirection, ViewContext,
};
use clap::{Args, Parser, Subcommand};
use std::convert::Infallible;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ayura")]
#[command(about = "Ayura's Lab admin console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Admin email address
        email: String,
        /// Admin password
        #[arg(long, env = "AYURA_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Test orders
    #[command(subcommand)]
    Orders(OrderCommands),
    /// Lab reports
    #[command(subcommand)]
    Reports(ReportCommands),
    /// Registered patients
    #[command(subcommand)]
    Patients(PatientCommands),
    /// Lab test catalog
    #[command(subcommand)]
    Tests(TestCommands),
    /// Test categories
    #[command(subcommand)]
    Categories(CategoryCommands),
    /// Customer testimonials
    #[command(subcommand)]
    Testimonials(TestimonialCommands),
}

/// Filter and sort options shared by the list commands.
#[derive(Args, Debug, Default)]
struct ListArgs {
    /// Case-insensitive text to look for
    #[arg(long, default_value = "")]
    search: String,
    /// Only show this status ("all" shows every status)
    #[arg(long)]
    status: Option<String>,
    /// Date bucket: all, today, week, month or quarter
    #[arg(long, default_value = "all")]
    range: DateRange,
    /// Sort key (newest first when omitted)
    #[arg(long)]
    sort: Option<String>,
    /// Sort by --sort descending instead of ascending
    #[arg(long, requires = "sort")]
    desc: bool,
}

impl ListArgs {
    /// Build the view query for record kind `R`, without the status filter.
    fn query<R>(&self) -> Result<QueryFor<R>>
    where
        R: Record,
        R::SortKey: FromStr<Err = DashboardError> + Default,
    {
        let mut query = QueryFor::<R>::default()
            .with_search(self.search.trim())
            .with_date_range(self.range);

        if let Some(raw) = &self.sort {
            let direction = if self.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            query = query.with_sort(raw.parse()?, direction);
        }
        Ok(query)
    }

    fn status<S: FromStr<Err = Infallible>>(&self) -> Selection<S> {
        self.status
            .as_deref()
            .map(|raw| Selection::parse(raw).unwrap_or_else(|never| match never {}))
            .unwrap_or_default()
    }
}

#[derive(Subcommand)]
enum OrderCommands {
    /// List all orders
    List(ListArgs),
    /// List orders waiting for approval
    Pending(ListArgs),
    /// Approve an order
    Approve { id: String },
    /// Deny an order
    Deny { id: String },
    /// Set an order's status
    Status { id: String, status: String },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// List reports
    List(ListArgs),
    /// Summary counts over all reports
    Stats,
    /// Set a report's status
    Status { id: String, status: String },
    /// Upload the result document for a report
    Upload {
        id: String,
        /// PDF or image file to upload
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum PatientCommands {
    /// List patients
    List(ListArgs),
    /// Summary counts over all patients
    Stats,
}

/// Fields of a lab test catalog entry.
#[derive(Args)]
struct TestFields {
    name: String,
    category: String,
    price: f64,
    #[arg(long)]
    discounted_price: Option<f64>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    sample_type: Option<String>,
    /// Reporting time, e.g. "24 hours"
    #[arg(long)]
    turnaround: Option<String>,
    /// Hide the test from the public catalog
    #[arg(long)]
    inactive: bool,
}

impl TestFields {
    fn into_form(self) -> Result<LabTestForm> {
        let form = LabTestForm::validate(LabTestInput {
            name: self.name,
            category: self.category,
            price: self.price,
            discounted_price: self.discounted_price,
            description: self.description,
            sample_type: self.sample_type,
            turnaround_time: self.turnaround,
            inactive: self.inactive,
        })?;
        Ok(form)
    }
}

#[derive(Subcommand)]
enum TestCommands {
    /// List catalog tests
    List,
    /// Add a test to the catalog
    Add(TestFields),
    /// Replace a catalog test
    Update {
        id: String,
        #[command(flatten)]
        fields: TestFields,
    },
    /// Remove a test from the catalog
    Delete { id: String },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    List,
    /// Add a category
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename or re-describe a category
    Update {
        id: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a category
    Delete { id: String },
}

#[derive(Subcommand)]
enum TestimonialCommands {
    /// List testimonials
    List {
        /// Only show testimonials awaiting approval
        #[arg(long)]
        pending: bool,
    },
    /// Publish a testimonial
    Approve { id: String },
    /// Remove a testimonial
    Delete { id: String },
}

/// Main entry point for the admin console.
///
/// Loads `.env`, installs logging, resolves configuration and the stored
/// session once, then runs the requested command. Command failures are
/// printed with a hint and exit with status 1.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("ayura=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'ayura --help' for commands");
        return Ok(());
    };

    let cfg = load_config()?;
    let session = SessionHandle::open(SessionStore::new(cfg.session_file()))?;
    let client = ApiClient::new(&cfg, session)?;
    tracing::debug!("using backend {}", client.base_url());

    if let Err(e) = run(command, &client, &cfg).await {
        eprintln!("Error: {e:#}");
        if let Some(hint) = hint_for(&e) {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn load_config() -> Result<CoreConfig> {
    let var = |key: &str| std::env::var(key).ok();
    let cfg = CoreConfig::from_env_values(EnvValues {
        api_url: var("AYURA_API_URL"),
        session_file: var("AYURA_SESSION_FILE"),
        utc_offset: var("AYURA_UTC_OFFSET"),
        http_timeout_secs: var("AYURA_HTTP_TIMEOUT_SECS"),
        home_dir: dirs::home_dir(),
    })
    .context("invalid configuration")?;
    Ok(cfg)
}

/// What the user can do about a failed command, if anything.
fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    let client_err = err.downcast_ref::<ClientError>()?;
    if client_err.needs_login() {
        Some("Run `ayura login <email>` to sign in.")
    } else if client_err.is_retryable() {
        Some("The backend is unreachable or busy; try again shortly.")
    } else {
        None
    }
}

/// Fetch one collection into a fresh screen.
///
/// # Errors
///
/// Returns the client error when the fetch fails, so `hint_for` can still
/// tell an expired session from an unreachable backend. A screen left in
/// any state other than [`LoadState::Ready`] is also an error.
async fn load_screen<R, F>(query: QueryFor<R>, fetch: F) -> Result<SharedScreen<R>>
where
    R: Record,
    F: Future<Output = ClientResult<Vec<R>>>,
{
    let shared = screen::shared(ListScreen::new(query));
    refresh(&shared, fetch).await?;
    match screen::lock(&shared).state() {
        LoadState::Ready => {}
        LoadState::Failed(message) => bail!("{message}"),
        LoadState::Idle | LoadState::Loading => bail!("list fetch was superseded"),
    }
    Ok(shared)
}

async fn run(command: Commands, client: &ApiClient, cfg: &CoreConfig) -> Result<()> {
    let ctx = ViewContext::current(cfg.utc_offset());

    match command {
        Commands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            let name = session
                .admin
                .as_ref()
                .map(|a| a.display_name())
                .unwrap_or(email.trim());
            println!("Signed in as {name}");
        }
        Commands::Logout => {
            client.logout()?;
            println!("Signed out.");
        }
        Commands::Whoami => match client.session().current() {
            Some(session) => {
                let name = session
                    .admin
                    .as_ref()
                    .map(|a| a.display_name())
                    .unwrap_or("admin");
                println!(
                    "{name} (signed in {})",
                    session
                        .started_at
                        .with_timezone(&ctx.offset)
                        .format("%Y-%m-%d %H:%M")
                );
            }
            None => println!("Not signed in."),
        },

        Commands::Orders(OrderCommands::List(args)) => {
            let mut query = args.query::<Order>()?;
            query.status = args.status::<OrderStatus>();
            let shared = load_screen(query, client.list_orders()).await?;
            let screen = screen::lock(&shared);
            let rows = screen.rows(&ctx);
            render::print_orders(&rows, ctx.offset);
            println!();
            println!(
                "{}",
                render::format_summary(&screen.summary(&ctx), Some(rows.len()), "patients", true)
            );
        }
        Commands::Orders(OrderCommands::Pending(args)) => {
            let mut query = args.query::<Order>()?;
            query.status = args.status::<OrderStatus>();
            let shared = load_screen(query, client.list_pending_orders()).await?;
            let screen = screen::lock(&shared);
            let rows = screen.rows(&ctx);
            render::print_orders(&rows, ctx.offset);
            println!();
            println!(
                "{}",
                render::format_summary(&screen.summary(&ctx), Some(rows.len()), "patients", false)
            );
        }
        Commands::Orders(OrderCommands::Approve { id }) => {
            client
                .approve_order(&id)
                .await
                .with_context(|| format!("approving order {id}"))?;
            println!("Approved order {id}");
        }
        Commands::Orders(OrderCommands::Deny { id }) => {
            client
                .deny_order(&id)
                .await
                .with_context(|| format!("denying order {id}"))?;
            println!("Denied order {id}");
        }
        Commands::Orders(OrderCommands::Status { id, status }) => {
            let status = OrderStatus::from_wire(&status);
            if !status.is_known() {
                tracing::warn!("'{status}' is not a known order status, sending it as given");
            }
            client
                .update_order_status(&id, &status)
                .await
                .with_context(|| format!("updating order {id}"))?;
            println!("Order {id} is now {status}");
        }

        Commands::Reports(ReportCommands::List(args)) => {
            let mut query = args.query::<Report>()?;
            query.status = args.status::<ReportStatus>();
            let shared = load_screen(query, client.list_reports()).await?;
            let screen = screen::lock(&shared);
            let rows = screen.rows(&ctx);
            render::print_reports(&rows, ctx.offset);
            println!();
            println!(
                "{}",
                render::format_summary(&screen.summary(&ctx), Some(rows.len()), "patients", true)
            );
        }
        Commands::Reports(ReportCommands::Stats) => {
            let shared = load_screen(QueryFor::<Report>::default(), client.list_reports()).await?;
            let screen = screen::lock(&shared);
            println!(
                "{}",
                render::format_summary(&screen.summary(&ctx), None, "patients", true)
            );
        }
        Commands::Reports(ReportCommands::Status { id, status }) => {
            let status = ReportStatus::from_wire(&status);
            if !status.is_known() {
                tracing::warn!("'{status}' is not a known report status, sending it as given");
            }
            client
                .update_report_status(&id, &status)
                .await
                .with_context(|| format!("updating report {id}"))?;
            println!("Report {id} is now {status}");
        }
        Commands::Reports(ReportCommands::Upload { id, file }) => {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("{} has no usable file name", file.display()))?
                .to_string();
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            if bytes.is_empty() {
                bail!("{} is empty", file.display());
            }

            let url = client
                .upload_report(&id, ReportUpload::new(file_name, bytes))
                .await
                .with_context(|| format!("uploading report {id}"))?;
            match url {
                Some(url) => println!("Uploaded report {id}: {url}"),
                None => println!("Uploaded report {id}"),
            }
        }

        Commands::Patients(PatientCommands::List(args)) => {
            if args.status.is_some() {
                bail!("patients have no status to filter on");
            }
            let shared = load_screen(args.query::<Patient>()?, client.list_patients()).await?;
            let screen = screen::lock(&shared);
            let rows = screen.rows(&ctx);
            render::print_patients(&rows, ctx.offset);
            println!();
            println!(
                "{}",
                render::format_summary(&screen.summary(&ctx), Some(rows.len()), "emails", false)
            );
        }
        Commands::Patients(PatientCommands::Stats) => {
            let shared = load_screen(QueryFor::<Patient>::default(), client.list_patients()).await?;
            let screen = screen::lock(&shared);
            println!(
                "{}",
                render::format_summary(&screen.summary(&ctx), None, "emails", false)
            );
        }

        Commands::Tests(TestCommands::List) => {
            let tests = client.list_lab_tests().await?;
            render::print_lab_tests(&tests);
        }
        Commands::Tests(TestCommands::Add(fields)) => {
            let created = client.create_lab_test(&fields.into_form()?).await?;
            println!("Added test {} ({})", created.name, created.id);
        }
        Commands::Tests(TestCommands::Update { id, fields }) => {
            let updated = client
                .update_lab_test(&id, &fields.into_form()?)
                .await
                .with_context(|| format!("updating test {id}"))?;
            println!("Updated test {}", updated.name);
        }
        Commands::Tests(TestCommands::Delete { id }) => {
            client
                .delete_lab_test(&id)
                .await
                .with_context(|| format!("deleting test {id}"))?;
            println!("Deleted test {id}");
        }

        Commands::Categories(CategoryCommands::List) => {
            let categories = client.list_categories().await?;
            render::print_categories(&categories);
        }
        Commands::Categories(CategoryCommands::Add { name, description }) => {
            let created = client
                .create_category(&CategoryForm::new(&name, description)?)
                .await?;
            println!("Added category {} ({})", created.name, created.id);
        }
        Commands::Categories(CategoryCommands::Update {
            id,
            name,
            description,
        }) => {
            let updated = client
                .update_category(&id, &CategoryForm::new(&name, description)?)
                .await
                .with_context(|| format!("updating category {id}"))?;
            println!("Updated category {}", updated.name);
        }
        Commands::Categories(CategoryCommands::Delete { id }) => {
            client
                .delete_category(&id)
                .await
                .with_context(|| format!("deleting category {id}"))?;
            println!("Deleted category {id}");
        }

        Commands::Testimonials(TestimonialCommands::List { pending }) => {
            let testimonials = client.list_testimonials().await?;
            let shown: Vec<_> = testimonials
                .iter()
                .filter(|t| !pending || !t.approved)
                .collect();
            render::print_testimonials(&shown, ctx.offset);
        }
        Commands::Testimonials(TestimonialCommands::Approve { id }) => {
            client
                .approve_testimonial(&id)
                .await
                .with_context(|| format!("approving testimonial {id}"))?;
            println!("Approved testimonial {id}");
        }
        Commands::Testimonials(TestimonialCommands::Delete { id }) => {
            client
                .delete_testimonial(&id)
                .await
                .with_context(|| format!("deleting testimonial {id}"))?;
            println!("Deleted testimonial {id}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ayura_core::models::{OrderSortKey, PatientSortKey};
    use ayura_core::SortSpec;

    fn list_args(argv: &[&str]) -> ListArgs {
        let mut full = vec!["ayura", "orders", "list"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).expect("arguments should parse").command {
            Some(Commands::Orders(OrderCommands::List(args))) => args,
            _ => panic!("expected orders list"),
        }
    }

    #[test]
    fn test_default_list_query_is_newest_first() {
        let query = list_args(&[]).query::<Order>().expect("query should build");

        assert!(query.is_unfiltered());
        assert_eq!(query.sort, SortSpec::descending(OrderSortKey::Date));
    }

    #[test]
    fn test_list_options_build_query() {
        let args = list_args(&[
            "--search", " asha ", "--status", "Completed", "--range", "week", "--sort", "priority",
            "--desc",
        ]);
        let mut query = args.query::<Order>().expect("query should build");
        query.status = args.status::<OrderStatus>();

        assert_eq!(query.search, "asha");
        assert_eq!(query.status, Selection::Only(OrderStatus::Completed));
        assert_eq!(query.date_range, DateRange::Week);
        assert_eq!(query.sort, SortSpec::descending(OrderSortKey::Priority));
    }

    #[test]
    fn test_sort_without_desc_is_ascending() {
        let query = list_args(&["--sort", "name"])
            .query::<Patient>()
            .expect("query should build");

        assert_eq!(query.sort, SortSpec::ascending(PatientSortKey::Name));
    }

    #[test]
    fn test_status_all_clears_filter() {
        let args = list_args(&["--status", "all"]);
        assert_eq!(args.status::<OrderStatus>(), Selection::All);
    }

    #[test]
    fn test_unknown_sort_key_is_rejected() {
        let err = list_args(&["--sort", "colour"])
            .query::<Order>()
            .expect_err("unknown sort key should fail");
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_desc_requires_sort() {
        let result = Cli::try_parse_from(["ayura", "orders", "list", "--desc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_screen_surfaces_client_error() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime should build");
        let err = rt
            .block_on(load_screen::<Order, _>(QueryFor::<Order>::default(), async {
                Err(ClientError::Unauthorized)
            }))
            .expect_err("failed fetch should be an error");

        assert!(matches!(err.downcast_ref::<ClientError>(), Some(ClientError::Unauthorized)));
        assert_eq!(hint_for(&err), Some("Run `ayura login <email>` to sign in."));
    }

    #[test]
    fn test_loaded_screen_renders_rows() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime should build");
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            { "_id": "o-1", "status": "pending" },
            { "_id": "o-2", "status": "completed" }
        ]))
        .expect("orders should decode");
        let shared = rt
            .block_on(load_screen(QueryFor::<Order>::default(), async { Ok(orders) }))
            .expect("fetch should load");
        let screen = screen::lock(&shared);

        assert_eq!(screen.state(), &LoadState::Ready);
        let utc = chrono::FixedOffset::east_opt(0).expect("zero offset is valid");
        assert_eq!(screen.rows(&ViewContext::current(utc)).len(), 2);
    }

    #[test]
    fn test_unknown_range_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["ayura", "reports", "list", "--range", "fortnight"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_hint_for_login_errors() {
        let err = anyhow::Error::from(ClientError::Unauthorized).context("listing orders");
        assert_eq!(hint_for(&err), Some("Run `ayura login <email>` to sign in."));

        let err = anyhow::anyhow!("something else");
        assert_eq!(hint_for(&err), None);
    }
}
