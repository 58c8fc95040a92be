use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use expense_advisor::config::{ClientConfig, ConfigError, layered_lookup};
use expense_advisor::net::types::{Expense, ReportFormat, TransactionType, UserProfile};
use expense_advisor::net::{ApiError, ExpenseApi, HttpApi};
use expense_advisor::services::chat::ChatTranscript;
use expense_advisor::services::forms::{FormError, validate_login, validate_signup};
use expense_advisor::services::ledger::{self, ExpenseForm, MonthCursor};
use expense_advisor::services::profile::{self, ProfileError, ProfileForm};
use expense_advisor::services::reports::{self, ReportError, ReportRequest};
use expense_advisor::state::{AuthFailure, AuthScreen, AuthSession, Route};
use expense_advisor::storage::{FileStorage, LocalStorage, StorageError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Auth(#[from] AuthFailure),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("failed to clear saved token: {0}")]
    Storage(#[from] StorageError),
    #[error("not signed in; run `expense-advisor login` or `expense-advisor signup` first")]
    NotSignedIn,
    #[error("profile incomplete; run `expense-advisor profile setup` first")]
    ProfileIncomplete,
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "expense-advisor", about = "Expense Advisor command-line client")]
struct Cli {
    /// Backend base URL; takes precedence over EXPENSE_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the saved token (overrides EXPENSE_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(LoginArgs),
    Signup(SignupArgs),
    Logout,
    /// Show the signed-in user's profile.
    Whoami,
    /// Show which screen the app would open on.
    Route,
    Profile(ProfileCommand),
    Expenses(ExpensesCommand),
    Stats(StatsCommand),
    Report(ReportArgs),
    /// Ask the AI advisor a question.
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Read from stdin when omitted.
    #[arg(long, env = "EXPENSE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "EXPENSE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Defaults to a second stdin prompt.
    #[arg(long)]
    confirm_password: Option<String>,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Setup(ProfileSetupArgs),
}

#[derive(Args, Debug)]
struct ProfileSetupArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    monthly_salary: String,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "")]
    mobile_number: String,
    #[arg(long, default_value = "")]
    monthly_income: String,
    #[arg(long, default_value = profile::DEFAULT_CURRENCY)]
    currency: String,
    #[arg(long, default_value_t = 1)]
    monthly_cycle_start: u8,
    #[arg(long, default_value_t = false)]
    no_monthly_report: bool,
    /// `HH:MM`, or empty to disable.
    #[arg(long, default_value = profile::DEFAULT_REMINDER_TIME)]
    daily_reminder_time: String,
}

#[derive(Args, Debug)]
struct ExpensesCommand {
    #[command(subcommand)]
    command: ExpensesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ExpensesSubcommand {
    /// List a month's transactions, newest first.
    List {
        #[command(flatten)]
        month: MonthArgs,
        /// Case-insensitive match on details; totals cover the matches only.
        #[arg(long)]
        search: Option<String>,
        /// Group transactions under their day.
        #[arg(long, default_value_t = false)]
        by_day: bool,
    },
    Add(ExpenseArgs),
    Update {
        id: i64,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct ExpenseArgs {
    #[arg(long)]
    details: String,
    #[arg(long)]
    amount: String,
    /// `credit` or `debit`.
    #[arg(long = "type", default_value = "debit")]
    transaction_type: TransactionType,
    /// `YYYY-MM-DD`; defaults to today.
    #[arg(long, value_parser = ledger::parse_date)]
    date: Option<time::Date>,
}

/// Month selection shared by listing commands.
#[derive(Args, Debug)]
struct MonthArgs {
    /// `YYYY-MM`; defaults to the current month.
    #[arg(long)]
    month: Option<MonthCursor>,
    /// Step back one month from `--month`.
    #[arg(long, default_value_t = false, conflicts_with = "next")]
    prev: bool,
    /// Step forward one month from `--month`.
    #[arg(long, default_value_t = false)]
    next: bool,
}

impl MonthArgs {
    /// The selected month, limited to the years the month picker offers.
    fn resolve(&self) -> Result<MonthCursor, FormError> {
        let mut month = self.month.unwrap_or_else(MonthCursor::current);
        if self.prev {
            month = month.previous();
        } else if self.next {
            month = month.next();
        }
        ledger::check_pickable(month, ledger::today().year())?;
        Ok(month)
    }
}

#[derive(Args, Debug)]
struct StatsCommand {
    #[command(subcommand)]
    command: StatsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StatsSubcommand {
    /// Credit/debit totals for one month.
    Month {
        #[command(flatten)]
        month: MonthArgs,
    },
    /// Last four months at a glance.
    Dashboard,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// `pdf` or `excel`.
    format: ReportFormat,
    /// `YYYY-MM`; defaults to the current month.
    #[arg(long)]
    from: Option<MonthCursor>,
    /// `YYYY-MM`; defaults to the current month.
    #[arg(long)]
    to: Option<MonthCursor>,
    /// `credit`, `debit`, or `both`.
    #[arg(long = "type", default_value = "both", value_parser = parse_type_filter)]
    transaction_type: TypeFilter,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy)]
struct TypeFilter(Option<TransactionType>);

fn parse_type_filter(raw: &str) -> Result<TypeFilter, String> {
    if raw.trim().eq_ignore_ascii_case("both") {
        return Ok(TypeFilter(None));
    }
    raw.parse().map(|t| TypeFilter(Some(t)))
}

type Session = AuthSession<HttpApi>;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let overrides: Vec<(&str, String)> = cli
        .api_url
        .map(|url| ("EXPENSE_API_URL", url))
        .into_iter()
        .collect();
    let mut config = ClientConfig::from_lookup(layered_lookup(&overrides, |key| std::env::var(key).ok()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(&config.data_dir));
    let api = HttpApi::new(&config, storage.clone())?;
    let mut auth = AuthSession::new(api, storage);
    auth.bootstrap().await;
    tracing::debug!(api_url = %config.api_url, route = %auth.route(AuthScreen::Login), "session bootstrapped");

    let json = cli.json;
    match cli.command {
        Command::Login(args) => run_login(&mut auth, args).await,
        Command::Signup(args) => run_signup(&mut auth, args).await,
        Command::Logout => {
            auth.logout()?;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => run_whoami(&auth, json),
        Command::Route => {
            println!("{}", auth.route(AuthScreen::Login));
            Ok(())
        }
        Command::Profile(cmd) => match cmd.command {
            ProfileSubcommand::Setup(args) => run_profile_setup(&mut auth, args).await,
        },
        Command::Expenses(cmd) => run_expenses(&auth, cmd, json).await,
        Command::Stats(cmd) => run_stats(&auth, cmd, json).await,
        Command::Report(args) => run_report(&auth, args).await,
        Command::Chat { message } => run_chat(&auth, &message.join(" "), json).await,
    }
}

// =============================================================================
// AUTH
// =============================================================================

async fn run_login(auth: &mut Session, args: LoginArgs) -> Result<(), CliError> {
    let password = match args.password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let credentials = validate_login(&args.email, &password)?;
    auth.login(&credentials.email, &credentials.password).await?;
    println!("signed in as {}", credentials.email);
    print_next_step(auth);
    Ok(())
}

async fn run_signup(auth: &mut Session, args: SignupArgs) -> Result<(), CliError> {
    let password = match args.password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let confirm = match args.confirm_password {
        Some(confirm) => confirm,
        None => prompt("Confirm password: ")?,
    };
    let credentials = validate_signup(&args.email, &password, &confirm)?;
    auth.signup(&credentials.email, &credentials.password).await?;
    println!("account created for {}", credentials.email);
    print_next_step(auth);
    Ok(())
}

fn print_next_step(auth: &Session) {
    if auth.route(AuthScreen::Login) == Route::ProfileSetup {
        println!("next: complete your profile with `expense-advisor profile setup`");
    }
}

fn run_whoami(auth: &Session, json: bool) -> Result<(), CliError> {
    let user = auth.session().user().ok_or(CliError::NotSignedIn)?;
    if json {
        return print_json(user);
    }
    print_profile(user);
    Ok(())
}

fn print_profile(user: &UserProfile) {
    let text = |value: Option<&str>| value.unwrap_or("-").to_owned();
    let money = |value: Option<f64>| value.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"));
    println!("email:           {}", text(user.email()));
    println!("name:            {}", text(user.full_name()));
    println!("location:        {}", text(user.location()));
    println!("mobile:          {}", text(user.mobile_number()));
    println!("currency:        {}", text(user.currency()));
    println!("monthly salary:  {}", money(user.monthly_salary()));
    println!("monthly income:  {}", money(user.monthly_income()));
    println!(
        "cycle start day: {}",
        user.monthly_cycle_start()
            .map_or_else(|| "-".to_owned(), |d| d.to_string())
    );
    println!(
        "monthly report:  {}",
        match user.monthly_report_enabled() {
            Some(true) => "on",
            Some(false) => "off",
            None => "-",
        }
    );
    println!("reminder:        {}", text(user.daily_reminder_time()));
    println!("profile:         {}", if user.is_profile_complete() { "complete" } else { "incomplete" });
}

async fn run_profile_setup(auth: &mut Session, args: ProfileSetupArgs) -> Result<(), CliError> {
    if !auth.session().is_authenticated() {
        return Err(CliError::NotSignedIn);
    }
    let form = ProfileForm {
        full_name: args.full_name,
        monthly_salary: args.monthly_salary,
        location: args.location,
        mobile_number: args.mobile_number,
        monthly_income: args.monthly_income,
        currency: args.currency,
        monthly_cycle_start: args.monthly_cycle_start,
        monthly_report_enabled: !args.no_monthly_report,
        daily_reminder_time: args.daily_reminder_time,
    };
    profile::complete_profile(auth, &form).await?;
    println!("profile saved");
    Ok(())
}

/// Gate for commands that belong to the main app.
fn require_main(auth: &Session) -> Result<(), CliError> {
    match auth.route(AuthScreen::Login) {
        Route::Main => Ok(()),
        Route::ProfileSetup => Err(CliError::ProfileIncomplete),
        Route::Auth(_) | Route::Splash => Err(CliError::NotSignedIn),
    }
}

// =============================================================================
// EXPENSES / STATS
// =============================================================================

async fn run_expenses(auth: &Session, cmd: ExpensesCommand, json: bool) -> Result<(), CliError> {
    require_main(auth)?;
    let api = auth.api();
    match cmd.command {
        ExpensesSubcommand::List { month, search, by_day } => {
            let month = month.resolve()?;
            let view = ledger::load_month(api, month).await?;
            let query = search.as_deref().unwrap_or_default();
            let shown = ledger::search(&view.expenses, query);
            if json {
                return print_json(&shown);
            }
            println!("{}", month.label());
            if shown.is_empty() {
                println!("  no transactions");
            }
            if by_day {
                let days = ledger::group_by_day(shown.iter().copied());
                for (day, expenses) in &days {
                    println!("{day}");
                    for expense in expenses {
                        print!("  ");
                        print_expense(expense);
                    }
                }
                println!("{} of {} days with transactions", days.len(), month.days());
            } else {
                for expense in &shown {
                    print_expense(expense);
                }
            }
            // Backend totals cover the whole month; a search narrows them locally.
            let totals = if query.trim().is_empty() { view.stats } else { ledger::summarize(shown.iter().copied()) };
            println!(
                "income {:.2}  expenses {:.2}  net {:.2}",
                totals.total_credit, totals.total_debit, totals.net_amount
            );
            Ok(())
        }
        ExpensesSubcommand::Add(args) => {
            let draft = expense_form(args).validate()?;
            let created = api.create_expense(&draft).await?;
            if json {
                return print_json(&created);
            }
            print!("added ");
            print_expense(&created);
            Ok(())
        }
        ExpensesSubcommand::Update { id, expense } => {
            let draft = expense_form(expense).validate()?;
            let updated = api.update_expense(id, &draft).await?;
            if json {
                return print_json(&updated);
            }
            print!("updated ");
            print_expense(&updated);
            Ok(())
        }
        ExpensesSubcommand::Delete { id } => {
            api.delete_expense(id).await?;
            println!("deleted expense {id}");
            Ok(())
        }
    }
}

fn expense_form(args: ExpenseArgs) -> ExpenseForm {
    ExpenseForm {
        date: Some(args.date.unwrap_or_else(ledger::today)),
        details: args.details,
        amount: args.amount,
        transaction_type: args.transaction_type,
    }
}

fn print_expense(expense: &Expense) {
    println!(
        "{:>6}  {}  {:<6}  {:>10.2}  {}",
        expense.id,
        expense.date(),
        expense.transaction_type,
        expense.amount,
        expense.details
    );
}

async fn run_stats(auth: &Session, cmd: StatsCommand, json: bool) -> Result<(), CliError> {
    require_main(auth)?;
    let api = auth.api();
    match cmd.command {
        StatsSubcommand::Month { month } => {
            let month = month.resolve()?;
            let stats = api
                .monthly_stats(month.year(), month.month_number())
                .await?;
            if json {
                return print_json(&stats);
            }
            println!("{}", month.label());
            println!("  income    {:>12.2}", stats.total_credit);
            println!("  expenses  {:>12.2}", stats.total_debit);
            println!("  net       {:>12.2}", stats.net_amount);
            Ok(())
        }
        StatsSubcommand::Dashboard => {
            let stats = api.dashboard_stats().await?;
            if json {
                return print_json(&stats);
            }
            for summary in &stats.months {
                println!(
                    "{:<10} {}  income {:>10.2}  expenses {:>10.2}  net {:>10.2}",
                    summary.month, summary.year, summary.credit, summary.debit, summary.net
                );
            }
            Ok(())
        }
    }
}

// =============================================================================
// REPORTS / CHAT
// =============================================================================

async fn run_report(auth: &Session, args: ReportArgs) -> Result<(), CliError> {
    require_main(auth)?;
    let current = MonthCursor::current();
    let request = ReportRequest {
        from: args.from.unwrap_or(current),
        to: args.to.unwrap_or(current),
        transaction_type: args.transaction_type.0,
        format: args.format,
    };
    let path = reports::download_report(auth.api(), &request, &args.out_dir, ledger::today()).await?;
    println!("saved {}", path.display());
    Ok(())
}

async fn run_chat(auth: &Session, message: &str, json: bool) -> Result<(), CliError> {
    require_main(auth)?;
    let mut transcript = ChatTranscript::new();
    let Some(reply) = transcript.send(auth.api(), message).await? else {
        return Ok(());
    };
    if json {
        return print_json(&serde_json::json!({ "response": reply.text, "chart_url": reply.chart_url }));
    }
    println!("{}", reply.text);
    if let Some(chart_url) = &reply.chart_url {
        let base = auth.api().base_url();
        if chart_url.starts_with('/') {
            println!("chart: {base}{chart_url}");
        } else {
            println!("chart: {chart_url}");
        }
    }
    Ok(())
}

// =============================================================================
// IO HELPERS
// =============================================================================

fn prompt(label: &str) -> Result<String, CliError> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}")?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
