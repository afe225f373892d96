//! SEO Console
//!
//! Terminal front end for the SEO analytics API. Each subcommand drives one
//! page or widget and prints what it renders.

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seo_console::config::Config;
use seo_console::errors::ClientError;
use seo_console::models::{CustomTarget, Provider, TriggerOutreachRequest};
use seo_console::navigation::Route;
use seo_console::views::{
    credential_check, delete_project, rank_history, remove_credentials, render_history,
    render_serp, render_serp_features, serp_features, serp_snapshot, AnalysisTab, ApiSetupModal,
    BacklinksDashboard, BacklinksTab, ChatOutcome, ChatPanel, CompetitorAnalysis, CompetitorManager,
    DashboardOverview, DashboardPage, Gated, KeywordTable, ProjectDetailPage, ProjectsPage,
    RankTrackingTable, ViewState, DEFAULT_HISTORY_DAYS, INPUT_PLACEHOLDER, QUICK_ACTIONS,
};
use seo_console::App;

#[derive(Parser)]
#[command(name = "seo-console", version, about = "Terminal client for the SEO analytics API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Credentials {
    #[arg(long)]
    email: String,
    #[arg(long, env = "SEO_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login(Credentials),
    /// Create an account and sign in
    Register(Credentials),
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Project overview widgets, or the welcome page without a project
    Dashboard {
        #[arg(long)]
        project: Option<String>,
    },
    #[command(subcommand)]
    Projects(ProjectsCommand),
    #[command(subcommand)]
    Keywords(KeywordsCommand),
    #[command(subcommand)]
    Ranks(RanksCommand),
    #[command(subcommand)]
    Competitors(CompetitorsCommand),
    #[command(subcommand)]
    Backlinks(BacklinksCommand),
    #[command(subcommand)]
    Credentials(CredentialsCommand),
    /// Chat with the AI assistant. Without --message, starts an interactive session.
    Chat {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    #[command(subcommand)]
    Ai(AiCommand),
    #[command(subcommand)]
    Outreach(OutreachCommand),
}

#[derive(Subcommand)]
enum ProjectsCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        domain: String,
    },
    Show {
        project: String,
    },
    Delete {
        project: String,
    },
}

#[derive(Subcommand)]
enum KeywordsCommand {
    List {
        project: String,
    },
    Add {
        project: String,
        keyword: String,
    },
    /// Add one keyword per line read from stdin
    BulkAdd {
        project: String,
    },
    Refresh {
        project: String,
        keyword: String,
    },
    /// Show the cost estimate; pass --yes to run the refresh
    RefreshAll {
        project: String,
        #[arg(long)]
        yes: bool,
    },
    Delete {
        project: String,
        keyword: String,
    },
}

#[derive(Subcommand)]
enum RanksCommand {
    List {
        project: String,
    },
    Enable {
        project: String,
        keyword: String,
        #[arg(long)]
        url: String,
    },
    Check {
        project: String,
        keyword: String,
    },
    Stop {
        project: String,
        keyword: String,
    },
    History {
        project: String,
        keyword: String,
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,
    },
    Serp {
        project: String,
        keyword: String,
    },
}

#[derive(Subcommand)]
enum CompetitorsCommand {
    List {
        project: String,
    },
    Add {
        project: String,
        domain: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Remove {
        project: String,
        competitor: String,
    },
    Overlap {
        project: String,
    },
    Gaps {
        project: String,
        competitor: String,
    },
    SerpFeatures {
        project: String,
    },
}

#[derive(Subcommand)]
enum BacklinksCommand {
    Summary { project: String },
    List { project: String },
    Domains { project: String },
}

#[derive(Subcommand)]
enum CredentialsCommand {
    Check {
        #[arg(value_parser = parse_provider)]
        provider: Provider,
    },
    /// Save credentials, e.g. `setup dataforseo --field login=me --field password=secret`
    Setup {
        #[arg(value_parser = parse_provider)]
        provider: Provider,
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    Remove {
        #[arg(value_parser = parse_provider)]
        provider: Provider,
    },
}

#[derive(Subcommand)]
enum AiCommand {
    Keywords {
        project: String,
    },
    Serp {
        project: String,
        keyword: String,
    },
    Brief {
        project: String,
        keyword: String,
    },
}

#[derive(Subcommand)]
enum OutreachCommand {
    Trigger {
        project: String,
        #[arg(long)]
        webhook_url: String,
        #[arg(long = "competitor")]
        competitors: Vec<String>,
        /// Extra target domain; repeatable
        #[arg(long = "target")]
        targets: Vec<String>,
        #[arg(long)]
        campaign: Option<String>,
        #[arg(long)]
        no_backlink_data: bool,
    },
    Test,
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    Provider::from_str(s).ok_or_else(|| {
        let known: Vec<&str> = Provider::all().iter().map(|p| p.as_str()).collect();
        format!("unknown provider '{}', expected one of: {}", s, known.join(", "))
    })
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Logs go to stderr so rendered output stays clean on stdout.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("API base URL: {}", config.api_url);
    tracing::debug!("State path: {:?}", config.state_path);

    let app = App::start(config).await?;

    if let Err(e) = run(&app, cli.command).await {
        eprintln!("Error: {}", e.message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(app: &App, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Login(creds) => {
            let user = app.session.sign_in(&creds.email, &creds.password).await?;
            println!("Signed in as {}", user.email);
        }
        Command::Register(creds) => {
            let user = app.session.sign_up(&creds.email, &creds.password).await?;
            println!("Account created. Signed in as {}", user.email);
        }
        Command::Logout => {
            app.session.sign_out().await?;
            println!("Signed out.");
        }
        command => {
            if app.navigator().navigate(Route::Dashboard) == Route::Login {
                return Err(ClientError::Unauthorized(
                    "Not signed in. Run `seo-console login` first.".to_string(),
                ));
            }
            run_protected(app, command).await?;
        }
    }
    Ok(())
}

async fn run_protected(app: &App, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Whoami => match app.session.current_user() {
            Some(user) => println!(
                "{} (id {}, {:.2} API credits remaining)",
                user.email, user.id, user.api_credits_remaining
            ),
            None => println!("Not signed in."),
        },
        Command::Dashboard { project } => match project {
            Some(pid) => {
                let mut overview = DashboardOverview::new(pid);
                overview.load(app).await;
                println!("{}", overview.render());
            }
            None => println!("{}", DashboardPage::render()),
        },
        Command::Projects(cmd) => projects_command(app, cmd).await?,
        Command::Keywords(cmd) => keywords_command(app, cmd).await?,
        Command::Ranks(cmd) => ranks_command(app, cmd).await?,
        Command::Competitors(cmd) => competitors_command(app, cmd).await?,
        Command::Backlinks(cmd) => backlinks_command(app, cmd).await,
        Command::Credentials(cmd) => credentials_command(app, cmd).await?,
        Command::Chat { project, message } => chat_command(app, project, message).await?,
        Command::Ai(cmd) => ai_command(app, cmd).await?,
        Command::Outreach(cmd) => outreach_command(app, cmd).await?,
        Command::Login(_) | Command::Register(_) | Command::Logout => {}
    }
    Ok(())
}

async fn projects_command(app: &App, cmd: ProjectsCommand) -> Result<(), ClientError> {
    match cmd {
        ProjectsCommand::List => {
            let mut page = ProjectsPage::new();
            page.load(app).await;
            println!("{}", page.render());
        }
        ProjectsCommand::Create { name, domain } => {
            let mut page = ProjectsPage::new();
            page.open_create();
            page.form.name = name;
            page.form.domain = domain;
            let created = page.submit_create(app).await?;
            println!("Created project {} ({})\n", created.name, created.id);
            println!("{}", page.render());
        }
        ProjectsCommand::Show { project } => {
            app.navigator()
                .navigate(Route::ProjectDetail(project.clone()));
            let mut page = ProjectDetailPage::new(project);
            page.load(app).await;
            println!("{}", page.render());
        }
        ProjectsCommand::Delete { project } => {
            delete_project(app, &project).await?;
            println!("Deleted project {}", project);
        }
    }
    Ok(())
}

async fn keywords_command(app: &App, cmd: KeywordsCommand) -> Result<(), ClientError> {
    match cmd {
        KeywordsCommand::List { project } => {
            let mut table = KeywordTable::new(project);
            table.load(app).await;
            println!("{}", table.render());
        }
        KeywordsCommand::Add { project, keyword } => {
            let mut table = KeywordTable::new(project);
            let added = table.add(app, &keyword).await?;
            println!("Added \"{}\"\n", added.keyword_text);
            println!("{}", table.render());
        }
        KeywordsCommand::BulkAdd { project } => {
            let input = read_stdin().await?;
            let mut table = KeywordTable::new(project);
            let result = table.bulk_add(app, &input).await?;
            println!("Added {}, skipped {}\n", result.added, result.skipped);
            println!("{}", table.render());
        }
        KeywordsCommand::Refresh { project, keyword } => {
            let mut table = KeywordTable::new(project);
            match table.refresh(app, &keyword).await? {
                Gated::Ran(refreshed) => {
                    println!("Refreshed \"{}\"\n", refreshed.keyword_text);
                    println!("{}", table.render());
                }
                Gated::SetupRequired(modal) => print_setup_required(&modal),
            }
        }
        KeywordsCommand::RefreshAll { project, yes } => {
            let mut table = KeywordTable::new(project);
            match table.prepare_refresh_all(app).await? {
                Gated::SetupRequired(modal) => print_setup_required(&modal),
                Gated::Ran(estimate) => {
                    println!(
                        "Refreshing {} keywords will cost about {:.2} {}",
                        estimate.keyword_count, estimate.estimated_cost, estimate.currency
                    );
                    if !yes {
                        println!("Re-run with --yes to continue.");
                        return Ok(());
                    }
                    let result = table.confirm_refresh_all(app).await?;
                    println!("Updated {} keywords\n", result.updated);
                    println!("{}", table.render());
                }
            }
        }
        KeywordsCommand::Delete { project, keyword } => {
            let mut table = KeywordTable::new(project);
            table.delete(app, &keyword).await?;
            println!("{}", table.render());
        }
    }
    Ok(())
}

async fn ranks_command(app: &App, cmd: RanksCommand) -> Result<(), ClientError> {
    match cmd {
        RanksCommand::List { project } => {
            let mut table = RankTrackingTable::new(project);
            table.load(app).await;
            println!("{}", table.render());
        }
        RanksCommand::Enable {
            project,
            keyword,
            url,
        } => {
            let mut table = RankTrackingTable::new(project);
            let tracked = table.enable(app, &keyword, &url).await?;
            println!("Tracking \"{}\" for {}\n", tracked.keyword_text, tracked.tracked_url);
            println!("{}", table.render());
        }
        RanksCommand::Check { project, keyword } => {
            let mut table = RankTrackingTable::new(project);
            let result = table.check_now(app, &keyword).await?;
            match result.rank_position {
                Some(position) => println!("\"{}\" is at position {}\n", result.keyword_text, position),
                None => println!("\"{}\" is not ranking\n", result.keyword_text),
            }
            println!("{}", table.render());
        }
        RanksCommand::Stop { project, keyword } => {
            let mut table = RankTrackingTable::new(project);
            table.stop(app, &keyword).await?;
            println!("{}", table.render());
        }
        RanksCommand::History {
            project,
            keyword,
            days,
        } => {
            let history = rank_history(app, &project, &keyword, days).await?;
            println!("{}", render_history(&history));
        }
        RanksCommand::Serp { project, keyword } => {
            let snapshot = serp_snapshot(app, &project, &keyword).await?;
            println!("{}", render_serp(&snapshot));
        }
    }
    Ok(())
}

async fn competitors_command(app: &App, cmd: CompetitorsCommand) -> Result<(), ClientError> {
    match cmd {
        CompetitorsCommand::List { project } => {
            let mut manager = CompetitorManager::new(project);
            manager.load(app).await;
            println!("{}", manager.render());
        }
        CompetitorsCommand::Add {
            project,
            domain,
            notes,
        } => {
            let mut manager = CompetitorManager::new(project);
            manager.add(app, &domain, notes.as_deref()).await?;
            println!("{}", manager.render());
        }
        CompetitorsCommand::Remove {
            project,
            competitor,
        } => {
            let mut manager = CompetitorManager::new(project);
            manager.remove(app, &competitor).await?;
            println!("{}", manager.render());
        }
        CompetitorsCommand::Overlap { project } => {
            let mut analysis = CompetitorAnalysis::new(project);
            analysis.load(app).await;
            println!("{}", analysis.render());
        }
        CompetitorsCommand::Gaps {
            project,
            competitor,
        } => {
            let mut analysis = CompetitorAnalysis::new(project);
            analysis.select(AnalysisTab::Gaps(competitor));
            analysis.load(app).await;
            println!("{}", analysis.render());
        }
        CompetitorsCommand::SerpFeatures { project } => {
            let report = ViewState::settled(serp_features(app, &project).await);
            println!("{}", report.render_with(render_serp_features));
        }
    }
    Ok(())
}

async fn backlinks_command(app: &App, cmd: BacklinksCommand) {
    let (project, tab) = match cmd {
        BacklinksCommand::Summary { project } => (project, BacklinksTab::Summary),
        BacklinksCommand::List { project } => (project, BacklinksTab::List),
        BacklinksCommand::Domains { project } => (project, BacklinksTab::Domains),
    };
    let mut dashboard = BacklinksDashboard::new(project);
    dashboard.select(tab);
    dashboard.load(app).await;
    println!("{}", dashboard.render());
}

async fn credentials_command(app: &App, cmd: CredentialsCommand) -> Result<(), ClientError> {
    match cmd {
        CredentialsCommand::Check { provider } => {
            let check = credential_check(app, provider).await?;
            if check.exists {
                let verified = check.last_verified.as_deref().unwrap_or("never");
                println!("{} credentials configured (last verified: {})", provider, verified);
            } else {
                println!("{} credentials not configured", provider);
            }
        }
        CredentialsCommand::Setup { provider, fields } => {
            let mut modal = ApiSetupModal::new(provider, "this integration");
            for (name, value) in fields {
                modal.set_field(&name, value);
            }
            match modal.submit(app).await {
                Ok(result) => println!(
                    "{}",
                    result
                        .message
                        .unwrap_or_else(|| format!("{} credentials saved", provider))
                ),
                Err(e) => {
                    println!("{}", modal.render());
                    return Err(e);
                }
            }
        }
        CredentialsCommand::Remove { provider } => {
            remove_credentials(app, provider).await?;
            println!("Removed {} credentials", provider);
        }
    }
    Ok(())
}

async fn chat_command(
    app: &App,
    project: Option<String>,
    message: Option<String>,
) -> Result<(), ClientError> {
    let mut panel = ChatPanel::new(project);

    if let Some(message) = message {
        match panel.send(app, &message).await? {
            ChatOutcome::SetupRequired(modal) => print_setup_required(&modal),
            _ => println!("{}", panel.render()),
        }
        return Ok(());
    }

    println!("{}", panel.render());
    println!("\n{} (\"exit\" to quit)", INPUT_PLACEHOLDER);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ClientError::Transport(format!("stdin: {}", e)))?
    {
        let line = line.trim();
        if line == "exit" || line == "quit" {
            break;
        }
        match line.parse::<usize>() {
            Ok(n) if panel.show_quick_actions() && (1..=QUICK_ACTIONS.len()).contains(&n) => {
                panel.quick_action(n - 1)
            }
            _ => panel.input = line.to_string(),
        }
        match panel.submit(app).await? {
            ChatOutcome::Ignored => continue,
            ChatOutcome::SetupRequired(modal) => {
                print_setup_required(&modal);
                break;
            }
            ChatOutcome::Replied => {
                if let Some(reply) = panel.messages.last() {
                    println!("\nAssistant: {}\n", reply.content);
                }
            }
        }
    }
    Ok(())
}

async fn ai_command(app: &App, cmd: AiCommand) -> Result<(), ClientError> {
    let analysis = match &cmd {
        AiCommand::Keywords { project } => app.client.ai().analyze_keywords(project).await?,
        AiCommand::Serp { project, keyword } => {
            app.client.ai().analyze_serp(keyword, project).await?
        }
        AiCommand::Brief { project, keyword } => {
            app.client.ai().content_brief(keyword, project).await?
        }
    };
    println!("{}", analysis.text().unwrap_or("No analysis returned."));
    Ok(())
}

async fn outreach_command(app: &App, cmd: OutreachCommand) -> Result<(), ClientError> {
    match cmd {
        OutreachCommand::Trigger {
            project,
            webhook_url,
            competitors,
            targets,
            campaign,
            no_backlink_data,
        } => {
            let mut request = TriggerOutreachRequest::new(webhook_url);
            if !competitors.is_empty() {
                request.competitor_ids = Some(competitors);
            }
            if !targets.is_empty() {
                request.custom_targets = Some(
                    targets
                        .into_iter()
                        .map(|domain| CustomTarget {
                            domain,
                            email: None,
                        })
                        .collect(),
                );
            }
            if let Some(name) = campaign {
                request.campaign_name = name;
            }
            request.include_backlink_data = !no_backlink_data;

            let result = app
                .client
                .webhooks()
                .trigger_outreach(&project, &request)
                .await?;
            println!(
                "{} ({} targets sent)",
                result.message.as_deref().unwrap_or("Outreach triggered"),
                result.targets_sent
            );
        }
        OutreachCommand::Test => {
            let status = app.client.webhooks().test().await?;
            println!("Webhooks: {}", status.status);
            for endpoint in status.endpoints {
                println!("  {}", endpoint);
            }
        }
    }
    Ok(())
}

fn print_setup_required(modal: &ApiSetupModal) {
    println!("{}", modal.render());
    println!(
        "\nRun `seo-console credentials setup {} --field name=value ...` to continue.",
        modal.provider
    );
}

async fn read_stdin() -> Result<String, ClientError> {
    let mut input = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ClientError::Transport(format!("stdin: {}", e)))?
    {
        input.push_str(&line);
        input.push('\n');
    }
    Ok(input)
}
