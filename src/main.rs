use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;

use release_drafter::autolabel::{run_autolabeler, AutolabelTarget};
use release_drafter::cli::{run_draft_workflow, DraftWorkflowArgs};
use release_drafter::config;
use release_drafter::context::{Overrides, RunContext};
use release_drafter::domain::MakeLatest;
use release_drafter::github::client::{DEFAULT_API_URL, DEFAULT_GRAPHQL_URL};
use release_drafter::github::GitHubClient;
use release_drafter::ui;

#[derive(Parser)]
#[command(
    name = "release-drafter",
    version,
    about = "Draft the next release notes from merged pull requests"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", global = true, help = "Repository as owner/name")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL, global = true)]
    graphql_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or update the draft release
    Draft(DraftArgs),
    /// Label a pull request from its files, branch, title and body
    Autolabel(AutolabelArgs),
}

#[derive(Args)]
struct DraftArgs {
    #[arg(long = "ref", env = "GITHUB_REF", default_value = "", help = "Ref the run was triggered for")]
    git_ref: String,

    #[arg(long, help = "Version to release instead of the resolved one")]
    version: Option<String>,

    #[arg(long, help = "Release tag, overriding tag-template")]
    tag: Option<String>,

    #[arg(long, help = "Release name, overriding name-template")]
    name: Option<String>,

    #[arg(long, help = "Branch or commit the release targets")]
    commitish: Option<String>,

    #[arg(long)]
    header: Option<String>,

    #[arg(long)]
    footer: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    prerelease: Option<bool>,

    #[arg(long)]
    prerelease_identifier: Option<String>,

    #[arg(long, help = "Mark as latest: true, false or legacy")]
    latest: Option<MakeLatest>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", help = "Publish instead of drafting")]
    publish: Option<bool>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Print outputs as JSON")]
    json: bool,

    #[arg(long, env = "GITHUB_OUTPUT", help = "File to append outputs to")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct AutolabelArgs {
    #[arg(long, env = "GITHUB_EVENT_PATH", help = "Webhook event payload")]
    event_path: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref()).context("Error loading config")?;

    let repository = cli
        .repository
        .as_deref()
        .ok_or_else(|| anyhow!("No repository given; pass --repository or set GITHUB_REPOSITORY"))?;
    let (owner, name) = repository
        .split_once('/')
        .filter(|(o, n)| !o.is_empty() && !n.is_empty())
        .ok_or_else(|| anyhow!("Repository must be owner/name, got '{}'", repository))?;

    let token = cli
        .token
        .ok_or_else(|| anyhow!("No token given; pass --token or set GITHUB_TOKEN"))?;
    let client = GitHubClient::new(owner, name, token)?.with_endpoints(cli.api_url, cli.graphql_url);
    debug!("Using repository {}/{}", owner, name);

    match cli.command {
        Command::Draft(args) => draft(&client, owner, name, &config, args),
        Command::Autolabel(args) => autolabel(&client, &config, args),
    }
}

fn draft(
    client: &GitHubClient,
    owner: &str,
    name: &str,
    config: &config::Config,
    args: DraftArgs,
) -> Result<()> {
    let overrides = Overrides {
        version: args.version,
        tag: args.tag,
        name: args.name,
        commitish: args.commitish,
        header: args.header,
        footer: args.footer,
        prerelease: args.prerelease,
        prerelease_identifier: args.prerelease_identifier,
        latest: args.latest,
        publish: args.publish,
    };
    let workflow = DraftWorkflowArgs {
        context: RunContext::new(owner, name, args.git_ref).with_overrides(overrides),
        dry_run: args.dry_run,
    };

    ui::display_status("Drafting release...");
    let result = run_draft_workflow(client, &workflow, config)?;

    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_success(&ui::format_summary(&result));

    let outputs = result.outputs();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else if args.dry_run {
        println!("\n{}", result.payload.body);
    }

    if let Some(path) = args.output.filter(|_| !args.dry_run) {
        ui::write_outputs(&path, &outputs)
            .with_context(|| format!("Error writing outputs to {}", path.display()))?;
    }

    Ok(())
}

fn autolabel(client: &GitHubClient, config: &config::Config, args: AutolabelArgs) -> Result<()> {
    let target = AutolabelTarget::from_event_file(&args.event_path)
        .with_context(|| format!("Error reading event {}", args.event_path.display()))?;

    let outcome = run_autolabeler(client, &config.autolabeler, &target)?;
    for warning in &outcome.warnings {
        ui::display_boundary_warning(warning);
    }

    if outcome.labels.is_empty() {
        ui::display_status(&format!("No labels matched #{}", target.number));
    } else {
        ui::display_success(&format!(
            "Labelled #{}: {}",
            target.number,
            outcome.labels.join(", ")
        ));
    }
    Ok(())
}
