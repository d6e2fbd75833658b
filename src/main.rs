use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taggit::cli::{run_bump, run_list, Kit, Status};
use taggit::config::{self, Backend, Config};
use taggit::domain::BumpKind;
use taggit::git::{
    CommandRepository, Git2Repository, ProcessCmd, TagCreator, TagLister, TagPublisher,
};
use taggit::ui::Console;

#[derive(clap::Parser)]
#[command(
    name = "taggit",
    version,
    about = "List semver tags and create the next one"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Remote that receives published tags")]
    remote: Option<String>,

    #[arg(long, global = true, help = "Repository backend: libgit2 or command")]
    backend: Option<Backend>,

    #[arg(short, long, global = true, help = "Log progress to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List semver tags grouped by base version
    List {
        #[arg(long, help = "Print only the latest tag")]
        latest: bool,
    },
    /// Create v0.0.0 in a repository without semver tags
    Zero(BumpArgs),
    /// Create the next patch version
    Patch(BumpArgs),
    /// Create the next minor version
    Minor(BumpArgs),
    /// Create the next major version
    Major(BumpArgs),
}

#[derive(clap::Args)]
struct BumpArgs {
    #[arg(long, help = "Preview the tag without creating or pushing it")]
    dry_run: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "taggit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn load(args: &Args) -> Result<Config> {
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(remote) = &args.remote {
        config.remote = remote.clone();
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    config.validate()?;
    Ok(config)
}

fn execute<R>(repo: &R, command: &Cmd) -> Status
where
    R: TagLister + TagCreator + TagPublisher,
{
    let kit = Kit::from_repo(repo);
    let mut console = Console::stdio();
    match command {
        Cmd::List { latest } => run_list(&kit, *latest, &mut console),
        Cmd::Zero(bump) => run_bump(&kit, BumpKind::Zero, bump.dry_run, &mut console),
        Cmd::Patch(bump) => run_bump(&kit, BumpKind::Patch, bump.dry_run, &mut console),
        Cmd::Minor(bump) => run_bump(&kit, BumpKind::Minor, bump.dry_run, &mut console),
        Cmd::Major(bump) => run_bump(&kit, BumpKind::Major, bump.dry_run, &mut console),
    }
}

fn run(args: &Args) -> Result<Status> {
    let config = load(args)?;
    tracing::debug!(?config, "configuration loaded");

    let status = match config.backend {
        Backend::Libgit2 => {
            let repo = Git2Repository::open(".", config.remote.as_str())?
                .with_timeout(config.git.timeout());
            execute(&repo, &args.command)
        }
        Backend::Command => {
            let repo = CommandRepository::new(
                ProcessCmd::new(config.git.executable.as_str()),
                config.remote.as_str(),
                config.git.timeout(),
            );
            execute(&repo, &args.command)
        }
    };
    Ok(status)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(status) => status.into(),
        Err(e) => {
            Console::stdio().failure(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
