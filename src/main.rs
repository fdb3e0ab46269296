use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use savit::areas::repository::Repository;
use savit::config::Config;
use savit::logging::init_logging;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "savit",
    version = "0.1.0",
    about = "A miniature content-addressed version control system",
    long_about = "savit fingerprints a working directory with content hashes, \
    stores every file version as a line-level edit script \
    and chains immutable snapshots into per-branch histories.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        long,
        global = true,
        help = "Run as if savit was started in this directory"
    )]
    path: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .savit control directory in the working directory."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage files or directories",
        long_about = "This command records the current content of the given paths in the stage. \
        Directories are expanded to every file beneath them."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The paths to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the stage as a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches",
        long_about = "This command switches to the given branch, creating it at the current head if it does not exist. \
        Without a name it prints the current branch."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to")]
        name: Option<String>,
    },
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command lists the commits of the current branch, most recent first."
    )]
    Log,
    #[command(
        name = "status",
        about = "Show staged changes",
        long_about = "This command lists the staged paths that differ from the head commit."
    )]
    Status,
    #[command(
        name = "validate",
        about = "Check a tracked path against its content on disk",
        long_about = "This command rehashes a tracked file or directory and compares it with the staged hash."
    )]
    Validate {
        #[arg(index = 1)]
        path: PathBuf,
    },
    #[command(
        name = "cat-object",
        about = "Print a stored edit script",
        long_about = "This command prints the edit script stored for the given content hash."
    )]
    CatObject {
        #[arg(index = 1, help = "The content hash of the object")]
        hash: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from_env().context("invalid configuration")?;
    init_logging(config.log_filter());

    let pwd = std::env::current_dir()?;
    let root = match &cli.path {
        Some(path) => pwd.join(path),
        None => pwd,
    };
    let repository = Repository::new(&root, config)
        .with_context(|| format!("failed to open repository at {}", root.display()))?;

    match &cli.command {
        Commands::Init => {
            let created = repository.init().await?;
            let verb = if created { "Initialized empty" } else { "Reinitialized existing" };
            println!(
                "{} savit repository in {}",
                verb,
                repository.control_path().display()
            );
        }
        Commands::Add { paths } => {
            for path in paths {
                let report = repository
                    .stage(&absolute(repository.path(), path))
                    .await
                    .with_context(|| format!("failed to stage {}", path.display()))?;
                for path in report.staged {
                    println!("{} {}", "staged".green(), path.display());
                }
                for skipped in report.skipped {
                    eprintln!(
                        "{} {}: {}",
                        "skipped".yellow(),
                        skipped.path.display(),
                        skipped.error
                    );
                }
            }
        }
        Commands::Commit { message } => {
            let commit = repository.commit(message.trim()).await?;
            let root = match commit.parent() {
                Some(_) => "",
                None => "(root-commit) ",
            };
            println!(
                "[{} {}{}] {}",
                repository.current_branch()?.to_string().green(),
                root,
                commit.id().to_short().yellow(),
                commit.short_message()
            );
        }
        Commands::Checkout { name } => {
            let branch = repository.checkout(name.as_deref()).await?;
            let head = branch
                .head()
                .map(|id| id.to_short())
                .unwrap_or_else(|| "no commits yet".to_string());
            match name {
                Some(_) => println!(
                    "Switched to branch '{}' ({})",
                    branch.name().to_string().green(),
                    head.yellow()
                ),
                None => println!(
                    "On branch {} ({})",
                    branch.name().to_string().green(),
                    head.yellow()
                ),
            }
        }
        Commands::Log => {
            for entry in repository.log()? {
                match entry.split_once(": ") {
                    Some((id, message)) => println!("{}: {}", id.yellow(), message),
                    None => println!("{}", entry),
                }
            }
        }
        Commands::Status => {
            let branch = repository.current_branch()?;
            let changes = repository.changes().await?;
            println!("On branch {}", branch.to_string().green());
            if changes.is_empty() {
                println!("nothing to commit");
            } else {
                println!("Changes to be committed:");
                for path in changes {
                    println!("\t{}", path.display().to_string().green());
                }
            }
        }
        Commands::Validate { path } => {
            repository
                .validate(&absolute(repository.path(), path))
                .await
                .with_context(|| format!("validation of {} failed", path.display()))?;
            println!("{} {}", "ok".green(), path.display());
        }
        Commands::CatObject { hash } => {
            let delta = repository.show_object(hash)?;
            println!("{}", serde_json::to_string_pretty(&delta)?);
        }
    }

    Ok(())
}

fn absolute(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
