use crate::{
    Store,
    github::{Github, User},
    username::Username,
};
use anyhow::{Context, Result, bail};
use clap::{
    CommandFactory, Parser, Subcommand, ValueHint,
    builder::{OsStr, Resettable},
};
use reqwest::Url;
use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(version, disable_version_flag = true, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// The GitHub user whose SSH keys to add.
    #[arg(value_hint = ValueHint::Username, allow_hyphen_values = true)]
    username: Option<String>,

    /// Print version.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    #[command(flatten)]
    global_args: GlobalArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search GitHub users matching a query.
    Search {
        /// The free text term to search for.
        query: String,
    },
}

#[derive(Debug, clap::Args)]
struct GlobalArgs {
    /// The authorized keys file.
    #[arg(
        long,
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        env = "ASK_AUTHORIZED_KEYS",
        global = true,
        default_value = default_authorized_keys()
    )]
    pub file: PathBuf,

    /// The URL serving raw key documents.
    #[arg(
        long,
        value_name = "URL",
        env = "ASK_GITHUB_URL",
        global = true,
        hide = true,
        default_value = "https://github.com"
    )]
    pub github_url: Url,

    /// The base URL of the GitHub API.
    #[arg(
        long,
        value_name = "URL",
        env = "ASK_GITHUB_API_URL",
        global = true,
        hide = true,
        default_value = "https://api.github.com"
    )]
    pub github_api_url: Url,

    /// Use verbose output.
    #[arg(long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// The default authorized keys file path inside the users home directory.
/// If `$HOME` is not set, [`Resettable::Reset`] is returned, forcing the user to specify the path.
fn default_authorized_keys() -> Resettable<OsStr> {
    if let Ok(home) = env::var("HOME") {
        Resettable::Value(format!("{home}/.ssh/authorized_keys").into())
    } else {
        Resettable::Reset
    }
}

/// The main CLI entrypoint.
pub fn entrypoint() -> ExitCode {
    let cli = Cli::parse();
    let args = cli.global_args;

    setup_tracing(args.verbose);

    let github = Github::new(args.github_url, args.github_api_url);

    match (cli.command, cli.username) {
        (Some(Commands::Search { query }), _) => {
            search(&github, &query);
            ExitCode::SUCCESS
        }
        (None, Some(username)) => match add(&github, &username, args.file) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                println!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
        (None, None) => {
            Cli::command().print_help().ok();
            ExitCode::FAILURE
        }
    }
}

/// Add a users public SSH keys to the authorized keys file.
#[tokio::main]
async fn add(github: &Github, username: &str, file: PathBuf) -> Result<()> {
    let username: Username = username.parse()?;

    let user = github
        .user(&username)
        .await
        .context("Failed to fetch user info")?;

    let stdin = io::stdin();
    if !confirm(&user, &mut stdin.lock())? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let keys = github
        .keys(&username)
        .await
        .context("Failed to fetch SSH keys")?;
    if keys.is_empty() {
        bail!("No SSH keys found for user '{username}'");
    }

    println!("Found {} SSH key(s) for user '{username}':", keys.len());
    for (i, key) in keys.iter().enumerate() {
        println!("  {}. {}", i + 1, key.truncated());
    }

    let store = Store::open(file).context("Failed to set up the SSH directory")?;
    let added = store.merge(&keys).context("Failed to add SSH keys")?;

    println!(
        "\nSuccessfully added {added} new SSH key(s) to {}",
        store.path().display()
    );
    Ok(())
}

/// Show the users profile and ask for confirmation to add their keys.
///
/// Any answer other than `y` or `yes`, compared case insensitively, declines.
fn confirm(user: &User, input: &mut impl BufRead) -> Result<bool> {
    println!("User: {} ({})", user.login, user.display_name());
    if let Some(bio) = &user.bio {
        println!("Bio: {bio}");
    }
    if let Some(company) = &user.company {
        println!("Company: {company}");
    }
    if let Some(location) = &user.location {
        println!("Location: {location}");
    }
    println!("Public repos: {}", user.public_repos);

    print!(
        "\nAre you sure you want to add {}'s SSH keys? (y/N): ",
        user.display_name()
    );
    io::stdout().flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;

    Ok(matches!(
        response.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Search users and print matching profiles.
///
/// Failures are printed but never affect the exit code.
#[tokio::main]
async fn search(github: &Github, query: &str) {
    println!("Searching for users matching '{query}'...\n");

    let results = match github.search(query).await {
        Ok(results) => results,
        Err(err) => {
            println!("Error searching users: {err}");
            return;
        }
    };

    if results.total_count == 0 {
        println!("No users found matching your query.");
        return;
    }

    println!("Found {} users:", results.items.len());
    for user in &results.items {
        print!("  {} - {}", user.login, user.display_name());
        if let Some(bio) = &user.bio {
            print!(" ({bio})");
        }
        if let Some(company) = &user.company {
            print!(" [{company}]");
        }
        println!();
    }

    println!("\nUse 'ask <username>' to add SSH keys from any of these users.");
}

fn setup_tracing(verbosity_level: u8) {
    let level = match verbosity_level {
        0 => return, // The user did not specify a verbosity level, do not configure tracing.
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = {
        // For verbosity levels of 3 and above, given a debug build, traces from external crates are included.
        if verbosity_level > 3 && cfg!(debug_assertions) {
            tracing_subscriber::filter::EnvFilter::new(format!("{level}"))
        } else {
            // Otherwise, traces from external crates are filtered.
            tracing_subscriber::filter::EnvFilter::new(format!(
                "{}={level}",
                env!("CARGO_PKG_NAME")
            ))
        }
    };
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    fn example_user() -> User {
        User {
            login: "octocat".to_string(),
            name: Some("The Octocat".to_string()),
            bio: None,
            company: Some("@github".to_string()),
            location: Some("San Francisco".to_string()),
            email: None,
            public_repos: 8,
        }
    }

    #[rstest]
    #[case("y\n", true)]
    #[case("Y\n", true)]
    #[case("yes\n", true)]
    #[case("YES\n", true)]
    #[case("  y  \n", true)]
    #[case("n\n", false)]
    #[case("no\n", false)]
    #[case("\n", false)]
    #[case("", false)]
    #[case("absolutely\n", false)]
    fn confirmation_accepts_only_yes(#[case] response: &str, #[case] expected: bool) {
        let mut input = io::Cursor::new(response);

        assert_eq!(confirm(&example_user(), &mut input).unwrap(), expected);
    }
}
