use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use scope_cli::Session;
use scope_core::{ScopeSelector, SelectorConfig};
use tokio::io::BufReader;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn cli() -> Command {
    Command::new("scope-selector")
        .version(scope_core::VERSION)
        .about("Build an OAuth2 scope list from standard input")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Selector configuration file (json, yaml or toml)"),
        )
        .arg(
            Arg::new("allow")
                .long("allow")
                .action(ArgAction::Append)
                .help("Allowed scope (repeatable)"),
        )
        .arg(
            Arg::new("prevent-custom")
                .long("prevent-custom")
                .action(ArgAction::SetTrue)
                .help("Reject scopes outside the allow-list"),
        )
        .arg(
            Arg::new("required")
                .long("required")
                .action(ArgAction::SetTrue)
                .help("Fail validation when no scope is selected"),
        )
        .arg(
            Arg::new("auto-validate")
                .long("auto-validate")
                .action(ArgAction::SetTrue)
                .help("Validate after every change"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &ArgMatches) -> Result<SelectorConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => SelectorConfig::from_path(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => SelectorConfig::new(),
    };

    if let Some(allowed) = args.get_many::<String>("allow") {
        config = config.with_allowed_scopes(allowed.map(String::as_str));
    }
    if args.get_flag("prevent-custom") {
        config.prevent_custom_scopes = true;
    }
    if args.get_flag("required") {
        config.required = true;
    }
    if args.get_flag("auto-validate") {
        config.auto_validate = true;
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli().get_matches();
    init_logging(args.get_flag("verbose"));

    let config = load_config(&args)?;
    tracing::info!(
        "Starting scope selector (required: {}, auto-validate: {})",
        config.required,
        config.auto_validate
    );

    let mut session = Session::new(ScopeSelector::from_config(config));
    let stdin = BufReader::new(tokio::io::stdin());
    let valid = session.run(stdin, tokio::io::stdout()).await?;

    println!("{}", session.selector().scope_param());
    if !valid {
        std::process::exit(1);
    }
    Ok(())
}
