//! `staffly` command-line tool

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use staffly_access::{AuthProvider, AuthState};
use staffly_client::{logging, ClientConfig, LogFormat, Preferences, Theme};
use staffly_core::{DashboardSession, SessionSnapshot};
use staffly_layout::{CardId, PersistOutcome};
use std::path::PathBuf;
use std::sync::Arc;

/// Session taken from the configuration file
struct ConfiguredAuth(Option<AuthState>);

impl AuthProvider for ConfiguredAuth {
    fn current(&self) -> Option<AuthState> {
        self.0.clone()
    }
}

fn cli() -> Command {
    Command::new("staffly")
        .version(staffly_core::VERSION)
        .about("Staffly dashboard access and layout tool")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .env("STAFFLY_CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("restaurant")
                .long("restaurant")
                .short('r')
                .global(true)
                .help("Restaurant to act on (overrides the configuration)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Print results and logs as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Debug logging for the staffly crates"),
        )
        .subcommand(Command::new("access").about("Show the resolved access summary"))
        .subcommand(Command::new("layout").about("Show the dashboard card order"))
        .subcommand(
            Command::new("move")
                .about("Move a card onto another card's slot and save")
                .arg(Arg::new("active").required(true).help("Card to move"))
                .arg(Arg::new("over").required(true).help("Card whose slot it takes")),
        )
        .subcommand(
            Command::new("theme")
                .about("Show or set the colour theme")
                .arg(
                    Arg::new("value")
                        .value_parser(["light", "dark", "system"])
                        .help("New theme"),
                ),
        )
        .subcommand(
            Command::new("banner")
                .about("Show or change the announcements banner state")
                .arg(
                    Arg::new("dismiss")
                        .long("dismiss")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("restore")
                        .help("Hide the banner"),
                )
                .arg(
                    Arg::new("restore")
                        .long("restore")
                        .action(ArgAction::SetTrue)
                        .help("Show the banner again"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ClientConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env()?,
    };
    Ok(match matches.get_one::<String>("restaurant") {
        Some(restaurant) => config.with_restaurant(restaurant.as_str()),
        None => config,
    })
}

fn print_snapshot(snapshot: &SessionSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    println!("User: {}", snapshot.user);
    match &snapshot.restaurant {
        Some(restaurant) => println!("Restaurant: {restaurant}"),
        None => println!("Restaurant: (none selected)"),
    }
    println!("Access: {}", snapshot.access.level().as_str());
    if let Some(role) = &snapshot.access.normalized_restaurant_role {
        println!("Restaurant role: {}", role.as_str());
    }
    println!("Cards:");
    for (i, card) in snapshot.layout.iter().enumerate() {
        println!("  {:>2}. {card}", i + 1);
    }
    if let Some(err) = &snapshot.load_error {
        println!("(default order: {err})");
    }
    Ok(())
}

async fn run_move(
    session: &DashboardSession,
    active: CardId,
    over: CardId,
    json: bool,
) -> anyhow::Result<()> {
    let engine = session.engine();
    if !engine.reorder(&active, &over) {
        bail!("cannot move {active} onto {over}: both cards must be on the dashboard and differ");
    }

    let outcome = engine.persist().await?;
    let layout = match outcome {
        PersistOutcome::Saved(layout) => layout,
        PersistOutcome::Unchanged => engine.layout(),
        PersistOutcome::NoContext | PersistOutcome::Superseded => {
            bail!("restaurant context changed before the layout was saved")
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        let order: Vec<&str> = layout.iter().map(CardId::as_str).collect();
        println!("Saved: {}", order.join(", "));
    }
    Ok(())
}

fn run_theme(prefs: &Preferences, value: Option<&String>) -> anyhow::Result<()> {
    if let Some(value) = value {
        let theme: Theme = value.parse()?;
        prefs.set_theme(theme)?;
    }
    println!("{}", prefs.theme());
    Ok(())
}

fn run_banner(
    prefs: &Preferences,
    auth: Option<AuthState>,
    args: &ArgMatches,
) -> anyhow::Result<()> {
    let auth = auth.context("no user configured")?;
    let restaurant = auth
        .restaurant_id
        .context("no restaurant selected; pass --restaurant")?;

    if args.get_flag("dismiss") {
        prefs.dismiss_announcements(&restaurant, &auth.user_id)?;
    } else if args.get_flag("restore") {
        prefs.restore_announcements(&restaurant, &auth.user_id)?;
    }

    let state = if prefs.announcements_dismissed(&restaurant, &auth.user_id) {
        "dismissed"
    } else {
        "shown"
    };
    println!("Announcements banner: {state}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let json = matches.get_flag("json");
    let format = if json { LogFormat::Json } else { LogFormat::Pretty };
    logging::init(format, matches.get_flag("verbose"));

    let config = load_config(&matches)?;
    let prefs = Preferences::open(config.preferences_path.as_deref())?;
    let auth_state = config.session.auth_state();

    match matches.subcommand() {
        Some(("theme", args)) => return run_theme(&prefs, args.get_one::<String>("value")),
        Some(("banner", args)) => return run_banner(&prefs, auth_state, args),
        _ => {}
    }

    let auth = Arc::new(ConfiguredAuth(auth_state));
    let session = DashboardSession::connect(&config, auth)?;
    let snapshot = session
        .sync(false)
        .await
        .context("could not load the dashboard session")?;
    if let Some(err) = session.role_error() {
        tracing::warn!(error = %err, "restaurant role unavailable");
    }

    match matches.subcommand() {
        Some(("access", _)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot.access)?);
            } else {
                print_snapshot(&snapshot, false)?;
            }
        }
        Some(("layout", _)) => print_snapshot(&snapshot, json)?,
        Some(("move", args)) => {
            let (Some(active), Some(over)) = (
                args.get_one::<String>("active"),
                args.get_one::<String>("over"),
            ) else {
                bail!("move needs an active and an over card");
            };
            run_move(&session, active.as_str().into(), over.as_str().into(), json).await?;
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
    Ok(())
}
