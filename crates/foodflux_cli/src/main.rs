//! FoodFlux command-line entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and own the SQLite connection.
//! - Run exactly one tracker command per process and print its result.
//!
//! Usage: foodflux [--db PATH] [--session USER_ID] <COMMAND>

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use foodflux_core::db::open_db;
use foodflux_core::{
    adjacent_date_key, init_logging, seed_demo_user, DayDirection, DaySummary, DayView, Entry,
    FoodItem, LogConfig, LoggingInvalidator, SqliteStore, StoredUserGateway, SystemClock,
    TrackerConfig, TrackerService,
};
use log::info;
use serde::Serialize;

use cli::{Cli, Commands};

const STDERR_LOG_LEVEL: &str = "warn";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::from_env()?;

    init_logging(&log_config(&config, cli.verbose))
        .map_err(anyhow::Error::msg)
        .context("failed to start logging")?;

    // Pure date arithmetic needs neither storage nor a session.
    match &cli.command {
        Commands::NextDay { date } => {
            println!("{}", adjacent_date_key(date, DayDirection::Next)?);
            return Ok(());
        }
        Commands::PrevDay { date } => {
            println!("{}", adjacent_date_key(date, DayDirection::Previous)?);
            return Ok(());
        }
        _ => {}
    }

    let database_path = cli.db.clone().unwrap_or(config.database_path);
    let conn = open_db(&database_path)
        .with_context(|| format!("failed to open database `{}`", database_path.display()))?;
    let store = SqliteStore::try_new(&conn)?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    if let Commands::Seed = cli.command {
        let outcome = seed_demo_user(&store)?;
        let verb = if outcome.created { "created" } else { "exists" };
        return emit(cli.json, &outcome.user, || {
            format!("{verb} {}", outcome.user.id)
        });
    }

    let service = TrackerService::new(store, StoredUserGateway::new(store), LoggingInvalidator);
    let subject = cli.session.as_deref();

    match cli.command {
        Commands::Day { date } => {
            let view = service.day_view(subject, date.as_deref(), &SystemClock)?;
            emit(cli.json, &view, || render_day(&view))
        }
        Commands::Presets => {
            let presets = service.list_presets(subject)?;
            emit(cli.json, &presets, || render_presets(&presets))
        }
        Commands::AddPreset {
            name,
            calories_per_unit,
        } => {
            let item = service.create_preset(subject, &name, calories_per_unit)?;
            emit(cli.json, &item, || render_preset(&item))
        }
        Commands::UpdatePreset {
            id,
            name,
            calories_per_unit,
        } => {
            let item = service.update_preset(subject, id, &name, calories_per_unit)?;
            emit(cli.json, &item, || render_preset(&item))
        }
        Commands::DeletePreset { id } => {
            service.delete_preset(subject, id)?;
            emit(cli.json, &id, || format!("deleted {id}"))
        }
        Commands::SetGoal { goal_calories } => {
            let goal = service.set_goal(subject, goal_calories)?;
            emit(cli.json, &goal, || format!("goal {} kcal", goal.goal_calories))
        }
        Commands::AddEntry {
            date,
            name,
            calories,
            preset,
        } => {
            let entry = service.add_entry(
                subject,
                &foodflux_core::AddEntryRequest {
                    date_key: date,
                    name,
                    calories,
                    food_item_id: preset,
                },
            )?;
            emit(cli.json, &entry, || render_entry(&entry))
        }
        Commands::DeleteEntry { id } => {
            service.delete_entry(subject, id)?;
            emit(cli.json, &id, || format!("deleted {id}"))
        }
        Commands::Seed | Commands::NextDay { .. } | Commands::PrevDay { .. } => Ok(()),
    }
}

/// Without a log directory only warnings reach stderr unless `--verbose`.
fn log_config(config: &TrackerConfig, verbose: bool) -> LogConfig {
    let level = if verbose {
        "debug"
    } else if config.log_dir.is_none() {
        STDERR_LOG_LEVEL
    } else {
        config.log_level
    };
    LogConfig {
        level: level.to_string(),
        log_dir: config.log_dir.clone(),
        mirror_to_stderr: verbose,
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Seed => "seed",
        Commands::Day { .. } => "day",
        Commands::Presets => "presets",
        Commands::AddPreset { .. } => "add-preset",
        Commands::UpdatePreset { .. } => "update-preset",
        Commands::DeletePreset { .. } => "delete-preset",
        Commands::SetGoal { .. } => "set-goal",
        Commands::AddEntry { .. } => "add-entry",
        Commands::DeleteEntry { .. } => "delete-entry",
        Commands::NextDay { .. } => "next-day",
        Commands::PrevDay { .. } => "prev-day",
    }
}

fn render_preset(item: &FoodItem) -> String {
    format!("{}  {} ({} kcal)", item.id, item.name, item.calories_per_unit)
}

fn render_presets(presets: &[FoodItem]) -> String {
    if presets.is_empty() {
        return "no presets".to_string();
    }
    presets
        .iter()
        .map(render_preset)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_entry(entry: &Entry) -> String {
    format!(
        "{}  {}  {} ({} kcal)",
        entry.id, entry.date_key, entry.name, entry.calories
    )
}

fn render_summary(summary: &DaySummary) -> String {
    let mut lines: Vec<String> = summary.entries.iter().map(render_entry).collect();
    if lines.is_empty() {
        lines.push("no entries".to_string());
    }
    lines.push(format!(
        "total {} / goal {} (remaining {})",
        summary.total, summary.goal_calories, summary.diff
    ));
    lines.join("\n")
}

fn render_day(view: &DayView) -> String {
    format!(
        "{} (today {}, prev {}, next {})\n{}\npresets:\n{}",
        view.summary.date_key,
        view.today,
        view.previous,
        view.next,
        render_summary(&view.summary),
        render_presets(&view.presets)
    )
}
