use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// FoodFlux - personal calorie tracker
#[derive(Parser, Debug)]
#[command(name = "foodflux")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Session subject vouched for by the identity provider (a user id)
    #[arg(long, env = "FOODFLUX_SESSION", global = true)]
    pub session: Option<String>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level and mirror warnings to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ensure the demo account exists and print its user id
    Seed,

    /// Show one day: entries, total, goal and presets
    Day {
        /// Day to show (YYYY-MM-DD); defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
    },

    /// List presets by name
    Presets,

    /// Create a preset
    AddPreset {
        name: String,

        #[arg(allow_negative_numbers = true)]
        calories_per_unit: i64,
    },

    /// Replace a preset's name and calories
    UpdatePreset {
        id: Uuid,

        name: String,

        #[arg(allow_negative_numbers = true)]
        calories_per_unit: i64,
    },

    /// Delete a preset; entries logged from it are kept
    DeletePreset { id: Uuid },

    /// Set the daily calorie goal
    SetGoal {
        #[arg(allow_negative_numbers = true)]
        goal_calories: i64,
    },

    /// Log an entry, optionally prefilled from a preset
    AddEntry {
        /// Day the entry belongs to (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Food name; may be omitted when --preset is given
        #[arg(long, default_value = "")]
        name: String,

        /// Calories; 0 takes the preset's value
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        calories: f64,

        /// Preset to prefill name and calories from
        #[arg(long)]
        preset: Option<Uuid>,
    },

    /// Delete an entry
    DeleteEntry { id: Uuid },

    /// Print the day after DATE
    NextDay { date: String },

    /// Print the day before DATE
    PrevDay { date: String },
}
