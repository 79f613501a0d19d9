use chrono::{Local, NaiveDate};
use clap::Subcommand;
use lodestar_core::checkin::{EveningEntry, MorningEntry};
use lodestar_core::config::Config;
use lodestar_core::dates::parse_day_key;
use lodestar_core::store::{Store, StreakCredit};
use std::path::Path;
use uuid::Uuid;

use crate::output;

#[derive(Subcommand)]
pub enum CheckinSubcommand {
    /// Record a morning check-in
    Morning {
        /// Profile id
        #[arg(long)]
        user: Uuid,

        /// Calendar date, yyyy-mm-dd (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Today's priorities (repeatable)
        #[arg(long = "priority")]
        priorities: Vec<String>,

        /// One-line intention for the day
        #[arg(long)]
        intention: String,
    },

    /// Record an evening check-in
    Evening {
        /// Profile id
        #[arg(long)]
        user: Uuid,

        /// Calendar date, yyyy-mm-dd (default: today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        wins: String,

        #[arg(long)]
        struggles: String,

        #[arg(long)]
        gratitude: String,

        /// Day rating, 1-10
        #[arg(long)]
        rating: u8,
    },

    /// Show one day's check-in
    Show {
        #[arg(long)]
        user: Uuid,

        /// Calendar date, yyyy-mm-dd
        #[arg(long)]
        date: String,
    },
}

fn resolve_date(raw: Option<&str>) -> anyhow::Result<NaiveDate> {
    match raw {
        Some(s) => Ok(parse_day_key(s)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn report(credit: StreakCredit, current_streak: u32, json_value: serde_json::Value, json: bool) {
    if json {
        let _ = output::print_json(&json_value);
        return;
    }
    match credit {
        StreakCredit::Credited { streak_broken } => {
            if streak_broken {
                println!("streak reset — back to day 1");
            } else {
                println!("checked in — {current_streak} day streak");
            }
        }
        StreakCredit::SameDay => println!("checked in — already counted today"),
        StreakCredit::OutOfOrder => {
            println!("saved, but the date is older than your last check-in; streak unchanged")
        }
    }
}

pub fn run(home: &Path, subcommand: CheckinSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(home)?;
    let store = Store::open(&config.data_path(home))?;

    match subcommand {
        CheckinSubcommand::Morning {
            user,
            date,
            priorities,
            intention,
        } => {
            let date = resolve_date(date.as_deref())?;
            let outcome = store.submit_morning(
                user,
                date,
                MorningEntry {
                    priorities,
                    intention,
                },
            )?;
            let value = serde_json::json!({
                "checkin": outcome.checkin,
                "streak": outcome.streak,
                "credited": outcome.credit.credited(),
            });
            report(outcome.credit, outcome.streak.current_streak, value, json);
        }
        CheckinSubcommand::Evening {
            user,
            date,
            wins,
            struggles,
            gratitude,
            rating,
        } => {
            let date = resolve_date(date.as_deref())?;
            let outcome = store.submit_evening(
                user,
                date,
                EveningEntry {
                    wins,
                    struggles,
                    gratitude,
                    day_rating: rating,
                },
            )?;
            let value = serde_json::json!({
                "checkin": outcome.checkin,
                "streak": outcome.streak,
                "credited": outcome.credit.credited(),
            });
            report(outcome.credit, outcome.streak.current_streak, value, json);
        }
        CheckinSubcommand::Show { user, date } => {
            let checkin = store.checkin(user, parse_day_key(&date)?)?;
            output::print_json(&checkin)?;
        }
    }
    Ok(())
}
