use lodestar_core::config::Config;
use lodestar_core::dates::day_key;
use lodestar_core::store::Store;
use std::path::Path;
use uuid::Uuid;

use crate::output;

pub fn run(home: &Path, user: Uuid, json: bool) -> anyhow::Result<()> {
    let config = Config::load(home)?;
    let store = Store::open(&config.data_path(home))?;

    store.profile(user)?;
    let streak = store.streak(user)?;

    if json {
        output::print_json(&streak)?;
    } else {
        println!("current streak:  {} days", streak.current_streak);
        println!("longest streak:  {} days", streak.longest_streak);
        println!("total check-ins: {}", streak.total_checkins);
        match streak.last_checkin_date {
            Some(date) => println!("last check-in:   {}", day_key(date)),
            None => println!("last check-in:   never"),
        }
    }
    Ok(())
}
