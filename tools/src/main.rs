//! economy-runner: seeded demo driver for the Campus Connect token economy.
//!
//! Seeds a roster of users, simulates a week of help sessions, runs the
//! reward storefront, then ranks the leaderboard and pays weekly bonuses.
//!
//! Usage:
//!   economy-runner --seed 7 --users 12 --db campus.db
//!   economy-runner --data-dir ./data --json

mod names;

use anyhow::Result;
use chrono::{Duration, Utc};
use connect_core::admin::BonusAward;
use connect_core::catalog::RewardItem;
use connect_core::config::EconomyConfig;
use connect_core::economy::TokenEconomy;
use connect_core::error::EconomyError;
use connect_core::leaderboard::{Leaderboard, LeaderboardPeriod};
use connect_core::ledger::TokenTransaction;
use names::{DemoNames, DemoRng};
use std::env;

#[derive(serde::Serialize)]
struct RunSnapshot {
    seed: u64,
    users: usize,
    sessions: u64,
    storefront: Vec<RewardItem>,
    board: Leaderboard,
    bonuses: Vec<BonusAward>,
    sample_history: Vec<TokenTransaction>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 7u64);
    let users = parse_arg(&args, "--users", 12usize);
    let json_mode = args.iter().any(|a| a == "--json");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if !json_mode {
        println!("Campus Connect — economy-runner");
        println!("  seed:      {seed}");
        println!("  users:     {users}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    // For :memory: use SQLite shared-memory URI so any second connection
    // opened during the run would see the same in-memory database.
    let db_effective: String = if db == ":memory:" {
        format!("file:economy_{}?mode=memory&cache=shared", unix_now())
    } else {
        db.to_string()
    };

    let config = EconomyConfig::load(data_dir)?;
    let mut economy = TokenEconomy::open(&db_effective, config)?;
    let mut rng = DemoRng::new(seed);

    let roster = seed_roster(&mut economy, &mut rng, users)?;
    let sessions = simulate_week(&mut economy, &mut rng, &roster)?;
    let first_purchase = run_storefront(&mut economy, &mut rng, &roster)?;

    // re-buy the first purchased item to show the duplicate guard
    if let Some((user_id, item_id)) = &first_purchase {
        match economy.purchase(user_id, item_id) {
            Err(EconomyError::AlreadyOwned { .. }) => {
                log::info!("runner: duplicate purchase correctly rejected")
            }
            Err(e) => return Err(e.into()),
            Ok(_) => anyhow::bail!("duplicate purchase of {item_id} was not rejected"),
        }
    }

    if let Some((user_id, _)) = roster.first() {
        economy.award_tokens("admin-demo", user_id, 25, Some("Welcome-week bonus"))?;
    }

    let period = LeaderboardPeriod::week_ending(Utc::now() + Duration::minutes(1));
    let caller = roster.last().map(|(user_id, _)| user_id.as_str());
    let limit = economy.config.leaderboard.default_limit;
    let board = economy.leaderboard(&period, limit, caller)?;
    let bonuses = economy.award_leaderboard_bonuses("admin-demo", &period)?;

    if json_mode {
        let sample_history = match roster.first() {
            Some((user_id, _)) => economy.transactions_for_user(user_id, 20)?,
            None => Vec::new(),
        };
        let snapshot = RunSnapshot {
            seed,
            users: roster.len(),
            sessions,
            storefront: economy.active_reward_items()?,
            board,
            bonuses,
            sample_history,
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_summary(&economy, &board, &bonuses, &roster, sessions)?;
    }
    Ok(())
}

/// Register `count` users. Returns (user_id, display_name) pairs.
fn seed_roster(
    economy: &mut TokenEconomy,
    rng: &mut DemoRng,
    count: usize,
) -> Result<Vec<(String, String)>> {
    let mut roster = Vec::with_capacity(count);
    for i in 0..count {
        let user_id = format!("user-{:02}", i + 1);
        let name = DemoNames::full_name(rng);
        economy.register_user(&user_id, &name)?;
        roster.push((user_id, name));
    }
    log::info!("runner: registered {} users", roster.len());
    Ok(roster)
}

/// Run a week of help sessions. Each session earns tokens by rating; the
/// rating and service rollups feed the leaderboard afterwards.
fn simulate_week(
    economy: &mut TokenEconomy,
    rng: &mut DemoRng,
    roster: &[(String, String)],
) -> Result<u64> {
    let mut total = 0u64;
    for (user_id, _) in roster {
        let sessions = rng.next_u64_below(9);
        if sessions == 0 {
            continue;
        }
        let mut rating_sum = 0.0;
        for _ in 0..sessions {
            let rating = round1(3.0 + rng.next_f64() * 2.0);
            let description = format!("Completed session: {}", DemoNames::session_topic(rng));
            economy.record_service_completion(user_id, rating, &description)?;
            rating_sum += rating;
        }
        let average = round1(rating_sum / sessions as f64);
        economy.set_user_aggregates(user_id, average, sessions as i64)?;
        total += sessions;
    }
    log::info!("runner: simulated {total} sessions");
    Ok(total)
}

/// Let users spend what they earned. Returns the first completed purchase
/// so the caller can demonstrate the duplicate guard against it.
fn run_storefront(
    economy: &mut TokenEconomy,
    rng: &mut DemoRng,
    roster: &[(String, String)],
) -> Result<Option<(String, String)>> {
    let storefront = economy.active_reward_items()?;
    if storefront.is_empty() {
        return Ok(None);
    }

    let mut first_purchase = None;
    for (user_id, _) in roster {
        if !rng.chance(0.6) {
            continue;
        }
        let balance = economy.balance(user_id)?;
        let affordable: Vec<&RewardItem> =
            storefront.iter().filter(|item| item.price <= balance).collect();
        if affordable.is_empty() {
            continue;
        }
        let item = affordable[rng.next_u64_below(affordable.len() as u64) as usize];
        let receipt = economy.purchase(user_id, &item.item_id)?;
        economy.activate_reward(user_id, &item.item_id, receipt.item.reward_type)?;
        if first_purchase.is_none() {
            first_purchase = Some((user_id.clone(), item.item_id.clone()));
        }
    }
    Ok(first_purchase)
}

fn print_summary(
    economy: &TokenEconomy,
    board: &Leaderboard,
    bonuses: &[BonusAward],
    roster: &[(String, String)],
    sessions: u64,
) -> Result<()> {
    println!("=== WEEK SUMMARY ===");
    println!("  users:          {}", economy.store.user_count()?);
    println!("  sessions:       {sessions}");
    println!("  ledger entries: {}", economy.store.transaction_count_total()?);
    println!("  storefront:     {} active items", economy.active_reward_items()?.len());

    println!();
    println!("=== LEADERBOARD (top {}) ===", board.entries.len());
    if board.entries.is_empty() {
        println!("  (nobody completed a service this week)");
    }
    for entry in &board.entries {
        println!(
            "  #{:<3} {:<22} {:.1}  {:>3} services  {:>5} tokens",
            entry.rank,
            entry.display_name,
            entry.average_rating,
            entry.completed_services,
            entry.token_balance
        );
    }
    if let Some(mine) = &board.caller_entry {
        println!("  ...");
        println!(
            "  #{:<3} {:<22} {:.1}  {:>3} services  (you)",
            mine.rank, mine.display_name, mine.average_rating, mine.completed_services
        );
    }

    println!();
    println!("=== WEEKLY BONUSES ===");
    if bonuses.is_empty() {
        println!("  (no bonuses paid)");
    }
    for award in bonuses {
        println!("  #{:<3} {:<10} +{} tokens", award.rank, award.user_id, award.amount);
    }

    if let Some((user_id, name)) = roster.first() {
        println!();
        println!("=== SAMPLE HISTORY ({name}) ===");
        for txn in economy.transactions_for_user(user_id, 8)? {
            println!(
                "  {}  {:>5}  {:<12}  {}",
                txn.created_at.format("%Y-%m-%d %H:%M"),
                txn.amount,
                txn.kind.as_str(),
                txn.description
            );
        }
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
