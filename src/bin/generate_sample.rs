use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const PRODUCTS: [&str; 5] = ["Widget", "Gadget", "Gizmo", "Doohickey", "Sprocket"];
const PLANS: [&str; 3] = ["free", "pro", "team"];
const FIRST_NAMES: [&str; 8] = ["Ada", "Grace", "Linus", "Ken", "Barbara", "Dennis", "Frances", "Edsger"];

#[derive(Serialize)]
struct SaleRecord {
    date: String,
    region: &'static str,
    product: &'static str,
    units: u32,
    unit_price: f64,
    revenue: f64,
}

#[derive(Serialize)]
struct UserRecord {
    id: u32,
    name: String,
    age: u32,
    plan: &'static str,
    monthly_spend: f64,
    active: bool,
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Daily sales with a mild weekly seasonality.
fn generate_sales<R: Rng>(rng: &mut R, rows: usize) -> Vec<SaleRecord> {
    (0..rows)
        .map(|i| {
            let day = i % 28 + 1;
            let month = i / 28 % 12 + 1;
            let weekend = matches!(i % 7, 5 | 6);
            let base: u32 = if weekend { 14 } else { 8 };
            let units = base + rng.gen_range(0..10);
            let unit_price = round2(rng.gen_range(4.0..40.0));
            SaleRecord {
                date: format!("2024-{month:02}-{day:02}"),
                region: pick(rng, &REGIONS),
                product: pick(rng, &PRODUCTS),
                units,
                unit_price,
                revenue: round2(units as f64 * unit_price),
            }
        })
        .collect()
}

fn generate_users<R: Rng>(rng: &mut R, rows: usize) -> Vec<UserRecord> {
    (0..rows)
        .map(|i| {
            let plan = pick(rng, &PLANS);
            let monthly_spend = match plan {
                "free" => 0.0,
                "pro" => round2(rng.gen_range(10.0..30.0)),
                _ => round2(rng.gen_range(50.0..250.0)),
            };
            UserRecord {
                id: i as u32 + 1,
                name: format!("{} {}", pick(rng, &FIRST_NAMES), i + 1),
                age: rng.gen_range(18..70),
                plan,
                monthly_spend,
                active: rng.gen_bool(0.8),
            }
        })
        .collect()
}

fn write_sales(path: &Path, records: &[SaleRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_users(path: &Path, records: &[UserRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("serialising users")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(2024);

    let sales = generate_sales(&mut rng, 365);
    let sales_path = out_dir.join("sales.csv");
    write_sales(&sales_path, &sales)?;
    log::info!("Wrote {} rows to {}", sales.len(), sales_path.display());

    let users = generate_users(&mut rng, 120);
    let users_path = out_dir.join("users.json");
    write_users(&users_path, &users)?;
    log::info!("Wrote {} records to {}", users.len(), users_path.display());

    Ok(())
}
