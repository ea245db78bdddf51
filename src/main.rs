mod config;
mod error;
mod fetch;
mod loader;
mod model;
mod overlay;
mod query;
mod sample;
mod sheet;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use config::Settings;
use loader::Origin;
use model::{Language, Status};
use query::Criteria;
use store::ApartmentStore;

#[derive(Parser)]
#[command(name = "floorplan_sheets", about = "Apartment data from a published floor-plan sheet")]
struct Cli {
    /// Read the sheet from a local CSV file instead of the configured URL
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the sheet and print a summary
    Load,
    /// List apartments matching the given filters
    List {
        /// Bedroom counts to keep (comma separated); default: all
        #[arg(short, long, value_delimiter = ',')]
        bedrooms: Option<Vec<u8>>,
        #[arg(long)]
        min_floor: Option<i32>,
        #[arg(long)]
        max_floor: Option<i32>,
        #[arg(long)]
        min_area: Option<f64>,
        #[arg(long)]
        max_area: Option<f64>,
        /// Statuses to keep (available, reserved, sold); default: any
        #[arg(short, long, value_delimiter = ',')]
        status: Vec<Status>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one apartment
    Show {
        id: String,
        /// Label language for raw fields (mk, en, sq)
        #[arg(short, long, default_value = "mk")]
        lang: Language,
        #[arg(long)]
        json: bool,
    },
    /// Print the status legend
    Legend,
    /// Check which apartment ids have an element in the overlay SVGs
    Overlays,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let origin = match &cli.file {
        Some(path) => Origin::File(path),
        None => Origin::Remote,
    };
    let catalog = store::Catalog::new(sample::store(&settings.office_prefix));
    loader::reload(&catalog, origin, &settings).await;
    let store = catalog.snapshot();

    let result = match cli.command {
        Commands::Load => {
            print_summary(&store);
            Ok(())
        }
        Commands::List {
            bedrooms,
            min_floor,
            max_floor,
            min_area,
            max_area,
            status,
            json,
        } => {
            let mut criteria = Criteria::permissive(store.records());
            if let Some(b) = bedrooms {
                criteria.bedrooms = b.into_iter().collect();
            }
            criteria.floors = (
                min_floor.unwrap_or(criteria.floors.0),
                max_floor.unwrap_or(criteria.floors.1),
            );
            criteria.area = (
                min_area.unwrap_or(criteria.area.0),
                max_area.unwrap_or(criteria.area.1),
            );
            criteria.status = status.into_iter().collect();

            let rows = store.filter(&criteria);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            if rows.is_empty() {
                println!("No apartments match.");
                return Ok(());
            }

            println!(
                "{:<10} | {:>5} | {:>8} | {:>7} | {:<9} | {:<18}",
                "Id", "Floor", "Bedrooms", "Area", "Status", "Area from"
            );
            println!("{}", "-".repeat(72));
            for r in &rows {
                let bedrooms = match (r.is_office_space, r.bedrooms) {
                    (true, _) => "office".to_string(),
                    (false, Some(b)) => b.to_string(),
                    (false, None) => "-".to_string(),
                };
                println!(
                    "{:<10} | {:>5} | {:>8} | {:>7} | {:<9} | {:<18}",
                    truncate(&r.id, 10),
                    r.floor.map(|f| f.to_string()).unwrap_or_else(|| "-".into()),
                    bedrooms,
                    r.area.map(|a| format!("{:.1}", a)).unwrap_or_else(|| "-".into()),
                    r.status,
                    truncate(&r.area_detection_method().unwrap_or_default(), 18),
                );
            }
            println!("\n{} of {} apartments", rows.len(), store.len());
            Ok(())
        }
        Commands::Show { id, lang, json } => match store.get(&id) {
            None => {
                println!("No apartment with id '{}'.", id);
                Ok(())
            }
            Some(r) if json => {
                println!("{}", serde_json::to_string_pretty(r)?);
                Ok(())
            }
            Some(r) => {
                let legend = store.status_label(r);
                println!("Id:        {}", r.id);
                println!("Office:    {}", r.is_office_space);
                println!("Bedrooms:  {}", r.bedrooms.map(|b| b.to_string()).unwrap_or_else(|| "-".into()));
                println!("Floor:     {}", r.floor.map(|f| f.to_string()).unwrap_or_else(|| "-".into()));
                println!("Area:      {}", r.area.map(|a| format!("{:.1}", a)).unwrap_or_else(|| "-".into()));
                println!("Status:    {} ({})", r.status, legend);
                if let Some(method) = r.area_detection_method() {
                    println!("Area from: {}", method);
                }
                let fields = store.visible_fields(&id, lang).unwrap_or_default();
                if !fields.is_empty() {
                    println!("\n--- Fields ---");
                    for (label, value) in fields {
                        println!("  {}: {}", label, value);
                    }
                }
                Ok(())
            }
        },
        Commands::Legend => {
            let legend = store.legend();
            if legend.is_empty() {
                println!("Sheet has no status legend.");
            }
            for e in legend.entries() {
                let status = e.status.map(|s| s.to_string()).unwrap_or_else(|| "?".into());
                println!("{:>4}  {:<10} {}", e.code, status, e.label);
            }
            Ok(())
        }
        Commands::Overlays => check_overlays(&store, &settings).await,
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_summary(store: &ApartmentStore) {
    if store.is_empty() {
        println!("No apartments loaded.");
        return;
    }
    let s = store.summary();
    println!("Source:    {:?} (loaded {})", store.source(), store.loaded_at().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Records:   {}", s.total);
    println!("Offices:   {}", s.office_spaces);
    println!("Columns:   {}", store.schema().len());
    for status in Status::ALL {
        println!("{:<10} {}", format!("{}:", status), s.by_status.get(&status).copied().unwrap_or(0));
    }
    println!("Bedrooms:  {:?}", s.bedroom_options);
    if let Some((lo, hi)) = s.floor_range {
        println!("Floors:    {}..={}", lo, hi);
    }
    if let Some((lo, hi)) = s.area_range {
        println!("Area:      {:.1}..={:.1}", lo, hi);
    }
}

async fn check_overlays(store: &ApartmentStore, settings: &Settings) -> anyhow::Result<()> {
    let client = fetch::build_client()?;
    let docs = [
        ("floorplan_svg_url", &settings.floorplan_svg_url),
        ("building_svg_url", &settings.building_svg_url),
    ];

    for (name, url) in docs {
        let svg = match fetch::fetch_svg(&client, name, url, settings.fetch_timeout_secs).await {
            Ok(svg) => svg,
            Err(e) => {
                tracing::warn!(document = name, error = %e, "Overlay unavailable");
                continue;
            }
        };
        let ids = overlay::collect_ids(&svg, &settings.overlay_id_attribute)?;
        let c = overlay::coverage(store, &ids);
        println!(
            "{}: {} matched, {} without overlay, {} unknown overlay ids",
            name,
            c.matched.len(),
            c.missing_overlay.len(),
            c.unknown_ids.len()
        );
        for id in c.missing_overlay.iter().take(20) {
            println!("  no overlay: {}", id);
        }
        for id in c.unknown_ids.iter().take(20) {
            println!("  no record:  {}", id);
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
