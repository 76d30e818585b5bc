use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use roadwatch_core::dataset::CameraDataset;
use roadwatch_core::proximity::DEFAULT_BUFFER_KM;
use roadwatch_routing::{NominatimClient, RoutingClient};
use roadwatch_server::planner::{analyze, PlanRequest};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a driving route scored against camera road conditions", long_about = None)]
struct Args {
    /// Origin: "lon,lat" or a free-text address
    #[arg(long = "from")]
    from: String,

    /// Destination: "lon,lat" or a free-text address
    #[arg(long = "to")]
    to: String,

    /// Alternative routes to request (max 3)
    #[arg(long, default_value_t = 3)]
    alternatives: u32,

    /// Classification results file produced by the pipeline
    #[arg(long, default_value = "data/fast_classified/classification_results.json")]
    results: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let bytes = std::fs::read(&args.results)
        .with_context(|| format!("reading {}", args.results.display()))?;
    let raw: serde_json::Value =
        serde_json::from_slice(&bytes).context("parsing results file")?;
    let cameras = CameraDataset::from_value(&raw);
    println!("Loaded {} camera record(s)", cameras.len());

    let routing = RoutingClient::public_osrm();
    let geocoder = NominatimClient::public();

    let request = PlanRequest {
        origin: args.from,
        destination: args.to,
        alternatives: Some(args.alternatives),
    };

    println!("Planning route...");
    let plan = analyze(&cameras, &routing, &geocoder, &request, DEFAULT_BUFFER_KM).await?;

    println!(
        "From: {}, {}",
        plan.origin.lon, plan.origin.lat
    );
    println!(
        "To:   {}, {}",
        plan.destination.lon, plan.destination.lat
    );
    println!("Found {} route(s)\n", plan.routes.len());

    for route in &plan.routes {
        println!("Route {}:", route.route_index + 1);
        println!(
            "  Recommended: {}",
            if route.is_recommended { "Yes" } else { "No" }
        );
        println!("  Distance: {} km", route.distance_km);
        println!("  Duration: {} min", route.duration_min);
        println!(
            "  Safety Score: {}/100 ({})",
            route.safety.score, route.safety.rating
        );
        println!("  Cameras monitored: {}", route.matched_camera_count);
        println!("  Hazards detected: {}", route.safety.hazard_count);
        if !route.top_hazards.is_empty() {
            println!("  Hazardous locations:");
            for camera in &route.top_hazards {
                println!("    - {} ({} km from route)", camera.name, camera.distance_km);
            }
        }
        println!();
    }

    Ok(())
}
