//! Terminal rendering of lookup results.

use immo_noise_address::LookupRefusal;
use immo_noise_geocoder::GeosearchHit;
use immo_noise_noise::Classification;
use immo_noise_noise::report::{LookupSource, NoiseReport};

pub fn print_refusal(refusal: &LookupRefusal, json: bool) -> Result<(), serde_json::Error> {
    if json {
        let value = serde_json::json!({ "status": "refused", "message": refusal.to_string() });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{refusal}");
    }
    Ok(())
}

pub fn print_report(
    address: &str,
    report: &NoiseReport,
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        let value = serde_json::json!({ "address": address, "report": report });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match report {
        NoiseReport::Unavailable { message } => println!("{message}"),
        NoiseReport::Categories {
            source,
            entries,
            grid,
        } => {
            let source = match source {
                LookupSource::Aggregated => "aggregated source",
                LookupSource::Fallback => "per-layer fallback",
            };
            println!("Noise for {address} ({source})");
            for entry in entries {
                let detail = entry
                    .descriptor
                    .as_deref()
                    .filter(|_| entry.is_available())
                    .unwrap_or_default();
                println!(
                    "  {:<20} {:<10} {:<16} {}",
                    entry.label, entry.display, detail, entry.tooltip
                );
            }
            match grid {
                Some(grid) => println!(
                    "  grid: {} cells around {:.5}, {:.5}",
                    grid.cells.len(),
                    grid.center.latitude,
                    grid.center.longitude
                ),
                None => println!("  grid: none"),
            }
        }
    }
    Ok(())
}

pub fn print_geocode(address: &str, hit: Option<&GeosearchHit>) {
    let Some(hit) = hit else {
        println!("No match for {address}");
        return;
    };

    println!(
        "{address} -> {}, {} ({})",
        hit.coordinate.latitude,
        hit.coordinate.longitude,
        hit.coordinate.system.epsg()
    );
    if let Some(matched) = &hit.matched_address {
        println!("  matched: {matched}");
    }
    if let Some(bbox) = &hit.bbox {
        println!("  bbox: {}", bbox.to_query_param());
    }
}

pub fn print_classification(descriptor: &str, classification: Option<Classification>) {
    match classification {
        Some(c) => {
            let decibels = c
                .decibels
                .map_or_else(|| "below minimum".to_string(), |db| format!("{db} dB(A)"));
            println!(
                "{descriptor}: {} ({}, {}) {}",
                c.tier.label(),
                decibels,
                c.tier.color(),
                c.tier.tooltip()
            );
        }
        None => println!("{descriptor}: unclassifiable"),
    }
}
