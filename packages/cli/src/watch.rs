//! Streaming lookups from stdin.
//!
//! Each line starts a new lookup cycle while earlier ones may still be in
//! flight. Results are printed only for the cycle that is current when
//! they arrive; the rest are dropped.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use immo_noise_address::{Address, normalize_address_lines, prepare_lookup};
use immo_noise_noise::{
    HttpNoiseBackend, LookupCoordinator, LookupTicket, NoiseLookup, NoiseReport, lookup_noise,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output;

async fn run_cycle(
    backend: &HttpNoiseBackend,
    ticket: LookupTicket,
    address: String,
) -> (LookupTicket, String, NoiseLookup) {
    let lookup = lookup_noise(backend, &address).await;
    (ticket, address, lookup)
}

pub async fn run(
    backend: &HttpNoiseBackend,
    city: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let served = backend.config().city.clone();
    let city = city.unwrap_or(&served).to_string();

    let mut coordinator = LookupCoordinator::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = FuturesUnordered::new();
    let mut stdin_open = true;

    while stdin_open || !in_flight.is_empty() {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                let Some(key) = normalize_address_lines(&line) else {
                    continue;
                };
                let Some(ticket) = coordinator.begin(&key) else {
                    continue;
                };

                let address = Address {
                    city: Some(city.clone()),
                    ..Address::from_text(line)
                };
                match prepare_lookup(&address, None, &served) {
                    Ok(lookup_address) => {
                        log::info!("Cycle {}: looking up '{lookup_address}'", ticket.cycle());
                        in_flight.push(run_cycle(backend, ticket, lookup_address));
                    }
                    Err(refusal) => output::print_refusal(&refusal, json)?,
                }
            }
            Some((ticket, address, lookup)) = in_flight.next(), if !in_flight.is_empty() => {
                let report =
                    NoiseReport::from_lookup(&lookup, &backend.config().unavailable_message);
                if coordinator.is_current(&ticket) {
                    output::print_report(&address, &report, json)?;
                }
                coordinator.complete(&ticket, report);
            }
        }
    }

    Ok(())
}
