//! Lookup-cycle ownership with latest-address-wins semantics.
//!
//! In-flight lookups are never cancelled. Instead each cycle gets a
//! ticket, and a result is only accepted while its ticket's cycle is still
//! the current one. Starting a cycle replaces the previous context
//! wholesale.

use crate::report::NoiseReport;

/// Identifies one lookup cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    cycle: u64,
    address: String,
}

impl LookupTicket {
    /// Cycle number, increasing per [`LookupCoordinator::begin`].
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Address this cycle looks up.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// State of the current cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupContext {
    /// Cycle number.
    pub cycle: u64,
    /// Address being looked up.
    pub address: String,
    /// Result, once the cycle completed.
    pub report: Option<NoiseReport>,
}

/// Owns the current lookup context.
#[derive(Debug, Default)]
pub struct LookupCoordinator {
    last_cycle: u64,
    current: Option<LookupContext>,
}

impl LookupCoordinator {
    /// Creates a coordinator with no current cycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a cycle for `address`.
    ///
    /// Returns `None` when `address` is already the current address, so
    /// repeated triggers for the same page do not refetch.
    pub fn begin(&mut self, address: &str) -> Option<LookupTicket> {
        if self
            .current
            .as_ref()
            .is_some_and(|ctx| ctx.address == address)
        {
            log::debug!("Ignoring repeated lookup for '{address}'");
            return None;
        }

        self.last_cycle += 1;
        if let Some(previous) = self.current.take() {
            log::debug!(
                "Cycle {} for '{address}' supersedes cycle {} ('{}')",
                self.last_cycle,
                previous.cycle,
                previous.address
            );
        }

        self.current = Some(LookupContext {
            cycle: self.last_cycle,
            address: address.to_string(),
            report: None,
        });

        Some(LookupTicket {
            cycle: self.last_cycle,
            address: address.to_string(),
        })
    }

    /// Records `report` for `ticket`'s cycle.
    ///
    /// Returns `false` and drops the report when a newer cycle has started
    /// since the ticket was issued.
    pub fn complete(&mut self, ticket: &LookupTicket, report: NoiseReport) -> bool {
        match self.current.as_mut() {
            Some(ctx) if ctx.cycle == ticket.cycle => {
                ctx.report = Some(report);
                true
            }
            _ => {
                log::debug!(
                    "Discarding stale result of cycle {} for '{}'",
                    ticket.cycle,
                    ticket.address
                );
                false
            }
        }
    }

    /// The current context, if any cycle has started.
    #[must_use]
    pub const fn current(&self) -> Option<&LookupContext> {
        self.current.as_ref()
    }

    /// Whether `ticket` still belongs to the current cycle.
    #[must_use]
    pub fn is_current(&self, ticket: &LookupTicket) -> bool {
        self.current
            .as_ref()
            .is_some_and(|ctx| ctx.cycle == ticket.cycle)
    }

    /// Discards the current context, e.g. when the page no longer shows a
    /// listing.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DEFAULT_UNAVAILABLE_MESSAGE;

    fn report() -> NoiseReport {
        NoiseReport::Unavailable {
            message: DEFAULT_UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    #[test]
    fn repeated_address_is_suppressed() {
        let mut coordinator = LookupCoordinator::new();
        assert!(coordinator.begin("Torstraße 5, Berlin").is_some());
        assert!(coordinator.begin("Torstraße 5, Berlin").is_none());
    }

    #[test]
    fn latest_address_wins() {
        let mut coordinator = LookupCoordinator::new();
        let first = coordinator.begin("Torstraße 5, Berlin").unwrap();
        let second = coordinator.begin("Alexanderplatz 1, Berlin").unwrap();
        assert!(second.cycle() > first.cycle());

        assert!(!coordinator.complete(&first, report()));
        assert!(coordinator.current().unwrap().report.is_none());

        assert!(coordinator.complete(&second, report()));
        let ctx = coordinator.current().unwrap();
        assert_eq!(ctx.address, "Alexanderplatz 1, Berlin");
        assert!(ctx.report.is_some());
    }

    #[test]
    fn returning_to_an_earlier_address_starts_a_new_cycle() {
        let mut coordinator = LookupCoordinator::new();
        let a1 = coordinator.begin("A").unwrap();
        coordinator.begin("B").unwrap();
        let a2 = coordinator.begin("A").unwrap();

        assert!(!coordinator.is_current(&a1));
        assert!(coordinator.is_current(&a2));
        assert!(!coordinator.complete(&a1, report()));
    }

    #[test]
    fn clear_discards_in_flight_results() {
        let mut coordinator = LookupCoordinator::new();
        let ticket = coordinator.begin("A").unwrap();
        coordinator.clear();
        assert!(!coordinator.complete(&ticket, report()));
        assert!(coordinator.begin("A").is_some());
    }
}
