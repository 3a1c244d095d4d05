//! Dashboard state: which run is current, what is on screen, and whether the
//! last run failed.
//!
//! Every pipeline run is tagged with a [`RunToken`]. Only the most recently
//! issued token may update the state, so a slow run that finishes after a
//! newer one is dropped instead of overwriting fresher data.

use std::sync::Arc;

use crate::{
    error::{ErrorKind, PipelineError},
    model::{LocationQuery, WeatherReport},
};

/// Identifies one pipeline run. Tokens are issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken(u64);

impl RunToken {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Nothing requested yet.
    Idle,
    Loading { location: LocationQuery },
    Ready,
    Failed {
        location: LocationQuery,
        kind: ErrorKind,
        message: String,
    },
}

/// Whether a completed run was applied or discarded as superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug)]
pub struct Dashboard {
    last_issued: u64,
    pending: Option<(RunToken, LocationQuery)>,
    status: Status,
    report: Option<Arc<WeatherReport>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            last_issued: 0,
            pending: None,
            status: Status::Idle,
            report: None,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The last successfully fetched report. Kept while a newer run is loading
    /// and after a failed run.
    pub fn report(&self) -> Option<&Arc<WeatherReport>> {
        self.report.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading { .. })
    }

    /// Start a new run for `location`, superseding any run still in flight.
    pub fn begin(&mut self, location: LocationQuery) -> RunToken {
        self.last_issued += 1;
        let token = RunToken(self.last_issued);

        if let Some((previous, _)) = self.pending.replace((token, location.clone())) {
            tracing::debug!(superseded = previous.seq(), by = token.seq(), "run superseded");
        }
        self.status = Status::Loading { location };
        token
    }

    /// Apply the result of the run identified by `token`. Results from any run
    /// other than the latest one are discarded.
    pub fn complete(
        &mut self,
        token: RunToken,
        result: Result<WeatherReport, PipelineError>,
    ) -> Completion {
        let location = match self.pending.take() {
            Some((latest, location)) if latest == token => location,
            other => {
                self.pending = other;
                tracing::debug!(seq = token.seq(), "discarding stale run result");
                return Completion::Stale;
            }
        };

        match result {
            Ok(report) => {
                tracing::info!(
                    seq = token.seq(),
                    location = %location,
                    records = report.forecast.records.len(),
                    "weather updated"
                );
                self.report = Some(Arc::new(report));
                self.status = Status::Ready;
            }
            Err(err) => {
                tracing::warn!(
                    seq = token.seq(),
                    location = %location,
                    error = %err,
                    "weather fetch failed"
                );
                self.status = Status::Failed {
                    location,
                    kind: err.kind(),
                    message: err.to_string(),
                };
            }
        }
        Completion::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, Forecast, ResolvedPlace};
    use chrono::Utc;

    fn query(s: &str) -> LocationQuery {
        LocationQuery::parse(s).expect("valid query")
    }

    fn report(name: &str) -> WeatherReport {
        WeatherReport {
            query: query(name),
            place: ResolvedPlace {
                name: name.to_string(),
                state: None,
                country: None,
                coordinates: Coordinates::new(0.0, 0.0),
            },
            forecast: Forecast::default(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn starts_idle_without_report() {
        let dash = Dashboard::new();
        assert_eq!(dash.status(), &Status::Idle);
        assert!(dash.report().is_none());
    }

    #[test]
    fn tokens_increase() {
        let mut dash = Dashboard::new();
        let a = dash.begin(query("A"));
        let b = dash.begin(query("B"));
        assert!(b > a);
        assert_eq!(b.seq(), a.seq() + 1);
    }

    #[test]
    fn success_replaces_report() {
        let mut dash = Dashboard::new();
        let token = dash.begin(query("Kolkata"));
        assert!(dash.is_loading());

        assert_eq!(dash.complete(token, Ok(report("Kolkata"))), Completion::Applied);
        assert_eq!(dash.status(), &Status::Ready);
        assert_eq!(dash.report().unwrap().place.name, "Kolkata");
    }

    #[test]
    fn stale_result_arriving_late_is_discarded() {
        let mut dash = Dashboard::new();
        let delhi = dash.begin(query("Delhi"));
        let mumbai = dash.begin(query("Mumbai"));

        assert_eq!(dash.complete(mumbai, Ok(report("Mumbai"))), Completion::Applied);
        assert_eq!(dash.complete(delhi, Ok(report("Delhi"))), Completion::Stale);

        assert_eq!(dash.report().unwrap().place.name, "Mumbai");
        assert_eq!(dash.status(), &Status::Ready);
    }

    #[test]
    fn stale_result_arriving_early_keeps_loading() {
        let mut dash = Dashboard::new();
        let delhi = dash.begin(query("Delhi"));
        let mumbai = dash.begin(query("Mumbai"));

        assert_eq!(dash.complete(delhi, Ok(report("Delhi"))), Completion::Stale);
        assert!(dash.is_loading());
        assert!(dash.report().is_none());

        assert_eq!(dash.complete(mumbai, Ok(report("Mumbai"))), Completion::Applied);
        assert_eq!(dash.report().unwrap().place.name, "Mumbai");
    }

    #[test]
    fn failure_keeps_previous_report_and_records_error() {
        let mut dash = Dashboard::new();
        let first = dash.begin(query("Kolkata"));
        dash.complete(first, Ok(report("Kolkata")));

        let second = dash.begin(query("Atlantis"));
        let err = PipelineError::NotFound {
            location: "Atlantis".into(),
        };
        assert_eq!(dash.complete(second, Err(err)), Completion::Applied);

        match dash.status() {
            Status::Failed {
                location,
                kind,
                message,
            } => {
                assert_eq!(location.as_str(), "Atlantis");
                assert_eq!(*kind, ErrorKind::NotFound);
                assert!(message.contains("Atlantis"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(dash.report().unwrap().place.name, "Kolkata");
    }

    #[test]
    fn completing_twice_is_stale() {
        let mut dash = Dashboard::new();
        let token = dash.begin(query("Kolkata"));
        assert_eq!(dash.complete(token, Ok(report("Kolkata"))), Completion::Applied);
        assert_eq!(dash.complete(token, Ok(report("Other"))), Completion::Stale);
        assert_eq!(dash.report().unwrap().place.name, "Kolkata");
    }
}
