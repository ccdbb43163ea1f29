//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::TimeOfDay;
use crate::reach::{ReachReport, ReachRequest};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with search form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Reachable stops fragment.
#[derive(Template)]
#[template(path = "reachable_results.html")]
pub struct ReachableResultsTemplate {
    pub summary: SummaryView,
    pub stops: Vec<StopView>,
}

impl ReachableResultsTemplate {
    /// Build the fragment for a finished analysis.
    pub fn new(request: &ReachRequest, report: &ReachReport) -> Self {
        let deadline = request.departure.saturating_add_secs(request.required_secs);
        Self {
            summary: SummaryView {
                calendar: request.calendar.to_string(),
                departure: request.departure.to_string(),
                deadline: deadline.to_string(),
                origin_points: report.origin_points,
                runs_scanned: report.runs_scanned,
            },
            stops: report
                .results
                .iter()
                .map(|r| {
                    StopView::new(
                        &r.name,
                        r.latitude,
                        r.longitude,
                        r.arrival(),
                        request.departure,
                    )
                })
                .collect(),
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Search summary shown above the results.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub calendar: String,
    pub departure: String,
    pub deadline: String,
    pub origin_points: usize,
    pub runs_scanned: usize,
}

/// Reachable stop view model.
#[derive(Debug, Clone)]
pub struct StopView {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub arrival: String,
    /// Minutes from departure to arrival, rounded down.
    pub minutes_after: u32,
}

impl StopView {
    pub fn new(
        name: &str,
        latitude: f64,
        longitude: f64,
        arrival: TimeOfDay,
        departure: TimeOfDay,
    ) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            arrival: arrival.to_string(),
            minutes_after: arrival.as_secs().saturating_sub(departure.as_secs()) / 60,
        }
    }

    /// Link to the stop on a map.
    pub fn map_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={}&mlon={}#map=17/{}/{}",
            self.latitude, self.longitude, self.latitude, self.longitude
        )
    }
}
