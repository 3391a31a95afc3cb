//! Tour definitions: the capability that fetches them, and the JSON
//! definition format they arrive in.
//!
//! Where definitions actually live (a remote table, a bundled file, a test
//! fixture) is the host's business; the engine only needs [`TourSource`].
//! Fetch failure is fatal to tour startup: the engine is never constructed.

use serde::Deserialize;

use crate::model::{Step, Tour};

/// Errors from fetching or decoding a tour definition.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("tour not found: {0}")]
    TourNotFound(String),

    #[error("invalid tour definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tour source unavailable: {0}")]
    Unavailable(String),
}

/// Provides tour definitions by id.
pub trait TourSource {
    fn fetch_tour(&self, tour_id: &str) -> Result<Tour, SourceError>;
}

/// An in-memory source: a fixed set of tours, looked up by id.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    tours: Vec<Tour>,
}

impl StaticSource {
    pub fn new(tours: Vec<Tour>) -> Self {
        Self { tours }
    }
}

impl TourSource for StaticSource {
    fn fetch_tour(&self, tour_id: &str) -> Result<Tour, SourceError> {
        self.tours
            .iter()
            .find(|tour| tour.id == tour_id)
            .cloned()
            .ok_or_else(|| SourceError::TourNotFound(tour_id.to_string()))
    }
}

/// The raw definition format: steps carry an explicit `order` field and
/// backend-flavored field names (`stepId`, `selector`, `content`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTour {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    step_id: String,
    selector: String,
    title: String,
    content: String,
    order: i64,
}

/// Parses a raw JSON tour definition into a [`Tour`].
///
/// Steps are sorted by their `order` field; the definition's array order
/// carries no meaning.
pub fn parse_tour_json(json: &str) -> Result<Tour, SourceError> {
    let raw: RawTour = serde_json::from_str(json)?;

    let mut steps = raw.steps;
    steps.sort_by_key(|step| step.order);

    Ok(Tour {
        id: raw.id,
        title: raw.title,
        description: raw.description,
        steps: steps
            .into_iter()
            .map(|step| Step {
                id: step.step_id,
                locator: step.selector,
                title: step.title,
                body: step.content,
            })
            .collect(),
    })
}
