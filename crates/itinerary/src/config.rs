//! Itinerary routing table and process configuration.

use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chart::DEFAULT_CHART_CAP;

/// Initial map view for a page before a route is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapDefaults {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
}

/// Static location drawn on days without a cycling route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestDay {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub radius_m: f64,
    pub label: String,
}

impl Default for RestDay {
    fn default() -> Self {
        Self {
            center: [5.5, -73.5],
            zoom: 8,
            radius_m: 20_000.0,
            label: "Bosques de Pandora - Día de Descanso".to_string(),
        }
    }
}

/// What a page displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTarget {
    /// GPX resource path, relative to the route store root.
    Route(String),
    RestDay(RestDay),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    pub id: String,
    pub day: u32,
    pub target: PageTarget,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read itinerary config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid itinerary config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate page id `{0}`")]
    DuplicatePage(String),
}

/// Page identifier to display target lookup.
///
/// Pages that are not listed resolve to `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub map: MapDefaults,
    #[serde(default)]
    pub pages: Vec<PageEntry>,
    #[serde(default)]
    pub fallback: RestDay,
}

impl Default for Itinerary {
    fn default() -> Self {
        let route = |id: &str, day: u32, gpx: &str| PageEntry {
            id: id.to_string(),
            day,
            target: PageTarget::Route(gpx.to_string()),
        };

        Self {
            map: MapDefaults {
                center: [6.2, -73.5],
                zoom: 10,
            },
            pages: vec![
                route("dia-1", 1, "assets/routes/etapa-1.gpx"),
                route("dia-2", 2, "assets/routes/etapa-2.gpx"),
                PageEntry {
                    id: "dia-3".to_string(),
                    day: 3,
                    target: PageTarget::RestDay(RestDay::default()),
                },
                route("dia-4", 4, "assets/routes/etapa-3.gpx"),
                route("dia-5", 5, "assets/routes/etapa-4-opcional.gpx"),
            ],
            fallback: RestDay::default(),
        }
    }
}

impl Itinerary {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let itinerary: Itinerary = toml::from_str(s)?;
        itinerary.validate()?;
        Ok(itinerary)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for page in &self.pages {
            if !seen.insert(page.id.as_str()) {
                return Err(ConfigError::DuplicatePage(page.id.clone()));
            }
        }
        Ok(())
    }

    pub fn page(&self, page_id: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn resolve(&self, page_id: &str) -> ResolvedPage<'_> {
        match self.page(page_id) {
            Some(entry) => ResolvedPage {
                day: Some(entry.day),
                target: match &entry.target {
                    PageTarget::Route(path) => Target::Route(path),
                    PageTarget::RestDay(rest) => Target::RestDay(rest),
                },
            },
            None => ResolvedPage {
                day: None,
                target: Target::RestDay(&self.fallback),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPage<'a> {
    pub day: Option<u32>,
    pub target: Target<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target<'a> {
    Route(&'a str),
    RestDay(&'a RestDay),
}

/// Page id from a URL path: the file stem of its last segment.
///
/// `/itinerario/dia-1.html` gives `dia-1`.
pub fn page_id_from_path(path: &str) -> Option<&str> {
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let stem = segment.split_once('.').map_or(segment, |(stem, _)| stem);
    (!stem.is_empty()).then_some(stem)
}

/// Where GPX resources are fetched from.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteSource {
    Local(PathBuf),
    Http(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub site_dir: PathBuf,
    pub route_base_url: Option<String>,
    pub itinerary_path: Option<PathBuf>,
    pub chart_cap: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            site_dir: PathBuf::from("./site"),
            route_base_url: None,
            itinerary_path: None,
            chart_cap: DEFAULT_CHART_CAP,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            site_dir: env::var("SITE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.site_dir),
            route_base_url: env::var("ROUTE_BASE_URL").ok().filter(|u| !u.is_empty()),
            itinerary_path: env::var("ITINERARY_CONFIG").ok().map(PathBuf::from),
            chart_cap: env::var("CHART_CAP")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(defaults.chart_cap),
        }
    }

    pub fn route_source(&self) -> RouteSource {
        match &self.route_base_url {
            Some(url) => RouteSource::Http(url.clone()),
            None => RouteSource::Local(self.site_dir.clone()),
        }
    }

    pub fn itinerary(&self) -> Result<Itinerary, ConfigError> {
        match &self.itinerary_path {
            Some(path) => Itinerary::load(path),
            None => Ok(Itinerary::default()),
        }
    }
}
