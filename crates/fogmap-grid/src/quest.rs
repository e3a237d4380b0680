//! Templated quests around points of interest.
//!
//! Rewards scale with great-circle distance from the player and double when the
//! target cell is still under fog.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{GridCellId, LatLon};
use crate::geo::haversine_km;
use crate::layout::GridLayout;

pub const BASE_REWARD: u32 = 10;
pub const REWARD_PER_KM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiCategory {
    Landmark,
    Food,
    Nature,
    Culture,
    Other,
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoiCategory::Landmark => write!(f, "landmark"),
            PoiCategory::Food => write!(f, "food"),
            PoiCategory::Nature => write!(f, "nature"),
            PoiCategory::Culture => write!(f, "culture"),
            PoiCategory::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub category: PoiCategory,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestOptions {
    pub radius_km: f64,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quest {
    pub poi_name: String,
    pub category: PoiCategory,
    pub title: String,
    pub description: String,
    pub target: LatLon,
    pub cell_id: GridCellId,
    pub distance_km: f64,
    pub reward_points: u32,
    /// Target cell is still unexplored for this player.
    pub fog_bonus: bool,
}

/// Distance-scaled reward, doubled for fogged targets.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn reward_points(distance_km: f64, fogged: bool) -> u32 {
    let scaled = (distance_km.max(0.0) * REWARD_PER_KM).round() as u32;
    let reward = BASE_REWARD.saturating_add(scaled);
    if fogged {
        reward.saturating_mul(2)
    } else {
        reward
    }
}

/// Quests for every POI within `options.radius_km` of `origin`, nearest first.
///
/// POIs outside the layout's region are ignored. Ties on distance are broken
/// by name so the output is stable.
#[must_use]
pub fn generate_quests(
    layout: &GridLayout,
    origin: LatLon,
    pois: &[PointOfInterest],
    explored: &BTreeSet<GridCellId>,
    options: QuestOptions,
) -> Vec<Quest> {
    let mut candidates: Vec<(f64, &PointOfInterest, GridCellId)> = pois
        .iter()
        .filter_map(|poi| {
            let cell_id = layout.coordinate_to_cell_id(poi.lat, poi.lon)?;
            let distance = haversine_km(origin, LatLon::new(poi.lat, poi.lon));
            (distance <= options.radius_km).then_some((distance, poi, cell_id))
        })
        .collect();

    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));

    candidates
        .into_iter()
        .take(options.limit)
        .map(|(distance_km, poi, cell_id)| {
            let fogged = !explored.contains(&cell_id);
            let (title, description) = render(poi);
            Quest {
                poi_name: poi.name.clone(),
                category: poi.category,
                title,
                description,
                target: LatLon::new(poi.lat, poi.lon),
                cell_id,
                distance_km,
                reward_points: reward_points(distance_km, fogged),
                fog_bonus: fogged,
            }
        })
        .collect()
}

fn render(poi: &PointOfInterest) -> (String, String) {
    let name = &poi.name;
    let (title, mut description) = match poi.category {
        PoiCategory::Landmark => (
            format!("Stand before {name}"),
            format!("Make your way to {name} and take in the view."),
        ),
        PoiCategory::Food => (
            format!("A taste of {name}"),
            format!("Find {name} and order something you have never tried."),
        ),
        PoiCategory::Nature => (
            format!("Trail to {name}"),
            format!("Walk to {name} and spend ten minutes outdoors."),
        ),
        PoiCategory::Culture => (
            format!("Stories of {name}"),
            format!("Visit {name} and learn one thing about its history."),
        ),
        PoiCategory::Other => (
            format!("Discover {name}"),
            format!("Head to {name} and see what is there."),
        ),
    };
    if let Some(extra) = poi.description.as_deref().filter(|d| !d.trim().is_empty()) {
        description.push(' ');
        description.push_str(extra.trim());
    }
    (title, description)
}
