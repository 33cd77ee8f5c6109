//! Summaries over extracted feature properties.
//!
//! These read the fields the map's own UI uses: `RouteName`, `TrainNum`,
//! `TrainState` from the trains feed and `StationName` from the stations feed.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::FeedError;
use crate::features::Properties;

/// Train counts for one route, by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteStatus {
    /// `TrainState == "Active"`
    pub active: usize,
    /// `TrainState == "Predeparture"`
    pub pending: usize,
    /// `TrainState == "Completed"`
    pub completed: usize,
}

fn string_field<'a>(properties: &'a Properties, field: &str) -> Result<&'a str, FeedError> {
    properties
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| FeedError::ProtocolShape(format!("feature has no string `{field}`")))
}

/// Train number, which the feed sends as either a string or a number.
fn train_number(properties: &Properties) -> Result<u32, FeedError> {
    let number = match properties.get("TrainNum") {
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };

    number.ok_or_else(|| FeedError::ProtocolShape("feature has no numeric `TrainNum`".to_string()))
}

/// Route name as shown to users.
///
/// The Michigan and Illinois services arrive as `A/B` and are displayed as
/// `B / A`.
pub fn display_route_name(route_name: &str) -> String {
    if route_name.contains("Michigan") || route_name.contains("Illinois Service") {
        let mut parts = route_name.split('/');
        if let (Some(first), Some(second)) = (parts.next(), parts.next()) {
            return format!("{second} / {first}");
        }
    }
    route_name.to_string()
}

/// Train numbers grouped by route name, in feed order within each route.
pub fn trains_by_route(trains: &[Properties]) -> Result<BTreeMap<String, Vec<u32>>, FeedError> {
    let mut by_route: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for train in trains {
        let route = string_field(train, "RouteName")?;
        by_route
            .entry(route.to_string())
            .or_default()
            .push(train_number(train)?);
    }
    Ok(by_route)
}

/// Active/pending/completed counts per route, keyed by display name.
///
/// Every route present in the feed gets an entry, even if none of its trains
/// are in one of the counted states. `TrainState` must be present; values
/// other than the three counted ones are ignored.
pub fn route_statuses(trains: &[Properties]) -> Result<BTreeMap<String, RouteStatus>, FeedError> {
    let mut statuses: BTreeMap<String, RouteStatus> = BTreeMap::new();
    for train in trains {
        let route = display_route_name(string_field(train, "RouteName")?);
        let state = string_field(train, "TrainState")?;
        let status = statuses.entry(route).or_default();

        match state {
            "Active" => status.active += 1,
            "Predeparture" => status.pending += 1,
            "Completed" => status.completed += 1,
            _ => {}
        }
    }
    Ok(statuses)
}

/// One route as listed by [`route_statuses`], with the trains running on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDetail {
    /// Display name the route was looked up by
    pub name: String,
    pub status: RouteStatus,
    /// Train numbers, sorted and de-duplicated
    pub trains: Vec<u32>,
}

/// Look up a route by its display name.
///
/// Trains are matched against raw feed route names by substring in either
/// direction. If nothing matches and the name has the swapped `B / A` form,
/// a raw name containing either half matches. An unknown route yields zero
/// counts and no trains.
pub fn route_detail(trains: &[Properties], route_name: &str) -> Result<RouteDetail, FeedError> {
    let status = route_statuses(trains)?
        .remove(route_name)
        .unwrap_or_default();
    let by_route = trains_by_route(trains)?;

    let mut numbers: BTreeSet<u32> = by_route
        .iter()
        .filter(|(name, _)| name.contains(route_name) || route_name.contains(name.as_str()))
        .flat_map(|(_, numbers)| numbers.iter().copied())
        .collect();

    if numbers.is_empty() {
        let parts: Vec<&str> = route_name.split(" / ").collect();
        if let [first, second] = parts[..] {
            numbers = by_route
                .iter()
                .filter(|(name, _)| name.contains(first) || name.contains(second))
                .flat_map(|(_, numbers)| numbers.iter().copied())
                .collect();
        }
    }

    Ok(RouteDetail {
        name: route_name.to_string(),
        status,
        trains: numbers.into_iter().collect(),
    })
}

/// The first train with the given number.
///
/// Features with an unreadable `TrainNum` are skipped.
pub fn find_train(trains: &[Properties], number: u32) -> Option<&Properties> {
    trains
        .iter()
        .find(|train| train_number(train).is_ok_and(|n| n == number))
}

/// Station names, sorted.
pub fn station_names(stations: &[Properties]) -> Result<Vec<String>, FeedError> {
    let mut names = stations
        .iter()
        .map(|station| string_field(station, "StationName").map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn trains() -> Vec<Properties> {
        vec![
            props(json!({"TrainNum": "171", "RouteName": "Northeast Regional", "TrainState": "Active"})),
            props(json!({"TrainNum": 95, "RouteName": "Northeast Regional", "TrainState": "Completed"})),
            props(json!({"TrainNum": "350", "RouteName": "Pontiac/Wolverine Michigan Services", "TrainState": "Predeparture"})),
            props(json!({"TrainNum": "2150", "RouteName": "Acela", "TrainState": "Unknown"})),
        ]
    }

    #[test]
    fn groups_by_route() {
        let grouped = trains_by_route(&trains()).unwrap();

        assert_eq!(grouped["Northeast Regional"], vec![171, 95]);
        assert_eq!(grouped["Pontiac/Wolverine Michigan Services"], vec![350]);
        assert_eq!(grouped["Acela"], vec![2150]);
    }

    #[test]
    fn counts_states_per_route() {
        let statuses = route_statuses(&trains()).unwrap();

        assert_eq!(
            statuses["Northeast Regional"],
            RouteStatus {
                active: 1,
                pending: 0,
                completed: 1
            }
        );
        assert_eq!(statuses["Wolverine Michigan Services / Pontiac"].pending, 1);
        // Present, with nothing counted
        assert_eq!(statuses["Acela"], RouteStatus::default());
    }

    #[test]
    fn display_name_swaps_michigan_and_illinois() {
        assert_eq!(
            display_route_name("Pontiac/Wolverine Michigan Services"),
            "Wolverine Michigan Services / Pontiac"
        );
        assert_eq!(
            display_route_name("Lincoln Service/Illinois Service"),
            "Illinois Service / Lincoln Service"
        );
        assert_eq!(display_route_name("Acela"), "Acela");
        // No slash to swap around
        assert_eq!(display_route_name("Michigan"), "Michigan");
    }

    #[test]
    fn missing_train_state_is_shape_error() {
        let trains = vec![props(json!({"TrainNum": "1", "RouteName": "Acela"}))];
        assert!(matches!(
            route_statuses(&trains),
            Err(FeedError::ProtocolShape(_))
        ));

        let trains = vec![props(json!({"TrainNum": "1", "RouteName": "Acela", "TrainState": null}))];
        assert!(route_statuses(&trains).is_err());
    }

    #[test]
    fn route_detail_by_plain_name() {
        let mut trains = trains();
        // Same train reported twice
        trains.push(props(json!({"TrainNum": 171, "RouteName": "Northeast Regional", "TrainState": "Active"})));

        let detail = route_detail(&trains, "Northeast Regional").unwrap();
        assert_eq!(detail.name, "Northeast Regional");
        assert_eq!(
            detail.status,
            RouteStatus {
                active: 2,
                pending: 0,
                completed: 1
            }
        );
        assert_eq!(detail.trains, vec![95, 171]);
    }

    #[test]
    fn route_detail_by_swapped_michigan_name() {
        let detail = route_detail(&trains(), "Wolverine Michigan Services / Pontiac").unwrap();

        assert_eq!(detail.status.pending, 1);
        assert_eq!(detail.trains, vec![350]);
    }

    #[test]
    fn route_detail_by_swapped_illinois_name() {
        let trains = vec![
            props(json!({"TrainNum": "300", "RouteName": "Lincoln Service/Illinois Service", "TrainState": "Active"})),
            props(json!({"TrainNum": "301", "RouteName": "Lincoln Service/Illinois Service", "TrainState": "Active"})),
        ];

        let detail = route_detail(&trains, "Illinois Service / Lincoln Service").unwrap();
        assert_eq!(detail.status.active, 2);
        assert_eq!(detail.trains, vec![300, 301]);
    }

    #[test]
    fn route_detail_matches_partial_name() {
        // Display name is a substring of the raw feed name
        let detail = route_detail(&trains(), "Northeast").unwrap();
        assert_eq!(detail.trains, vec![95, 171]);
        // Counts are keyed by the exact display name only
        assert_eq!(detail.status, RouteStatus::default());
    }

    #[test]
    fn unknown_route_is_empty() {
        let detail = route_detail(&trains(), "Nowhere Express").unwrap();
        assert_eq!(detail.status, RouteStatus::default());
        assert!(detail.trains.is_empty());
    }

    #[test]
    fn finds_train_by_number() {
        let trains = trains();
        assert_eq!(find_train(&trains, 95).unwrap()["RouteName"], "Northeast Regional");
        assert_eq!(find_train(&trains, 350).unwrap()["TrainState"], "Predeparture");
        assert!(find_train(&trains, 1).is_none());
    }

    #[test]
    fn missing_route_name_is_shape_error() {
        let trains = vec![props(json!({"TrainNum": "1"}))];
        assert!(matches!(
            trains_by_route(&trains),
            Err(FeedError::ProtocolShape(_))
        ));
    }

    #[test]
    fn non_numeric_train_number_is_shape_error() {
        let trains = vec![props(json!({"TrainNum": "abc", "RouteName": "Acela"}))];
        assert!(matches!(
            trains_by_route(&trains),
            Err(FeedError::ProtocolShape(_))
        ));
    }

    #[test]
    fn station_names_sorted() {
        let stations = vec![
            props(json!({"StationName": "Washington"})),
            props(json!({"StationName": "Albany"})),
            props(json!({"StationName": "Baltimore"})),
        ];
        assert_eq!(
            station_names(&stations).unwrap(),
            vec!["Albany", "Baltimore", "Washington"]
        );
    }

    #[test]
    fn station_without_name_is_shape_error() {
        let stations = vec![props(json!({"Code": "WAS"}))];
        assert!(station_names(&stations).is_err());
    }
}
