//! ODPT API response DTOs.
//!
//! These types map directly to the ODPT JSON-LD responses. They use `Option`
//! liberally because ODPT omits fields rather than sending null values, and
//! timetable records carry either an arrival or a departure field, never both.

use serde::{Deserialize, Serialize};

/// A bus stop pole (`odpt:BusstopPole`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusstopPoleDto {
    /// Stop identifier, e.g. `odpt.BusstopPole:Tokyu.Shibuya.1`.
    #[serde(rename = "owl:sameAs", default)]
    pub same_as: Option<String>,

    /// Display name.
    #[serde(rename = "dc:title", default)]
    pub title: Option<String>,

    #[serde(rename = "geo:lat", default)]
    pub lat: Option<f64>,

    #[serde(rename = "geo:long", default)]
    pub long: Option<f64>,

    /// Route patterns calling at this pole.
    #[serde(rename = "odpt:busroutePattern", default)]
    pub busroute_pattern: Vec<String>,
}

/// A railway station (`odpt:Station`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    /// Station identifier, e.g. `odpt.Station:Tokyu.Toyoko.Shibuya`.
    #[serde(rename = "owl:sameAs", default)]
    pub same_as: Option<String>,

    #[serde(rename = "dc:title", default)]
    pub title: Option<String>,

    #[serde(rename = "geo:lat", default)]
    pub lat: Option<f64>,

    #[serde(rename = "geo:long", default)]
    pub long: Option<f64>,

    /// The railway line this station belongs to.
    #[serde(rename = "odpt:railway", default)]
    pub railway: Option<String>,
}

/// One bus run (`odpt:BusTimetable`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusTimetableDto {
    #[serde(rename = "owl:sameAs", default)]
    pub same_as: Option<String>,

    #[serde(rename = "odpt:busroutePattern", default)]
    pub busroute_pattern: Option<String>,

    #[serde(rename = "odpt:calendar", default)]
    pub calendar: Option<String>,

    /// Stop visits in run order.
    #[serde(rename = "odpt:busTimetableObject", default)]
    pub objects: Vec<BusTimetableObject>,
}

/// A stop visit within a bus run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusTimetableObject {
    #[serde(rename = "odpt:index", default)]
    pub index: Option<u32>,

    #[serde(rename = "odpt:busstopPole", default)]
    pub busstop_pole: Option<String>,

    #[serde(rename = "odpt:arrivalTime", default)]
    pub arrival_time: Option<String>,

    #[serde(rename = "odpt:departureTime", default)]
    pub departure_time: Option<String>,
}

/// One train run (`odpt:TrainTimetable`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainTimetableDto {
    #[serde(rename = "owl:sameAs", default)]
    pub same_as: Option<String>,

    #[serde(rename = "odpt:railway", default)]
    pub railway: Option<String>,

    #[serde(rename = "odpt:calendar", default)]
    pub calendar: Option<String>,

    /// Station visits in run order.
    #[serde(rename = "odpt:trainTimetableObject", default)]
    pub objects: Vec<TrainTimetableObject>,
}

/// A station visit within a train run.
///
/// Records with neither time field are operational pass-through points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainTimetableObject {
    #[serde(rename = "odpt:arrivalTime", default)]
    pub arrival_time: Option<String>,

    #[serde(rename = "odpt:arrivalStation", default)]
    pub arrival_station: Option<String>,

    #[serde(rename = "odpt:departureTime", default)]
    pub departure_time: Option<String>,

    #[serde(rename = "odpt:departureStation", default)]
    pub departure_station: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_busstop_pole() {
        let json = r#"[{
            "@id": "urn:ucode:_00001C000000000000010000030C3BE5",
            "@type": "odpt:BusstopPole",
            "dc:title": "渋谷駅",
            "owl:sameAs": "odpt.BusstopPole:Tokyu.ShibuyaStation.1",
            "geo:lat": 35.6589,
            "geo:long": 139.7016,
            "odpt:busroutePattern": ["odpt.BusroutePattern:Tokyu.Shibu01.1", "odpt.BusroutePattern:Tokyu.Shibu01.2"]
        }]"#;

        let poles: Vec<BusstopPoleDto> = serde_json::from_str(json).unwrap();
        assert_eq!(poles.len(), 1);
        assert_eq!(
            poles[0].same_as.as_deref(),
            Some("odpt.BusstopPole:Tokyu.ShibuyaStation.1")
        );
        assert_eq!(poles[0].title.as_deref(), Some("渋谷駅"));
        assert_eq!(poles[0].busroute_pattern.len(), 2);
    }

    #[test]
    fn busstop_pole_without_routes() {
        let json = r#"{"owl:sameAs": "odpt.BusstopPole:X.1"}"#;
        let pole: BusstopPoleDto = serde_json::from_str(json).unwrap();
        assert!(pole.busroute_pattern.is_empty());
        assert!(pole.lat.is_none());
    }

    #[test]
    fn deserialize_bus_timetable() {
        let json = r#"{
            "owl:sameAs": "odpt.BusTimetable:Tokyu.Shibu01.1.Weekday.1",
            "odpt:calendar": "odpt.Calendar:Weekday",
            "odpt:busroutePattern": "odpt.BusroutePattern:Tokyu.Shibu01.1",
            "odpt:busTimetableObject": [
                {"odpt:index": 0, "odpt:busstopPole": "odpt.BusstopPole:A", "odpt:departureTime": "12:01"},
                {"odpt:index": 1, "odpt:busstopPole": "odpt.BusstopPole:B", "odpt:arrivalTime": "12:10"}
            ]
        }"#;

        let run: BusTimetableDto = serde_json::from_str(json).unwrap();
        assert_eq!(run.objects.len(), 2);
        assert_eq!(run.objects[0].departure_time.as_deref(), Some("12:01"));
        assert!(run.objects[0].arrival_time.is_none());
        assert_eq!(run.objects[1].arrival_time.as_deref(), Some("12:10"));
    }

    #[test]
    fn deserialize_train_timetable_with_pass_through() {
        let json = r#"{
            "owl:sameAs": "odpt.TrainTimetable:Tokyu.Toyoko.1201.Weekday",
            "odpt:railway": "odpt.Railway:Tokyu.Toyoko",
            "odpt:trainTimetableObject": [
                {"odpt:departureTime": "12:01", "odpt:departureStation": "odpt.Station:Tokyu.Toyoko.Shibuya"},
                {},
                {"odpt:arrivalTime": "12:20", "odpt:arrivalStation": "odpt.Station:Tokyu.Toyoko.Yokohama"}
            ]
        }"#;

        let run: TrainTimetableDto = serde_json::from_str(json).unwrap();
        assert_eq!(run.objects.len(), 3);
        assert!(run.objects[1].arrival_time.is_none());
        assert!(run.objects[1].departure_time.is_none());
    }

    #[test]
    fn record_without_stop_does_not_reject_response() {
        let json = r#"[
            {"owl:sameAs": "good", "odpt:busTimetableObject": [
                {"odpt:busstopPole": "odpt.BusstopPole:A", "odpt:departureTime": "12:01"}
            ]},
            {"owl:sameAs": "bad", "odpt:busTimetableObject": [
                {"odpt:departureTime": "12:05"}
            ]}
        ]"#;

        let runs: Vec<BusTimetableDto> = serde_json::from_str(json).unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs[1].objects[0].busstop_pole.is_none());
    }

    #[test]
    fn poles_without_id_still_decode() {
        let json = r#"[
            {"owl:sameAs": "odpt.BusstopPole:X.1", "dc:title": "X"},
            {"dc:title": "no id"}
        ]"#;

        let poles: Vec<BusstopPoleDto> = serde_json::from_str(json).unwrap();
        assert_eq!(poles.len(), 2);
        assert!(poles[1].same_as.is_none());

        let stations: Vec<StationDto> = serde_json::from_str(r#"[{"dc:title": "Y"}]"#).unwrap();
        assert!(stations[0].same_as.is_none());
    }
}
