//! Raw catalog rows as delivered by the data source.
//!
//! Measurements arrive as numeric strings, JSON numbers, the literal unset
//! marker, or not at all. Nothing is interpreted until [`RawFrameRecord::inputs`]
//! parses them into [`FrameInputs`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Marker the catalog uses for a measurement that was never filled in.
pub const UNSET_MARKER: &str = "None";

/// A single measurement cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl RawValue {
    /// Parse into a finite number. Unset markers, blanks, unparseable text
    /// and missing cells are all absent (never zero).
    pub fn parse(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            RawValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() || s == UNSET_MARKER || s.eq_ignore_ascii_case("unset") {
                    return None;
                }
                s.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            RawValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<Option<f64>> for RawValue {
    fn from(v: Option<f64>) -> Self {
        v.map(RawValue::Number).unwrap_or_default()
    }
}

/// Named measurement fields of a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    VirtualSeatTube,
    VirtualTopTube,
    SeatTube,
    TopTube,
    HeadTubeAngle,
    SeatTubeAngle,
    HeadTubeLength,
    ChainStayLength,
    FrontCenter,
    Wheelbase,
    BottomBracketDrop,
    BracketHeight,
    Stack,
    Reach,
    CrankLength,
    ForkRate,
}

impl Measurement {
    pub const ALL: [Measurement; 16] = [
        Measurement::VirtualSeatTube,
        Measurement::VirtualTopTube,
        Measurement::SeatTube,
        Measurement::TopTube,
        Measurement::HeadTubeAngle,
        Measurement::SeatTubeAngle,
        Measurement::HeadTubeLength,
        Measurement::ChainStayLength,
        Measurement::FrontCenter,
        Measurement::Wheelbase,
        Measurement::BottomBracketDrop,
        Measurement::BracketHeight,
        Measurement::Stack,
        Measurement::Reach,
        Measurement::CrankLength,
        Measurement::ForkRate,
    ];

    /// Field name on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Measurement::VirtualSeatTube => "virtualSeatTube",
            Measurement::VirtualTopTube => "virtualTopTube",
            Measurement::SeatTube => "seatTube",
            Measurement::TopTube => "topTube",
            Measurement::HeadTubeAngle => "headTubeAngle",
            Measurement::SeatTubeAngle => "seatTubeAngle",
            Measurement::HeadTubeLength => "headTubeLength",
            Measurement::ChainStayLength => "chainStayLength",
            Measurement::FrontCenter => "frontCenter",
            Measurement::Wheelbase => "wheelbase",
            Measurement::BottomBracketDrop => "bottomBracketDrop",
            Measurement::BracketHeight => "bracketHeight",
            Measurement::Stack => "stack",
            Measurement::Reach => "reach",
            Measurement::CrankLength => "crankLength",
            Measurement::ForkRate => "forkRate",
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Measurement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One row of the frame catalog. Immutable once read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrameRecord {
    #[serde(rename = "_id", alias = "id", deserialize_with = "label")]
    pub id: String,
    #[serde(default, deserialize_with = "label")]
    pub brand: String,
    #[serde(default, deserialize_with = "label")]
    pub model: String,
    #[serde(default, deserialize_with = "label")]
    pub size: String,
    #[serde(default, deserialize_with = "label")]
    pub year: String,

    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub virtual_seat_tube: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub virtual_top_tube: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub seat_tube: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub top_tube: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub head_tube_angle: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub seat_tube_angle: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub head_tube_length: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub chain_stay_length: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub front_center: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub wheelbase: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub bottom_bracket_drop: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub bracket_height: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub stack: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub reach: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub crank_length: RawValue,
    #[serde(default, skip_serializing_if = "RawValue::is_missing")]
    pub fork_rate: RawValue,
}

/// Accept strings, numbers (sizes and years are often numeric) and Mongo
/// `{"$oid": ..}` identifiers for the label columns.
fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Object(map)) => match map.get("$oid") {
            Some(Value::String(oid)) => oid.clone(),
            _ => Value::Object(map).to_string(),
        },
        Some(other) => other.to_string(),
    })
}

impl RawFrameRecord {
    pub fn new(
        id: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        size: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            size: size.into(),
            year: year.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with(mut self, field: Measurement, value: impl Into<RawValue>) -> Self {
        *self.field_mut(field) = value.into();
        self
    }

    pub fn field(&self, field: Measurement) -> &RawValue {
        match field {
            Measurement::VirtualSeatTube => &self.virtual_seat_tube,
            Measurement::VirtualTopTube => &self.virtual_top_tube,
            Measurement::SeatTube => &self.seat_tube,
            Measurement::TopTube => &self.top_tube,
            Measurement::HeadTubeAngle => &self.head_tube_angle,
            Measurement::SeatTubeAngle => &self.seat_tube_angle,
            Measurement::HeadTubeLength => &self.head_tube_length,
            Measurement::ChainStayLength => &self.chain_stay_length,
            Measurement::FrontCenter => &self.front_center,
            Measurement::Wheelbase => &self.wheelbase,
            Measurement::BottomBracketDrop => &self.bottom_bracket_drop,
            Measurement::BracketHeight => &self.bracket_height,
            Measurement::Stack => &self.stack,
            Measurement::Reach => &self.reach,
            Measurement::CrankLength => &self.crank_length,
            Measurement::ForkRate => &self.fork_rate,
        }
    }

    fn field_mut(&mut self, field: Measurement) -> &mut RawValue {
        match field {
            Measurement::VirtualSeatTube => &mut self.virtual_seat_tube,
            Measurement::VirtualTopTube => &mut self.virtual_top_tube,
            Measurement::SeatTube => &mut self.seat_tube,
            Measurement::TopTube => &mut self.top_tube,
            Measurement::HeadTubeAngle => &mut self.head_tube_angle,
            Measurement::SeatTubeAngle => &mut self.seat_tube_angle,
            Measurement::HeadTubeLength => &mut self.head_tube_length,
            Measurement::ChainStayLength => &mut self.chain_stay_length,
            Measurement::FrontCenter => &mut self.front_center,
            Measurement::Wheelbase => &mut self.wheelbase,
            Measurement::BottomBracketDrop => &mut self.bottom_bracket_drop,
            Measurement::BracketHeight => &mut self.bracket_height,
            Measurement::Stack => &mut self.stack,
            Measurement::Reach => &mut self.reach,
            Measurement::CrankLength => &mut self.crank_length,
            Measurement::ForkRate => &mut self.fork_rate,
        }
    }

    /// Parse every measurement cell.
    pub fn inputs(&self) -> FrameInputs {
        let get = |m: Measurement| self.field(m).parse();
        FrameInputs {
            virtual_seat_tube: get(Measurement::VirtualSeatTube),
            virtual_top_tube: get(Measurement::VirtualTopTube),
            seat_tube: get(Measurement::SeatTube),
            top_tube: get(Measurement::TopTube),
            head_tube_angle: get(Measurement::HeadTubeAngle),
            seat_tube_angle: get(Measurement::SeatTubeAngle),
            head_tube_length: get(Measurement::HeadTubeLength),
            chain_stay_length: get(Measurement::ChainStayLength),
            front_center: get(Measurement::FrontCenter),
            wheelbase: get(Measurement::Wheelbase),
            bottom_bracket_drop: get(Measurement::BottomBracketDrop),
            bracket_height: get(Measurement::BracketHeight),
            stack: get(Measurement::Stack),
            reach: get(Measurement::Reach),
            crank_length: get(Measurement::CrankLength),
            fork_rate: get(Measurement::ForkRate),
        }
    }
}

/// Parsed measurements; `None` means absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInputs {
    pub virtual_seat_tube: Option<f64>,
    pub virtual_top_tube: Option<f64>,
    pub seat_tube: Option<f64>,
    pub top_tube: Option<f64>,
    pub head_tube_angle: Option<f64>,
    pub seat_tube_angle: Option<f64>,
    pub head_tube_length: Option<f64>,
    pub chain_stay_length: Option<f64>,
    pub front_center: Option<f64>,
    pub wheelbase: Option<f64>,
    pub bottom_bracket_drop: Option<f64>,
    pub bracket_height: Option<f64>,
    pub stack: Option<f64>,
    pub reach: Option<f64>,
    pub crank_length: Option<f64>,
    pub fork_rate: Option<f64>,
}

impl FrameInputs {
    pub fn has_bracket_reference(&self) -> bool {
        self.bracket_height.is_some() || self.bottom_bracket_drop.is_some()
    }

    pub fn has_head_set_reference(&self) -> bool {
        (self.reach.is_some() && self.stack.is_some())
            || (self.virtual_seat_tube.is_some() && self.virtual_top_tube.is_some())
    }

    pub fn has_wheelbase_reference(&self) -> bool {
        self.wheelbase.is_some() || self.front_center.is_some() || self.fork_rate.is_some()
    }

    /// Tube measurements every derivation path needs.
    pub fn missing_tubes(&self) -> Vec<Measurement> {
        [
            (Measurement::HeadTubeAngle, self.head_tube_angle),
            (Measurement::SeatTubeAngle, self.seat_tube_angle),
            (Measurement::HeadTubeLength, self.head_tube_length),
            (Measurement::ChainStayLength, self.chain_stay_length),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(m, _)| m)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_value_parse() {
        assert_eq!(RawValue::from("73.5").parse(), Some(73.5));
        assert_eq!(RawValue::from(" 40 ").parse(), Some(40.0));
        assert_eq!(RawValue::from(12.0).parse(), Some(12.0));
        assert_eq!(RawValue::from("None").parse(), None);
        assert_eq!(RawValue::from("unset").parse(), None);
        assert_eq!(RawValue::from("").parse(), None);
        assert_eq!(RawValue::from("n/a").parse(), None);
        assert_eq!(RawValue::Missing.parse(), None);
    }

    #[test]
    fn test_unset_is_absent_not_zero() {
        let record = RawFrameRecord::new("1", "Time", "NXR", "S", "2011")
            .with(Measurement::Stack, "None")
            .with(Measurement::Reach, "0");
        let inputs = record.inputs();
        assert_eq!(inputs.stack, None);
        assert_eq!(inputs.reach, Some(0.0));
    }

    #[test]
    fn test_deserialize_catalog_row() {
        let record: RawFrameRecord = serde_json::from_value(json!({
            "_id": {"$oid": "5b8d3f"},
            "brand": "Time",
            "model": "Skylon",
            "size": 54,
            "year": 2015,
            "headTubeAngle": "73",
            "seatTubeAngle": 73.5,
            "bracketHeight": "None",
            "bottomBracketDrop": null
        }))
        .unwrap();

        assert_eq!(record.id, "5b8d3f");
        assert_eq!(record.size, "54");
        assert_eq!(record.year, "2015");
        let inputs = record.inputs();
        assert_eq!(inputs.head_tube_angle, Some(73.0));
        assert_eq!(inputs.seat_tube_angle, Some(73.5));
        assert_eq!(inputs.bracket_height, None);
        assert_eq!(inputs.bottom_bracket_drop, None);
        assert_eq!(inputs.stack, None);
        assert!(!inputs.has_bracket_reference());
    }

    #[test]
    fn test_id_alias_and_missing_labels() {
        let record: RawFrameRecord = serde_json::from_value(json!({"id": "abc"})).unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.brand, "");
    }

    #[test]
    fn test_missing_tubes() {
        let record = RawFrameRecord::new("1", "b", "m", "s", "y")
            .with(Measurement::HeadTubeAngle, 73.0)
            .with(Measurement::ChainStayLength, 40.5);
        assert_eq!(
            record.inputs().missing_tubes(),
            vec![Measurement::SeatTubeAngle, Measurement::HeadTubeLength]
        );
    }

    #[test]
    fn test_reference_predicates() {
        let inputs = FrameInputs {
            reach: Some(38.0),
            ..Default::default()
        };
        assert!(!inputs.has_head_set_reference());
        let inputs = FrameInputs {
            virtual_seat_tube: Some(52.0),
            virtual_top_tube: Some(54.0),
            fork_rate: Some(4.5),
            ..Default::default()
        };
        assert!(inputs.has_head_set_reference());
        assert!(inputs.has_wheelbase_reference());
    }
}
