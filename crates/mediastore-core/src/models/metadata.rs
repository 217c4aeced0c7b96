use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Place description resolved from a GPS fix. Every field is optional and
/// filled independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl LocationInfo {
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.district.is_none()
            && self.road.is_none()
            && self.postal_code.is_none()
            && self.display_name.is_none()
    }
}

/// Capture metadata decoded from an image's embedded tags.
///
/// Display fields (`flash`, `focal_length`, `f_number`, `exposure_time`) are
/// already rendered as strings; `date_time` is Unix epoch seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
}

impl ImageMetadata {
    pub fn is_empty(&self) -> bool {
        *self == ImageMetadata::default()
    }

    /// `None` when nothing was decoded, so callers can omit the block entirely.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metadata_collapses_to_none() {
        assert!(ImageMetadata::default().into_option().is_none());

        let meta = ImageMetadata {
            iso: Some(200),
            ..Default::default()
        };
        assert_eq!(meta.clone().into_option(), Some(meta));
    }

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let meta = ImageMetadata {
            camera_make: Some("Canon".to_string()),
            location: Some(LocationInfo {
                city: Some("Hanoi".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(json["camera_make"], "Canon");
        assert_eq!(json["location"]["city"], "Hanoi");
        assert!(json["location"].get("country").is_none());
    }

    #[test]
    fn test_location_is_empty() {
        assert!(LocationInfo::default().is_empty());
        let loc = LocationInfo {
            postal_code: Some("100000".to_string()),
            ..Default::default()
        };
        assert!(!loc.is_empty());
    }
}
