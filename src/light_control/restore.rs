use serde_derive::{Deserialize, Serialize};

/// Brightness and temperature of the light when it was last turned off.
/// Serialized as JSON so that it survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestoreState {
    #[serde(default)]
    pub brightness: Option<u8>,
    #[serde(default)]
    pub color_temp_kelvin: Option<u32>,
}

impl RestoreState {
    pub fn new(brightness: u8, color_temp_kelvin: u32) -> RestoreState {
        RestoreState {
            brightness: Some(brightness),
            color_temp_kelvin: Some(color_temp_kelvin),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brightness.is_none() && self.color_temp_kelvin.is_none()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<RestoreState, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod test {
    use super::RestoreState;

    #[test]
    fn json_format() {
        let state = RestoreState::new(127, 4000);
        assert_eq!(
            state.to_json().unwrap(),
            r#"{"brightness":127,"color_temp_kelvin":4000}"#
        );
        assert_eq!(
            RestoreState::from_json(r#"{"color_temp_kelvin": 4000, "brightness": 127}"#).unwrap(),
            state
        );
    }

    #[test]
    fn partial_state() {
        let state = RestoreState::from_json("{}").unwrap();
        assert!(state.is_empty());
        let state = RestoreState::from_json(r#"{"brightness": 12}"#).unwrap();
        assert_eq!(state.brightness, Some(12));
        assert_eq!(state.color_temp_kelvin, None);
        assert!(!state.is_empty());
    }

    #[test]
    fn invalid_state() {
        assert!(RestoreState::from_json(r#"{"brightness": 300}"#).is_err());
        assert!(RestoreState::from_json("null").is_err());
    }
}
