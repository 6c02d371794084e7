use thiserror::Error;

/// One of the ten EPA-derived e-waste categories.
///
/// The serialized form is the human-readable label shown on the public form,
/// which is also what the store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WasteCategory {
    #[serde(rename = "Large household appliances")]
    LargeHouseholdAppliances,
    #[serde(rename = "Small household appliances")]
    SmallHouseholdAppliances,
    #[serde(rename = "IT equipment")]
    ItEquipment,
    #[serde(rename = "Consumer electronics")]
    ConsumerElectronics,
    #[serde(rename = "Lamps and luminaires")]
    LampsAndLuminaires,
    #[serde(rename = "Toys")]
    Toys,
    #[serde(rename = "Tools")]
    Tools,
    #[serde(rename = "Medical devices")]
    MedicalDevices,
    #[serde(rename = "Monitoring and control instruments")]
    MonitoringAndControlInstruments,
    #[serde(rename = "Automatic dispensers")]
    AutomaticDispensers,
}

impl WasteCategory {
    /// Every category, in the order the EPA list presents them.
    pub const ALL: [WasteCategory; 10] = [
        WasteCategory::LargeHouseholdAppliances,
        WasteCategory::SmallHouseholdAppliances,
        WasteCategory::ItEquipment,
        WasteCategory::ConsumerElectronics,
        WasteCategory::LampsAndLuminaires,
        WasteCategory::Toys,
        WasteCategory::Tools,
        WasteCategory::MedicalDevices,
        WasteCategory::MonitoringAndControlInstruments,
        WasteCategory::AutomaticDispensers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WasteCategory::LargeHouseholdAppliances => "Large household appliances",
            WasteCategory::SmallHouseholdAppliances => "Small household appliances",
            WasteCategory::ItEquipment => "IT equipment",
            WasteCategory::ConsumerElectronics => "Consumer electronics",
            WasteCategory::LampsAndLuminaires => "Lamps and luminaires",
            WasteCategory::Toys => "Toys",
            WasteCategory::Tools => "Tools",
            WasteCategory::MedicalDevices => "Medical devices",
            WasteCategory::MonitoringAndControlInstruments => {
                "Monitoring and control instruments"
            }
            WasteCategory::AutomaticDispensers => "Automatic dispensers",
        }
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown waste category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for WasteCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WasteCategory::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Submission lifecycle flag. The only exposed transition is
/// `pending -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown submission status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for SubmissionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "completed" => Ok(SubmissionStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_round_trip() {
        for category in WasteCategory::ALL {
            let parsed: WasteCategory = category.label().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_serializes_to_label() {
        let json = serde_json::to_string(&WasteCategory::Toys).unwrap();
        assert_eq!(json, "\"Toys\"");

        let json = serde_json::to_string(&WasteCategory::ItEquipment).unwrap();
        assert_eq!(json, "\"IT equipment\"");
    }

    #[test]
    fn unknown_category_rejected() {
        let err = "Radioactive waste".parse::<WasteCategory>().unwrap_err();
        assert_eq!(err.0, "Radioactive waste");

        let result: Result<WasteCategory, _> = serde_json::from_str("\"Radioactive waste\"");
        assert!(result.is_err());
    }

    #[test]
    fn status_round_trips() {
        assert_eq!(
            "pending".parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::Pending
        );
        assert_eq!(
            "completed".parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::Completed
        );
        assert!("cancelled".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
