/// Intent labels produced by the booking model. Unknown labels collapse to
/// `NoneIntent` rather than failing the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    BookFlight,
    Cancel,
    GetWeather,
    NoneIntent,
}

impl Intent {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "BookFlight" => Self::BookFlight,
            "Cancel" => Self::Cancel,
            "GetWeather" => Self::GetWeather,
            _ => Self::NoneIntent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookFlight => "BookFlight",
            Self::Cancel => "Cancel",
            Self::GetWeather => "GetWeather",
            Self::NoneIntent => "NoneIntent",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::intent::Intent;

    #[test]
    fn known_labels_round_trip() {
        for intent in [Intent::BookFlight, Intent::Cancel, Intent::GetWeather, Intent::NoneIntent] {
            assert_eq!(Intent::from_label(intent.as_str()), intent);
        }
    }

    #[test]
    fn unknown_labels_fall_back_to_none() {
        assert_eq!(Intent::from_label("OrderPizza"), Intent::NoneIntent);
        assert_eq!(Intent::from_label(""), Intent::NoneIntent);
    }
}
