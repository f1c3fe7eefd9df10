use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Caller-selected lookback duration, mapped to an integer day count for the
/// market-chart query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    OneWeek,
    OneMonth,
    OneYear,
    FiveYears,
}

impl Window {
    pub const ALL: [Window; 4] = [
        Window::OneWeek,
        Window::OneMonth,
        Window::OneYear,
        Window::FiveYears,
    ];

    /// Day count sent as the `days` query parameter.
    pub const fn days(self) -> u32 {
        match self {
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::OneYear => 365,
            Self::FiveYears => 1825,
        }
    }

    /// Human-readable label shown in selection dropdowns.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneWeek => "1 Week",
            Self::OneMonth => "1 Month",
            Self::OneYear => "1 Year",
            Self::FiveYears => "5 Years",
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Window {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1w" | "1 week" => Ok(Self::OneWeek),
            "1m" | "1 month" => Ok(Self::OneMonth),
            "1y" | "1 year" => Ok(Self::OneYear),
            "5y" | "5 years" => Ok(Self::FiveYears),
            _ => Err(DomainError::UnknownWindow {
                value: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_expected_day_counts() {
        assert_eq!("1 Week".parse::<Window>().expect("parses").days(), 7);
        assert_eq!("1 Month".parse::<Window>().expect("parses").days(), 30);
        assert_eq!("1 Year".parse::<Window>().expect("parses").days(), 365);
        assert_eq!("5 Years".parse::<Window>().expect("parses").days(), 1825);
    }

    #[test]
    fn short_forms_parse_case_insensitively() {
        assert_eq!("1W".parse::<Window>().expect("parses"), Window::OneWeek);
        assert_eq!("5y".parse::<Window>().expect("parses"), Window::FiveYears);
    }

    #[test]
    fn unknown_window_is_rejected() {
        let err = "2 Weeks".parse::<Window>().expect_err("must fail");
        assert!(matches!(err, DomainError::UnknownWindow { .. }));
    }
}
