//! Closed demographic enumerations.
//!
//! The survey encodes demographics as small integer codes. We keep the
//! enumerations closed: any code outside the published set aborts
//! construction instead of being carried through silently.

use crate::error::FlowError;
use serde::{Deserialize, Serialize};

/// Respondent gender, survey codes 1-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gender {
    Female = 1,
    Male = 2,
}

impl TryFrom<u8> for Gender {
    type Error = FlowError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Female),
            2 => Ok(Self::Male),
            other => Err(FlowError::UnknownGender(other)),
        }
    }
}

impl From<Gender> for u8 {
    fn from(g: Gender) -> u8 {
        g as u8
    }
}

/// Highest completed education level, survey codes 1-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EducationLevel {
    PrimarySchool = 1,
    MiddleSchool = 2,
    HighSchool = 3,
    JuniorCollege = 4,
    Bachelor = 5,
    Master = 6,
    Doctorate = 7,
}

impl TryFrom<u8> for EducationLevel {
    type Error = FlowError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::PrimarySchool),
            2 => Ok(Self::MiddleSchool),
            3 => Ok(Self::HighSchool),
            4 => Ok(Self::JuniorCollege),
            5 => Ok(Self::Bachelor),
            6 => Ok(Self::Master),
            7 => Ok(Self::Doctorate),
            other => Err(FlowError::UnknownEducationLevel(other)),
        }
    }
}

impl From<EducationLevel> for u8 {
    fn from(level: EducationLevel) -> u8 {
        level as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_codes_round_trip() {
        assert_eq!(Gender::try_from(1), Ok(Gender::Female));
        assert_eq!(Gender::try_from(2), Ok(Gender::Male));
        assert_eq!(u8::from(Gender::Male), 2);
    }

    #[test]
    fn test_unknown_codes_rejected() {
        assert_eq!(Gender::try_from(0), Err(FlowError::UnknownGender(0)));
        assert_eq!(Gender::try_from(3), Err(FlowError::UnknownGender(3)));
        assert_eq!(
            EducationLevel::try_from(8),
            Err(FlowError::UnknownEducationLevel(8))
        );
    }

    #[test]
    fn test_education_span() {
        assert_eq!(EducationLevel::try_from(1), Ok(EducationLevel::PrimarySchool));
        assert_eq!(EducationLevel::try_from(7), Ok(EducationLevel::Doctorate));
    }
}
