use crate::{IndividualId, ParseKindError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(non_camel_case_types)]
pub enum Gender {
    MALE,
    FEMALE,
    OTHER,
    #[default]
    UNKNOWN,
}

impl FromStr for Gender {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "MALE" => Ok(Gender::MALE),
            "FEMALE" => Ok(Gender::FEMALE),
            "OTHER" => Ok(Gender::OTHER),
            "UNKNOWN" => Ok(Gender::UNKNOWN),
            _ => Err(ParseKindError::InvalidGender(value.to_string())),
        }
    }
}

/// A person as delivered by the data provider.
///
/// Immutable for the duration of a layout pass; the layout core only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: IndividualId,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default, alias = "surname")]
    pub family_name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
    /// Opaque avatar reference (URL or media key), resolved by the renderer.
    #[serde(default, alias = "profilePictureUrl")]
    pub avatar: Option<String>,
}

impl Individual {
    pub fn new(id: IndividualId, given_name: &str, family_name: &str) -> Self {
        Self {
            id,
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_death_date(mut self, date: NaiveDate) -> Self {
        self.death_date = Some(date);
        self
    }

    /// Family name, middle name, then given name; empty parts are skipped.
    pub fn full_name(&self) -> String {
        [
            self.family_name.as_str(),
            self.middle_name.as_deref().unwrap_or_default(),
            self.given_name.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn initials(&self) -> String {
        let initials: String = [&self.given_name, &self.family_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }

    /// `"1950-2010"` for the deceased, `"1950-"` for the living, `"?-"` when unknown.
    pub fn life_years(&self) -> String {
        let birth = self
            .birth_date
            .map(|date| date.year().to_string())
            .unwrap_or_else(|| "?".to_string());
        match self.death_date {
            Some(death) => format!("{}-{}", birth, death.year()),
            None => format!("{}-", birth),
        }
    }

    pub fn is_deceased(&self) -> bool {
        self.death_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn person(given: &str, family: &str) -> Individual {
        Individual::new(IndividualId(Uuid::from_u128(7)), given, family)
    }

    #[test]
    fn test_full_name_skips_empty_parts() {
        let mut individual = person("Lan", "Nguyen");
        assert_eq!(individual.full_name(), "Nguyen Lan");

        individual.middle_name = Some("Thi".to_string());
        assert_eq!(individual.full_name(), "Nguyen Thi Lan");

        individual.family_name.clear();
        assert_eq!(individual.full_name(), "Thi Lan");
    }

    #[test]
    fn test_initials_fall_back_to_question_mark() {
        assert_eq!(person("ada", "lovelace").initials(), "AL");
        assert_eq!(person("", "").initials(), "?");
    }

    #[test]
    fn test_life_years() {
        let born = NaiveDate::from_ymd_opt(1950, 3, 1).unwrap();
        let died = NaiveDate::from_ymd_opt(2010, 7, 9).unwrap();

        assert_eq!(person("A", "B").life_years(), "?-");
        assert_eq!(person("A", "B").with_birth_date(born).life_years(), "1950-");

        let deceased = person("A", "B").with_birth_date(born).with_death_date(died);
        assert_eq!(deceased.life_years(), "1950-2010");
        assert!(deceased.is_deceased());
    }

    #[test]
    fn test_deserialize_provider_payload() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "givenName": "Minh",
            "surname": "Tran",
            "gender": "MALE",
            "birthDate": "1931-05-02"
        }"#;
        let individual: Individual = serde_json::from_str(json).unwrap();
        assert_eq!(individual.family_name, "Tran");
        assert_eq!(individual.gender, Gender::MALE);
        assert_eq!(individual.birth_date, NaiveDate::from_ymd_opt(1931, 5, 2));
        assert!(individual.avatar.is_none());
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!("FEMALE".parse::<Gender>(), Ok(Gender::FEMALE));
        assert!(matches!(
            "female".parse::<Gender>(),
            Err(ParseKindError::InvalidGender(_))
        ));
    }
}
