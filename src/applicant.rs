//! # Applicant records
//! Raw applicant input (form fields, JSON bodies, table cells) is loosely typed:
//! numbers may arrive as strings, be blank, or be missing entirely.
//! `ApplicantInput::into_record` is the single default-filling step that turns
//! it into a typed `ApplicantRecord` the scoring core can rely on.
//!
//! Only `income`, `credit_amount` and `years_in_current_job` feed the model.
//! Everything else is descriptive and carried through for display/export.

use serde::{Deserialize, Deserializer, Serialize};

/// Loosely-typed applicant as submitted by a front end.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantInput {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "loose_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub children: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub income: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub credit_amount: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub years_in_current_job: Option<f64>,
}

impl ApplicantInput {
    /// Fill defaults and normalize descriptive fields.
    pub fn into_record(self) -> ApplicantRecord {
        ApplicantRecord {
            id: non_blank(self.id),
            name: non_blank(self.name),
            age: self.age.and_then(whole_years),
            gender: self.gender.as_deref().and_then(Gender::parse),
            education: self.education.as_deref().and_then(Education::parse),
            children: self.children.as_deref().and_then(parse_children),
            income: amount_or_zero(self.income),
            credit_amount: amount_or_zero(self.credit_amount),
            years_in_current_job: amount_or_zero(self.years_in_current_job),
        }
    }
}

/// Typed applicant with defaults already applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Education>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<u8>,
    pub income: f64,
    pub credit_amount: f64,
    pub years_in_current_job: f64,
}

impl ApplicantRecord {
    /// Record with only the three model inputs set.
    pub fn with_financials(income: f64, credit_amount: f64, years_in_current_job: f64) -> Self {
        Self {
            income: amount_or_zero(Some(income)),
            credit_amount: amount_or_zero(Some(credit_amount)),
            years_in_current_job: amount_or_zero(Some(years_in_current_job)),
            ..Self::default()
        }
    }

    pub fn age_band(&self) -> Option<AgeBand> {
        self.age.and_then(AgeBand::from_age)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "man" => Some(Self::Male),
            "f" | "female" | "woman" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Education {
    #[serde(rename = "Lower secondary")]
    LowerSecondary,
    #[serde(rename = "Secondary / secondary special")]
    Secondary,
    #[serde(rename = "Incomplete higher")]
    IncompleteHigher,
    #[serde(rename = "Higher education")]
    Higher,
    #[serde(rename = "Academic degree")]
    AcademicDegree,
}

impl Education {
    pub const ALL: [Education; 5] = [
        Education::LowerSecondary,
        Education::Secondary,
        Education::IncompleteHigher,
        Education::Higher,
        Education::AcademicDegree,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LowerSecondary => "Lower secondary",
            Self::Secondary => "Secondary / secondary special",
            Self::IncompleteHigher => "Incomplete higher",
            Self::Higher => "Higher education",
            Self::AcademicDegree => "Academic degree",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(wanted))
    }
}

/// Age bucket used for reporting: (18,34], (34,43], (43,54], (54,100].
/// 18 itself is folded into the first band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AgeBand(u8);

impl AgeBand {
    pub const MIN_AGE: u32 = 18;
    pub const MAX_AGE: u32 = 100;

    pub fn from_age(age: u32) -> Option<Self> {
        let band = match age {
            18..=34 => 1,
            35..=43 => 2,
            44..=54 => 3,
            55..=100 => 4,
            _ => return None,
        };
        Some(Self(band))
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

/// Highest child count the form distinguishes ("4 or more").
pub const MAX_CHILDREN: u8 = 4;

fn parse_children(raw: &str) -> Option<u8> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    // "4 or more", "4+" and friends
    let digits: String = t.chars().take_while(|c| c.is_ascii_digit()).collect();
    let n: u64 = digits.parse().ok()?;
    Some(n.min(u64::from(MAX_CHILDREN)) as u8)
}

/// Numeric coercion used for the model inputs: anything that is not a finite,
/// non-negative number becomes 0.
pub fn amount_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Coerce a raw text cell to a number (blank/invalid → `None`).
pub fn parse_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn whole_years(age: f64) -> Option<u32> {
    if age.is_finite() && age >= 0.0 && age <= f64::from(u32::MAX) {
        Some(age.floor() as u32)
    } else {
        None
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

fn loose_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseValue>::deserialize(d).unwrap_or(None);
    Ok(match raw {
        Some(LooseValue::Number(n)) => Some(n).filter(|v| v.is_finite()),
        Some(LooseValue::Text(s)) => parse_number(&s),
        Some(LooseValue::Flag(_)) | None => None,
    })
}

fn loose_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseValue>::deserialize(d).unwrap_or(None);
    Ok(match raw {
        Some(LooseValue::Text(s)) => Some(s),
        Some(LooseValue::Number(n)) => Some(format_number(n)),
        Some(LooseValue::Flag(b)) => Some(b.to_string()),
        None => None,
    })
}

/// Render a number the way a spreadsheet would show it (`5000`, not `5000.0`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
