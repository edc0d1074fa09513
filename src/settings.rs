use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("unknown paper format `{0}`")]
    UnknownFormat(String),
    #[error("invalid length `{0}`")]
    InvalidLength(String),
    #[error("unsupported unit `{unit}` in length `{input}` (expected px, in, cm or mm)")]
    UnknownUnit { input: String, unit: String },
    #[error("scale must be a number between 0.1 and 2, got `{0}`")]
    InvalidScale(String),
    #[error("unknown wait condition `{0}` (expected load, domcontentloaded, networkidle0 or networkidle2)")]
    UnknownWaitCondition(String),
}

/// Paper sizes understood by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperFormat {
    Letter,
    Legal,
    Tabloid,
    Ledger,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
}

impl PaperFormat {
    /// Width and height in inches, portrait orientation.
    pub fn size_in_inches(self) -> (f64, f64) {
        match self {
            PaperFormat::Letter => (8.5, 11.),
            PaperFormat::Legal => (8.5, 14.),
            PaperFormat::Tabloid => (11., 17.),
            PaperFormat::Ledger => (17., 11.),
            PaperFormat::A0 => (33.1, 46.8),
            PaperFormat::A1 => (23.4, 33.1),
            PaperFormat::A2 => (16.54, 23.4),
            PaperFormat::A3 => (11.7, 16.54),
            PaperFormat::A4 => (8.27, 11.7),
            PaperFormat::A5 => (5.83, 8.27),
            PaperFormat::A6 => (4.13, 5.83),
        }
    }
}

impl FromStr for PaperFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_ascii_lowercase().as_str() {
            "letter" => PaperFormat::Letter,
            "legal" => PaperFormat::Legal,
            "tabloid" => PaperFormat::Tabloid,
            "ledger" => PaperFormat::Ledger,
            "a0" => PaperFormat::A0,
            "a1" => PaperFormat::A1,
            "a2" => PaperFormat::A2,
            "a3" => PaperFormat::A3,
            "a4" => PaperFormat::A4,
            "a5" => PaperFormat::A5,
            "a6" => PaperFormat::A6,
            _ => return Err(SettingsError::UnknownFormat(s.to_string())),
        };
        Ok(format)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthUnit {
    Px,
    In,
    Cm,
    Mm,
}

impl LengthUnit {
    fn per_inch(self) -> f64 {
        match self {
            LengthUnit::Px => 96.,
            LengthUnit::In => 1.,
            LengthUnit::Cm => 2.54,
            LengthUnit::Mm => 25.4,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
        }
    }
}

/// A CSS length as accepted by `--margin`. A bare number is read as pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssLength {
    pub value: f64,
    pub unit: LengthUnit,
}

impl CssLength {
    pub fn to_inches(self) -> f64 {
        self.value / self.unit.per_inch()
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for CssLength {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SettingsError::InvalidLength(s.to_string());

        let suffix = trimmed
            .len()
            .checked_sub(2)
            .and_then(|split| trimmed.get(split..))
            .map(str::to_ascii_lowercase);
        let known_unit = match suffix.as_deref() {
            Some("px") => Some(LengthUnit::Px),
            Some("in") => Some(LengthUnit::In),
            Some("cm") => Some(LengthUnit::Cm),
            Some("mm") => Some(LengthUnit::Mm),
            _ => None,
        };

        let (number, unit) = match known_unit {
            Some(unit) => (&trimmed[..trimmed.len() - 2], unit),
            None => (trimmed, LengthUnit::Px),
        };

        match parse_length_value(number) {
            Some(value) => Ok(CssLength { value, unit }),
            None if known_unit.is_some() => Err(invalid()),
            None => {
                // report the trailing letters when the rest is a valid number
                let split = trimmed
                    .trim_end_matches(|c: char| c.is_ascii_alphabetic())
                    .len();
                let (number, unit) = trimmed.split_at(split);
                if unit.is_empty() || parse_length_value(number).is_none() {
                    return Err(invalid());
                }
                Err(SettingsError::UnknownUnit {
                    input: s.to_string(),
                    unit: unit.to_ascii_lowercase(),
                })
            }
        }
    }
}

fn parse_length_value(number: &str) -> Option<f64> {
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.)
}

pub fn validate_scale(scale: f64) -> Result<f64, SettingsError> {
    if (0.1..=2.).contains(&scale) {
        Ok(scale)
    } else {
        Err(SettingsError::InvalidScale(scale.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_paper_formats_are_case_insensitive() {
        assert_eq!("A4".parse(), Ok(PaperFormat::A4));
        assert_eq!("letter".parse(), Ok(PaperFormat::Letter));
        assert_eq!(" LEDGER ".parse(), Ok(PaperFormat::Ledger));
        assert_eq!(PaperFormat::A4.size_in_inches(), (8.27, 11.7));
        assert_eq!(PaperFormat::Ledger.size_in_inches(), (17., 11.));
    }

    #[test]
    fn test_unknown_paper_format() {
        let err = "B5".parse::<PaperFormat>().unwrap_err();
        assert_snapshot!(err, @"unknown paper format `B5`");
    }

    #[test]
    fn test_lengths_convert_to_inches() {
        let margin: CssLength = "10mm".parse().unwrap();
        assert!((margin.to_inches() - 0.393_700_787).abs() < 1e-6);

        let margin: CssLength = "2.54cm".parse().unwrap();
        assert!((margin.to_inches() - 1.).abs() < 1e-9);

        let margin: CssLength = "0.5in".parse().unwrap();
        assert_eq!(margin.to_inches(), 0.5);

        let margin: CssLength = "48".parse().unwrap();
        assert_eq!(margin.unit, LengthUnit::Px);
        assert_eq!(margin.to_inches(), 0.5);
    }

    #[test]
    fn test_lengths_with_exponents() {
        let margin: CssLength = "1e1mm".parse().unwrap();
        assert_eq!(margin.value, 10.);
        assert_eq!(margin.unit, LengthUnit::Mm);

        let margin: CssLength = "2E1".parse().unwrap();
        assert_eq!(margin.value, 20.);
        assert_eq!(margin.unit, LengthUnit::Px);
    }

    #[test]
    fn test_length_display_keeps_the_unit() {
        let margin: CssLength = "10MM".parse().unwrap();
        assert_eq!(margin.to_string(), "10mm");
    }

    #[test]
    fn test_rejects_bad_lengths() {
        let err = "wide".parse::<CssLength>().unwrap_err();
        assert_snapshot!(err, @"invalid length `wide`");

        let err = "-3mm".parse::<CssLength>().unwrap_err();
        assert_eq!(err, SettingsError::InvalidLength("-3mm".into()));

        let err = "mm".parse::<CssLength>().unwrap_err();
        assert_eq!(err, SettingsError::InvalidLength("mm".into()));

        let err = "1em".parse::<CssLength>().unwrap_err();
        assert_snapshot!(err, @"unsupported unit `em` in length `1em` (expected px, in, cm or mm)");
    }

    #[test]
    fn test_scale_range() {
        assert_eq!(validate_scale(1.), Ok(1.));
        assert_eq!(validate_scale(0.1), Ok(0.1));
        assert_eq!(validate_scale(2.), Ok(2.));
        assert!(validate_scale(0.05).is_err());
        assert!(validate_scale(2.5).is_err());
        assert!(validate_scale(f64::NAN).is_err());
    }
}
