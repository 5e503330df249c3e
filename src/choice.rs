use std::fmt;

use thiserror::Error;

use crate::options::OptValue;

/// Accepted shape of a prompted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Inclusive integer range
    IntRange(i64, i64),
    /// Inclusive float range
    FloatRange(f64, f64),
    /// Lowercase accepted strings
    OneOf(&'static [&'static str]),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::IntRange(lo, hi) => write!(f, "{lo}-{hi}"),
            Shape::FloatRange(lo, hi) => write!(f, "{lo}-{hi}"),
            Shape::OneOf(opts) => write!(f, "{}", opts.join("/")),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidChoice {
    #[error("Cannot parse \"{0}\" as an integer.")]
    NotAnInteger(String),
    #[error("Cannot parse \"{0}\" as a float.")]
    NotAFloat(String),
    #[error("Invalid value: {value} (must be within {shape}).")]
    OutOfRange { value: String, shape: Shape },
    #[error("Unrecognized value \"{0}\".")]
    Unrecognized(String),
}

/// Check `choice` against `shape`.
///
/// `Ok(None)` for an empty answer, the caller picks the default. A blank but
/// non-empty answer is invalid.
pub fn validate_choice(choice: &str, shape: &Shape) -> Result<Option<OptValue>, InvalidChoice> {
    if choice.is_empty() {
        return Ok(None);
    }
    let trimmed = choice.trim();

    let value = match shape {
        Shape::IntRange(lo, hi) => {
            let v: i64 = trimmed
                .parse()
                .map_err(|_| InvalidChoice::NotAnInteger(choice.to_string()))?;
            if !(*lo..=*hi).contains(&v) {
                return Err(InvalidChoice::OutOfRange {
                    value: v.to_string(),
                    shape: shape.clone(),
                });
            }
            OptValue::Int(v)
        }
        Shape::FloatRange(lo, hi) => {
            let v: f64 = trimmed
                .parse()
                .map_err(|_| InvalidChoice::NotAFloat(choice.to_string()))?;
            // NaN fails the containment check as well
            if !(*lo..=*hi).contains(&v) {
                return Err(InvalidChoice::OutOfRange {
                    value: v.to_string(),
                    shape: shape.clone(),
                });
            }
            OptValue::Float(v)
        }
        Shape::OneOf(opts) => {
            let lowered = trimmed.to_lowercase();
            let opt = opts
                .iter()
                .find(|&&o| o == lowered)
                .ok_or_else(|| InvalidChoice::Unrecognized(choice.to_string()))?;
            OptValue::Str(opt.to_string())
        }
    };
    Ok(Some(value))
}

/// Parse a prompted answer, falling back to `default` on empty or invalid input.
///
/// Every fallback caused by invalid input prints a diagnostic.
pub fn parse_choice(choice: &str, shape: &Shape, default: OptValue) -> OptValue {
    match validate_choice(choice, shape) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            println!("{e} Using default value: {default}.");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ME: Shape = Shape::OneOf(&["ds", "epzs", "esa"]);

    #[test]
    fn empty_returns_default() {
        let d = OptValue::Int(16);
        assert_eq!(parse_choice("", &Shape::IntRange(1, 512), d.clone()), d);
        // the default itself is not validated
        let d = OptValue::Int(9000);
        assert_eq!(parse_choice("", &Shape::IntRange(1, 512), d.clone()), d);
    }

    #[test]
    fn blank_answers_are_reported() {
        assert_eq!(
            validate_choice("  ", &Shape::IntRange(1, 512)),
            Err(InvalidChoice::NotAnInteger("  ".into()))
        );
        assert_eq!(
            validate_choice(" ", &Shape::FloatRange(0.1, 144.0)),
            Err(InvalidChoice::NotAFloat(" ".into()))
        );
        assert_eq!(
            validate_choice("\t", &ME),
            Err(InvalidChoice::Unrecognized("\t".into()))
        );
        assert_eq!(validate_choice("", &ME), Ok(None));

        let d = OptValue::Int(16);
        assert_eq!(parse_choice("   ", &Shape::IntRange(1, 512), d.clone()), d);
    }

    #[test]
    fn int_range() {
        let shape = Shape::IntRange(1, 144);
        assert_eq!(validate_choice("60", &shape), Ok(Some(OptValue::Int(60))));
        assert_eq!(validate_choice(" 144 ", &shape), Ok(Some(OptValue::Int(144))));
        assert_eq!(
            validate_choice("6.5", &shape),
            Err(InvalidChoice::NotAnInteger("6.5".into()))
        );
        assert!(matches!(
            validate_choice("0", &shape),
            Err(InvalidChoice::OutOfRange { .. })
        ));
        assert_eq!(parse_choice("abc", &shape, OptValue::Int(60)), OptValue::Int(60));
        assert_eq!(parse_choice("145", &shape, OptValue::Int(60)), OptValue::Int(60));
    }

    #[test]
    fn float_range() {
        let shape = Shape::FloatRange(0.1, 144.0);
        assert_eq!(validate_choice("24", &shape), Ok(Some(OptValue::Float(24.0))));
        assert_eq!(validate_choice("0.1", &shape), Ok(Some(OptValue::Float(0.1))));
        assert!(matches!(
            validate_choice("fast", &shape),
            Err(InvalidChoice::NotAFloat(_))
        ));
        assert!(matches!(
            validate_choice("0.05", &shape),
            Err(InvalidChoice::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_choice("NaN", &shape),
            Err(InvalidChoice::OutOfRange { .. })
        ));
        assert_eq!(
            parse_choice("inf", &shape, OptValue::Float(15.0)),
            OptValue::Float(15.0)
        );
    }

    #[test]
    fn one_of_is_trimmed_and_case_insensitive() {
        assert_eq!(
            validate_choice("  EPZS ", &ME),
            Ok(Some(OptValue::Str("epzs".into())))
        );
        assert_eq!(
            validate_choice("umh", &ME),
            Err(InvalidChoice::Unrecognized("umh".into()))
        );
        assert_eq!(
            parse_choice("nope", &ME, OptValue::Str("epzs".into())),
            OptValue::Str("epzs".into())
        );
    }

    #[test]
    fn diagnostic_messages() {
        let e = validate_choice("600", &Shape::IntRange(1, 512)).unwrap_err();
        assert_eq!(e.to_string(), "Invalid value: 600 (must be within 1-512).");
        let e = validate_choice("x", &Shape::IntRange(1, 512)).unwrap_err();
        assert_eq!(e.to_string(), "Cannot parse \"x\" as an integer.");
    }

    proptest! {
        #[test]
        fn in_range_ints_parse_exactly(lo in -1000i64..1000, span in 0i64..1000, off in 0i64..1000) {
            let hi = lo + span;
            let v = lo + off.min(span);
            let got = parse_choice(&v.to_string(), &Shape::IntRange(lo, hi), OptValue::Int(lo - 1));
            prop_assert_eq!(got, OptValue::Int(v));
        }

        #[test]
        fn non_integers_fall_back(s in "[a-zA-Z.]{1,8}") {
            let got = parse_choice(&s, &Shape::IntRange(1, 512), OptValue::Int(16));
            prop_assert_eq!(got, OptValue::Int(16));
        }
    }
}
