use std::fmt;

use tracing::{debug, warn};

/// A named unit price with a safe default and an inclusive plausibility
/// range. Overrides outside the range are treated as operator mistakes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSpec {
    pub name: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl PriceSpec {
    pub const fn new(name: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            name,
            default,
            min,
            max,
        }
    }
}

/// Why a configured price override was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceRejection {
    Missing,
    Unparsable,
    NotFinite,
    Negative { value: f64 },
    BelowMinimum { value: f64, min: f64 },
    AboveMaximum { value: f64, max: f64 },
}

impl fmt::Display for PriceRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no override configured"),
            Self::Unparsable => write!(f, "not a decimal number"),
            Self::NotFinite => write!(f, "not a finite number"),
            Self::Negative { value } => write!(f, "negative price {}", value),
            Self::BelowMinimum { value, min } => {
                write!(f, "price {} below minimum {}", value, min)
            }
            Self::AboveMaximum { value, max } => {
                write!(f, "price {} above maximum {}", value, max)
            }
        }
    }
}

fn validate(spec: &PriceSpec, raw: Option<&str>) -> Result<f64, PriceRejection> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw.trim(),
        _ => return Err(PriceRejection::Missing),
    };

    let value: f64 = raw.parse().map_err(|_| PriceRejection::Unparsable)?;

    if !value.is_finite() {
        return Err(PriceRejection::NotFinite);
    }
    if value < 0.0 {
        return Err(PriceRejection::Negative { value });
    }
    if value < spec.min {
        return Err(PriceRejection::BelowMinimum {
            value,
            min: spec.min,
        });
    }
    if value > spec.max {
        return Err(PriceRejection::AboveMaximum {
            value,
            max: spec.max,
        });
    }

    Ok(value)
}

/// Resolve the unit price for `spec` from an optional raw override.
///
/// Total: every invalid override is logged and replaced by the default, so
/// a bad price can skew the estimate but never stop the guardrail.
pub fn resolve_price(spec: &PriceSpec, raw: Option<&str>) -> f64 {
    match validate(spec, raw) {
        Ok(value) => value,
        Err(PriceRejection::Missing) => {
            debug!(price = spec.name, default = spec.default, "No price override configured");
            spec.default
        }
        Err(rejection) => {
            warn!(
                price = spec.name,
                raw = raw.unwrap_or_default(),
                reason = %rejection,
                fallback = spec.default,
                "Invalid price override, using default"
            );
            spec.default
        }
    }
}
