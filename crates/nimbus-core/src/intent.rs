//! Positional-argument resolution for `nimbus scale`.
//!
//! Two calling forms share one token list. The deprecated legacy form
//! passes bounds directly after the deployment and implicitly targets
//! every region; the current form names regions explicitly:
//!
//! ```text
//! nimbus scale <deployment> <min> [max]            # legacy
//! nimbus scale <deployment> <regions> [min] [max]  # current
//! ```
//!
//! The form is decided by a single lookahead on the token after the
//! deployment identifier: a scaling bound selects the legacy form,
//! anything else is a region designator. The decision never backtracks.
//! The legacy form rewrites its designator to `all` and then joins the
//! shared path, so defaulting and region normalization are identical
//! for both forms.

use crate::error::{ScaleError, ScaleResult};
use crate::regions;
use crate::types::{ScalingBound, ScalingBounds, ScalingIntent};

/// Which calling form the lookahead committed to.
#[derive(Debug, PartialEq, Eq)]
enum Grammar {
    /// `<min> [max]`, regions implicitly `all`.
    Legacy {
        min: ScalingBound,
        max: Option<ScalingBound>,
    },
    /// `<regions> [min] [max]`.
    Current {
        designator: String,
        min: Option<ScalingBound>,
        max: Option<ScalingBound>,
    },
}

/// Resolve the full positional token list (token 0 is the deployment
/// identifier) into a per-region scaling intent.
///
/// Fails with [`ScaleError::Usage`] on a bad token count or shape, and
/// with [`ScaleError::Validation`] on an invalid region designator.
pub fn resolve(tokens: &[String]) -> ScaleResult<ScalingIntent> {
    if tokens.len() < 2 {
        return Err(ScaleError::Usage("too few arguments".to_string()));
    }
    if tokens.len() > 4 {
        return Err(ScaleError::Usage("too many arguments".to_string()));
    }

    let (designator, min, max) = match classify(&tokens[1..])? {
        Grammar::Legacy { min, max } => ("all".to_string(), Some(min), max),
        Grammar::Current {
            designator,
            min,
            max,
        } => (designator, min, max),
    };

    // Defaults are applied after the forms converge: a missing max
    // mirrors min, except that a bare `auto` means (0, auto).
    let bounds = match (min, max) {
        (None, _) | (Some(ScalingBound::Auto), None) => ScalingBounds {
            min: ScalingBound::Count(0),
            max: ScalingBound::Auto,
        },
        (Some(min), None) => ScalingBounds { min, max: min },
        (Some(min), Some(max)) => ScalingBounds { min, max },
    };

    let raw: Vec<&str> = designator.split(',').collect();
    let normalized = regions::normalize(&raw).map_err(|e| ScaleError::Validation(e.to_string()))?;

    Ok(ScalingIntent::uniform(normalized, bounds))
}

/// Commit to a grammar based on the dc-or-min token (`args[0]`).
fn classify(args: &[String]) -> ScaleResult<Grammar> {
    match ScalingBound::parse(&args[0]) {
        Some(min) => {
            // Legacy form takes at most two bound tokens.
            if args.len() > 2 {
                return Err(ScaleError::Usage(format!(
                    "unexpected argument \"{}\": the <min> [max] form takes no region list",
                    args[2]
                )));
            }
            let max = args
                .get(1)
                .map(|token| parse_bound(token, "maximum"))
                .transpose()?;
            Ok(Grammar::Legacy { min, max })
        }
        None => {
            let min = args
                .get(1)
                .map(|token| parse_bound(token, "minimum"))
                .transpose()?;
            let max = args
                .get(2)
                .map(|token| parse_bound(token, "maximum"))
                .transpose()?;
            Ok(Grammar::Current {
                designator: args[0].clone(),
                min,
                max,
            })
        }
    }
}

fn parse_bound(token: &str, which: &str) -> ScaleResult<ScalingBound> {
    ScalingBound::parse(token).ok_or_else(|| {
        ScaleError::Usage(format!(
            "invalid {which} instance count \"{token}\": expected a non-negative integer or \"auto\""
        ))
    })
}
