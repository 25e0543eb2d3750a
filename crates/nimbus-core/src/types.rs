//! Domain types for the Nimbus scaling client.
//!
//! [`ScalingBound`] serializes as a JSON number or the string `"auto"`,
//! matching the control-plane wire format.

use std::fmt;

use serde::de::{self, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique identifier for a deployment on the platform.
pub type DeploymentId = String;

/// Canonical region code (e.g. "sfo", "iad").
pub type RegionId = String;

// ── Scaling bounds ─────────────────────────────────────────────────

/// One endpoint of an instance-count range: a fixed count or the
/// platform-managed autoscaling sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingBound {
    /// Fixed instance count.
    Count(u64),
    /// Platform-managed autoscaling (`auto`).
    Auto,
}

impl ScalingBound {
    /// Parse a raw token as a scaling bound.
    ///
    /// Accepts the literal `auto` or an unsigned-integer string: ASCII
    /// digits only, no sign, no decimal point. Anything else (including
    /// a leading `+`) is not a bound.
    pub fn parse(token: &str) -> Option<Self> {
        if token == "auto" {
            return Some(Self::Auto);
        }
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        token.parse::<u64>().ok().map(Self::Count)
    }
}

impl fmt::Display for ScalingBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

impl Serialize for ScalingBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u64(*n),
            Self::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for ScalingBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BoundVisitor;

        impl Visitor<'_> for BoundVisitor {
            type Value = ScalingBound;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or the string \"auto\"")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<ScalingBound, E> {
                Ok(ScalingBound::Count(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<ScalingBound, E> {
                u64::try_from(value)
                    .map(ScalingBound::Count)
                    .map_err(|_| E::custom("instance count cannot be negative"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ScalingBound, E> {
                if value == "auto" {
                    Ok(ScalingBound::Auto)
                } else {
                    Err(E::custom(format!("expected \"auto\", got \"{value}\"")))
                }
            }
        }

        deserializer.deserialize_any(BoundVisitor)
    }
}

/// Min/max pair for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingBounds {
    pub min: ScalingBound,
    pub max: ScalingBound,
}

// ── Scaling intent ─────────────────────────────────────────────────

/// Per-region scaling request.
///
/// Region order follows first mention; duplicates collapse to the
/// first occurrence. Built once by the argument resolver and read-only
/// afterwards. Serializes as a JSON object in entry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingIntent {
    entries: Vec<(RegionId, ScalingBounds)>,
}

impl ScalingIntent {
    /// Assign `bounds` to every region in `regions`.
    pub fn uniform(regions: impl IntoIterator<Item = RegionId>, bounds: ScalingBounds) -> Self {
        let mut entries: Vec<(RegionId, ScalingBounds)> = Vec::new();
        for region in regions {
            if !entries.iter().any(|(r, _)| *r == region) {
                entries.push((region, bounds));
            }
        }
        Self { entries }
    }

    /// Number of target regions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target regions in order of first mention.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(r, _)| r.as_str())
    }

    /// Iterate (region, bounds) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalingBounds)> {
        self.entries.iter().map(|(r, b)| (r.as_str(), b))
    }
}

impl Serialize for ScalingIntent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (region, bounds) in &self.entries {
            map.serialize_entry(region, bounds)?;
        }
        map.end()
    }
}

// ── Deployment ─────────────────────────────────────────────────────

/// Deployment record fetched from the control plane. Read-only here;
/// the platform owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub url: String,
    pub kind: DeploymentKind,
    pub state: DeploymentState,
}

/// Workload kind. Static deployments have no running instances and
/// cannot be scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentKind {
    Static,
    Container,
    Function,
}

impl DeploymentKind {
    /// Whether this kind of workload accepts scaling updates.
    pub fn scalable(&self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// Lifecycle state of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Initializing,
    Ready,
    Error,
    Frozen,
}
