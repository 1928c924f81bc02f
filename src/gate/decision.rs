//! Forced-update decision for the running build

use std::fmt;

use tracing::{debug, warn};

use crate::gate::platform::PlatformKind;
use crate::gate::semver::{SemanticVersion, leading_version};

/// Outcome of evaluating the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Local build is strictly older than the required version
    UpdateRequired,
    /// Local build meets the required version
    NoUpdateNeeded,
    /// Platform is not gated
    NotApplicable,
    /// Inputs were missing or malformed; treated as no update needed
    Indeterminate(IndeterminateReason),
}

impl GateDecision {
    pub fn requires_update(&self) -> bool {
        matches!(self, GateDecision::UpdateRequired)
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateDecision::UpdateRequired => f.write_str("update required"),
            GateDecision::NoUpdateNeeded => f.write_str("no update needed"),
            GateDecision::NotApplicable => f.write_str("not applicable"),
            GateDecision::Indeterminate(reason) => write!(f, "indeterminate ({})", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndeterminateReason {
    RemoteVersionNotSet,
    LocalVersionUnparsable,
    VersionParseFailure,
}

impl fmt::Display for IndeterminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndeterminateReason::RemoteVersionNotSet => "remote version not set",
            IndeterminateReason::LocalVersionUnparsable => "local version unparsable",
            IndeterminateReason::VersionParseFailure => "version parse failure",
        })
    }
}

/// Decide whether the local build must be upgraded to `remote_version_raw`.
///
/// Any ambiguity in the inputs resolves to a decision that does not block
/// the user; parse errors are logged and never returned.
pub fn evaluate(
    remote_version_raw: &str,
    local_version_raw: &str,
    platform: PlatformKind,
) -> GateDecision {
    if !platform.is_gated() {
        debug!("Platform {} is not gated", platform);
        return GateDecision::NotApplicable;
    }

    if remote_version_raw.trim().is_empty() {
        debug!("Remote required version is not set");
        return GateDecision::Indeterminate(IndeterminateReason::RemoteVersionNotSet);
    }

    let Some(local_prefix) = leading_version(local_version_raw) else {
        warn!("Local version {:?} is unparsable", local_version_raw);
        return GateDecision::Indeterminate(IndeterminateReason::LocalVersionUnparsable);
    };

    let versions = SemanticVersion::parse(local_prefix)
        .and_then(|local| SemanticVersion::parse(remote_version_raw).map(|remote| (local, remote)));

    let (local, remote) = match versions {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Failed to parse versions, assuming no update needed: {}", e);
            return GateDecision::Indeterminate(IndeterminateReason::VersionParseFailure);
        }
    };

    let decision = if local < remote {
        GateDecision::UpdateRequired
    } else {
        GateDecision::NoUpdateNeeded
    };
    debug!(
        "Local version {} vs required {}: {}",
        local, remote, decision
    );
    decision
}
