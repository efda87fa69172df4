//! Best-effort resolution of the requested timezone

use chrono_tz::Tz;
use tracing::warn;

/// Zone used when no timezone is requested or the request is unusable
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Outcome of resolving a timezone identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedZone {
    tz: Tz,
    fell_back: bool,
}

impl ResolvedZone {
    fn utc(fell_back: bool) -> Self {
        Self {
            tz: Tz::UTC,
            fell_back,
        }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Canonical IANA name of the resolved zone
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// True when the requested identifier was replaced by UTC
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }
}

/// Resolve an optional IANA identifier, substituting UTC when it is unknown
///
/// `"UTC"` in any letter case selects UTC directly. Other identifiers are
/// looked up case-insensitively and reported under their canonical name.
pub fn resolve_timezone(requested: Option<&str>) -> ResolvedZone {
    let id = match requested {
        None => return ResolvedZone::utc(false),
        Some(id) if id.eq_ignore_ascii_case(DEFAULT_TIMEZONE) => return ResolvedZone::utc(false),
        Some(id) => id,
    };

    match Tz::from_str_insensitive(id) {
        Ok(tz) => ResolvedZone {
            tz,
            fell_back: false,
        },
        Err(_) => {
            warn!(requested = id, "Unknown timezone, falling back to UTC");
            ResolvedZone::utc(true)
        }
    }
}
