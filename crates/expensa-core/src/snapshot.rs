//! Requester snapshot capture.
//!
//! Copies the mutable profile fields of the acting requester into an
//! immutable [`RequesterSnapshot`]. Each field has a fallback chain: the
//! user-customised value wins, then the platform-provided one, then `None`.
//! Blank strings count as absent.

use chrono::Utc;

use crate::entities::RequesterSnapshot;
use crate::identity::ActorProfile;

/// First non-blank value of a fallback chain, trimmed.
fn first_present(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// Capture a snapshot of `profile`, tagged with `source`.
///
/// Returns `None` (and logs a warning) when no profile is available. Every
/// call produces a new value; nothing is shared with earlier captures.
#[must_use]
pub fn capture(profile: Option<&ActorProfile>, source: &str) -> Option<RequesterSnapshot> {
    let Some(p) = profile else {
        tracing::warn!(source, "no requester profile available, snapshot skipped");
        return None;
    };

    Some(RequesterSnapshot {
        name: first_present(&[&p.display_name, &p.full_name]),
        tax_id: first_present(&[&p.tax_id]),
        role_title: first_present(&[&p.role_title, &p.job_title]),
        org_unit: first_present(&[&p.org_unit, &p.organization]),
        department: first_present(&[&p.department]),
        phone: first_present(&[&p.phone, &p.mobile_phone]),
        manager: first_present(&[&p.manager_name, &p.supervisor]),
        municipality: first_present(&[&p.municipality, &p.city]),
        captured_at: Utc::now(),
        source: source.to_string(),
    })
}
