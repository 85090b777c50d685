//! Role-keyed transition tables for the three lifecycles.
//!
//! One generic [`TransitionTable`] type holds the data; each lifecycle loads
//! its own static instance. A move is legal only if it is listed for the
//! acting role's tier, and the tables are deliberately sparse so that a
//! submitter can never skip straight to a decided state.
//!
//! Side effects of entering a state (stamping the analyst, freezing the
//! requester snapshot, stamping the payment date) are listed next to the
//! edges as [`Hook`]s and applied by the status engine in `expensa-db`.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entities::{ExpenseReport, FundingRequest, ReimbursementClaim};
use crate::enums::{
    EntityType, ExpenseReportStatus, FundingRequestStatus, ReimbursementClaimStatus, Role,
    RoleTier,
};
use crate::errors::CoreError;

/// A lifecycle status enumeration.
pub trait LifecycleStatus:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Every member of the enumeration.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

impl LifecycleStatus for FundingRequestStatus {
    const ALL: &'static [Self] = Self::ALL;

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl LifecycleStatus for ExpenseReportStatus {
    const ALL: &'static [Self] = Self::ALL;

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl LifecycleStatus for ReimbursementClaimStatus {
    const ALL: &'static [Self] = Self::ALL;

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

/// Effect applied to the update payload when a hook fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Set `analysis_date` to now and `analyst_email` to the actor's email.
    StampAnalysis,
    /// Capture and embed a fresh `requester_snapshot`.
    CaptureSnapshot,
    /// Set `paid_at` to now.
    StampPayment,
}

/// Outgoing moves for one (tier, status) pair.
#[derive(Debug)]
pub struct Edge<S: 'static> {
    pub tier: RoleTier,
    pub from: S,
    pub to: &'static [S],
}

/// Side effect fired when entering `to`, optionally only when coming from `from`.
#[derive(Debug)]
pub struct Hook<S: 'static> {
    pub from: Option<S>,
    pub to: S,
    pub effect: SideEffect,
}

/// Transition table for one lifecycle.
#[derive(Debug)]
pub struct TransitionTable<S: 'static> {
    pub edges: &'static [Edge<S>],
    pub hooks: &'static [Hook<S>],
}

impl<S: LifecycleStatus> TransitionTable<S> {
    /// Statuses reachable in one step from `current` for `role`.
    #[must_use]
    pub fn available(&self, current: S, role: Role) -> &'static [S] {
        let tier = role.tier();
        self.edges
            .iter()
            .find(|edge| edge.tier == tier && edge.from == current)
            .map_or(&[], |edge| edge.to)
    }

    #[must_use]
    pub fn allows(&self, current: S, target: S, role: Role) -> bool {
        self.available(current, role).contains(&target)
    }

    /// Side effects triggered by moving `from` → `to`, in table order.
    pub fn effects(&self, from: S, to: S) -> impl Iterator<Item = SideEffect> + '_ {
        self.hooks
            .iter()
            .filter(move |hook| hook.to == to && hook.from.is_none_or(|f| f == from))
            .map(|hook| hook.effect)
    }
}

/// A lifecycle record type driven by the status engine.
pub trait Lifecycle: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Status: LifecycleStatus;

    const ENTITY_TYPE: EntityType;

    /// Status every new record starts in.
    const INITIAL: Self::Status;

    fn transitions() -> &'static TransitionTable<Self::Status>;

    fn id(&self) -> &str;

    fn status(&self) -> Self::Status;

    /// Check a move against this lifecycle's table.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::IllegalTransition` if `target` is not reachable
    /// from `current` for `role`.
    fn check_transition(
        id: &str,
        current: Self::Status,
        target: Self::Status,
        role: Role,
    ) -> Result<(), CoreError> {
        if Self::transitions().allows(current, target, role) {
            Ok(())
        } else {
            Err(CoreError::IllegalTransition {
                entity_type: Self::ENTITY_TYPE.as_str().to_string(),
                id: id.to_string(),
                from: current.as_str().to_string(),
                to: target.as_str().to_string(),
                tier: role.tier().as_str().to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// FundingRequest
// ---------------------------------------------------------------------------

pub static FUNDING_REQUEST_TRANSITIONS: TransitionTable<FundingRequestStatus> = {
    use FundingRequestStatus as S;
    TransitionTable {
        edges: &[
            Edge { tier: RoleTier::Submitter, from: S::Draft, to: &[S::Pending] },
            Edge { tier: RoleTier::Submitter, from: S::Rejected, to: &[S::Pending] },
            Edge { tier: RoleTier::Submitter, from: S::Paid, to: &[S::Confirmed] },
            Edge { tier: RoleTier::Admin, from: S::Pending, to: &[S::UnderAnalysis] },
            Edge {
                tier: RoleTier::Admin,
                from: S::UnderAnalysis,
                to: &[S::Approved, S::Rejected],
            },
            Edge { tier: RoleTier::Admin, from: S::Approved, to: &[S::Paid] },
            Edge { tier: RoleTier::Admin, from: S::Paid, to: &[S::Cancelled] },
        ],
        hooks: &[
            Hook { from: Some(S::Draft), to: S::Pending, effect: SideEffect::CaptureSnapshot },
            Hook { from: None, to: S::UnderAnalysis, effect: SideEffect::StampAnalysis },
            Hook { from: None, to: S::Paid, effect: SideEffect::StampPayment },
        ],
    }
};

impl Lifecycle for FundingRequest {
    type Status = FundingRequestStatus;

    const ENTITY_TYPE: EntityType = EntityType::FundingRequest;
    const INITIAL: Self::Status = FundingRequestStatus::Draft;

    fn transitions() -> &'static TransitionTable<Self::Status> {
        &FUNDING_REQUEST_TRANSITIONS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Self::Status {
        self.status
    }
}

// ---------------------------------------------------------------------------
// ExpenseReport
// ---------------------------------------------------------------------------

pub static EXPENSE_REPORT_TRANSITIONS: TransitionTable<ExpenseReportStatus> = {
    use ExpenseReportStatus as S;
    TransitionTable {
        edges: &[
            Edge { tier: RoleTier::Submitter, from: S::Draft, to: &[S::Pending] },
            Edge { tier: RoleTier::Submitter, from: S::Rejected, to: &[S::Pending] },
            Edge { tier: RoleTier::Admin, from: S::Pending, to: &[S::UnderAnalysis] },
            Edge {
                tier: RoleTier::Admin,
                from: S::UnderAnalysis,
                to: &[S::Approved, S::Rejected],
            },
        ],
        // The requester is already frozen on the funding request this
        // report settles, so there is no snapshot hook here.
        hooks: &[Hook { from: None, to: S::UnderAnalysis, effect: SideEffect::StampAnalysis }],
    }
};

impl Lifecycle for ExpenseReport {
    type Status = ExpenseReportStatus;

    const ENTITY_TYPE: EntityType = EntityType::ExpenseReport;
    const INITIAL: Self::Status = ExpenseReportStatus::Draft;

    fn transitions() -> &'static TransitionTable<Self::Status> {
        &EXPENSE_REPORT_TRANSITIONS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Self::Status {
        self.status
    }
}

// ---------------------------------------------------------------------------
// ReimbursementClaim
// ---------------------------------------------------------------------------

pub static REIMBURSEMENT_CLAIM_TRANSITIONS: TransitionTable<ReimbursementClaimStatus> = {
    use ReimbursementClaimStatus as S;
    TransitionTable {
        edges: &[
            Edge { tier: RoleTier::Submitter, from: S::Draft, to: &[S::Pending, S::Cancelled] },
            Edge { tier: RoleTier::Submitter, from: S::Rejected, to: &[S::Pending] },
            Edge { tier: RoleTier::Submitter, from: S::Paid, to: &[S::Confirmed] },
            Edge { tier: RoleTier::Admin, from: S::Pending, to: &[S::UnderAnalysis] },
            Edge {
                tier: RoleTier::Admin,
                from: S::UnderAnalysis,
                to: &[S::Approved, S::Rejected],
            },
            Edge { tier: RoleTier::Admin, from: S::Approved, to: &[S::Paid] },
        ],
        hooks: &[
            Hook { from: Some(S::Draft), to: S::Pending, effect: SideEffect::CaptureSnapshot },
            Hook { from: None, to: S::UnderAnalysis, effect: SideEffect::StampAnalysis },
            Hook { from: None, to: S::Paid, effect: SideEffect::StampPayment },
        ],
    }
};

impl Lifecycle for ReimbursementClaim {
    type Status = ReimbursementClaimStatus;

    const ENTITY_TYPE: EntityType = EntityType::ReimbursementClaim;
    const INITIAL: Self::Status = ReimbursementClaimStatus::Draft;

    fn transitions() -> &'static TransitionTable<Self::Status> {
        &REIMBURSEMENT_CLAIM_TRANSITIONS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Self::Status {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use FundingRequestStatus as F;

    #[rstest]
    #[case(Role::Requester, F::Draft, &[F::Pending])]
    #[case(Role::Requester, F::Pending, &[])]
    #[case(Role::Requester, F::UnderAnalysis, &[])]
    #[case(Role::Requester, F::Approved, &[])]
    #[case(Role::Requester, F::Rejected, &[F::Pending])]
    #[case(Role::Requester, F::Paid, &[F::Confirmed])]
    #[case(Role::Requester, F::Confirmed, &[])]
    #[case(Role::Requester, F::Cancelled, &[])]
    #[case(Role::Manager, F::Draft, &[F::Pending])]
    #[case(Role::Manager, F::Paid, &[F::Confirmed])]
    #[case(Role::Admin, F::Draft, &[])]
    #[case(Role::Admin, F::Pending, &[F::UnderAnalysis])]
    #[case(Role::Admin, F::UnderAnalysis, &[F::Approved, F::Rejected])]
    #[case(Role::Admin, F::Approved, &[F::Paid])]
    #[case(Role::Admin, F::Rejected, &[])]
    #[case(Role::Admin, F::Paid, &[F::Cancelled])]
    #[case(Role::Admin, F::Confirmed, &[])]
    #[case(Role::Admin, F::Cancelled, &[])]
    fn funding_request_table(
        #[case] role: Role,
        #[case] current: FundingRequestStatus,
        #[case] expected: &[FundingRequestStatus],
    ) {
        assert_eq!(FUNDING_REQUEST_TRANSITIONS.available(current, role), expected);
    }

    #[test]
    fn submitter_never_reaches_decided_states() {
        let decided = [F::Approved, F::Rejected, F::Paid];
        for role in [Role::Requester, Role::Manager] {
            for from in F::ALL {
                for to in decided {
                    assert!(
                        !FUNDING_REQUEST_TRANSITIONS.allows(*from, to, role),
                        "{role} must not move {from} -> {to}"
                    );
                }
            }
        }
    }

    #[test]
    fn admin_cannot_pay_pending_request() {
        assert!(!FUNDING_REQUEST_TRANSITIONS.allows(F::Pending, F::Paid, Role::Admin));
        let err = FundingRequest::check_transition("fr-1", F::Pending, F::Paid, Role::Admin)
            .unwrap_err();
        assert!(matches!(err, CoreError::IllegalTransition { .. }));
    }

    #[test]
    fn edges_are_unique_per_tier_and_status() {
        fn check<S: LifecycleStatus>(table: &TransitionTable<S>) {
            for (i, a) in table.edges.iter().enumerate() {
                for b in &table.edges[i + 1..] {
                    assert!(
                        !(a.tier == b.tier && a.from == b.from),
                        "duplicate edge row for {} {}",
                        a.tier,
                        a.from
                    );
                }
            }
        }
        check(&FUNDING_REQUEST_TRANSITIONS);
        check(&EXPENSE_REPORT_TRANSITIONS);
        check(&REIMBURSEMENT_CLAIM_TRANSITIONS);
    }

    #[test]
    fn snapshot_only_fires_from_draft() {
        let effects: Vec<_> = FUNDING_REQUEST_TRANSITIONS
            .effects(F::Draft, F::Pending)
            .collect();
        assert_eq!(effects, vec![SideEffect::CaptureSnapshot]);

        let resubmit: Vec<_> = FUNDING_REQUEST_TRANSITIONS
            .effects(F::Rejected, F::Pending)
            .collect();
        assert!(resubmit.is_empty());
    }

    #[test]
    fn analysis_and_payment_stamps() {
        let analysis: Vec<_> = FUNDING_REQUEST_TRANSITIONS
            .effects(F::Pending, F::UnderAnalysis)
            .collect();
        assert_eq!(analysis, vec![SideEffect::StampAnalysis]);

        let paid: Vec<_> = FUNDING_REQUEST_TRANSITIONS
            .effects(F::Approved, F::Paid)
            .collect();
        assert_eq!(paid, vec![SideEffect::StampPayment]);
    }

    #[test]
    fn expense_report_has_no_snapshot_hook() {
        use ExpenseReportStatus as E;
        assert_eq!(
            EXPENSE_REPORT_TRANSITIONS.effects(E::Draft, E::Pending).count(),
            0
        );
        assert_eq!(
            EXPENSE_REPORT_TRANSITIONS.available(E::UnderAnalysis, Role::Admin),
            &[E::Approved, E::Rejected]
        );
        assert!(EXPENSE_REPORT_TRANSITIONS
            .available(E::Approved, Role::Admin)
            .is_empty());
    }

    #[test]
    fn reimbursement_submitter_can_withdraw_draft() {
        use ReimbursementClaimStatus as R;
        assert_eq!(
            REIMBURSEMENT_CLAIM_TRANSITIONS.available(R::Draft, Role::Requester),
            &[R::Pending, R::Cancelled]
        );
        assert!(REIMBURSEMENT_CLAIM_TRANSITIONS
            .available(R::Paid, Role::Admin)
            .is_empty());
    }
}
