/// Run `$body` with `$l` bound to the record type selected by a
/// [`LifecycleKind`](crate::cli::subcommands::LifecycleKind).
macro_rules! with_lifecycle {
    ($kind:expr, $l:ident => $body:expr) => {
        match $kind {
            $crate::cli::subcommands::LifecycleKind::FundingRequest => {
                type $l = ::expensa_core::entities::FundingRequest;
                $body
            }
            $crate::cli::subcommands::LifecycleKind::ExpenseReport => {
                type $l = ::expensa_core::entities::ExpenseReport;
                $body
            }
            $crate::cli::subcommands::LifecycleKind::ReimbursementClaim => {
                type $l = ::expensa_core::entities::ReimbursementClaim;
                $body
            }
        }
    };
}

pub(crate) use with_lifecycle;
