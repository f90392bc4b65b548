// approval-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Approval Gate configuration. The example must load
//! and validate; tests enforce this.

/// Returns a canonical example `approval-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[logging]
filter = "info"
format = "text"

[compiler]
merge_policy = "last_write_wins"
reject_unknown_components = true

[[components]]
id = "payments.disbursement"
title = "Disbursements"

[[components]]
id = "payments.disbursement.approve"
title = "Approve disbursement"

[[components]]
id = "payments.refund"
title = "Refunds"

[[components]]
id = "reports.daily"
title = "Daily report"

[[permission_groups]]
id = "pg-maker"
access_level = "MAKER"
can_view = true
can_insert = true
can_submit = true

[[permission_groups]]
id = "pg-checker"
access_level = "CHECKER"
can_view = true
can_authorize = true
can_reject = true

[[permission_groups]]
id = "pg-authorizer"
access_level = "AUTHORIZER_1"
can_view = true
can_authorize = true
can_reject = true

[[permission_groups]]
id = "pg-viewer"
access_level = "VIEWER"
can_view = true

[[flows]]
feature = "payments.disbursement"
steps = ["MAKER", "CHECKER", "AUTHORIZER_1"]

[[flows]]
feature = "payments.refund"
steps = ["MAKER", ["CHECKER", "AUTHORIZER_1"]]

[[navigation]]
id = "home"
title = "Home"
href = "/"
public = true

[[navigation]]
id = "payments"
title = "Payments"

[[navigation.children]]
id = "payments.disbursement"
title = "Disbursements"
href = "/payments/disbursements"

[[navigation.children]]
id = "payments.refund"
title = "Refunds"
href = "/payments/refunds"

[[navigation]]
id = "admin"
title = "Administration"
user_group = "admins"

[[navigation.children]]
id = "admin.users"
title = "Users"
href = "/admin/users"
"#,
    )
}
