//! The API endpoints URIs.

/// The root route which redirects to the bills page.
pub const ROOT: &str = "/";
/// The page listing the signed-in user's bills.
pub const BILLS_VIEW: &str = "/bills";
/// The page for submitting a new bill.
pub const NEW_BILL_VIEW: &str = "/bills/new";
/// The dialog fragment showing a bill's proof.
pub const PROOF_MODAL: &str = "/bills/proof";
/// The route for getting the sign in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for uploaded proof files.
pub const PROOFS: &str = "/proofs";

/// The route for signing in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to sign out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to submit bills.
pub const BILLS_API: &str = "/api/bills";
/// The route to check a proof file when it is selected.
pub const CHECK_PROOF_API: &str = "/api/bills/proof";
