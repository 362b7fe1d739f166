// Public API
pub use coordinator::{LeaveReason, MembershipCoordinator};
pub use relay::RelayRouter;

// Internal modules
mod coordinator;
mod relay;
