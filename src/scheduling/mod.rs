//! Scheduling rules
//!
//! Pure logic behind availability windows, slot generation and meeting quotas.
//! Nothing in here touches the database; services feed it counts and rows.

pub mod clock;
pub mod quota;
pub mod slots;
pub mod window;

pub use clock::{Clock, FixedClock, LocalClock};
pub use quota::{QuotaCounts, QuotaDecision, QuotaLimits, QuotaScope, evaluate_reservation, first_exhausted_scope, week_range};
pub use slots::{SlotSpec, generate_slots};
pub use window::{AvailabilityWindow, parse_date, parse_time, validate_window};
