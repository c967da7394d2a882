use crate::bookings::BookingStatus;

/// Rules for booking status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Confirmed, Cancelled
    /// - Confirmed → Active, Cancelled, Completed
    /// - Active → Cancelled, Completed
    /// - Cancelled, Completed → nothing
    ///
    /// Moving to the current status is not a transition and is rejected.
    pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
        if from.is_terminal() {
            return false;
        }

        match (from, to) {
            // From Pending
            (BookingStatus::Pending, BookingStatus::Confirmed) => true,
            (BookingStatus::Pending, BookingStatus::Cancelled) => true,

            // From Confirmed
            (BookingStatus::Confirmed, BookingStatus::Active) => true,
            (BookingStatus::Confirmed, BookingStatus::Cancelled) => true,
            (BookingStatus::Confirmed, BookingStatus::Completed) => true,

            // From Active
            (BookingStatus::Active, BookingStatus::Cancelled) => true,
            (BookingStatus::Active, BookingStatus::Completed) => true,

            _ => false,
        }
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<BookingStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}
