// Booking Policy Engine
//
// Orchestrates creation, cancellation, confirmation and completion of
// bookings. Every rule runs before anything is written; the final slot
// check and insert happen atomically in the repository.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{AuthError, Role, UserRepository};
use crate::bookings::{
    cancellation_allowed, check_advance_window, check_max_duration, check_min_duration,
    validate_interval, AdminBookingQuery, AdminCreateBookingRequest, AvailabilityChecker,
    Booking, BookingError, BookingRepository, BookingStatus, CreateBookingRequest, NewBooking,
    OperatingHoursValidator, StatusMachine, UserBookingQuery,
};
use crate::config::AppConfig;
use crate::metrics::PerformanceMetrics;
use crate::pricing::PricingResolver;
use crate::settings::SettingsStore;
use crate::stats::StatsService;
use crate::turfs::TurfRepository;

/// Engine-wide defaults taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct BookingRules {
    pub venue_offset: FixedOffset,
    pub min_booking_hours: f64,
    /// Used when the turf has no usable `cancellation_deadline_hours`
    pub cancel_hours_threshold: f64,
}

impl From<&AppConfig> for BookingRules {
    fn from(config: &AppConfig) -> Self {
        Self {
            venue_offset: config.venue_offset,
            min_booking_hours: config.min_booking_hours,
            cancel_hours_threshold: config.cancel_hours_threshold,
        }
    }
}

/// Everything `create` needs about a requested booking
#[derive(Debug, Clone)]
struct BookingDraft {
    turf_id: Uuid,
    user_id: i32,
    date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    creator_id: i32,
    creator_role: Role,
}

/// How an actor is allowed to touch a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// The user who holds the booking
    Holder,
    /// The admin who owns the booking's turf
    TurfAdmin,
}

#[derive(Clone)]
pub struct BookingService {
    repo: BookingRepository,
    turf_repo: TurfRepository,
    user_repo: UserRepository,
    availability: AvailabilityChecker,
    settings: SettingsStore,
    pricing: Arc<PricingResolver>,
    stats: Arc<StatsService>,
    metrics: PerformanceMetrics,
    rules: BookingRules,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repo: BookingRepository,
        turf_repo: TurfRepository,
        user_repo: UserRepository,
        availability: AvailabilityChecker,
        settings: SettingsStore,
        pricing: Arc<PricingResolver>,
        stats: Arc<StatsService>,
        metrics: PerformanceMetrics,
        rules: BookingRules,
    ) -> Self {
        Self {
            repo,
            turf_repo,
            user_repo,
            availability,
            settings,
            pricing,
            stats,
            metrics,
            rules,
        }
    }

    /// Book a slot for the calling user
    ///
    /// An admin booking on their own turf goes straight to `confirmed`;
    /// everyone else starts at `pending`.
    pub async fn create_for_user(
        &self,
        user_id: i32,
        role: Role,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        self.create(BookingDraft {
            turf_id: request.turf_id,
            user_id,
            date: request.date,
            start: request.start_time,
            end: request.end_time,
            creator_id: user_id,
            creator_role: role,
        })
        .await
    }

    /// Book a slot on an owned turf on behalf of another user
    pub async fn create_on_behalf(
        &self,
        admin_id: i32,
        request: AdminCreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let turf = self
            .turf_repo
            .find_by_id(request.turf_id)
            .await
            .map_err(turf_error)?
            .ok_or(BookingError::TurfNotFound(request.turf_id))?;
        if !turf.is_owned_by(admin_id) {
            return Err(BookingError::Forbidden(
                "Bookings can only be made on behalf of users on turfs you own".to_string(),
            ));
        }

        self.user_repo
            .find_by_id(request.user_id)
            .await
            .map_err(auth_error)?
            .ok_or(BookingError::UserNotFound(request.user_id))?;

        self.create(BookingDraft {
            turf_id: request.turf_id,
            user_id: request.user_id,
            date: request.date,
            start: request.start_time,
            end: request.end_time,
            creator_id: admin_id,
            creator_role: Role::Admin,
        })
        .await
    }

    async fn create(&self, draft: BookingDraft) -> Result<Booking, BookingError> {
        let _timer = self.metrics.start_booking_creation();
        let offset = self.rules.venue_offset;
        let now = Utc::now();

        validate_interval(draft.date, draft.start, draft.end, offset)?;

        let turf = self
            .turf_repo
            .find_by_id(draft.turf_id)
            .await
            .map_err(turf_error)?
            .ok_or(BookingError::TurfNotFound(draft.turf_id))?;

        // The owning admin bypasses status, disable flag, length cap and window
        let by_turf_admin = draft.creator_role == Role::Admin && turf.is_owned_by(draft.creator_id);

        if !by_turf_admin && !turf.is_active() {
            return Err(BookingError::TurfNotActive(turf.status));
        }

        let policy = self.settings.policy(turf.id).await?;
        if !by_turf_admin && policy.booking_disabled {
            debug!("Booking refused, turf {} has bookings disabled", turf.id);
            return Err(BookingError::BookingsDisabled(policy.disabled_message()));
        }

        check_min_duration(draft.start, draft.end, self.rules.min_booking_hours)?;
        if !by_turf_admin {
            check_max_duration(draft.start, draft.end, policy.max_booking_hours)?;
            check_advance_window(draft.start, now, policy.advance_booking_days, offset)?;
        }

        OperatingHoursValidator::validate(
            turf.opening_time,
            turf.closing_time,
            draft.start,
            draft.end,
            offset,
        )?;

        if self
            .availability
            .has_overlap(turf.id, draft.date, draft.start, draft.end)
            .await?
        {
            return Err(BookingError::SlotTaken);
        }

        let price = self
            .pricing
            .calculate_price(turf.id, draft.start, draft.end)
            .await?;

        let created_by_name = self
            .user_repo
            .find_name(draft.creator_id)
            .await
            .map_err(auth_error)?
            .ok_or(BookingError::UserNotFound(draft.creator_id))?;

        let status = if by_turf_admin {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };

        let booking = self
            .repo
            .create_if_free(NewBooking {
                turf_id: turf.id,
                user_id: draft.user_id,
                booking_date: draft.date,
                start_time: draft.start,
                end_time: draft.end,
                price,
                status,
                created_by: draft.creator_id,
                created_by_name,
            })
            .await?;

        self.stats.invalidate(turf.owner_id).await;

        info!(
            "Booking {} created on turf {} for user {} ({}, {})",
            booking.id, booking.turf_id, booking.user_id, booking.status, booking.price
        );
        Ok(booking)
    }

    /// Cancel a booking
    ///
    /// The holder must respect the cancellation threshold; the turf's admin
    /// may cancel at any time. Cancelling twice is rejected and leaves
    /// `cancelled_at` as first written.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        actor_id: i32,
        actor_role: Role,
        reason: Option<String>,
    ) -> Result<Booking, BookingError> {
        let booking = self.find(booking_id).await?;
        let (access, owner_id) = self.authorize(&booking, actor_id, actor_role).await?;

        // Read before taking a pooled connection for the transaction
        let threshold = match access {
            Access::Holder => Some(
                self.settings
                    .policy(booking.turf_id)
                    .await?
                    .cancellation_deadline_hours
                    .unwrap_or(self.rules.cancel_hours_threshold),
            ),
            Access::TurfAdmin => None,
        };

        let mut tx = self.repo.pool().begin().await?;
        let current = BookingRepository::find_for_update(&mut *tx, booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;

        if current.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled);
        }
        StatusMachine::transition(current.status, BookingStatus::Cancelled)
            .map_err(BookingError::InvalidTransition)?;

        if let Some(threshold) = threshold {
            if !cancellation_allowed(current.start_time, Utc::now(), threshold) {
                return Err(BookingError::CancellationWindowClosed {
                    threshold_hours: threshold,
                });
            }
        }

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let cancelled =
            BookingRepository::mark_cancelled(&mut *tx, booking_id, reason.as_deref()).await?;
        tx.commit().await?;

        self.stats.invalidate(owner_id).await;

        info!(
            "Booking {} cancelled by {} {}",
            booking_id,
            if access == Access::TurfAdmin { "admin" } else { "user" },
            actor_id
        );
        Ok(cancelled)
    }

    /// Move a pending booking to confirmed
    pub async fn confirm(&self, booking_id: Uuid, admin_id: i32) -> Result<Booking, BookingError> {
        self.admin_transition(booking_id, admin_id, BookingStatus::Confirmed)
            .await
    }

    /// Mark a confirmed or active booking as completed
    pub async fn complete(&self, booking_id: Uuid, admin_id: i32) -> Result<Booking, BookingError> {
        self.admin_transition(booking_id, admin_id, BookingStatus::Completed)
            .await
    }

    async fn admin_transition(
        &self,
        booking_id: Uuid,
        admin_id: i32,
        to: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let booking = self.find(booking_id).await?;
        let owner_id = self.ensure_turf_admin(&booking, admin_id).await?;

        let mut tx = self.repo.pool().begin().await?;
        let current = BookingRepository::find_for_update(&mut *tx, booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;

        StatusMachine::transition(current.status, to).map_err(|msg| {
            warn!("Rejected transition on booking {}: {}", booking_id, msg);
            BookingError::InvalidTransition(msg)
        })?;

        let updated = BookingRepository::set_status(&mut *tx, booking_id, to).await?;
        tx.commit().await?;

        self.stats.invalidate(owner_id).await;

        info!("Booking {} moved {} -> {}", booking_id, current.status, to);
        Ok(updated)
    }

    /// Fetch a booking visible to the actor
    pub async fn get(
        &self,
        booking_id: Uuid,
        actor_id: i32,
        actor_role: Role,
    ) -> Result<Booking, BookingError> {
        let booking = self.find(booking_id).await?;
        self.authorize(&booking, actor_id, actor_role).await?;
        Ok(booking)
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
        query: UserBookingQuery,
    ) -> Result<Vec<Booking>, BookingError> {
        self.repo.list_for_user(user_id, &query).await
    }

    pub async fn list_for_admin(
        &self,
        admin_id: i32,
        query: AdminBookingQuery,
    ) -> Result<Vec<Booking>, BookingError> {
        self.repo.list_for_owner(admin_id, &query).await
    }

    async fn find(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        self.repo
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound(booking_id))
    }

    /// Resolve the actor's access and the turf owner's id
    ///
    /// An admin acting on their own turf gets admin access even for a booking
    /// they hold themselves.
    async fn authorize(
        &self,
        booking: &Booking,
        actor_id: i32,
        actor_role: Role,
    ) -> Result<(Access, i32), BookingError> {
        let owner_id = self
            .repo
            .find_turf_owner(booking.turf_id)
            .await?
            .ok_or(BookingError::TurfNotFound(booking.turf_id))?;

        if actor_role == Role::Admin && owner_id == actor_id {
            return Ok((Access::TurfAdmin, owner_id));
        }
        if booking.user_id == actor_id {
            return Ok((Access::Holder, owner_id));
        }

        Err(BookingError::Forbidden(
            "You do not have access to this booking".to_string(),
        ))
    }

    async fn ensure_turf_admin(&self, booking: &Booking, admin_id: i32) -> Result<i32, BookingError> {
        let owner_id = self
            .repo
            .find_turf_owner(booking.turf_id)
            .await?
            .ok_or(BookingError::TurfNotFound(booking.turf_id))?;

        if owner_id != admin_id {
            return Err(BookingError::Forbidden(
                "Only the turf's admin can change this booking".to_string(),
            ));
        }
        Ok(owner_id)
    }
}

fn auth_error(err: AuthError) -> BookingError {
    match err {
        AuthError::DatabaseError(e) => BookingError::DatabaseError(e),
        other => BookingError::ValidationError(other.to_string()),
    }
}

fn turf_error(err: crate::turfs::TurfError) -> BookingError {
    match err {
        crate::turfs::TurfError::DatabaseError(e) => BookingError::DatabaseError(e),
        crate::turfs::TurfError::NotFound(id) => BookingError::TurfNotFound(id),
        other => BookingError::ValidationError(other.to_string()),
    }
}
