use super::*;
use crate::auth::Role;
use crate::bookings::{Booking, BookingStatus};
use crate::test_support::{
    booking_request, create_test_pool, create_turf, create_user, on_behalf_request, test_state,
};
use crate::AppState;
use uuid::Uuid;

/// A completed booking from yesterday held by `user` on a fresh turf
async fn completed_booking(state: &AppState, admin: i32, user: i32) -> Booking {
    let turf = create_turf(state, admin).await;
    let booking = state
        .booking_service
        .create_on_behalf(admin, on_behalf_request(user, turf.id, -1, 10, 1))
        .await
        .expect("Failed to create past booking");
    state
        .booking_service
        .complete(booking.id, admin)
        .await
        .expect("Failed to complete booking")
}

fn review_request(booking_id: Uuid, rating: i32) -> CreateReviewRequest {
    CreateReviewRequest {
        booking_id,
        rating,
        comment: Some("Great pitch, good lights".to_string()),
    }
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_review_success() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let booking = completed_booking(&state, admin, user).await;

    let review = state
        .review_service
        .create_review(user, review_request(booking.id, 5))
        .await
        .unwrap();

    assert_eq!(review.user_id, user);
    assert_eq!(review.booking_id, booking.id);
    assert_eq!(review.rating, 5);
    assert_eq!(review.comment.as_deref(), Some("Great pitch, good lights"));
}

#[tokio::test]
async fn test_blank_comment_is_stored_as_none() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let booking = completed_booking(&state, admin, user).await;

    let review = state
        .review_service
        .create_review(
            user,
            CreateReviewRequest {
                booking_id: booking.id,
                rating: 3,
                comment: Some("   ".to_string()),
            },
        )
        .await
        .unwrap();

    assert!(review.comment.is_none());
}

#[tokio::test]
async fn test_second_review_is_rejected() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let booking = completed_booking(&state, admin, user).await;

    state
        .review_service
        .create_review(user, review_request(booking.id, 4))
        .await
        .unwrap();
    let second = state
        .review_service
        .create_review(user, review_request(booking.id, 2))
        .await;

    assert!(matches!(second, Err(ReviewError::AlreadyReviewed)));
}

#[tokio::test]
async fn test_concurrent_reviews_store_one() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let booking = completed_booking(&state, admin, user).await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = state.review_service.clone();
            let request = review_request(booking.id, 4);
            tokio::spawn(async move { service.create_review(user, request).await })
        })
        .collect();

    let mut stored = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => stored += 1,
            Err(ReviewError::AlreadyReviewed) => {}
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn test_rating_out_of_range() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let booking = completed_booking(&state, admin, user).await;

    for rating in [0, 6, -1] {
        let result = state
            .review_service
            .create_review(user, review_request(booking.id, rating))
            .await;
        assert!(matches!(result, Err(ReviewError::InvalidRating(r)) if r == rating));
    }
}

// ============================================================================
// Eligibility
// ============================================================================

#[tokio::test]
async fn test_only_the_holder_can_review() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let stranger = create_user(&pool, Role::User).await;
    let booking = completed_booking(&state, admin, user).await;

    let result = state
        .review_service
        .create_review(stranger, review_request(booking.id, 5))
        .await;
    assert!(matches!(result, Err(ReviewError::Forbidden)));
}

#[tokio::test]
async fn test_future_booking_cannot_be_reviewed() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let turf = create_turf(&state, admin).await;

    let booking = state
        .booking_service
        .create_for_user(user, Role::User, booking_request(turf.id, 2, 10, 1))
        .await
        .unwrap();

    let result = state
        .review_service
        .create_review(user, review_request(booking.id, 5))
        .await;
    assert!(matches!(result, Err(ReviewError::NotYetCompleted)));
}

#[tokio::test]
async fn test_cancelled_booking_cannot_be_reviewed() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let turf = create_turf(&state, admin).await;

    let booking = state
        .booking_service
        .create_on_behalf(admin, on_behalf_request(user, turf.id, -2, 9, 1))
        .await
        .unwrap();
    state
        .booking_service
        .cancel(booking.id, admin, Role::Admin, None)
        .await
        .unwrap();

    let result = state
        .review_service
        .create_review(user, review_request(booking.id, 1))
        .await;
    assert!(matches!(
        result,
        Err(ReviewError::InvalidState(BookingStatus::Cancelled))
    ));
}

#[tokio::test]
async fn test_unknown_booking() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let user = create_user(&pool, Role::User).await;

    let result = state
        .review_service
        .create_review(user, review_request(Uuid::new_v4(), 5))
        .await;
    assert!(matches!(result, Err(ReviewError::BookingNotFound(_))));
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_get_for_booking_and_list_for_user() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let booking = completed_booking(&state, admin, user).await;

    assert!(matches!(
        state.review_service.get_for_booking(booking.id).await,
        Err(ReviewError::NotFound(_))
    ));

    let review = state
        .review_service
        .create_review(user, review_request(booking.id, 4))
        .await
        .unwrap();

    let fetched = state.review_service.get_for_booking(booking.id).await.unwrap();
    assert_eq!(fetched.id, review.id);

    let mine = state.review_service.list_for_user(user).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].booking_id, booking.id);
}

#[tokio::test]
async fn test_stats_for_one_turf() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let first = create_user(&pool, Role::User).await;
    let second = create_user(&pool, Role::User).await;
    let turf = create_turf(&state, admin).await;

    for (user, hour, rating) in [(first, 8, 5), (second, 12, 4)] {
        let booking = state
            .booking_service
            .create_on_behalf(admin, on_behalf_request(user, turf.id, -1, hour, 1))
            .await
            .unwrap();
        state.booking_service.complete(booking.id, admin).await.unwrap();
        state
            .review_service
            .create_review(user, review_request(booking.id, rating))
            .await
            .unwrap();
    }

    let stats = state.review_service.stats(Some(turf.id)).await.unwrap();
    assert_eq!(stats.total_reviews, 2);
    assert_eq!(stats.average_rating, 4.5);
    assert_eq!(stats.distribution[0], RatingBucket { rating: 5, count: 1 });
    assert_eq!(stats.distribution[1], RatingBucket { rating: 4, count: 1 });
    assert_eq!(stats.distribution[4], RatingBucket { rating: 1, count: 0 });

    let empty = state
        .review_service
        .stats(Some(Uuid::new_v4()))
        .await
        .unwrap();
    assert_eq!(empty.total_reviews, 0);
    assert_eq!(empty.average_rating, 0.0);
}
