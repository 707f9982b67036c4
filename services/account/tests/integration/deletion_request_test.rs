use chrono::{Duration, Utc};

use meridian_account::domain::types::DeletionStatus;
use meridian_account::error::AccountServiceError;
use meridian_account::usecase::deletion_request::{
    CancelDeletionUseCase, GetDeletionUseCase, RequestDeletionUseCase,
};

use crate::helpers::{MockDeletionRepo, processing_request, scheduled_request, test_user_id};

// ── RequestDeletionUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_schedule_deletion_after_grace_period() {
    let deletions = MockDeletionRepo::empty();
    let requests = deletions.requests_handle();
    let usecase = RequestDeletionUseCase {
        deletions,
        grace_period: Duration::days(30),
    };

    let before = Utc::now();
    let request = usecase.execute(test_user_id()).await.unwrap();

    assert_eq!(request.status, DeletionStatus::Scheduled);
    assert_eq!(request.user_id, test_user_id());
    assert!(request.scheduled_for >= before + Duration::days(30));
    assert!(request.scheduled_for <= Utc::now() + Duration::days(30));
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_conflict_when_request_already_active() {
    let existing = scheduled_request(test_user_id(), Utc::now() + Duration::days(10));
    let usecase = RequestDeletionUseCase {
        deletions: MockDeletionRepo::new(vec![existing]),
        grace_period: Duration::days(30),
    };
    let result = usecase.execute(test_user_id()).await;
    assert!(matches!(
        result,
        Err(AccountServiceError::DeletionAlreadyRequested)
    ));
}

#[tokio::test]
async fn completed_request_does_not_block_a_new_one() {
    let mut done = scheduled_request(test_user_id(), Utc::now() - Duration::days(40));
    done.status = DeletionStatus::Completed;
    done.completed_at = Some(Utc::now() - Duration::days(39));
    let usecase = RequestDeletionUseCase {
        deletions: MockDeletionRepo::new(vec![done]),
        grace_period: Duration::days(30),
    };
    assert!(usecase.execute(test_user_id()).await.is_ok());
}

// ── GetDeletionUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_active_request() {
    let existing = scheduled_request(test_user_id(), Utc::now() + Duration::days(10));
    let id = existing.id;
    let usecase = GetDeletionUseCase {
        deletions: MockDeletionRepo::new(vec![existing]),
    };
    assert_eq!(usecase.execute(test_user_id()).await.unwrap().id, id);
}

#[tokio::test]
async fn should_return_not_found_without_request() {
    let usecase = GetDeletionUseCase {
        deletions: MockDeletionRepo::empty(),
    };
    let result = usecase.execute(test_user_id()).await;
    assert!(matches!(
        result,
        Err(AccountServiceError::DeletionRequestNotFound)
    ));
}

// ── CancelDeletionUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_cancel_scheduled_request() {
    let existing = scheduled_request(test_user_id(), Utc::now() + Duration::days(10));
    let deletions = MockDeletionRepo::new(vec![existing]);
    let requests = deletions.requests_handle();
    let usecase = CancelDeletionUseCase { deletions };

    usecase.execute(test_user_id()).await.unwrap();
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_to_cancel_processing_request() {
    let now = Utc::now();
    let running = processing_request(test_user_id(), now - Duration::days(1), now);
    let id = running.id;
    let deletions = MockDeletionRepo::new(vec![running]);
    let usecase = CancelDeletionUseCase { deletions };

    let result = usecase.execute(test_user_id()).await;
    assert!(matches!(result, Err(AccountServiceError::DeletionInProgress)));
    assert_eq!(
        usecase.deletions.get(id).status,
        DeletionStatus::Processing
    );
}

#[tokio::test]
async fn should_return_not_found_when_cancelling_nothing() {
    let usecase = CancelDeletionUseCase {
        deletions: MockDeletionRepo::empty(),
    };
    let result = usecase.execute(test_user_id()).await;
    assert!(matches!(
        result,
        Err(AccountServiceError::DeletionRequestNotFound)
    ));
}
