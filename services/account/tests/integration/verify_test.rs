use uuid::Uuid;

use meridian_account::domain::types::{ClientMeta, CodeKind, FailureReason};
use meridian_account::error::AccountServiceError;
use meridian_account::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

use crate::helpers::{
    MockAttemptRepo, MockTwoFactorRepo, current_totp, stale_totp, test_credential, test_user_id,
};

fn input(user_id: Uuid, code: &str, kind: Option<&str>) -> VerifyCodeInput {
    VerifyCodeInput {
        user_id: Some(user_id.to_string()),
        code: Some(code.to_owned()),
        kind: kind.map(str::to_owned),
        client: ClientMeta::default(),
    }
}

// ── TOTP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_current_totp_and_record_success() {
    let user_id = test_user_id();
    let credentials = MockTwoFactorRepo::new(vec![test_credential(user_id)]);
    let last_verified = credentials.last_verified_handle();
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();

    let usecase = VerifyCodeUseCase {
        credentials,
        attempts,
    };
    let output = usecase
        .execute(input(user_id, &current_totp(), None))
        .await
        .unwrap();

    assert_eq!(output.kind, CodeKind::Totp);
    assert!(last_verified.lock().unwrap().contains_key(&user_id));
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].success);
    assert_eq!(log[0].failure_reason, None);
    assert_eq!(log[0].kind, CodeKind::Totp);
}

#[tokio::test]
async fn should_reject_wrong_totp_and_record_invalid_code() {
    let user_id = test_user_id();
    let credentials = MockTwoFactorRepo::new(vec![test_credential(user_id)]);
    let last_verified = credentials.last_verified_handle();
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();

    let usecase = VerifyCodeUseCase {
        credentials,
        attempts,
    };
    let result = usecase
        .execute(input(user_id, &stale_totp(), Some("totp")))
        .await;

    assert!(matches!(result, Err(AccountServiceError::InvalidCode)));
    assert!(last_verified.lock().unwrap().is_empty());
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert!(!log[0].success);
    assert_eq!(log[0].failure_reason, Some(FailureReason::InvalidCode));
}

#[tokio::test]
async fn should_return_not_found_and_record_attempt_without_setup() {
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();

    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::empty(),
        attempts,
    };
    let result = usecase
        .execute(input(test_user_id(), "123456", None))
        .await;

    assert!(matches!(result, Err(AccountServiceError::TwoFactorNotFound)));
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].failure_reason, Some(FailureReason::NoSetup));
    assert_eq!(log[0].failure_reason.unwrap().as_str(), "no 2FA setup found");
}

#[tokio::test]
async fn should_treat_disabled_credential_as_absent() {
    let user_id = test_user_id();
    let mut credential = test_credential(user_id);
    credential.enabled = false;

    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::new(vec![credential]),
        attempts: MockAttemptRepo::new(),
    };
    let result = usecase.execute(input(user_id, &current_totp(), None)).await;
    assert!(matches!(result, Err(AccountServiceError::TwoFactorNotFound)));
}

// ── Input validation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_non_digit_totp_before_storage_access() {
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();

    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::new(vec![test_credential(test_user_id())]),
        attempts,
    };
    let result = usecase
        .execute(input(test_user_id(), "12a456", Some("totp")))
        .await;

    assert!(matches!(result, Err(AccountServiceError::InvalidCodeFormat)));
    assert!(log.lock().unwrap().is_empty(), "validation errors leave no attempt row");
}

#[tokio::test]
async fn should_reject_missing_fields() {
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::empty(),
        attempts,
    };

    let no_user = VerifyCodeInput {
        user_id: None,
        code: Some("123456".to_owned()),
        kind: None,
        client: ClientMeta::default(),
    };
    assert!(matches!(
        usecase.execute(no_user).await,
        Err(AccountServiceError::MissingFields)
    ));

    let empty_code = VerifyCodeInput {
        user_id: Some(test_user_id().to_string()),
        code: Some(String::new()),
        kind: None,
        client: ClientMeta::default(),
    };
    assert!(matches!(
        usecase.execute(empty_code).await,
        Err(AccountServiceError::MissingFields)
    ));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_unsupported_type() {
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::empty(),
        attempts: MockAttemptRepo::new(),
    };
    let result = usecase
        .execute(input(test_user_id(), "123456", Some("sms")))
        .await;
    assert!(matches!(result, Err(AccountServiceError::UnsupportedCodeType)));
}

#[tokio::test]
async fn should_reject_lowercase_backup_code() {
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::empty(),
        attempts: MockAttemptRepo::new(),
    };
    let result = usecase
        .execute(input(test_user_id(), "ab12-cd34-ef56", Some("backup")))
        .await;
    assert!(matches!(result, Err(AccountServiceError::InvalidCodeFormat)));
}

#[tokio::test]
async fn should_reject_non_uuid_user_id() {
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::empty(),
        attempts,
    };
    let result = usecase
        .execute(VerifyCodeInput {
            user_id: Some("user-1".to_owned()),
            code: Some("123456".to_owned()),
            kind: None,
            client: ClientMeta::default(),
        })
        .await;
    assert!(matches!(result, Err(AccountServiceError::InvalidUserId)));
    assert!(log.lock().unwrap().is_empty());
}

// ── Backup codes ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redeem_backup_code_exactly_once() {
    let user_id = test_user_id();
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::new(vec![test_credential(user_id)])
            .with_backup_codes(user_id, &["AB12-CD34-EF56"]),
        attempts,
    };

    let first = usecase
        .execute(input(user_id, "AB12-CD34-EF56", Some("backup")))
        .await
        .unwrap();
    assert_eq!(first.kind, CodeKind::Backup);

    let second = usecase
        .execute(input(user_id, "AB12-CD34-EF56", Some("backup")))
        .await;
    assert!(matches!(second, Err(AccountServiceError::InvalidCode)));

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert!(log[0].success);
    assert_eq!(log[1].failure_reason, Some(FailureReason::InvalidCode));
    assert_eq!(log[1].kind, CodeKind::Backup);
}

#[tokio::test]
async fn should_keep_other_backup_codes_after_redemption() {
    let user_id = test_user_id();
    let credentials = MockTwoFactorRepo::new(vec![test_credential(user_id)])
        .with_backup_codes(user_id, &["AAAA-BBBB-CCCC", "DDDD-EEEE-FFFF"]);
    let rows = credentials.backup_codes_handle();
    let usecase = VerifyCodeUseCase {
        credentials,
        attempts: MockAttemptRepo::new(),
    };

    usecase
        .execute(input(user_id, "AAAA-BBBB-CCCC", Some("backup")))
        .await
        .unwrap();

    assert_eq!(rows.lock().unwrap().len(), 1);
    usecase
        .execute(input(user_id, "DDDD-EEEE-FFFF", Some("backup")))
        .await
        .unwrap();
    assert!(rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_redemptions_of_one_code_succeed_once() {
    let user_id = test_user_id();
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::new(vec![test_credential(user_id)])
            .with_backup_codes(user_id, &["ZZZZ-9999-ZZZZ"]),
        attempts: MockAttemptRepo::new(),
    };

    let (a, b) = tokio::join!(
        usecase.execute(input(user_id, "ZZZZ-9999-ZZZZ", Some("backup"))),
        usecase.execute(input(user_id, "ZZZZ-9999-ZZZZ", Some("backup"))),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn should_not_redeem_another_users_backup_code() {
    let user_id = test_user_id();
    let other = Uuid::parse_str("00000000-0000-0000-0000-000000000099").unwrap();
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::new(vec![test_credential(user_id)])
            .with_backup_codes(other, &["AB12-CD34-EF56"]),
        attempts: MockAttemptRepo::new(),
    };
    let result = usecase
        .execute(input(user_id, "AB12-CD34-EF56", Some("backup")))
        .await;
    assert!(matches!(result, Err(AccountServiceError::InvalidCode)));
}

#[tokio::test]
async fn consumed_backup_code_is_audited_even_if_touch_fails() {
    let user_id = test_user_id();
    let credentials = MockTwoFactorRepo::new(vec![test_credential(user_id)])
        .with_backup_codes(user_id, &["AB12-CD34-EF56"])
        .failing_touch();
    let rows = credentials.backup_codes_handle();
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();
    let usecase = VerifyCodeUseCase {
        credentials,
        attempts,
    };

    let result = usecase
        .execute(input(user_id, "AB12-CD34-EF56", Some("backup")))
        .await;

    assert!(matches!(result, Err(AccountServiceError::Internal(_))));
    assert!(rows.lock().unwrap().is_empty());
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].success);
    assert_eq!(log[0].kind, CodeKind::Backup);
}

// ── Audit log ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_record_client_metadata() {
    let user_id = test_user_id();
    let attempts = MockAttemptRepo::new();
    let log = attempts.attempts_handle();
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::new(vec![test_credential(user_id)]),
        attempts,
    };
    let client = ClientMeta {
        ip_address: Some("203.0.113.7".to_owned()),
        user_agent: Some("Mozilla/5.0".to_owned()),
    };
    usecase
        .execute(VerifyCodeInput {
            client: client.clone(),
            ..input(user_id, &current_totp(), None)
        })
        .await
        .unwrap();

    assert_eq!(log.lock().unwrap()[0].client, client);
}

#[tokio::test]
async fn should_surface_audit_write_failure_as_internal() {
    let user_id = test_user_id();
    let usecase = VerifyCodeUseCase {
        credentials: MockTwoFactorRepo::new(vec![test_credential(user_id)]),
        attempts: MockAttemptRepo::failing(),
    };
    let result = usecase.execute(input(user_id, &current_totp(), None)).await;
    assert!(matches!(result, Err(AccountServiceError::Internal(_))));
}
