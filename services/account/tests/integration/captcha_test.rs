use meridian_account::domain::types::ClientMeta;
use meridian_account::error::AccountServiceError;
use meridian_account::usecase::captcha::VerifyCaptchaUseCase;

use crate::helpers::MockCaptcha;

fn client() -> ClientMeta {
    ClientMeta {
        ip_address: Some("198.51.100.4".to_owned()),
        user_agent: None,
    }
}

#[tokio::test]
async fn should_pass_accepted_token() {
    let verifier = MockCaptcha::accepting();
    let seen = verifier.seen_handle();
    let usecase = VerifyCaptchaUseCase { verifier };

    usecase
        .execute(Some("tok-123".to_owned()), &client())
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "tok-123");
    assert_eq!(seen[0].1.ip_address.as_deref(), Some("198.51.100.4"));
}

#[tokio::test]
async fn should_reject_missing_token_without_calling_provider() {
    let verifier = MockCaptcha::accepting();
    let seen = verifier.seen_handle();
    let usecase = VerifyCaptchaUseCase { verifier };

    for token in [None, Some(String::new()), Some("   ".to_owned())] {
        let result = usecase.execute(token, &client()).await;
        assert!(matches!(result, Err(AccountServiceError::MissingFields)));
    }
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_fail_rejected_token() {
    let usecase = VerifyCaptchaUseCase {
        verifier: MockCaptcha::rejecting(),
    };
    let result = usecase.execute(Some("bad".to_owned()), &client()).await;
    assert!(matches!(result, Err(AccountServiceError::CaptchaFailed)));
}

#[tokio::test]
async fn should_surface_provider_outage_as_internal() {
    let usecase = VerifyCaptchaUseCase {
        verifier: MockCaptcha::unavailable(),
    };
    let result = usecase.execute(Some("tok".to_owned()), &client()).await;
    assert!(matches!(result, Err(AccountServiceError::Internal(_))));
}
