use crate::domain::repository::CaptchaVerifier;
use crate::domain::types::ClientMeta;
use crate::error::AccountServiceError;

pub struct VerifyCaptchaUseCase<C: CaptchaVerifier> {
    pub verifier: C,
}

impl<C: CaptchaVerifier> VerifyCaptchaUseCase<C> {
    pub async fn execute(
        &self,
        token: Option<String>,
        client: &ClientMeta,
    ) -> Result<(), AccountServiceError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AccountServiceError::MissingFields)?;
        if self.verifier.verify(&token, client).await? {
            Ok(())
        } else {
            Err(AccountServiceError::CaptchaFailed)
        }
    }
}
