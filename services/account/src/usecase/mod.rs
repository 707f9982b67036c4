pub mod captcha;
pub mod deletion_request;
pub mod sweep;
pub mod verify;
