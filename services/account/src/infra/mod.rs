pub mod captcha;
pub mod db;
pub mod identity;
pub mod mailer;
