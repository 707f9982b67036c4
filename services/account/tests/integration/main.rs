mod captcha_test;
mod deletion_request_test;
mod router_test;
mod verify_test;
