use super::sendmail::send_email;
use crate::config::Config;

pub async fn send_otp_email(
    config: &Config,
    to_email: &str,
    name: &str,
    otp: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = "Account Verification OTP";
    let body = format!(
        "<p>Hi {},</p>\
         <p>Your OTP code is: <strong>{}</strong></p>\
         <p>The code expires in 10 minutes.</p>",
        name, otp
    );

    send_email(config, to_email, subject, body).await
}

pub async fn send_welcome_email(
    config: &Config,
    to_email: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = "Welcome to TaskBridge";
    let body = format!(
        "<p>Hi {},</p>\
         <p>Your email has been verified and your account is ready to use.</p>",
        name
    );

    send_email(config, to_email, subject, body).await
}

pub async fn send_reset_password_email(
    config: &Config,
    to_email: &str,
    name: &str,
    reset_token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let subject = "Reset your Password";
    let reset_link = format!("{}/reset-password?token={}", config.app_url, reset_token);
    let body = format!(
        "<p>Hi {},</p>\
         <p>Click the link below to reset your password:</p>\
         <p><a href=\"{}\">{}</a></p>\
         <p>If you did not request this, you can ignore this email.</p>",
        name, reset_link, reset_link
    );

    send_email(config, to_email, subject, body).await
}
