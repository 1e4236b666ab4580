//! Static HTML bodies for the four notification emails.

const VERIFICATION_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Verify Your Email</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1>Verify Your Email</h1>
  <p>Hello,</p>
  <p>Thank you for signing up! Your verification code is:</p>
  <div style="text-align: center; font-size: 32px; font-weight: bold; letter-spacing: 5px; margin: 30px 0;">
    {verification_code}
  </div>
  <p>Enter this code on the verification page to complete your registration.</p>
  <p>This code will expire in 24 hours.</p>
  <p>If you didn't create an account with us, please ignore this email.</p>
</body>
</html>
"#;

const WELCOME_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Welcome</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1>Welcome aboard</h1>
  <p>Hello {name},</p>
  <p>Your email address has been verified and your account is ready to use.</p>
  <p>We're glad to have you with us.</p>
</body>
</html>
"#;

const PASSWORD_RESET_REQUEST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Reset Your Password</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1>Password Reset</h1>
  <p>Hello,</p>
  <p>We received a request to reset your password. If you didn't make this request, please ignore this email.</p>
  <p>To reset your password, click the button below:</p>
  <div style="text-align: center; margin: 30px 0;">
    <a href="{reset_url}" style="background: #333; color: white; padding: 12px 20px; text-decoration: none; border-radius: 5px; font-weight: bold;">Reset Password</a>
  </div>
  <p>This link will expire in 1 hour.</p>
</body>
</html>
"#;

const PASSWORD_RESET_SUCCESS_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Password Reset Successful</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1>Password Reset Successful</h1>
  <p>Hello,</p>
  <p>Your password has been successfully reset.</p>
  <p>If you did not initiate this password reset, please contact our support team immediately.</p>
</body>
</html>
"#;

pub fn verification_email(code: &str) -> String {
    VERIFICATION_EMAIL_TEMPLATE.replace("{verification_code}", code)
}

pub fn welcome_email(name: &str) -> String {
    WELCOME_EMAIL_TEMPLATE.replace("{name}", name)
}

pub fn password_reset_email(reset_url: &str) -> String {
    PASSWORD_RESET_REQUEST_TEMPLATE.replace("{reset_url}", reset_url)
}

pub fn reset_success_email() -> String {
    PASSWORD_RESET_SUCCESS_TEMPLATE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_embeds_code() {
        let html = verification_email("123456");
        assert!(html.contains("123456"));
        assert!(!html.contains("{verification_code}"));
    }

    #[test]
    fn welcome_email_embeds_name() {
        let html = welcome_email("Ann");
        assert!(html.contains("Hello Ann,"));
        assert!(!html.contains("{name}"));
    }

    #[test]
    fn password_reset_email_embeds_link() {
        let html = password_reset_email("http://localhost:5173/reset-password/abc123");
        assert!(html.contains("href=\"http://localhost:5173/reset-password/abc123\""));
        assert!(!html.contains("{reset_url}"));
    }
}
