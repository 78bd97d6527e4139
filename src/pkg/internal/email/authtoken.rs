use std::fmt::{self, Display};

use super::{send_email, SendEmail};

pub struct AuthnCodeTemplate<'a> {
    pub name: &'a str,
    pub code: &'a str,
}

impl<'a> Display for AuthnCodeTemplate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"
            <!DOCTYPE html>
            <html>
            <body style="font-family: sans-serif; background-color: #f9fafb; margin: 0; padding: 24px;">
                <div style="max-width: 480px; margin: 0 auto; background: #ffffff; border-radius: 8px; padding: 32px; text-align: center;">
                    <h2 style="color: #111827; margin-top: 0;">Hi {name}, here's your sign-in code</h2>
                    <div style="font-size: 32px; font-weight: bold; letter-spacing: 6px; color: #0d9488; margin: 24px 0;">{code}</div>
                    <p style="color: #4b5563; font-size: 14px;">
                        The code is valid for one hour and can be used once.
                    </p>
                    <p style="color: #dc2626; font-size: 12px;">
                        Never share this code. RiserJobs will not ask you for it.
                    </p>
                </div>
            </body>
            </html>
            "#,
            name = self.name,
            code = self.code,
        )
    }
}

impl<'a> SendEmail for AuthnCodeTemplate<'a> {
    fn send(&self, email: &str) -> crate::prelude::Result<()> {
        send_email(
            email,
            "Your RiserJobs sign-in code",
            &format!("{}", &self),
            true,
        )?;
        Ok(())
    }
}
