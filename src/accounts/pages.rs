//! Standalone pages shown when a verification link is opened in a browser.

use crate::accounts::services::VerificationOutcome;

pub enum VerificationPage {
    Outcome(VerificationOutcome),
    Error,
}

impl VerificationPage {
    pub fn message(&self) -> &'static str {
        match self {
            VerificationPage::Outcome(VerificationOutcome::Verified) => {
                "Email verified successfully"
            }
            VerificationPage::Outcome(VerificationOutcome::AlreadyVerifiedOrInvalid) => {
                "Email already verified or invalid token"
            }
            VerificationPage::Error => "Something went wrong while verifying your email",
        }
    }

    pub fn render(&self) -> String {
        let (title, accent, detail) = match self {
            VerificationPage::Outcome(VerificationOutcome::Verified) => (
                "Email verified",
                "#16a34a",
                "Your email address is confirmed. You can return to the app and log in.",
            ),
            VerificationPage::Outcome(VerificationOutcome::AlreadyVerifiedOrInvalid) => (
                "Link no longer valid",
                "#d97706",
                "This link was already used or is not recognised. If you have verified before, just log in.",
            ),
            VerificationPage::Error => (
                "Verification failed",
                "#dc2626",
                "We could not verify your email right now. Please try the link again later.",
            ),
        };
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; margin: 0; }}
        .card {{ max-width: 480px; margin: 80px auto; background: #fff; border-radius: 8px; padding: 40px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); text-align: center; }}
        h1 {{ color: {accent}; font-size: 24px; margin-top: 0; }}
        p {{ color: #444; line-height: 1.6; }}
    </style>
</head>
<body>
    <div class="card">
        <h1>{title}</h1>
        <p>{detail}</p>
    </div>
</body>
</html>"#
        )
    }
}
