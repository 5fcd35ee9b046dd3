use std::path::Path;
use std::sync::Arc;

use crate::services::directory::UserDirectory;
use crate::services::email::EmailService;
use crate::services::otp::OtpLedger;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<UserDirectory>,
    pub otp_ledger: Arc<OtpLedger>,
    pub mailer: Option<Arc<EmailService>>,
}

impl AppState {
    pub fn new(data_dir: &Path) -> Self {
        let directory = Arc::new(UserDirectory::new(data_dir));
        let otp_ledger = Arc::new(OtpLedger::new(data_dir, Arc::clone(&directory)));

        AppState {
            directory,
            otp_ledger,
            mailer: None,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<EmailService>) -> Self {
        self.mailer = Some(mailer);
        self
    }
}
