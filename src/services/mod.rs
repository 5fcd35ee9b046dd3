pub mod directory;
pub mod email;
pub mod otp;
