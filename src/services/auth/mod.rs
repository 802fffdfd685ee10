pub mod cookies;
pub mod jwt;
pub mod login;
pub mod otp;
pub mod password;

pub use jwt::TokenService;
pub use login::LoginService;
