mod log_repo;
mod request_repo;
mod user_repo;

pub use log_repo::LogRepo;
pub use request_repo::RequestRepo;
pub use user_repo::UserRepo;
