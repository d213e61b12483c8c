mod contact;
mod error;
mod middleware;
mod public;
mod revalidate;

pub use error::ApiError;
pub use public::{HttpState, build_router};
pub use revalidate::RevalidateResponse;
