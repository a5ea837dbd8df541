pub mod handlers;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod search;

pub use routes::create_router;
