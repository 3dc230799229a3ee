pub mod handlers;
pub mod icons;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
