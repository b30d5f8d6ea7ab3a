pub mod audit;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod staff;
pub mod tickets;

pub use routes::create_router;
