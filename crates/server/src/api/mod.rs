pub mod accessories;
pub mod handlers;
pub mod middleware;
pub mod products;
pub mod routes;
pub mod ws;

pub use routes::create_router;
