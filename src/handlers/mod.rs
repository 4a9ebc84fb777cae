// Public handlers need no token; protected handlers sit behind the JWT
// middleware and, under /api/admin, /api/manager and /api/allocator, a role guard.
pub mod protected;
pub mod public;
