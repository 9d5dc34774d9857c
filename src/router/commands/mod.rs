//! One handler per request.  Each takes exactly what it uses.

pub mod add;
pub mod change;
pub mod connect;
pub mod drop;
pub mod list;
pub mod lock;
pub mod remove;
