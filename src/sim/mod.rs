pub mod clock;
pub mod event;
pub mod session;
pub mod turn;
