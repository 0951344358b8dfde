pub mod dispatcher;
pub mod refresher;

pub use dispatcher::RequestDispatcher;
pub use refresher::PersistentRefresher;
