pub mod callback_handler;
pub mod is_logged_handler;
pub mod login_handler;

pub use callback_handler::{CallbackOutcome, callback_handler};
pub use is_logged_handler::is_logged_handler;
pub use login_handler::login_handler;
