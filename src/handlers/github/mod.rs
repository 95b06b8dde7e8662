pub mod repos_handler;
pub mod star_handler;
pub mod starred_list_handler;

pub use repos_handler::repos_handler;
pub use star_handler::{StarError, star_handler};
pub use starred_list_handler::{StarredListError, starred_list_handler};
