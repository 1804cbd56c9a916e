mod breadcrumb;
mod check;
mod search;
mod sitemap;

pub use breadcrumb::cmd_breadcrumb;
pub use check::cmd_check;
pub use search::cmd_search;
pub use sitemap::cmd_sitemap;
