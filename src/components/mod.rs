pub mod breadcrumbs;
pub mod detail;
pub mod help;
pub mod listing;
pub mod search;
pub mod status_bar;
