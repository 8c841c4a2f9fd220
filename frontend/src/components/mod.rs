// Reusable components live here.

pub mod error_banner;
pub mod forms;
pub mod icons;
pub mod layout;
pub mod overlay;
pub mod print_card;
pub mod stat_card;
pub mod tables;
