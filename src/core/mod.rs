pub mod category_registry;
pub mod clock;
pub mod semester_cache;
pub mod services;
pub mod session;
