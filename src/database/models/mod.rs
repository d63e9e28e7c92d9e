pub mod category;
pub mod item;
pub mod user;

pub use category::{Category, CategoryWithCount};
pub use item::{Item, ItemWithCategory};
pub use user::{User, UserProfile};
