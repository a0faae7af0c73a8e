//! Entity module - Contains all SeaORM entity definitions for the backing store.
//! Each entity is one named collection: orders, menu entries, requesters,
//! administrators and announcements. Each has a Model struct for data and an
//! Entity struct for operations.

pub mod administrator;
pub mod announcement;
pub mod menu_entry;
pub mod order;
pub mod requester;

// Re-export specific types to avoid conflicts
pub use administrator::{
    AdminRole, Column as AdministratorColumn, Entity as Administrator,
    Model as AdministratorModel,
};
pub use announcement::{
    Column as AnnouncementColumn, Entity as Announcement, Model as AnnouncementModel,
};
pub use menu_entry::{
    Column as MenuEntryColumn, Entity as MenuEntry, MenuCategory, Model as MenuEntryModel,
};
pub use order::{
    Column as OrderColumn, Entity as Order, LineItem, LineItems, Model as OrderModel,
    OrderStatus,
};
pub use requester::{Column as RequesterColumn, Entity as Requester, Model as RequesterModel};
