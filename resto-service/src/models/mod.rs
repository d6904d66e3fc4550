pub mod audit;
pub mod menu;
pub mod order;
pub mod payment;
pub mod preparation;
pub mod role;
pub mod table;
pub mod user;

pub use audit::Audit;
pub use menu::MenuItem;
pub use order::{Order, OrderItem, OrderStatus, OrderWithItems};
pub use payment::{Invoice, Payment, PaymentMethod};
pub use preparation::Preparation;
pub use role::Role;
pub use table::{DiningTable, TableStatus};
pub use user::User;
