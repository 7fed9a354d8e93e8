pub mod brands;
pub mod items;
pub mod parts;
pub mod purchase_orders;
pub mod suppliers;
