pub mod brand;
pub mod item;
pub mod part;
pub mod part_model;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod stock;
pub mod supplier;
