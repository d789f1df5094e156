pub mod category;
pub mod seed;
pub mod shipping_zone;
