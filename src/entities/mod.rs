pub mod approval_history;
pub mod bulk_inventory;
pub mod dispatch_record;
pub mod notification;
pub mod packaged_inventory;
pub mod price_history;
pub mod product_price;
pub mod sales_request;
pub mod showroom;
pub mod stock_movement;
pub mod storage_location;
pub mod user;
