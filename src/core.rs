pub mod allocator;
pub mod error;
pub mod fuel;
pub mod pipeline;
pub mod price;
pub mod span;
pub mod tariff;
