pub mod chart;
pub mod pagination;

pub use chart::{generate_y_axis, RevenueChart, YAxis};
pub use pagination::{generate_pagination, PageToken};
