pub mod top_customers;

pub use top_customers::{verify_top_customers, TopCustomersQuery};
