//! Reusable view components.

pub mod data_table;
pub mod layout;

pub use data_table::{
    DataTableConfig, TableColumn, products_table_config, sales_table_config, users_table_config,
};
pub use layout::{Chrome, NavLink, NotificationView, Page, time_ago};
