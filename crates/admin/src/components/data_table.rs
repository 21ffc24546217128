//! Data table component types.
//!
//! Describe the header, search box and empty state of the list pages. The
//! rows themselves are rendered by each page's template.

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: &'static str,
    /// Display label for the column header.
    pub label: &'static str,
    /// Right-align numeric cells.
    pub numeric: bool,
}

impl TableColumn {
    /// Create a text column.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: false,
        }
    }

    /// Create a right-aligned numeric column.
    #[must_use]
    pub const fn numeric(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: true,
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTableConfig {
    /// Unique table identifier, used as the DOM id.
    pub table_id: &'static str,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Page the search form submits to.
    pub search_action: &'static str,
    /// Search placeholder text.
    pub search_placeholder: &'static str,
    /// Title for empty state.
    pub empty_title: &'static str,
    /// Description for empty state.
    pub empty_description: Option<&'static str>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub const fn new(table_id: &'static str, search_action: &'static str) -> Self {
        Self {
            table_id,
            columns: Vec::new(),
            search_action,
            search_placeholder: "Search...",
            empty_title: "No items found",
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub const fn search_placeholder(mut self, placeholder: &'static str) -> Self {
        self.search_placeholder = placeholder;
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub const fn empty_state(mut self, title: &'static str, description: Option<&'static str>) -> Self {
        self.empty_title = title;
        self.empty_description = description;
        self
    }

    /// Number of columns including the trailing actions column.
    #[must_use]
    pub fn span(&self) -> usize {
        self.columns.len() + 1
    }
}

/// Build the products table configuration.
#[must_use]
pub fn products_table_config() -> DataTableConfig {
    DataTableConfig::new("products", "/products")
        .column(TableColumn::new("name", "Product"))
        .column(TableColumn::new("sku", "SKU"))
        .column(TableColumn::new("category", "Category"))
        .column(TableColumn::numeric("stock", "Stock"))
        .column(TableColumn::numeric("price", "Price"))
        .column(TableColumn::new("supplier", "Supplier"))
        .search_placeholder("Search products by name, SKU, or category...")
        .empty_state("No products found", Some("Try a different search term"))
}

/// Build the users table configuration.
#[must_use]
pub fn users_table_config() -> DataTableConfig {
    DataTableConfig::new("users", "/users")
        .column(TableColumn::new("name", "User"))
        .column(TableColumn::new("role", "Role"))
        .column(TableColumn::new("created", "Created"))
        .column(TableColumn::new("last_login", "Last login"))
        .search_placeholder("Search users by name, email, or role...")
        .empty_state("No users found", None)
}

/// Build the sales table configuration.
#[must_use]
pub fn sales_table_config() -> DataTableConfig {
    DataTableConfig::new("sales", "/sales")
        .column(TableColumn::new("date", "Date"))
        .column(TableColumn::new("product", "Product"))
        .column(TableColumn::numeric("quantity", "Qty"))
        .column(TableColumn::numeric("unit_price", "Unit price"))
        .column(TableColumn::numeric("total", "Total"))
        .column(TableColumn::new("cashier", "Recorded by"))
        .search_placeholder("Search sales by product...")
        .empty_state("No sales recorded", None)
}
