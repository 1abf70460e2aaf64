//! Data table component types.
//!
//! Column sets for the admin list pages. Templates render headers from
//! `columns` and the empty state when there are no rows.

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Right-align the column (numbers and money).
    pub numeric: bool,
}

impl TableColumn {
    /// Create a new left-aligned column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
        }
    }

    /// Create a new right-aligned column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Icon for empty state.
    pub empty_icon: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            empty_icon: "ph-list".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, icon: &str, title: &str, description: Option<&str>) -> Self {
        self.empty_icon = icon.to_string();
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Number of columns, for `colspan` on full-width rows.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Build the products table configuration.
#[must_use]
pub fn products_table_config() -> DataTableConfig {
    DataTableConfig::new("products")
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::numeric("price", "Price"))
        .column(TableColumn::new("category", "Category"))
        .column(TableColumn::new("brand", "Brand"))
        .column(TableColumn::numeric("stock", "Stock"))
        .column(TableColumn::numeric("rating", "Rating"))
        .empty_state(
            "ph-package",
            "No products yet",
            Some("Create one through the products API"),
        )
}

/// Build the users table configuration.
#[must_use]
pub fn users_table_config() -> DataTableConfig {
    DataTableConfig::new("users")
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("admin", "Admin"))
        .column(TableColumn::new("created", "Joined"))
        .empty_state("ph-users", "No users yet", None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_table_columns() {
        let config = products_table_config();
        let keys: Vec<&str> = config.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            ["id", "name", "price", "category", "brand", "stock", "rating"]
        );
        assert_eq!(config.column_count(), 7);
        assert!(config.columns.iter().any(|c| c.key == "price" && c.numeric));
    }

    #[test]
    fn test_users_table_empty_state() {
        let config = users_table_config();
        assert_eq!(config.table_id, "users");
        assert_eq!(config.empty_title, "No users yet");
        assert!(config.empty_description.is_none());
    }
}
