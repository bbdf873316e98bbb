//! The data-source collaborator: where source operators get their tables.

use crate::canvas::SourceConfig;
use crate::error::ExecuteError;
use crate::row;
use crate::table::Table;

/// Resolves a source operator's descriptor to a table.
///
/// Real deployments would back this with a database or file reader; the
/// executor only cares that it yields a [`Table`]. Implementations must not
/// apply the operator's column projection, the executor does that itself.
pub trait TableProvider {
    fn fetch(&self, operator_id: &str, config: &SourceConfig) -> Result<Table, ExecuteError>;
}

/// A built-in provider serving small fixed demo tables, keyed by table name.
///
/// `customers` is the default when the descriptor names nothing or names an
/// unknown table, so a half-configured canvas still previews something.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleProvider;

impl SampleProvider {
    pub fn new() -> Self {
        Self
    }

    fn customers() -> Table {
        Table::named(
            "customers",
            vec![
                "id".into(),
                "name".into(),
                "email".into(),
                "age".into(),
                "city".into(),
                "country".into(),
            ],
            vec![
                row!("id" => 1i64, "name" => "John Doe", "email" => "john.doe@example.com",
                     "age" => 30i64, "city" => "New York", "country" => "USA"),
                row!("id" => 2i64, "name" => "Jane Smith", "email" => "jane.smith@example.com",
                     "age" => 25i64, "city" => "Los Angeles", "country" => "USA"),
                row!("id" => 3i64, "name" => "Alice Johnson", "email" => "alice.johnson@example.com",
                     "age" => 28i64, "city" => "London", "country" => "UK"),
                row!("id" => 4i64, "name" => "Bob Williams", "email" => "bob.williams@example.com",
                     "age" => 35i64, "city" => "Paris", "country" => "France"),
                row!("id" => 5i64, "name" => "Charlie Brown", "email" => "charlie.brown@example.com",
                     "age" => 22i64, "city" => "Tokyo", "country" => "Japan"),
            ],
        )
    }

    fn orders() -> Table {
        Table::named(
            "orders",
            vec![
                "order_id".into(),
                "customer_id".into(),
                "product".into(),
                "amount".into(),
                "date".into(),
            ],
            vec![
                row!("order_id" => 101i64, "customer_id" => 1i64, "product" => "Laptop",
                     "amount" => 999i64, "date" => "2023-06-15"),
                row!("order_id" => 102i64, "customer_id" => 2i64, "product" => "Phone",
                     "amount" => 699i64, "date" => "2023-07-23"),
                row!("order_id" => 103i64, "customer_id" => 3i64, "product" => "Headphones",
                     "amount" => 149i64, "date" => "2023-08-10"),
                row!("order_id" => 104i64, "customer_id" => 1i64, "product" => "Monitor",
                     "amount" => 329i64, "date" => "2023-09-02"),
            ],
        )
    }

    fn feedback() -> Table {
        Table::named(
            "feedback",
            vec!["id".into(), "comment".into()],
            vec![
                row!("id" => 1i64, "comment" => "I absolutely love this product! Best purchase ever."),
                row!("id" => 2i64, "comment" => "The service was average but the staff was friendly."),
                row!("id" => 3i64, "comment" => "Terrible experience, would not recommend to anyone."),
            ],
        )
    }
}

impl TableProvider for SampleProvider {
    fn fetch(&self, _operator_id: &str, config: &SourceConfig) -> Result<Table, ExecuteError> {
        let table = match config.table.as_deref() {
            Some("orders") => Self::orders(),
            Some("feedback") => Self::feedback(),
            _ => Self::customers(),
        };
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_falls_back_to_customers() {
        let provider = SampleProvider::new();
        let config = SourceConfig {
            table: Some("does_not_exist".into()),
            ..Default::default()
        };
        let table = provider.fetch("op", &config).unwrap();
        assert_eq!(table.name.as_deref(), Some("customers"));
        assert_eq!(table.row_count(), 5);
    }

    #[test]
    fn orders_table_is_served_by_name() {
        let provider = SampleProvider::new();
        let config = SourceConfig {
            table: Some("orders".into()),
            ..Default::default()
        };
        let table = provider.fetch("op", &config).unwrap();
        assert_eq!(table.columns[0], "order_id");
        assert_eq!(table.row_count(), 4);
    }
}
