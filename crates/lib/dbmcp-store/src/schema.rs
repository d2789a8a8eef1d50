/// A logical sample table shared by both adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTable {
    /// Logical table name, also the relational table name.
    pub name: &'static str,
    /// Key-value key prefix; keys look like `{prefix}:{id}`.
    pub key_prefix: &'static str,
    pub description: &'static str,
}

impl SampleTable {
    /// Glob pattern matching every key of the table.
    #[must_use]
    pub fn key_pattern(&self) -> String {
        format!("{}:*", self.key_prefix)
    }

    #[must_use]
    pub fn key_for(&self, id: u32) -> String {
        format!("{}:{id}", self.key_prefix)
    }

    #[must_use]
    pub fn sample_key(&self) -> String {
        self.key_for(1)
    }
}

pub const TABLE_USERS: SampleTable = SampleTable {
    name: "users",
    key_prefix: "user",
    description: "User accounts with name, email, role",
};

pub const TABLE_PRODUCTS: SampleTable = SampleTable {
    name: "products",
    key_prefix: "product",
    description: "Product catalog with name, price, category, stock",
};

pub const TABLE_ORDERS: SampleTable = SampleTable {
    name: "orders",
    key_prefix: "order",
    description: "Customer orders linking users and products",
};

pub const SAMPLE_TABLES: [SampleTable; 3] = [TABLE_USERS, TABLE_PRODUCTS, TABLE_ORDERS];

/// Looks up a sample table by its logical name.
#[must_use]
pub fn find_table(name: &str) -> Option<&'static SampleTable> {
    SAMPLE_TABLES.iter().find(|table| table.name == name)
}

/// Comma separated list of the valid logical table names.
#[must_use]
pub fn table_names() -> String {
    SAMPLE_TABLES
        .iter()
        .map(|table| table.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drop order respects the foreign keys between the tables.
pub const DROP_ORDER: [&str; 3] = ["orders", "products", "users"];

pub const DDL_USERS: &str = "CREATE TABLE users (
    id INT PRIMARY KEY,
    name VARCHAR(100),
    email VARCHAR(100),
    role VARCHAR(50),
    created_at DATE
)";

pub const DDL_PRODUCTS: &str = "CREATE TABLE products (
    id INT PRIMARY KEY,
    name VARCHAR(100),
    price DECIMAL(10, 2),
    category VARCHAR(50),
    stock INT
)";

pub const DDL_ORDERS: &str = "CREATE TABLE orders (
    id INT PRIMARY KEY,
    user_id INT REFERENCES users(id),
    product_id INT REFERENCES products(id),
    quantity INT,
    status VARCHAR(50),
    order_date DATE
)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        assert_eq!(find_table("orders"), Some(&TABLE_ORDERS));
        assert_eq!(find_table("Orders"), None);
        assert_eq!(find_table("bogus"), None);
    }

    #[test]
    fn key_layout() {
        assert_eq!(TABLE_USERS.key_pattern(), "user:*");
        assert_eq!(TABLE_PRODUCTS.sample_key(), "product:1");
        assert_eq!(table_names(), "users, products, orders");
    }
}
