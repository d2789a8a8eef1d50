/// Fields of a fixture record as they are written into a key-value hash.
pub type HashFields = Vec<(String, String)>;

/// A fixture row that can be stored as a hash or as a relational row.
pub trait SampleRecord {
    /// Numeric id shared by the hash key suffix and the primary key column.
    fn id(&self) -> u32;

    /// Field/value pairs in the order they are written to the hash.
    fn hash_fields(&self) -> HashFields;
}

/// Demonstration user account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct User {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub role: &'static str,
    pub created: &'static str,
}

/// Demonstration catalog product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price: f64,
    pub category: &'static str,
    pub stock: u32,
}

/// Demonstration order linking a user to a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    pub id: u32,
    pub user_id: u32,
    pub product_id: u32,
    pub quantity: u32,
    pub status: &'static str,
    pub order_date: &'static str,
}

impl SampleRecord for User {
    fn id(&self) -> u32 {
        self.id
    }

    fn hash_fields(&self) -> HashFields {
        vec![
            field("id", self.id),
            field("name", self.name),
            field("email", self.email),
            field("role", self.role),
            field("created", self.created),
        ]
    }
}

impl SampleRecord for Product {
    fn id(&self) -> u32 {
        self.id
    }

    fn hash_fields(&self) -> HashFields {
        vec![
            field("id", self.id),
            field("name", self.name),
            field("price", format_price(self.price)),
            field("category", self.category),
            field("stock", self.stock),
        ]
    }
}

impl SampleRecord for Order {
    fn id(&self) -> u32 {
        self.id
    }

    fn hash_fields(&self) -> HashFields {
        vec![
            field("id", self.id),
            field("user_id", self.user_id),
            field("product_id", self.product_id),
            field("quantity", self.quantity),
            field("status", self.status),
            field("order_date", self.order_date),
        ]
    }
}

/// Formats a price with two decimals, matching the DECIMAL(10, 2) column.
#[must_use]
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

fn field(name: &str, value: impl ToString) -> (String, String) {
    (name.to_string(), value.to_string())
}

pub const USERS: [User; 5] = [
    User { id: 1, name: "Alice Johnson", email: "alice@example.com", role: "admin", created: "2024-01-15" },
    User { id: 2, name: "Bob Smith", email: "bob@example.com", role: "developer", created: "2024-02-20" },
    User { id: 3, name: "Carol Williams", email: "carol@example.com", role: "analyst", created: "2024-03-10" },
    User { id: 4, name: "David Brown", email: "david@example.com", role: "developer", created: "2024-04-05" },
    User { id: 5, name: "Eve Davis", email: "eve@example.com", role: "manager", created: "2024-05-12" },
];

pub const PRODUCTS: [Product; 5] = [
    Product { id: 1, name: "Laptop Pro", price: 1299.99, category: "electronics", stock: 50 },
    Product { id: 2, name: "Wireless Mouse", price: 49.99, category: "accessories", stock: 200 },
    Product { id: 3, name: "USB-C Hub", price: 79.99, category: "accessories", stock: 150 },
    Product { id: 4, name: "Monitor 27\"", price: 399.99, category: "electronics", stock: 75 },
    Product { id: 5, name: "Mechanical Keyboard", price: 129.99, category: "accessories", stock: 100 },
];

pub const ORDERS: [Order; 5] = [
    Order { id: 1, user_id: 1, product_id: 1, quantity: 1, status: "completed", order_date: "2024-06-01" },
    Order { id: 2, user_id: 2, product_id: 2, quantity: 2, status: "shipped", order_date: "2024-06-15" },
    Order { id: 3, user_id: 3, product_id: 4, quantity: 1, status: "processing", order_date: "2024-06-20" },
    Order { id: 4, user_id: 1, product_id: 3, quantity: 3, status: "completed", order_date: "2024-06-25" },
    Order { id: 5, user_id: 5, product_id: 5, quantity: 1, status: "pending", order_date: "2024-06-28" },
];
