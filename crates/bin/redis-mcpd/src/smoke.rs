use dbmcp_core::store::KeyValueStore;
use dbmcp_mcp::{
    HashSetParams, KeyParams, KeysParams, Parameters, QueryTableParams, RedisMcp, SetParams,
    response_text,
};
use rmcp::ErrorData;

fn section(title: &str) {
    let rule = "=".repeat(50);
    println!("\n{rule}\n {title}\n{rule}");
}

fn key(key: &str) -> Parameters<KeyParams> {
    Parameters(KeyParams {
        key: key.to_string(),
    })
}

fn hset(key: &str, field: &str, value: &str) -> Parameters<HashSetParams> {
    Parameters(HashSetParams {
        key: key.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn table(name: &str) -> Parameters<QueryTableParams> {
    Parameters(QueryTableParams {
        table_name: name.to_string(),
    })
}

/// Runs each tool once in a fixed order; `false` when the store is unreachable.
pub async fn run<S: KeyValueStore>(server: &RedisMcp<S>) -> Result<bool, ErrorData> {
    println!("\n[TEST] Redis MCP Server - smoke test\n");

    section("1. Connection Status");
    let status = server.redis_connection_status().await?;
    println!("{}", response_text(&status));
    if response_text(&status).contains("disconnected") {
        return Ok(false);
    }

    section("2. Basic SET/GET Operations");
    let set = server
        .redis_set(Parameters(SetParams {
            key: "test:hello".to_string(),
            value: "world".to_string(),
            expire_seconds: None,
        }))
        .await?;
    println!("SET: {}", response_text(&set));
    println!("GET: {}", response_text(&server.redis_get(key("test:hello")).await?));
    println!("DELETE: {}", response_text(&server.redis_delete(key("test:hello")).await?));
    println!(
        "GET (after delete): {}",
        response_text(&server.redis_get(key("test:hello")).await?)
    );

    section("3. Hash Operations");
    let name = server.redis_hset(hset("test:user", "name", "Test User")).await?;
    println!("HSET: {}", response_text(&name));
    let email = server
        .redis_hset(hset("test:user", "email", "test@example.com"))
        .await?;
    println!("HSET: {}", response_text(&email));
    println!("HGETALL: {}", response_text(&server.redis_hgetall(key("test:user")).await?));
    server.redis_delete(key("test:user")).await?;

    section("4. List Keys");
    println!("All keys matching 'user:*':");
    let keys = server
        .redis_keys(Parameters(KeysParams {
            pattern: Some("user:*".to_string()),
        }))
        .await?;
    println!("{}", response_text(&keys));

    section("5. Available Tables");
    println!("{}", response_text(&server.redis_list_tables().await?));

    for (step, name) in [(6, "users"), (7, "products"), (8, "orders")] {
        section(&format!("{step}. Query {name} table"));
        println!("{}", response_text(&server.redis_query_table(table(name)).await?));
    }

    println!("\n[SUCCESS] All steps completed!\n");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use dbmcp_core::store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn memory_store_passes_every_step() {
        let server = RedisMcp::new(MemoryStore::new());
        assert!(run(&server).await.expect("smoke run should not fail"));
        assert_eq!(server.control().get("test:hello").await.unwrap(), None);
        assert!(server.control().hash_get_all("test:user").await.unwrap().is_empty());
    }
}
